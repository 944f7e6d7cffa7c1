use chrono::{DateTime, Duration, Local};

/// Shown instead of a clock time when nothing is left to wait for
pub const FINISH_NOW: &str = "Now";

/// Shown when the finish time lies beyond what the calendar can represent
pub const FINISH_UNKNOWN: &str = "--:--";

/// Split a second count into (hours, minutes, seconds), ignoring the sign
pub fn to_hms(seconds: i64) -> (u64, u64, u64) {
    let abs = seconds.unsigned_abs();
    (abs / 3600, (abs % 3600) / 60, abs % 60)
}

/// Format a countdown as "H:MM:SS" or "MM:SS", with a leading '-' in overtime
///
/// `0` -> `"00:00"`, `-5` -> `"-00:05"`, `3661` -> `"1:01:01"`
pub fn format_duration(seconds: i64) -> String {
    let (h, m, s) = to_hms(seconds);
    let formatted = if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    };

    if seconds < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Predict the wall-clock time `offset_seconds` from now, rendered as a short time of day
///
/// Returns [`FINISH_NOW`] when the offset is not in the future, and
/// [`FINISH_UNKNOWN`] when it is too large to add to `now`.
pub fn predicted_finish_time(now: DateTime<Local>, offset_seconds: i64) -> String {
    if offset_seconds <= 0 {
        return FINISH_NOW.to_string();
    }
    Duration::try_seconds(offset_seconds)
        .and_then(|offset| now.checked_add_signed(offset))
        .map_or_else(|| FINISH_UNKNOWN.to_string(), |finish| finish.format("%H:%M").to_string())
}
