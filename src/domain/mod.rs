pub mod enums;
pub mod task;
pub mod time;
pub mod views;

pub use enums::{EditorField, Screen, UiMode};
pub use task::Task;
pub use time::{format_duration, predicted_finish_time, to_hms};
pub use views::{list_rows, running_task, status_glyph, time_remaining_today, ListRow};
