use uuid::Uuid;

/// Which top-level view the TUI is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The ordered task list
    List,
    /// Full-screen focus view for one task
    Focus(Uuid),
    /// Compact view of whatever is running
    Mini,
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    EditingTask, // Editing an existing task
}

/// Field focused in the task editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Name,
    Hours,
    Minutes,
    Seconds,
}

impl EditorField {
    /// Next field in Tab order
    pub fn next(&self) -> Self {
        match self {
            Self::Name => Self::Hours,
            Self::Hours => Self::Minutes,
            Self::Minutes => Self::Seconds,
            Self::Seconds => Self::Name,
        }
    }

    /// Previous field in Tab order
    pub fn prev(&self) -> Self {
        match self {
            Self::Name => Self::Seconds,
            Self::Hours => Self::Name,
            Self::Minutes => Self::Hours,
            Self::Seconds => Self::Minutes,
        }
    }

    /// Number of positions on the wheel for this field (None for the name)
    pub fn wheel_size(&self) -> Option<u32> {
        match self {
            Self::Name => None,
            Self::Hours => Some(24),
            Self::Minutes | Self::Seconds => Some(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_field_cycle() {
        let mut field = EditorField::Name;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, EditorField::Name);
        assert_eq!(EditorField::Name.prev(), EditorField::Seconds);
        assert_eq!(EditorField::Minutes.prev(), EditorField::Hours);
    }

    #[test]
    fn test_wheel_sizes() {
        assert_eq!(EditorField::Name.wheel_size(), None);
        assert_eq!(EditorField::Hours.wheel_size(), Some(24));
        assert_eq!(EditorField::Minutes.wheel_size(), Some(60));
        assert_eq!(EditorField::Seconds.wheel_size(), Some(60));
    }
}
