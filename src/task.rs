use std::fmt;

pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Board-wide task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    pub description: String,
    pub date: String, // display only
}

impl Task {
    pub fn new(id: TaskId, content: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            date: date.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
