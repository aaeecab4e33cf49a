use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    pub status: NotificationStatus,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "duration_ms")]
    pub duration: StdDuration,
}

/// Caller-supplied part of a notification; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationInput {
    pub status: NotificationStatus,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<StdDuration>,
}

impl NotificationInput {
    pub fn new(status: NotificationStatus, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            description: None,
            duration: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, duration: StdDuration) -> Self {
        self.duration = Some(duration);
        self
    }
}

mod duration_ms {
    use std::time::Duration as StdDuration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &StdDuration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}
