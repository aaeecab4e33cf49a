use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::notification::{Notification, NotificationInput, NotificationStatus};

/// Transient messages that remove themselves after their duration.
#[derive(Clone)]
pub struct NotificationStore {
    items: Arc<Mutex<Vec<Notification>>>,
    default_duration: StdDuration,
}

impl NotificationStore {
    pub fn new(default_duration: StdDuration) -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            default_duration,
        }
    }

    /// Appends the notification and schedules its removal. A missing or zero
    /// duration falls back to the store default.
    pub fn add(&self, input: NotificationInput) -> String {
        let duration = input
            .duration
            .filter(|duration| !duration.is_zero())
            .unwrap_or(self.default_duration);
        let id = Uuid::new_v4().to_string();

        let notification = Notification {
            id: id.clone(),
            status: input.status,
            title: input.title,
            description: input.description,
            duration,
        };
        self.lock().push(notification);
        debug!(target: "app::notifications", %id, duration_ms = duration.as_millis() as u64, "notification added");

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                let expired = id.clone();
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    store.remove(&expired);
                });
            }
            Err(_) => {
                warn!(target: "app::notifications", %id, "no runtime, notification will not expire");
            }
        }

        id
    }

    pub fn remove(&self, id: &str) {
        self.lock().retain(|notification| notification.id != id);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn success(&self, title: impl Into<String>, description: Option<String>) -> String {
        self.add_with(NotificationStatus::Success, title, description)
    }

    pub fn error(&self, title: impl Into<String>, description: Option<String>) -> String {
        self.add_with(NotificationStatus::Error, title, description)
    }

    pub fn warning(&self, title: impl Into<String>, description: Option<String>) -> String {
        self.add_with(NotificationStatus::Warning, title, description)
    }

    pub fn info(&self, title: impl Into<String>, description: Option<String>) -> String {
        self.add_with(NotificationStatus::Info, title, description)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add_with(
        &self,
        status: NotificationStatus,
        title: impl Into<String>,
        description: Option<String>,
    ) -> String {
        let mut input = NotificationInput::new(status, title);
        input.description = description;
        self.add(input)
    }
}
