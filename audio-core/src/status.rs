//! Transient status notices shown after library operations

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Whether a notice reports success or failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user about the last operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

/// Holds the most recent notice until it expires
#[derive(Debug, Clone)]
pub struct StatusBoard {
    current: Option<Notice>,
    ttl: Duration,
}

impl StatusBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.post(NoticeLevel::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.post(NoticeLevel::Error, message.into());
    }

    fn post(&mut self, level: NoticeLevel, message: String) {
        self.current = Some(Notice {
            level,
            message,
            posted_at: Utc::now(),
        });
    }

    /// The notice visible at `now`, if it has not expired
    pub fn visible_at(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| now - notice.posted_at < self.ttl)
    }

    /// The notice visible right now
    pub fn current(&self) -> Option<&Notice> {
        self.visible_at(Utc::now())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(Duration::seconds(4))
    }
}
