use chrono::{DateTime, Duration, Utc};

/// How long a status message stays visible, in milliseconds.
pub const STATUS_TTL_MS: i64 = 3200;

pub fn status_ttl() -> Duration {
    Duration::milliseconds(STATUS_TTL_MS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Single-slot transient status line.
///
/// Posting replaces whatever was shown. Progress messages stay until
/// replaced; results expire after [`status_ttl`].
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    current: Option<StatusMessage>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `text` until [`status_ttl`] has passed.
    pub fn flash(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        let text = text.into();
        log::info!("{}", text);
        self.current = Some(StatusMessage {
            text,
            expires_at: Some(now + status_ttl()),
        });
    }

    /// Shows `text` with no deadline (e.g. while a request is in flight).
    pub fn progress(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("{}", text);
        self.current = Some(StatusMessage {
            text,
            expires_at: None,
        });
    }

    /// Visible text at `now`; expired messages are dropped.
    pub fn current(&mut self, now: DateTime<Utc>) -> Option<&str> {
        let expired = self
            .current
            .as_ref()
            .and_then(|message| message.expires_at)
            .is_some_and(|deadline| now >= deadline);
        if expired {
            self.current = None;
        }
        self.current.as_ref().map(|message| message.text.as_str())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
