use std::fmt;
use std::time::Duration;

pub type NotificationId = u64;

/// How long a notification stays visible unless dismissed earlier.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at_ms: u64,
}

/// Transient message queue in arrival order.
///
/// Expiry is driven from outside: whoever posts is expected to schedule a
/// removal after [`NOTIFICATION_TTL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCenter {
    next_id: NotificationId,
    queue: Vec<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self {
            next_id: 1,
            queue: Vec::new(),
        }
    }
}

impl NotificationCenter {
    pub fn post(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        created_at_ms: u64,
    ) -> NotificationId {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Notification {
            id,
            message: message.into(),
            severity,
            created_at_ms,
        });
        id
    }

    /// Removes `id` if present. Returns whether anything was removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.queue.iter().any(|n| n.id == id)
    }

    pub fn entries(&self) -> &[Notification] {
        &self.queue
    }
}
