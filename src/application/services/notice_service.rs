use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// A dismissable toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub severity: NoticeSeverity,
    pub message: String,
}

struct NoticeEntry {
    notice: Notice,
    expires_at: Instant,
}

struct NoticeInner {
    next_id: u64,
    entries: Vec<NoticeEntry>,
}

/// Auto-expiring user notices. Sync and polling failures land here instead
/// of halting anything; entries vanish after the TTL or when dismissed.
pub struct NoticeCenter {
    inner: RwLock<NoticeInner>,
    ttl: Duration,
}

impl NoticeCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(NoticeInner {
                next_id: 0,
                entries: Vec::new(),
            }),
            ttl,
        }
    }

    pub async fn push(&self, severity: NoticeSeverity, message: impl Into<String>) -> u64 {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let expires_at = Instant::now() + self.ttl;
        inner.entries.push(NoticeEntry {
            notice: Notice {
                id,
                severity,
                message: message.into(),
            },
            expires_at,
        });
        id
    }

    pub async fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeSeverity::Info, message).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeSeverity::Warning, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeSeverity::Error, message).await
    }

    /// Currently visible notices; expired entries are pruned on read.
    pub async fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.entries.retain(|entry| entry.expires_at > now);
        inner.entries.iter().map(|entry| entry.notice.clone()).collect()
    }

    pub async fn dismiss(&self, id: u64) {
        let mut inner = self.inner.write().await;
        inner.entries.retain(|entry| entry.notice.id != id);
    }
}
