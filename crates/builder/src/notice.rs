//! Operator-facing notices (the builder's toast messages).

use serde::Serialize;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

use crate::{Error, Result};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// An operation completed.
    Success,
    /// Something needs attention but nothing failed.
    Warn,
    /// An operation failed.
    Error,
}

/// One notice shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub text: String,
}

impl Notice {
    /// Build a notice of any kind.
    pub fn new(kind: NoticeKind, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            text: text.into(),
        }
    }

    /// An informational notice.
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, text)
    }

    /// A success notice.
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, text)
    }

    /// A warning notice.
    pub fn warn(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warn, title, text)
    }

    /// An error notice.
    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, text)
    }
}

/// Sends notices to whoever displays them.
#[derive(Debug, Clone)]
pub struct NoticeDispatcher {
    /// Notice channel.
    tx: Sender<Notice>,
}

impl NoticeDispatcher {
    /// Create a dispatcher from a notice channel.
    pub fn new(tx: Sender<Notice>) -> Self {
        Self { tx }
    }

    /// Create a dispatcher and the receiving end of a fresh bounded channel.
    pub fn channel(capacity: usize) -> (Self, Receiver<Notice>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Send a notice. Every notice is logged at info level.
    pub fn send(&self, notice: Notice) -> Result<()> {
        info!(kind = ?notice.kind, title = %notice.title, text = %notice.text, "notice");
        self.tx.try_send(notice).map_err(|_| Error::ChannelClosed)
    }

    /// Convenience helper to send an error notice.
    pub fn send_error(&self, title: &str, text: String) -> Result<()> {
        self.send(Notice::error(title, text))
    }
}
