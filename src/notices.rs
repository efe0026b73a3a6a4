//! User-facing notice list.
//!
//! Feed and vote operations never propagate errors past the point of
//! use; they record a notice here and keep their held data intact. The
//! center is shared and cloneable, so every component reports into one
//! list and a front end drains or dismisses from it.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// A single dismissable notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    /// Short user-facing line.
    pub summary: String,
    /// Longer diagnostic text, e.g. the underlying error.
    pub detail: String,
}

/// Shared notice list. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct NoticeCenter {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        tracing::debug!(severity = ?notice.severity, summary = %notice.summary, "notice");
        self.inner.lock().unwrap().push(notice);
    }

    pub fn error(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Notice {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn warn(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Notice {
            severity: Severity::Warn,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn info(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Notice {
            severity: Severity::Info,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    /// Remove the notice at `index`. Out-of-range indices are ignored.
    pub fn dismiss(&self, index: usize) {
        let mut notices = self.inner.lock().unwrap();
        if index < notices.len() {
            notices.remove(index);
        }
    }

    /// Take every pending notice, leaving the list empty.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.inner.lock().unwrap())
    }

    /// Copy of the current notices, newest last.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
