//! User-facing status notices queued by store mutations.
//!
//! Delivery (toasts, banners) belongs to the UI; the store only records what
//! happened in the wizard's language.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    /// Rejection or failure the user must act on.
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.kind == NoticeKind::Destructive
    }
}
