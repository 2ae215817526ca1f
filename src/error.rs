//! Error codes and transient user-facing notices.
//!
//! Every domain error implements [`ErrorCode`] so a host can show a short,
//! auto-dismissing message without matching on concrete error types.

use serde::Serialize;

/// Stable machine-readable code for an error, plus retry hint.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message surfaced to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: Option<&'static str>,
    pub message: String,
    pub retryable: bool,
}

impl Notice {
    /// Informational notice with no error code.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, code: None, message: message.into(), retryable: false }
    }

    /// Build an error notice from any coded error.
    #[must_use]
    pub fn error_from(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self {
            level: NoticeLevel::Error,
            code: Some(err.error_code()),
            message: err.to_string(),
            retryable: err.retryable(),
        }
    }
}
