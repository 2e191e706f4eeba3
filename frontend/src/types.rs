//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Error Types** - transport and upload failures, refused transitions
//! - **Display Types** - the progress and detail slots of a row

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Failure of the transfer itself, before any status code was received.
///
/// The `Display` text is what the user sees in the row's detail slot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, reset, or otherwise lost.
    #[error("Upload failed: network error")]
    Network,
    /// The request was aborted before a response arrived.
    #[error("Upload failed: transfer aborted")]
    Aborted,
    /// The transport gave up waiting for the server.
    #[error("Upload failed: request timed out")]
    TimedOut,
    /// The request could not be built or sent.
    #[error("Upload failed: {0}")]
    Setup(String),
}

/// Terminal failure of one upload.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The server answered with a non-success status. The body is shown verbatim.
    #[error("{body}")]
    Rejected { status: u16, body: String },
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An event the upload lifecycle refused to apply.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("transfer has not started yet")]
    NotStarted,
    #[error("transfer was already started")]
    AlreadyStarted,
    #[error("upload already reached a terminal state")]
    AlreadyFinished,
    #[error("progress went backwards ({reported} < {previous} bytes)")]
    ProgressRegressed { previous: u64, reported: u64 },
}

// =============================================================================
// Display Types
// =============================================================================

/// Current and maximum values of a row's progress indicator.
///
/// `None` renders an indeterminate bar (nothing reported yet).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressSlot {
    pub value: Option<u64>,
    pub max: Option<u64>,
}

impl ProgressSlot {
    /// Current value equal to maximum.
    pub fn saturate(&mut self) {
        let max = self.max.unwrap_or(1).max(1);
        self.max = Some(max);
        self.value = Some(max);
    }

    pub fn is_saturated(&self) -> bool {
        matches!((self.value, self.max), (Some(v), Some(m)) if v == m)
    }
}

/// Visual state of a row's detail slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetailStatus {
    /// Transfer in flight, nothing to show yet.
    #[default]
    Idle,
    /// All bytes sent, waiting on the server.
    Processing,
    /// Server answered 200.
    Success,
    /// Server rejected the file or the transfer failed.
    Failure,
}

impl DetailStatus {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            DetailStatus::Idle => "detail",
            DetailStatus::Processing => "detail processing",
            DetailStatus::Success => "detail success",
            DetailStatus::Failure => "detail failure",
        }
    }
}

/// Status and text of a row's detail slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailSlot {
    pub status: DetailStatus,
    pub text: String,
}
