//! Per-file upload lifecycle.
//!
//! ```text
//! Queued --Started--> Uploading --Progress(sent == total)--> Processing
//!                       |   ^                                    |
//!                       |   +-- Progress                         |
//!                       +---------- Completed / Failed ----------+--> Succeeded | Failed
//! ```
//!
//! [`UploadTask::apply`] is the only way to move between states. Every
//! event/state pair is listed; anything else is a [`TransitionError`].

use chrono::{DateTime, Utc};

use crate::config::SUCCESS_STATUS;
use crate::types::{TransitionError, TransportError, UploadError};

/// Notification from the transport for one transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferEvent {
    /// The request was handed to the transport.
    Started,
    /// Bytes handed to the transport so far.
    Progress { loaded: u64, total: u64 },
    /// The server replied.
    Completed { status: u16, body: String },
    /// The transfer ended without a status.
    Failed(TransportError),
}

/// Lifecycle phase of an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadState {
    Queued,
    Uploading,
    Processing { started_at: DateTime<Utc> },
    Succeeded { body: String },
    Failed { error: UploadError },
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Succeeded { .. } | UploadState::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Queued => "queued",
            UploadState::Uploading => "uploading",
            UploadState::Processing { .. } => "processing",
            UploadState::Succeeded { .. } => "succeeded",
            UploadState::Failed { .. } => "failed",
        }
    }
}

/// What the presenter has to render after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Progress { sent: u64, total: u64 },
    ProcessingStarted { started_at: DateTime<Utc> },
    Finished(Result<String, UploadError>),
}

/// One accepted file and where its transfer stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTask {
    id: usize,
    file_name: String,
    file_size: u64,
    bytes_sent: u64,
    bytes_total: Option<u64>,
    state: UploadState,
}

impl UploadTask {
    pub fn new(id: usize, file_name: impl Into<String>, file_size: u64) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            file_size,
            bytes_sent: 0,
            bytes_total: None,
            state: UploadState::Queued,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// `None` until the transport reports a total.
    pub fn bytes_total(&self) -> Option<u64> {
        self.bytes_total
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Server body on success, error description on failure.
    pub fn result_text(&self) -> Option<String> {
        match &self.state {
            UploadState::Succeeded { body } => Some(body.clone()),
            UploadState::Failed { error } => Some(error.to_string()),
            _ => None,
        }
    }

    pub fn processing_started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            UploadState::Processing { started_at } => Some(started_at),
            _ => None,
        }
    }

    /// Applies one transport event, returning what changed on screen.
    ///
    /// On error the task is left untouched.
    pub fn apply(
        &mut self,
        event: TransferEvent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, TransitionError> {
        match (&self.state, event) {
            (UploadState::Queued, TransferEvent::Started) => {
                self.state = UploadState::Uploading;
                Ok(Vec::new())
            }
            (UploadState::Queued, _) => Err(TransitionError::NotStarted),

            (UploadState::Succeeded { .. } | UploadState::Failed { .. }, _) => {
                Err(TransitionError::AlreadyFinished)
            }

            (_, TransferEvent::Started) => Err(TransitionError::AlreadyStarted),

            (UploadState::Uploading, TransferEvent::Progress { loaded, total }) => {
                let sent = self.record_progress(loaded, total)?;
                let mut effects = vec![Effect::Progress { sent, total }];
                if sent == total {
                    self.state = UploadState::Processing { started_at: now };
                    effects.push(Effect::ProcessingStarted { started_at: now });
                }
                Ok(effects)
            }
            (UploadState::Processing { .. }, TransferEvent::Progress { loaded, .. }) => {
                // Repeated "everything sent" notifications are harmless.
                if loaded < self.bytes_sent {
                    return Err(TransitionError::ProgressRegressed {
                        previous: self.bytes_sent,
                        reported: loaded,
                    });
                }
                Ok(Vec::new())
            }

            (_, TransferEvent::Completed { status, body }) => {
                let outcome = if status == SUCCESS_STATUS {
                    Ok(body)
                } else {
                    Err(UploadError::Rejected { status, body })
                };
                Ok(vec![self.finish(outcome)])
            }
            (_, TransferEvent::Failed(error)) => Ok(vec![self.finish(Err(error.into()))]),
        }
    }

    fn record_progress(&mut self, loaded: u64, total: u64) -> Result<u64, TransitionError> {
        let sent = loaded.min(total);
        if sent < self.bytes_sent {
            return Err(TransitionError::ProgressRegressed {
                previous: self.bytes_sent,
                reported: loaded,
            });
        }
        self.bytes_sent = sent;
        self.bytes_total = Some(total);
        Ok(sent)
    }

    fn finish(&mut self, outcome: Result<String, UploadError>) -> Effect {
        if let Some(total) = self.bytes_total {
            self.bytes_sent = total;
        }
        self.state = match &outcome {
            Ok(body) => UploadState::Succeeded { body: body.clone() },
            Err(error) => UploadState::Failed {
                error: error.clone(),
            },
        };
        Effect::Finished(outcome)
    }
}
