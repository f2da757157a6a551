//! Error types specific to APDU responses

use super::status::StatusWord;

/// Error for a non-success status word in an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Status error {status}")]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Get the status word
    pub const fn status_word(&self) -> StatusWord {
        self.status
    }

    /// Status word as four upper-case hex characters
    pub fn code(&self) -> String {
        self.status.to_string()
    }
}

impl From<StatusWord> for StatusError {
    fn from(status: StatusWord) -> Self {
        Self { status }
    }
}

/// Error for APDU response framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// Fewer than the two bytes of a status word were received
    #[error("Incomplete response")]
    Incomplete,
}
