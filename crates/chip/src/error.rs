use lukso_apdu_core::StatusWord;
use lukso_apdu_core::response::error::{ResponseError, StatusError};
use lukso_apdu_core::transport::TransportError;

use crate::tlv::TlvError;

/// Result type for chip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chip operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-related errors, surfaced unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The chip's reply was not a valid response frame
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A command frame could not be built or sent
    #[error("Command error: {0}")]
    Command(lukso_apdu_core::Error),

    /// The chip answered with a non-success status word
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The chip did not answer the public key read that opens a session
    #[error("Chip unreadable: status {0}")]
    ChipUnreadable(StatusWord),

    /// Unsupported tag or key selector, rejected before anything was sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Success status, but an expected TLV record was absent
    #[error("Missing field in chip response: {name} (tag {tag:#04x})")]
    MissingField {
        /// Tag that was expected
        tag: u8,
        /// Human readable field name
        name: &'static str,
    },

    /// The chip failed a cryptographic check and must not be trusted
    #[error("Invalid chip: {0}")]
    InvalidChip(String),

    /// No recovery id reproduces the session's public key
    #[error("Recovery failed: signature does not recover to the chip's public key")]
    RecoveryFailed,

    /// A chip-supplied value has the wrong shape
    #[error("Invalid data: {0}")]
    InvalidData(&'static str),

    /// TLV encoding failure
    #[error(transparent)]
    Tlv(#[from] TlvError),

    /// Signature or key rejected by k256
    #[error(transparent)]
    EcdsaSignatureError(#[from] k256::ecdsa::Error),
}

impl Error {
    /// Status word carried by this error, if the chip reported one
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status(e) => Some(e.status),
            Self::ChipUnreadable(status) => Some(*status),
            _ => None,
        }
    }

    pub(crate) const fn missing(tag: u8, name: &'static str) -> Self {
        Self::MissingField { tag, name }
    }
}

impl From<lukso_apdu_core::Error> for Error {
    fn from(error: lukso_apdu_core::Error) -> Self {
        match error {
            lukso_apdu_core::Error::Transport(e) => Self::Transport(e),
            lukso_apdu_core::Error::Response(e) => Self::Response(e),
            other => Self::Command(other),
        }
    }
}
