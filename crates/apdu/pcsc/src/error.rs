//! Error types for PC/SC transport

use lukso_apdu_core::TransportError;

/// PC/SC-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PcscError {
    /// Error reported by the PC/SC stack
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// The card handle was already released
    #[error("No card connected")]
    NoCard,
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::NoCard => Self::Connection,
            PcscError::Pcsc(e) => match e {
                pcsc::Error::RemovedCard | pcsc::Error::ResetCard => Self::CardRemoved,
                pcsc::Error::NoSmartcard | pcsc::Error::UnknownReader => Self::Connection,
                pcsc::Error::Timeout => Self::Timeout,
                pcsc::Error::InsufficientBuffer => Self::BufferTooSmall,
                pcsc::Error::CommError | pcsc::Error::UnpoweredCard => Self::Transmission,
                other => Self::Driver(other as u32 as i32),
            },
        }
    }
}
