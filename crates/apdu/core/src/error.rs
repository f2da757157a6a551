//! Core error type for APDU exchanges
//!
//! Errors from the transport, response framing, and command encoding layers are
//! consolidated here so that higher layers can convert a single type.

use crate::response::error::ResponseError;
use crate::transport::error::TransportError;

/// Result type for APDU operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Core error type that encompasses all errors raised by this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport failed to move bytes to or from the card
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response frame could not be parsed
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A command frame has an invalid length
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),
}
