//! Transport traits for APDU communication with cards
//!
//! A transport moves raw bytes to the card and back. It has no knowledge of
//! command structure or status words.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// Each call is one blocking round trip. Implementations own the physical
/// channel exclusively, so a transport never has two exchanges in flight.
pub trait CardTransport: Send + Sync + fmt::Debug {
    /// Send raw APDU bytes to the card and return the response bytes
    ///
    /// `max_response_len` bounds the number of response bytes the caller is
    /// prepared to accept, excluding the 2-byte status word.
    fn transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError> {
        trace!(
            command = %hex::encode_upper(command),
            max_response_len,
            "Transmitting raw command"
        );
        let result = self.do_transmit_raw(command, max_response_len);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode_upper(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of [`CardTransport::transmit_raw`]
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Reset the transport connection
    fn reset(&mut self) -> Result<(), TransportError>;
}

impl<T: CardTransport + ?Sized> CardTransport for Box<T> {
    fn transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command, max_response_len)
    }

    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command, max_response_len)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        (**self).reset()
    }
}
