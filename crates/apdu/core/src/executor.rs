//! Executor for APDU command execution
//!
//! The executor owns a transport and performs one command/response exchange
//! per call: serialize, transmit, parse. It never interprets the status word
//! beyond logging it.

use tracing::{Level, debug, info, instrument, warn};

use crate::command::Command;
use crate::response::Response;
use crate::transport::CardTransport;
use crate::Result;

/// Card executor that pairs a transport with frame encoding and decoding
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor with the given transport
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a command and parse the card's reply
    ///
    /// A non-success status word is returned as a normal [`Response`]; only
    /// transport failures and unparseable frames are errors.
    #[instrument(
        level = "trace",
        skip(self, command),
        fields(ins = command.ins, p1 = command.p1, p2 = command.p2)
    )]
    pub fn execute(&mut self, command: &Command, max_response_len: usize) -> Result<Response> {
        command.validate()?;

        let raw = self
            .transport
            .transmit_raw(&command.to_bytes(), max_response_len)?;
        let response = Response::from_bytes(&raw)?;

        let status = response.status();
        let level = status.tracing_level();
        if level == Level::DEBUG {
            debug!(%status, "Command completed");
        } else if level == Level::INFO {
            info!(%status, description = status.description(), "Command completed with warning");
        } else {
            warn!(%status, description = status.description(), "Command rejected by card");
        }

        Ok(response)
    }
}
