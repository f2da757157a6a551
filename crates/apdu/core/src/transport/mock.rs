use std::collections::VecDeque;

use bytes::Bytes;

use super::{CardTransport, TransportError};

/// Scripted transport for tests
///
/// Replies are handed out in order; every command sent is recorded together
/// with the response length limit it was sent with.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Replies to return, front first
    pub responses: VecDeque<Result<Bytes, TransportError>>,
    /// Commands that were sent, with their `max_response_len`
    pub commands: Vec<(Bytes, usize)>,
    /// Whether the transport is connected
    pub connected: bool,
}

impl MockTransport {
    /// Create a new mock transport with the given responses
    pub fn new<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            responses: responses.into_iter().map(|r| Ok(r.into())).collect(),
            commands: Vec::new(),
            connected: true,
        }
    }

    /// Create a new mock transport that answers once with the given response
    pub fn with_response(response: impl Into<Bytes>) -> Self {
        Self::new([response.into()])
    }

    /// Queue a transport failure as the next reply
    pub fn push_error(&mut self, error: TransportError) {
        self.responses.push_back(Err(error));
    }

    /// Queue a raw reply
    pub fn push_response(&mut self, response: impl Into<Bytes>) {
        self.responses.push_back(Ok(response.into()));
    }
}

impl CardTransport for MockTransport {
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        self.commands.push((Bytes::copy_from_slice(command), max_response_len));

        self.responses
            .pop_front()
            .unwrap_or(Err(TransportError::Transmission))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        self.commands.clear();
        Ok(())
    }
}
