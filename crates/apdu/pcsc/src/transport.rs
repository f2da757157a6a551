//! PC/SC transport implementation

use std::fmt;

use bytes::Bytes;
use lukso_apdu_core::{CardTransport, TransportError};
use pcsc::{Card, Disposition};
use tracing::{debug, warn};

use crate::{config::PcscConfig, error::PcscError};

/// Transport over an already-connected PC/SC card handle
///
/// Reader discovery and the initial connection are left to the caller.
pub struct PcscTransport {
    /// Card connection, released on drop or after the card is removed
    card: Option<Card>,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Wrap a connected card with the default configuration
    pub fn new(card: Card) -> Self {
        Self::with_config(card, PcscConfig::default())
    }

    /// Wrap a connected card
    pub const fn with_config(card: Card, config: PcscConfig) -> Self {
        Self {
            card: Some(card),
            config,
        }
    }

    /// Configuration in use
    pub const fn config(&self) -> &PcscConfig {
        &self.config
    }

    fn transmit_command(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, PcscError> {
        let card = self.card.as_ref().ok_or(PcscError::NoCard)?;

        // Payload plus the 2-byte status word
        let mut buffer = vec![0u8; max_response_len + 2];

        match card.transmit(command, &mut buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(e) => {
                if matches!(e, pcsc::Error::RemovedCard) {
                    warn!("Card removed, releasing handle");
                    self.card = None;
                }
                Err(e.into())
            }
        }
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError> {
        self.transmit_command(command, max_response_len)
            .map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        let card = self.card.as_mut().ok_or(PcscError::NoCard)?;
        card.reconnect(
            self.config.share_mode.into(),
            self.config.protocols,
            Disposition::ResetCard,
        )
        .map_err(PcscError::from)?;
        debug!("Card reset");
        Ok(())
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(self.config.disposition) {
                debug!(error = %e, "Failed to disconnect card");
            }
        }
    }
}
