//! PC/SC transport for APDU exchanges
//!
//! [`PcscTransport`] implements [`CardTransport`](lukso_apdu_core::CardTransport)
//! over a `pcsc::Card` the caller has already connected. Finding a reader and
//! waiting for a chip to be presented stay outside this crate.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lukso_apdu_pcsc::{PcscConfig, PcscTransport};
//! use pcsc::{Context, Protocols, Scope, ShareMode};
//!
//! let context = Context::establish(Scope::User)?;
//! let mut readers = [0u8; 2048];
//! let reader = context.list_readers(&mut readers)?.next().ok_or("no reader")?;
//! let card = context.connect(reader, ShareMode::Shared, Protocols::ANY)?;
//!
//! let transport = PcscTransport::with_config(card, PcscConfig::default());
//! # drop(transport);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

mod config;
mod error;
mod transport;

pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Disposition, Protocols};
