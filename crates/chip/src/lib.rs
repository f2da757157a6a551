//! Driver for the LUKSO NFC signing chip
//!
//! The chip keeps two secp256k1 key pairs (device and blockchain) and speaks
//! ISO 7816-4 APDUs whose payloads are SIMPLE-TLV records. This crate builds
//! those commands, opens a [`ChipSession`] over any
//! [`CardTransport`](lukso_apdu_core::CardTransport), authenticates the chip
//! by challenge-response, and turns its raw transaction signatures into
//! low-S, recoverable Ethereum signatures.
//!
//! ```no_run
//! # fn run<T: lukso_apdu_core::CardTransport>(transport: T) -> lukso_nfc_chip::Result<()> {
//! use lukso_nfc_chip::{ChipSession, KeySelector};
//!
//! let mut chip = ChipSession::build(transport)?;
//! chip.verify(KeySelector::Blockchain)?;
//! let signature = chip.sign_transaction_hash(42, &[0u8; 32].into())?;
//! println!("v = {}", signature.v());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

pub mod commands;
mod config;
mod constants;
mod error;
mod session;
pub mod signature;
pub mod tlv;
mod types;

pub use config::ChipConfig;
pub use constants::*;
pub use error::{Error, Result};
pub use session::ChipSession;
pub use signature::RecoverableSignature;
pub use tlv::{TlvError, TlvMap};
pub use types::{Attribute, Challenge, KeySelector, VerifyOutcome};
