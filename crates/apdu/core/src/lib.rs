//! Core types for APDU (Application Protocol Data Unit) exchanges
//!
//! This crate provides the building blocks used to talk to an ISO/IEC 7816-4
//! smart card over a byte-oriented request/response channel:
//!
//! - [`Command`] frames (`CLA INS P1 P2 [Lc data] [Le]`)
//! - [`Response`] frames split into payload and [`StatusWord`]
//! - the [`CardTransport`] boundary that moves raw bytes to and from a card
//! - a [`CardExecutor`] that ties the three together with tracing
//!
//! Transports are deliberately dumb: they know nothing about command structure
//! or status words. Interpretation happens in the executor and above.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

mod error;
pub use error::{Error, Result};

pub use command::Command;
pub use executor::CardExecutor;
pub use response::status::StatusWord;
pub use response::{Response, utils};
pub use transport::{CardTransport, TransportError};
