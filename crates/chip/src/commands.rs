//! Command frames understood by the chip
//!
//! Every builder returns a ready-to-send [`Command`] with class byte
//! [`CLA`](crate::CLA). Payloads are single SIMPLE-TLV records; none of the
//! commands carry an Le byte.

use alloy_primitives::B256;
use bytes::Bytes;
use lukso_apdu_core::Command;
use lukso_apdu_core::command::MAX_SHORT_DATA_LEN;

use crate::types::{Challenge, KeySelector};
use crate::{CLA, Error, Result, ins, tags, tlv};

/// Wrap `value` in a single TLV record that fits a short APDU data field
fn wrap(tag: u8, value: &[u8]) -> Result<Bytes> {
    let data = tlv::encode(tag, value)?;
    if data.len() > MAX_SHORT_DATA_LEN {
        return Err(Error::InvalidParameter(
            "command payload exceeds 255 bytes",
        ));
    }
    Ok(data)
}

fn freeze_command(ins: u8, pin: &[u8]) -> Result<Command> {
    let data = wrap(tags::TRANSACTION_PIN, pin)?;
    Ok(Command::new_with_data(
        CLA,
        ins,
        tags::TRANSACTION_PIN_STATUS,
        0x00,
        data,
    ))
}

/// DISABLE VERIFICATION: stop requiring the transaction PIN
pub fn disable_verification(pin: &[u8]) -> Result<Command> {
    freeze_command(ins::DISABLE_VERIFICATION, pin)
}

/// ENABLE VERIFICATION: require the transaction PIN again
pub fn enable_verification(pin: &[u8]) -> Result<Command> {
    freeze_command(ins::ENABLE_VERIFICATION, pin)
}

/// INTERNAL AUTHENTICATE: ask the chip to sign `challenge` with the selected key
pub fn internal_authenticate(selector: KeySelector, challenge: &Challenge) -> Result<Command> {
    let data = wrap(tags::CHALLENGE, challenge.as_bytes())?;
    Ok(Command::new_with_data(
        CLA,
        ins::INTERNAL_AUTHENTICATE,
        selector.tag(),
        0x00,
        data,
    ))
}

/// READ DATA for the attribute identified by `tag`
pub const fn read_information(tag: u8) -> Command {
    Command::new(CLA, ins::READ_DATA, 0x00, tag)
}

/// READ DATA for the manufacturer certificate chunk at `offset`
pub const fn read_certification(offset: u8) -> Command {
    Command::new(CLA, ins::READ_DATA, offset, tags::CERTIFICATE)
}

/// SIGN TRANSACTION with the blockchain key
pub fn sign_transaction_hash(hash: &B256) -> Result<Command> {
    let data = wrap(tags::TRANSACTION_HASH, hash.as_slice())?;
    Ok(Command::new_with_data(
        CLA,
        ins::SIGN_TRANSACTION,
        tags::PRIVATE_KEY_BLOCKCHAIN,
        0x00,
        data,
    ))
}
