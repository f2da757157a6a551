//! SIMPLE-TLV codec for chip command and response payloads
//!
//! Each record is a 1-byte tag, a length, and the value. Lengths below `0xFF`
//! take a single byte; anything longer is written as `0xFF` followed by a
//! 2-byte big-endian length, which caps values at 65535 bytes.
//!
//! Decoding is lenient: any tag byte is read, including `0x00` and `0xFF`
//! which the encoder refuses. The scan stops silently at the first record that
//! runs past the end of the buffer, and when a tag repeats only its first value
//! is kept.

use bytes::{Bytes, BytesMut};
use iso7816_tlv::simple::{Tag, Tlv};
use tracing::trace;

/// Largest value a single record can carry
pub const MAX_VALUE_LEN: usize = 0xFFFF;

/// Marker byte introducing the 3-byte length form
pub const LONG_LENGTH_MARKER: u8 = 0xFF;

/// Errors raised while encoding TLV records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TlvError {
    /// Value exceeds [`MAX_VALUE_LEN`]
    #[error("TLV value too large: {0} bytes exceeds 65535")]
    ValueTooLarge(usize),

    /// `0x00` and `0xFF` are not valid SIMPLE-TLV tags
    #[error("Tag {0:#04x} is not a valid SIMPLE-TLV tag")]
    InvalidTag(u8),

    /// Encoder failure reported by the underlying TLV implementation
    #[error("TLV encoding failed: {0}")]
    Encoding(String),
}

impl From<iso7816_tlv::TlvError> for TlvError {
    fn from(error: iso7816_tlv::TlvError) -> Self {
        Self::Encoding(error.to_string())
    }
}

fn record(tag: u8, value: &[u8]) -> Result<Tlv, TlvError> {
    if value.len() > MAX_VALUE_LEN {
        return Err(TlvError::ValueTooLarge(value.len()));
    }
    let tag = Tag::try_from(tag).map_err(|_| TlvError::InvalidTag(tag))?;
    Ok(Tlv::new(tag, value.to_vec())?)
}

/// Encode a single TLV record
///
/// A 255-byte value takes the long form `FF 00 FF`, not a single `FF` length
/// byte, since a bare `FF` always introduces the 3-byte length on decode.
pub fn encode(tag: u8, value: &[u8]) -> Result<Bytes, TlvError> {
    Ok(Bytes::from(record(tag, value)?.to_vec()))
}

/// Split the first record off `input`, returning its value and the remainder
///
/// `None` when the declared length runs past the end of `input`.
fn next_record(input: &[u8]) -> Option<(Bytes, &[u8])> {
    let (&tag, rest) = input.split_first()?;
    if Tag::try_from(tag).is_ok() {
        let (parsed, rest) = Tlv::parse(input);
        return parsed
            .ok()
            .map(|tlv| (Bytes::copy_from_slice(tlv.value()), rest));
    }

    // 0x00 and 0xFF are refused by `Tag`, but chips may still send them
    let (&first, rest) = rest.split_first()?;
    let (len, rest) = if first == LONG_LENGTH_MARKER {
        let (len, rest) = rest.split_first_chunk::<2>()?;
        (usize::from(u16::from_be_bytes(*len)), rest)
    } else {
        (usize::from(first), rest)
    };
    if rest.len() < len {
        return None;
    }
    let (value, rest) = rest.split_at(len);
    Some((Bytes::copy_from_slice(value), rest))
}

/// Decode a buffer of TLV records
pub fn decode(input: &[u8]) -> TlvMap {
    TlvMap::decode(input)
}

/// Ordered tag → value container with at most one record per tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlvMap {
    records: Vec<(u8, Bytes)>,
}

impl TlvMap {
    /// Create an empty container
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Scan `input` from the start, keeping the first record seen for each tag
    pub fn decode(mut input: &[u8]) -> Self {
        let mut map = Self::new();

        while let Some(&tag) = input.first() {
            let Some((value, rest)) = next_record(input) else {
                trace!(
                    tag = format_args!("{:#04x}", tag),
                    remaining = input.len(),
                    "Dropping truncated trailing TLV data"
                );
                break;
            };

            if map.contains(tag) {
                trace!(tag = format_args!("{:#04x}", tag), "Ignoring duplicate TLV tag");
            } else {
                map.records.push((tag, value));
            }
            input = rest;
        }

        map
    }

    /// Add a record unless the tag is already present
    ///
    /// Returns `false` when an earlier record for `tag` was kept instead.
    pub fn insert(&mut self, tag: u8, value: impl Into<Bytes>) -> Result<bool, TlvError> {
        let value = value.into();
        // Validate up front so that `to_bytes` cannot fail on stored records
        record(tag, &value)?;
        if self.contains(tag) {
            return Ok(false);
        }
        self.records.push((tag, value));
        Ok(true)
    }

    /// Raw value for `tag`, if the chip returned it
    pub fn get(&self, tag: u8) -> Option<&Bytes> {
        self.records
            .iter()
            .find_map(|(t, value)| (*t == tag).then_some(value))
    }

    /// Value for `tag` as an upper-case hex string
    pub fn get_hex(&self, tag: u8) -> Option<String> {
        self.get(tag).map(hex::encode_upper)
    }

    /// Value for `tag` as an owned byte array
    pub fn get_vec(&self, tag: u8) -> Option<Vec<u8>> {
        self.get(tag).map(|value| value.to_vec())
    }

    /// Whether a record for `tag` is present
    pub fn contains(&self, tag: u8) -> bool {
        self.records.iter().any(|(t, _)| *t == tag)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the container holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over `(tag, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Bytes)> {
        self.records.iter().map(|(tag, value)| (*tag, value))
    }

    /// Serialize every record in insertion order
    pub fn to_bytes(&self) -> Result<Bytes, TlvError> {
        let mut buf = BytesMut::new();
        for (tag, value) in &self.records {
            buf.extend_from_slice(&record(*tag, value)?.to_vec());
        }
        Ok(buf.freeze())
    }
}

impl From<&[u8]> for TlvMap {
    fn from(input: &[u8]) -> Self {
        Self::decode(input)
    }
}
