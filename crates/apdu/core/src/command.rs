//! APDU command frames
//!
//! A command frame is a fixed 4-byte header (`CLA INS P1 P2`) optionally
//! followed by a 1-byte data length (Lc) and the data, and optionally by a
//! 1-byte expected response length (Le). Only short APDUs are supported.

use bytes::{BufMut, Bytes, BytesMut};

use crate::Error;

/// Largest data field a short APDU can carry
pub const MAX_SHORT_DATA_LEN: usize = 0xFF;

/// Expected length type for APDU commands
pub type ExpectedLength = u8;

/// Generic APDU command structure
///
/// Commands are immutable once built and only live for a single exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self::new(cla, ins, p1, p2).with_data(data)
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Command payload data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Check that the command can be serialized as a short APDU
    pub fn validate(&self) -> Result<(), Error> {
        match &self.data {
            Some(data) if data.len() > MAX_SHORT_DATA_LEN => {
                Err(Error::InvalidCommandLength(data.len()))
            }
            _ => Ok(()),
        }
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;

        if let Some(data) = &self.data {
            length += 1 + data.len();
        }

        if self.le.is_some() {
            length += 1;
        }

        length
    }

    /// Convert to raw APDU bytes
    ///
    /// Callers are expected to have checked [`Command::validate`]; an oversized
    /// data field is truncated in the Lc byte.
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if let Some(data) = &self.data {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        if data.len() == 4 {
            return Ok(command);
        }

        if data.len() == 5 {
            // Only Le present, no data
            command.le = Some(data[4]);
            return Ok(command);
        }

        let lc = data[4] as usize;
        let body_end = 5 + lc;
        if data.len() < body_end {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        if lc > 0 {
            command.data = Some(Bytes::copy_from_slice(&data[5..body_end]));
        }

        match data.len() - body_end {
            0 => {}
            1 => command.le = Some(data[body_end]),
            _ => return Err(Error::InvalidCommandLength(data.len())),
        }

        Ok(command)
    }
}

impl From<&Command> for Bytes {
    fn from(command: &Command) -> Self {
        command.to_bytes()
    }
}
