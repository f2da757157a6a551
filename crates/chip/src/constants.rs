/// Class byte shared by every chip command
pub const CLA: u8 = 0x00;

/// Instruction bytes
pub mod ins {
    /// Disable transaction PIN verification
    pub const DISABLE_VERIFICATION: u8 = 0x26;
    /// Enable transaction PIN verification
    pub const ENABLE_VERIFICATION: u8 = 0x28;
    /// Challenge-response with an on-chip key pair
    pub const INTERNAL_AUTHENTICATE: u8 = 0x88;
    /// Read a chip attribute or certificate chunk
    pub const READ_DATA: u8 = 0xCA;
    /// Sign a transaction hash with the blockchain key
    pub const SIGN_TRANSACTION: u8 = 0xA0;
}

/// SIMPLE-TLV tags understood by the chip
pub mod tags {
    /// Manufacturer certificate
    pub const CERTIFICATE: u8 = 0x30;
    /// Device private key selector
    pub const PRIVATE_KEY_DEVICE: u8 = 0x52;
    /// Device public key (uncompressed, 65 bytes)
    pub const PUBLIC_KEY_DEVICE: u8 = 0x53;
    /// Blockchain private key selector
    pub const PRIVATE_KEY_BLOCKCHAIN: u8 = 0x54;
    /// Blockchain public key (uncompressed, 65 bytes)
    pub const PUBLIC_KEY_BLOCKCHAIN: u8 = 0x55;
    /// Host challenge for INTERNAL AUTHENTICATE
    pub const CHALLENGE: u8 = 0x70;
    /// Chip-chosen salt mixed into the authentication digest
    pub const SALT: u8 = 0x71;
    /// Authentication signature (r || s, 64 bytes)
    pub const VERIFICATION_SIGNATURE: u8 = 0x73;
    /// Number of transaction signatures produced so far
    pub const TRANSACTION_SIGNATURE_COUNTER: u8 = 0x90;
    /// Transaction hash to sign (32 bytes)
    pub const TRANSACTION_HASH: u8 = 0x91;
    /// Transaction signature (r || s, 64 bytes)
    pub const TRANSACTION_SIGNATURE: u8 = 0x92;
    /// Transaction PIN (6 bytes)
    pub const TRANSACTION_PIN: u8 = 0x93;
    /// Transaction PIN status, also used as P1 when freezing verification
    pub const TRANSACTION_PIN_STATUS: u8 = 0x94;
    /// Remaining transaction PIN tries
    pub const TRANSACTION_PIN_TRIES_REMAINING: u8 = 0x95;
}

/// Fixed value lengths, in bytes
#[allow(missing_docs)]
pub mod lengths {
    pub const CHALLENGE: usize = 0x20;
    pub const PUBLIC_KEY: usize = 0x41;
    pub const SIGNATURE: usize = 0x40;
    pub const TRANSACTION_HASH: usize = 0x20;
    pub const TRANSACTION_PIN: usize = 0x06;
    pub const TRANSACTION_PIN_STATUS: usize = 0x01;
    pub const TRANSACTION_PIN_TRIES_REMAINING: usize = 0x01;
}
