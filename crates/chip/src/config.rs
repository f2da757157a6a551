/// Response length limits handed to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipConfig {
    /// Limit for the public key read that opens a session
    pub build_response_len: usize,
    /// Limit for every other exchange
    pub response_len: usize,
}

impl ChipConfig {
    /// Limits used by the reference chip firmware
    pub const DEFAULT: Self = Self {
        build_response_len: 128,
        response_len: 255,
    };
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
