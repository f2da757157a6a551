use std::fmt;

use derive_more::{AsRef, Deref, Display};
use rand::RngCore;

use crate::{Error, lengths, tags};

/// Chip attributes that may be read with READ DATA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Attribute {
    /// Uncompressed public key of the blockchain key pair
    BlockchainPublicKey = tags::PUBLIC_KEY_BLOCKCHAIN,
    /// Uncompressed public key of the device key pair
    DevicePublicKey = tags::PUBLIC_KEY_DEVICE,
    /// Number of transaction signatures produced by the chip
    SignatureCounter = tags::TRANSACTION_SIGNATURE_COUNTER,
}

impl Attribute {
    /// Tag used both as P2 of READ DATA and as the response record tag
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Field name used in error reports
    pub const fn name(self) -> &'static str {
        match self {
            Self::BlockchainPublicKey => "blockchain public key",
            Self::DevicePublicKey => "device public key",
            Self::SignatureCounter => "transaction signature counter",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Attribute {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            tags::PUBLIC_KEY_BLOCKCHAIN => Ok(Self::BlockchainPublicKey),
            tags::PUBLIC_KEY_DEVICE => Ok(Self::DevicePublicKey),
            tags::TRANSACTION_SIGNATURE_COUNTER => Ok(Self::SignatureCounter),
            _ => Err(Error::InvalidParameter("tag is not a readable chip attribute")),
        }
    }
}

/// On-chip key pair selected for INTERNAL AUTHENTICATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[repr(u8)]
pub enum KeySelector {
    /// Device identity key
    #[display("device key")]
    Device = tags::PRIVATE_KEY_DEVICE,
    /// Blockchain signing key
    #[display("blockchain key")]
    Blockchain = tags::PRIVATE_KEY_BLOCKCHAIN,
}

impl KeySelector {
    /// Private key selector sent as P1
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Attribute holding the matching public key
    pub const fn public_key_attribute(self) -> Attribute {
        match self {
            Self::Device => Attribute::DevicePublicKey,
            Self::Blockchain => Attribute::BlockchainPublicKey,
        }
    }
}

impl TryFrom<u8> for KeySelector {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            tags::PRIVATE_KEY_DEVICE => Ok(Self::Device),
            tags::PRIVATE_KEY_BLOCKCHAIN => Ok(Self::Blockchain),
            _ => Err(Error::InvalidParameter("tag is not a private key selector")),
        }
    }
}

/// Random challenge for INTERNAL AUTHENTICATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRef, Deref)]
pub struct Challenge([u8; lengths::CHALLENGE]);

impl Challenge {
    /// Draw a fresh challenge from `rng`
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut challenge = [0u8; lengths::CHALLENGE];
        rng.fill_bytes(&mut challenge);
        Self(challenge)
    }

    /// Challenge bytes
    pub const fn as_bytes(&self) -> &[u8; lengths::CHALLENGE] {
        &self.0
    }
}

impl From<[u8; lengths::CHALLENGE]> for Challenge {
    fn from(bytes: [u8; lengths::CHALLENGE]) -> Self {
        Self(bytes)
    }
}

/// Result of a successful challenge-response check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum VerifyOutcome {
    /// The chip proved possession of the selected private key
    #[display("success")]
    Success,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_whitelist() {
        assert_eq!(
            Attribute::try_from(0x55).unwrap(),
            Attribute::BlockchainPublicKey
        );
        assert_eq!(Attribute::try_from(0x53).unwrap(), Attribute::DevicePublicKey);
        assert_eq!(Attribute::try_from(0x90).unwrap(), Attribute::SignatureCounter);

        for tag in [0x30, 0x52, 0x54, 0x92, 0x93] {
            assert!(matches!(
                Attribute::try_from(tag),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_key_selector() {
        assert_eq!(KeySelector::try_from(0x52).unwrap(), KeySelector::Device);
        assert_eq!(KeySelector::try_from(0x54).unwrap(), KeySelector::Blockchain);
        assert!(matches!(
            KeySelector::try_from(0x55),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(
            KeySelector::Device.public_key_attribute(),
            Attribute::DevicePublicKey
        );
        assert_eq!(KeySelector::Blockchain.tag(), 0x54);
    }

    #[test]
    fn test_challenge_is_filled_from_rng() {
        let mut rng = rand::rng();
        let a = Challenge::random(&mut rng);
        let b = Challenge::random(&mut rng);
        assert_eq!(a.as_bytes().len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        assert_eq!(VerifyOutcome::Success.to_string(), "success");
        assert_eq!(Attribute::SignatureCounter.to_string(), "transaction signature counter");
        for attribute in [
            Attribute::BlockchainPublicKey,
            Attribute::DevicePublicKey,
            Attribute::SignatureCounter,
        ] {
            assert_eq!(attribute.to_string(), attribute.name());
        }
    }
}
