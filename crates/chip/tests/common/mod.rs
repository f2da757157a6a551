//! Common test utilities
#![allow(dead_code, unreachable_pub, missing_docs)]

use bytes::Bytes;
use k256::ecdsa::{Signature, SigningKey};
use lukso_apdu_core::{CardTransport, Command, TransportError};
use lukso_nfc_chip::{TlvMap, ins, tags, tlv};
use sha2::{Digest, Sha256};

pub const SW_SUCCESS: [u8; 2] = [0x90, 0x00];
pub const SW_WRONG_DATA: [u8; 2] = [0x6A, 0x80];
pub const SW_DATA_NOT_FOUND: [u8; 2] = [0x6A, 0x88];
pub const SW_SECURITY_NOT_SATISFIED: [u8; 2] = [0x69, 0x82];
pub const SW_INS_NOT_SUPPORTED: [u8; 2] = [0x6D, 0x00];

/// Frame a TLV payload with a status word
pub fn reply(fields: &[(u8, &[u8])], sw: [u8; 2]) -> Bytes {
    let mut map = TlvMap::new();
    for (tag, value) in fields {
        map.insert(*tag, value.to_vec()).unwrap();
    }
    let mut out = map.to_bytes().unwrap().to_vec();
    out.extend_from_slice(&sw);
    Bytes::from(out)
}

pub fn uncompressed(key: &SigningKey) -> Vec<u8> {
    key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
}

pub fn random_key() -> SigningKey {
    SigningKey::random(&mut rand_v8::thread_rng())
}

/// Chip model that answers real command frames with a pair of k256 keys
#[derive(Debug, Clone)]
pub struct SimulatedChip {
    pub blockchain_key: SigningKey,
    pub device_key: SigningKey,
    pub salt: Vec<u8>,
    pub pin: [u8; 6],
    pub pin_required: bool,
    pub signature_counter: u32,
    pub certificate: Vec<u8>,
    /// Return signatures with `s` in the upper half of the curve order
    pub high_s: bool,
    /// Sign something other than the challenge digest
    pub forge_challenge: bool,
    /// Frames received, in order
    pub received: Vec<Command>,
    pub connected: bool,
}

impl Default for SimulatedChip {
    fn default() -> Self {
        Self {
            blockchain_key: random_key(),
            device_key: random_key(),
            salt: vec![0x5A; 16],
            pin: *b"123456",
            pin_required: true,
            signature_counter: 0,
            certificate: (0..=255u8).chain(0..=255u8).collect(),
            high_s: false,
            forge_challenge: false,
            received: Vec::new(),
            connected: true,
        }
    }
}

impl SimulatedChip {
    fn raw_signature(&self, key: &SigningKey, digest: &[u8]) -> [u8; 64] {
        let (signature, _) = key.sign_prehash_recoverable(digest).unwrap();
        if self.high_s {
            return flip_s(&signature);
        }
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&signature.to_bytes());
        raw
    }

    fn read_data(&self, command: &Command) -> Bytes {
        if command.p2 == tags::CERTIFICATE {
            let start = (command.p1 as usize).min(self.certificate.len());
            let end = (start + 128).min(self.certificate.len());
            return reply(&[(tags::CERTIFICATE, &self.certificate[start..end])], SW_SUCCESS);
        }

        match command.p2 {
            tags::PUBLIC_KEY_BLOCKCHAIN => reply(
                &[(tags::PUBLIC_KEY_BLOCKCHAIN, uncompressed(&self.blockchain_key).as_slice())],
                SW_SUCCESS,
            ),
            tags::PUBLIC_KEY_DEVICE => reply(
                &[(tags::PUBLIC_KEY_DEVICE, uncompressed(&self.device_key).as_slice())],
                SW_SUCCESS,
            ),
            tags::TRANSACTION_SIGNATURE_COUNTER => reply(
                &[(
                    tags::TRANSACTION_SIGNATURE_COUNTER,
                    &self.signature_counter.to_be_bytes()[..],
                )],
                SW_SUCCESS,
            ),
            _ => Bytes::from_static(&SW_DATA_NOT_FOUND),
        }
    }

    fn internal_authenticate(&self, command: &Command) -> Bytes {
        let key = match command.p1 {
            tags::PRIVATE_KEY_DEVICE => &self.device_key,
            tags::PRIVATE_KEY_BLOCKCHAIN => &self.blockchain_key,
            _ => return Bytes::from_static(&SW_DATA_NOT_FOUND),
        };
        let fields = tlv::decode(command.data().unwrap_or_default());
        let Some(challenge) = fields.get(tags::CHALLENGE) else {
            return Bytes::from_static(&SW_WRONG_DATA);
        };

        let mut input = challenge.to_vec();
        input.extend_from_slice(&self.salt);
        if self.forge_challenge {
            input.push(0x00);
        }
        let digest = Sha256::digest(Sha256::digest(&input));

        let signature = self.raw_signature(key, &digest);
        reply(
            &[
                (tags::SALT, self.salt.as_slice()),
                (tags::VERIFICATION_SIGNATURE, &signature[..]),
            ],
            SW_SUCCESS,
        )
    }

    fn sign_transaction(&mut self, command: &Command) -> Bytes {
        if command.p1 != tags::PRIVATE_KEY_BLOCKCHAIN {
            return Bytes::from_static(&SW_DATA_NOT_FOUND);
        }
        let fields = tlv::decode(command.data().unwrap_or_default());
        let Some(hash) = fields.get(tags::TRANSACTION_HASH) else {
            return Bytes::from_static(&SW_WRONG_DATA);
        };

        self.signature_counter += 1;
        let signature = self.raw_signature(&self.blockchain_key, hash);
        reply(&[(tags::TRANSACTION_SIGNATURE, &signature[..])], SW_SUCCESS)
    }

    fn set_verification(&mut self, command: &Command, required: bool) -> Bytes {
        let fields = tlv::decode(command.data().unwrap_or_default());
        match fields.get(tags::TRANSACTION_PIN) {
            Some(pin) if pin.as_ref() == self.pin => {
                self.pin_required = required;
                Bytes::from_static(&SW_SUCCESS)
            }
            _ => Bytes::from_static(&SW_SECURITY_NOT_SATISFIED),
        }
    }
}

impl CardTransport for SimulatedChip {
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        max_response_len: usize,
    ) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }
        let command = Command::from_bytes(command).map_err(|_| TransportError::Transmission)?;

        let response = match command.ins {
            ins::READ_DATA => self.read_data(&command),
            ins::INTERNAL_AUTHENTICATE => self.internal_authenticate(&command),
            ins::SIGN_TRANSACTION => self.sign_transaction(&command),
            ins::DISABLE_VERIFICATION => self.set_verification(&command, false),
            ins::ENABLE_VERIFICATION => self.set_verification(&command, true),
            _ => Bytes::from_static(&SW_INS_NOT_SUPPORTED),
        };
        self.received.push(command);

        if response.len() > max_response_len + 2 {
            return Err(TransportError::BufferTooSmall);
        }
        Ok(response)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }
}

/// Same signature with `s` replaced by `n - s`
pub fn flip_s(signature: &Signature) -> [u8; 64] {
    let mut raw = [0u8; 64];
    raw[..32].copy_from_slice(&signature.r().to_bytes());
    raw[32..].copy_from_slice(&(-*signature.s()).to_bytes());
    raw
}
