//! Session with a single LUKSO NFC chip
//!
//! A [`ChipSession`] owns the transport for its whole life. Every operation is
//! one blocking command/response exchange taking `&mut self`, so a session
//! never has two requests in flight. The only state kept between exchanges is
//! public: the chip's blockchain public key and, once needed, its device
//! public key.

use alloy_primitives::{B256, ChainId};
use bytes::Bytes;
use k256::PublicKey;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use lukso_apdu_core::{CardExecutor, CardTransport, Command, Response};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::signature::{self, RecoverableSignature};
use crate::tlv::TlvMap;
use crate::types::{Attribute, Challenge, KeySelector, VerifyOutcome};
use crate::{ChipConfig, Error, Result, commands, lengths, tags};

/// Parse a 65-byte uncompressed SEC1 key reported by the chip
fn parse_public_key(bytes: &[u8]) -> Result<PublicKey> {
    if bytes.len() != lengths::PUBLIC_KEY {
        return Err(Error::InvalidChip(format!(
            "public key must be {} bytes, got {}",
            lengths::PUBLIC_KEY,
            bytes.len()
        )));
    }
    PublicKey::from_sec1_bytes(bytes)
        .map_err(|_| Error::InvalidChip("public key is not a secp256k1 point".to_string()))
}

/// `SHA256(SHA256(challenge || salt))`
fn challenge_digest(challenge: &Challenge, salt: &[u8]) -> [u8; 32] {
    let first = Sha256::new()
        .chain_update(challenge.as_bytes())
        .chain_update(salt)
        .finalize();
    Sha256::digest(first).into()
}

/// Connected chip, identified by its blockchain public key
#[derive(Debug)]
pub struct ChipSession<T: CardTransport> {
    executor: CardExecutor<T>,
    blockchain_public_key: PublicKey,
    device_public_key: Option<PublicKey>,
    config: ChipConfig,
}

impl<T: CardTransport> ChipSession<T> {
    /// Open a session with the default response limits
    pub fn build(transport: T) -> Result<Self> {
        Self::build_with_config(transport, ChipConfig::default())
    }

    /// Open a session by reading the chip's blockchain public key
    #[instrument(skip(transport))]
    pub fn build_with_config(transport: T, config: ChipConfig) -> Result<Self> {
        let mut executor = CardExecutor::new(transport);
        let command = commands::read_information(tags::PUBLIC_KEY_BLOCKCHAIN);
        let response = executor.execute(&command, config.build_response_len)?;

        if !response.is_success() {
            warn!(status = %response.status(), "Chip did not return its public key");
            return Err(Error::ChipUnreadable(response.status()));
        }

        let fields = TlvMap::decode(response.payload());
        let key = fields.get(tags::PUBLIC_KEY_BLOCKCHAIN).ok_or(Error::missing(
            tags::PUBLIC_KEY_BLOCKCHAIN,
            Attribute::BlockchainPublicKey.name(),
        ))?;
        let blockchain_public_key = parse_public_key(key)?;

        debug!(
            public_key = %hex::encode_upper(key),
            "Opened chip session"
        );

        Ok(Self {
            executor,
            blockchain_public_key,
            device_public_key: None,
            config,
        })
    }

    /// Blockchain public key read when the session was opened
    pub const fn blockchain_public_key(&self) -> &PublicKey {
        &self.blockchain_public_key
    }

    /// Blockchain public key as upper-case hex of its 65-byte SEC1 encoding
    pub fn blockchain_public_key_hex(&self) -> String {
        hex::encode_upper(self.blockchain_public_key.to_sec1_bytes())
    }

    /// Response limits in use
    pub const fn config(&self) -> &ChipConfig {
        &self.config
    }

    /// Close the session and hand back the transport
    pub fn into_transport(self) -> T {
        self.executor.into_transport()
    }

    fn transmit(&mut self, command: &Command) -> Result<Response> {
        Ok(self.executor.execute(command, self.config.response_len)?)
    }

    /// Read a whitelisted chip attribute
    #[instrument(skip(self))]
    pub fn read(&mut self, attribute: Attribute) -> Result<Bytes> {
        let response = self.transmit(&commands::read_information(attribute.tag()))?;
        let payload = response.into_payload()?;

        let value = TlvMap::decode(&payload)
            .get(attribute.tag())
            .cloned()
            .ok_or(Error::missing(attribute.tag(), attribute.name()))?;

        debug!(len = value.len(), "Read chip attribute");
        Ok(value)
    }

    /// Read the attribute stored under `tag`
    ///
    /// Tags outside the readable set are rejected without contacting the chip.
    pub fn read_tag(&mut self, tag: u8) -> Result<Bytes> {
        self.read(Attribute::try_from(tag)?)
    }

    /// Read a chunk of the manufacturer certificate starting at `offset`
    #[instrument(skip(self))]
    pub fn read_certificate(&mut self, offset: u8) -> Result<Bytes> {
        let response = self.transmit(&commands::read_certification(offset))?;
        let payload = response.into_payload()?;

        TlvMap::decode(&payload)
            .get(tags::CERTIFICATE)
            .cloned()
            .ok_or(Error::missing(tags::CERTIFICATE, "certificate"))
    }

    fn verifying_key(&mut self, selector: KeySelector) -> Result<VerifyingKey> {
        match selector {
            KeySelector::Blockchain => Ok(VerifyingKey::from(&self.blockchain_public_key)),
            KeySelector::Device => {
                if let Some(key) = &self.device_public_key {
                    return Ok(VerifyingKey::from(key));
                }
                let bytes = self.read(Attribute::DevicePublicKey)?;
                let key = parse_public_key(&bytes)?;
                let verifying_key = VerifyingKey::from(&key);
                self.device_public_key = Some(key);
                Ok(verifying_key)
            }
        }
    }

    /// Challenge the chip to prove it holds the selected private key
    pub fn verify(&mut self, selector: KeySelector) -> Result<VerifyOutcome> {
        self.verify_with_rng(selector, &mut rand::rng())
    }

    /// [`ChipSession::verify`] with an explicit challenge source
    #[instrument(skip(self, rng))]
    pub fn verify_with_rng<R: RngCore + ?Sized>(
        &mut self,
        selector: KeySelector,
        rng: &mut R,
    ) -> Result<VerifyOutcome> {
        let key = self.verifying_key(selector)?;
        let challenge = Challenge::random(rng);
        let command = commands::internal_authenticate(selector, &challenge)?;
        let payload = self.transmit(&command)?.into_payload()?;

        let fields = TlvMap::decode(&payload);
        let salt = fields
            .get(tags::SALT)
            .ok_or(Error::missing(tags::SALT, "salt"))?;
        let raw = fields
            .get(tags::VERIFICATION_SIGNATURE)
            .ok_or(Error::missing(tags::VERIFICATION_SIGNATURE, "verification signature"))?;

        let signature = parse_verification_signature(raw)?;
        let digest = challenge_digest(&challenge, salt);

        match key.verify_prehash(&digest, &signature) {
            Ok(()) => {
                debug!(%selector, "Chip passed challenge-response");
                Ok(VerifyOutcome::Success)
            }
            Err(e) => {
                warn!(%selector, error = %e, "Chip failed challenge-response");
                Err(Error::InvalidChip(format!(
                    "challenge signature does not match the {selector}"
                )))
            }
        }
    }

    /// Sign a transaction hash with the blockchain key
    ///
    /// The raw chip signature is canonicalized to low-S and given a `v` for
    /// `chain_id` (EIP-155 when non-zero, legacy otherwise).
    #[instrument(skip(self))]
    pub fn sign_transaction_hash(
        &mut self,
        chain_id: ChainId,
        hash: &B256,
    ) -> Result<RecoverableSignature> {
        // The chip bumps its signature counter on every signature
        signature::check_chain_id(chain_id)?;

        let response = self.transmit(&commands::sign_transaction_hash(hash)?)?;
        if !response.is_success() {
            warn!(status = %response.status(), "Chip refused to sign");
            return Err(Error::InvalidChip(format!(
                "signing rejected with status {}",
                response.status_code()
            )));
        }

        let fields = TlvMap::decode(response.payload());
        let raw = fields
            .get(tags::TRANSACTION_SIGNATURE)
            .ok_or(Error::missing(tags::TRANSACTION_SIGNATURE, "transaction signature"))?;

        let signature =
            signature::finalize(chain_id, hash, raw, &self.blockchain_public_key)?;
        debug!(v = signature.v(), "Signed transaction hash");
        Ok(signature)
    }

    /// Stop requiring the transaction PIN for signing
    #[instrument(skip_all)]
    pub fn disable_verification(&mut self, pin: &[u8]) -> Result<()> {
        check_pin(pin)?;
        self.transmit(&commands::disable_verification(pin)?)?
            .into_payload()?;
        debug!("Transaction PIN verification disabled");
        Ok(())
    }

    /// Require the transaction PIN for signing again
    #[instrument(skip_all)]
    pub fn enable_verification(&mut self, pin: &[u8]) -> Result<()> {
        check_pin(pin)?;
        self.transmit(&commands::enable_verification(pin)?)?
            .into_payload()?;
        debug!("Transaction PIN verification enabled");
        Ok(())
    }
}

fn check_pin(pin: &[u8]) -> Result<()> {
    if pin.len() != lengths::TRANSACTION_PIN {
        return Err(Error::InvalidParameter("transaction PIN must be 6 bytes"));
    }
    Ok(())
}

fn parse_verification_signature(raw: &[u8]) -> Result<Signature> {
    if raw.len() != lengths::SIGNATURE {
        return Err(Error::InvalidChip(format!(
            "challenge signature must be {} bytes, got {}",
            lengths::SIGNATURE,
            raw.len()
        )));
    }
    let (r, s) = raw.split_at(32);

    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(s);
    let s = signature::canonicalize_bytes(&s_bytes)
        .map_err(|_| Error::InvalidChip("challenge signature s is out of range".to_string()))?;

    let mut r_bytes = [0u8; 32];
    r_bytes.copy_from_slice(r);

    Signature::from_scalars(r_bytes, s)
        .map_err(|_| Error::InvalidChip("challenge signature is malformed".to_string()))
}
