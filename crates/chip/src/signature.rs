//! Turning raw chip signatures into recoverable Ethereum signatures
//!
//! The chip returns a bare `r || s` pair. Before it can be used on chain, `s`
//! is folded into the lower half of the curve order and the recovery id is
//! found by trying each candidate against the chip's known public key.

use alloy_primitives::{B256, ChainId, U256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::PrimeField;
use k256::elliptic_curve::scalar::IsHigh;
use k256::{FieldBytes, PublicKey, Scalar};
use tracing::warn;

use crate::{Error, Result, lengths};

/// Fold `s` into the lower half of the curve order
pub fn canonicalize(s: Scalar) -> Scalar {
    if bool::from(s.is_high()) { -s } else { s }
}

/// Canonicalize a big-endian 32-byte `s`
///
/// Values at or above the curve order are not scalars and are rejected.
pub fn canonicalize_bytes(s: &[u8; 32]) -> Result<[u8; 32]> {
    let scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*s)))
        .ok_or(Error::InvalidData("s is not below the curve order"))?;
    Ok(canonicalize(scalar).to_bytes().into())
}

/// Find the recovery id that recovers `public_key` from `(hash, signature)`
pub fn compute_recovery_id(
    hash: &B256,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<RecoveryId> {
    let verifying_key = VerifyingKey::from(public_key);
    RecoveryId::trial_recovery_from_prehash(&verifying_key, hash.as_slice(), signature).map_err(
        |e| {
            warn!(error = %e, "No recovery id reproduces the chip public key");
            Error::RecoveryFailed
        },
    )
}

/// Encode a recovery id as `v`
///
/// A non-zero `chain_id` gives the EIP-155 form `recid + chain_id * 2 + 35`,
/// otherwise the legacy `recid + 27`. Chain ids whose `v` does not fit in a
/// `u64` are rejected with [`Error::InvalidParameter`].
pub fn encode_v(recovery_id: RecoveryId, chain_id: ChainId) -> Result<u64> {
    let recid = u64::from(recovery_id.to_byte());
    if chain_id == 0 {
        return Ok(recid + 27);
    }
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + recid))
        .ok_or(Error::InvalidParameter("chain id too large to encode in v"))
}

/// Check that every recovery id can be encoded as `v` for `chain_id`
pub fn check_chain_id(chain_id: ChainId) -> Result<()> {
    encode_v(RecoveryId::new(true, true), chain_id).map(|_| ())
}

/// Canonicalize a raw `r || s` signature from the chip and attach `v`
pub fn finalize(
    chain_id: ChainId,
    hash: &B256,
    raw: &[u8],
    public_key: &PublicKey,
) -> Result<RecoverableSignature> {
    if raw.len() != lengths::SIGNATURE {
        return Err(Error::InvalidData("signature must be 64 bytes"));
    }
    let (r, s) = raw.split_at(32);

    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(s);
    let s = canonicalize_bytes(&s_bytes)?;

    let mut r_bytes = [0u8; 32];
    r_bytes.copy_from_slice(r);

    let signature = Signature::from_scalars(r_bytes, s)?;
    let recovery_id = compute_recovery_id(hash, &signature, public_key)?;

    Ok(RecoverableSignature {
        signature,
        recovery_id,
        v: encode_v(recovery_id, chain_id)?,
    })
}

/// Low-S signature with its recovery id and encoded `v`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
    v: u64,
}

impl RecoverableSignature {
    /// `r` as 32 big-endian bytes
    pub fn r(&self) -> B256 {
        B256::from_slice(&self.signature.r().to_bytes())
    }

    /// Canonical `s` as 32 big-endian bytes
    pub fn s(&self) -> B256 {
        B256::from_slice(&self.signature.s().to_bytes())
    }

    /// Encoded `v`, EIP-155 or legacy depending on the chain id used
    pub const fn v(&self) -> u64 {
        self.v
    }

    /// Parity of the recovered point's y coordinate
    pub fn y_parity(&self) -> bool {
        self.recovery_id.is_y_odd()
    }

    /// Recovery id found for the signature
    pub const fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Underlying ECDSA signature
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// `r || s || parity`
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&self.signature.to_bytes());
        out[64] = self.y_parity() as u8;
        out
    }
}

impl From<RecoverableSignature> for alloy_primitives::Signature {
    fn from(signature: RecoverableSignature) -> Self {
        Self::new(
            U256::from_be_bytes(signature.r().0),
            U256::from_be_bytes(signature.s().0),
            signature.y_parity(),
        )
    }
}
