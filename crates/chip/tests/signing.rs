//! Transaction signing through a chip session

mod common;

use alloy_primitives::{Address, B256, b256};
use common::{SimulatedChip, reply, uncompressed};
use k256::ecdsa::{RecoveryId, VerifyingKey};
use k256::elliptic_curve::scalar::IsHigh;
use lukso_apdu_core::transport::MockTransport;
use lukso_nfc_chip::{ChipSession, Error, tags};

const HASH: B256 = b256!("0xdaf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53");

fn signed_by(chip: &SimulatedChip, chain_id: u64) -> lukso_nfc_chip::RecoverableSignature {
    let mut session = ChipSession::build(chip.clone()).unwrap();
    session.sign_transaction_hash(chain_id, &HASH).unwrap()
}

#[test]
fn test_sign_produces_recoverable_signature() {
    let simulated = SimulatedChip::default();
    let signature = signed_by(&simulated, 42);

    assert!(signature.v() == 119 || signature.v() == 120);
    assert_eq!(signature.v(), signature.recovery_id().to_byte() as u64 + 42 * 2 + 35);

    let recovered =
        VerifyingKey::recover_from_prehash(HASH.as_slice(), signature.signature(), signature.recovery_id())
            .unwrap();
    assert_eq!(&recovered, simulated.blockchain_key.verifying_key());

    let alloy: alloy_primitives::Signature = signature.into();
    assert_eq!(
        alloy.recover_address_from_prehash(&HASH).unwrap(),
        Address::from_public_key(simulated.blockchain_key.verifying_key())
    );
}

#[test]
fn test_sign_legacy_v() {
    let signature = signed_by(&SimulatedChip::default(), 0);
    assert!(signature.v() == 27 || signature.v() == 28);
    assert_eq!(signature.v(), 27 + signature.y_parity() as u64);
}

#[test]
fn test_sign_canonicalizes_high_s() {
    let simulated = SimulatedChip {
        high_s: true,
        ..Default::default()
    };
    let high = signed_by(&simulated, 1);
    assert!(!bool::from(high.signature().s().is_high()));

    let low = signed_by(
        &SimulatedChip {
            high_s: false,
            ..simulated.clone()
        },
        1,
    );
    // RFC 6979 nonces make both runs sign with the same k
    assert_eq!(high.r(), low.r());
    assert_eq!(high.s(), low.s());
    assert_eq!(high.v(), low.v());
}

#[test]
fn test_sign_sends_expected_frame() {
    let mut session = ChipSession::build(SimulatedChip::default()).unwrap();
    session.sign_transaction_hash(1, &HASH).unwrap();

    let simulated = session.into_transport();
    assert_eq!(simulated.signature_counter, 1);
    let frame = simulated.received[1].to_bytes();
    assert_eq!(&frame[..7], &[0x00, 0xA0, 0x54, 0x00, 0x22, 0x91, 0x20]);
    assert_eq!(&frame[7..], HASH.as_slice());
}

#[test]
fn test_sign_rejects_unencodable_chain_id_before_sending() {
    let mut session = ChipSession::build(SimulatedChip::default()).unwrap();
    assert!(matches!(
        session.sign_transaction_hash(u64::MAX / 2 + 1, &HASH),
        Err(Error::InvalidParameter(_))
    ));

    let simulated = session.into_transport();
    assert_eq!(simulated.signature_counter, 0);
    // Only the public key read that opened the session
    assert_eq!(simulated.received.len(), 1);
}

fn session_with(responses: &[&[u8]]) -> ChipSession<MockTransport> {
    let key = uncompressed(&common::random_key());
    let mut transport = MockTransport::with_response(reply(
        &[(tags::PUBLIC_KEY_BLOCKCHAIN, key.as_slice())],
        [0x90, 0x00],
    ));
    for response in responses {
        transport.push_response(response.to_vec());
    }
    ChipSession::build(transport).unwrap()
}

#[test]
fn test_sign_error_status_is_invalid_chip() {
    let mut session = session_with(&[&[0x69, 0x82]]);
    let err = session.sign_transaction_hash(1, &HASH).unwrap_err();
    assert!(matches!(err, Error::InvalidChip(ref reason) if reason.contains("6982")));
}

#[test]
fn test_sign_missing_or_malformed_signature() {
    let empty = reply(&[(tags::SALT, &[0x00])], [0x90, 0x00]);
    let short = reply(&[(tags::TRANSACTION_SIGNATURE, &[0x01; 63])], [0x90, 0x00]);
    let mut session = session_with(&[&empty, &short]);

    assert!(matches!(
        session.sign_transaction_hash(1, &HASH),
        Err(Error::MissingField {
            tag: tags::TRANSACTION_SIGNATURE,
            ..
        })
    ));
    assert!(matches!(
        session.sign_transaction_hash(1, &HASH),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_sign_by_foreign_key_fails_recovery() {
    // Signature from a key that is not the session's blockchain key
    let foreign = common::random_key();
    let (signature, _) = foreign.sign_prehash_recoverable(HASH.as_slice()).unwrap();
    let raw = reply(
        &[(tags::TRANSACTION_SIGNATURE, &signature.to_bytes()[..])],
        [0x90, 0x00],
    );

    let mut session = session_with(&[&raw]);
    assert!(matches!(
        session.sign_transaction_hash(1, &HASH),
        Err(Error::RecoveryFailed)
    ));
}

#[test]
fn test_recovery_id_matches_signer() {
    let simulated = SimulatedChip::default();
    let (_, expected) = simulated
        .blockchain_key
        .sign_prehash_recoverable(HASH.as_slice())
        .unwrap();
    let signature = signed_by(&simulated, 5);
    assert_eq!(signature.recovery_id(), expected);
    assert_eq!(RecoveryId::from_byte(signature.recovery_id().to_byte()), Some(expected));
}
