//! Binary payload codec for seal attestation messages.
//!
//! This layout is the portable wire contract: every host chain's binding
//! must emit byte-identical payloads so a single relayer can consume
//! messages regardless of origin chain.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Payload type tag for a seal attestation.
pub const PAYLOAD_TYPE_SEAL: u8 = 0x01;

/// Maximum token URI length (matches the EVM constant).
pub const MAX_URI_LENGTH: usize = 2048;

/// Length of the fixed-offset prefix; URI bytes follow with no length prefix.
pub const SEAL_PAYLOAD_MIN_LEN: usize = 131;

/// Encode a variable-length string identity (account id, token id) into
/// 32 bytes via SHA-256.
///
/// Chains with string-keyed identities (e.g. NEAR account ids like
/// "alice.near", token ids like "cool-nft-42") have no fixed-width native
/// form. The wire format requires a 32-byte value; SHA-256 gives a
/// deterministic one.
pub fn encode_string_identity(raw: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hasher.finalize().into()
}

/// Encode a 20-byte EVM address into 32 bytes by left-padding with zeros,
/// the canonical form EVM chains use on the wire.
pub fn encode_evm_address(address: &[u8; 20]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(address);
    out
}

/// Build the binary seal attestation payload.
///
/// Wire format (all multi-byte integers big-endian):
///   Offset  Size  Field            Encoding
///   0       1     payload_type     u8 = 0x01
///   1       2     source_chain     u16 big-endian
///   3       32    nft_contract     canonical 32-byte identity
///   35      32    token_id         canonical 32-byte identity
///   67      32    deposit_address  canonical 32-byte identity
///   99      32    receiver         raw destination-chain identity
///   131     var   token_uri        raw UTF-8, no length prefix
///
/// Total minimum: 131 bytes (empty URI). Encoding never fails; the
/// orchestrator enforces [`MAX_URI_LENGTH`] before calling.
pub fn build_seal_payload(
    source_chain_id: u16,
    nft_contract: &[u8; 32],
    token_id: &[u8; 32],
    deposit_address: &[u8; 32],
    receiver: &[u8; 32],
    token_uri: &str,
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(SEAL_PAYLOAD_MIN_LEN + token_uri.len());

    payload.push(PAYLOAD_TYPE_SEAL);
    payload.extend_from_slice(&source_chain_id.to_be_bytes());
    payload.extend_from_slice(nft_contract);
    payload.extend_from_slice(token_id);
    payload.extend_from_slice(deposit_address);
    payload.extend_from_slice(receiver);
    payload.extend_from_slice(token_uri.as_bytes());

    debug_assert!(payload.len() >= SEAL_PAYLOAD_MIN_LEN, "Payload too short");

    payload
}

/// A decoded seal attestation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealPayload {
    pub source_chain_id: u16,
    pub nft_contract: [u8; 32],
    pub token_id: [u8; 32],
    pub deposit_address: [u8; 32],
    pub receiver: [u8; 32],
    pub token_uri: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadDecodeError {
    #[error("payload is {0} bytes, need at least {SEAL_PAYLOAD_MIN_LEN}")]
    Truncated(usize),

    #[error("unknown payload type {0:#04x}")]
    UnknownPayloadType(u8),
}

/// Structural inverse of [`build_seal_payload`]: fixed-offset slicing for
/// the first 131 bytes, remainder is the URI.
pub fn parse_seal_payload(bytes: &[u8]) -> Result<SealPayload, PayloadDecodeError> {
    if bytes.len() < SEAL_PAYLOAD_MIN_LEN {
        return Err(PayloadDecodeError::Truncated(bytes.len()));
    }
    if bytes[0] != PAYLOAD_TYPE_SEAL {
        return Err(PayloadDecodeError::UnknownPayloadType(bytes[0]));
    }

    fn field(bytes: &[u8], offset: usize) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes[offset..offset + 32]);
        out
    }

    Ok(SealPayload {
        source_chain_id: u16::from_be_bytes([bytes[1], bytes[2]]),
        nft_contract: field(bytes, 3),
        token_id: field(bytes, 35),
        deposit_address: field(bytes, 67),
        receiver: field(bytes, 99),
        token_uri: bytes[SEAL_PAYLOAD_MIN_LEN..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CHAIN_ID: u16 = 15;

    fn sample_payload(receiver: &[u8; 32], uri: &str) -> Vec<u8> {
        build_seal_payload(
            CHAIN_ID,
            &encode_string_identity("nft.paras.near"),
            &encode_string_identity("42"),
            &encode_string_identity("alice.near"),
            receiver,
            uri,
        )
    }

    #[test]
    fn test_payload_encoding_minimum() {
        let payload = sample_payload(&[0xAA; 32], "");

        assert_eq!(payload.len(), 131);
        assert_eq!(payload[0], 0x01); // payload_type
        assert_eq!(payload[1], 0x00); // source_chain high byte
        assert_eq!(payload[2], 0x0F); // source_chain low byte (15)
    }

    #[test]
    fn test_payload_encoding_with_uri() {
        let uri = "ipfs://QmTest123";
        let payload = sample_payload(&[0xBB; 32], uri);

        assert_eq!(payload.len(), 131 + uri.len());
        assert_eq!(&payload[131..], uri.as_bytes());
    }

    #[test]
    fn test_field_offsets() {
        let contract = encode_string_identity("nft.paras.near");
        let token = encode_string_identity("42");
        let deposit = encode_string_identity("alice.near");
        let receiver = [0x42u8; 32];
        let payload = sample_payload(&receiver, "");

        assert_eq!(&payload[3..35], &contract);
        assert_eq!(&payload[35..67], &token);
        assert_eq!(&payload[67..99], &deposit);
        assert_eq!(&payload[99..131], &receiver);
    }

    #[test]
    fn test_encode_string_identity_deterministic() {
        let a = encode_string_identity("alice.near");
        let b = encode_string_identity("alice.near");
        assert_eq!(a, b);

        let c = encode_string_identity("bob.near");
        assert_ne!(a, c);
    }

    #[test]
    fn test_encode_evm_address_left_padded() {
        let padded = encode_evm_address(&[0x11; 20]);
        assert_eq!(&padded[..12], &[0u8; 12]);
        assert_eq!(&padded[12..], &[0x11; 20]);
    }

    #[test]
    fn test_parse_truncated() {
        let payload = sample_payload(&[0; 32], "");
        assert_eq!(
            parse_seal_payload(&payload[..130]),
            Err(PayloadDecodeError::Truncated(130))
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let mut payload = sample_payload(&[0; 32], "");
        payload[0] = 0x02;
        assert_eq!(
            parse_seal_payload(&payload),
            Err(PayloadDecodeError::UnknownPayloadType(0x02))
        );
    }

    proptest! {
        #[test]
        fn prop_parse_inverts_build(
            chain_id in any::<u16>(),
            contract in any::<[u8; 32]>(),
            token in any::<[u8; 32]>(),
            deposit in any::<[u8; 32]>(),
            receiver in any::<[u8; 32]>(),
            uri in ".{0,64}",
        ) {
            let bytes =
                build_seal_payload(chain_id, &contract, &token, &deposit, &receiver, &uri);
            prop_assert_eq!(bytes.len(), 131 + uri.len());

            let decoded = parse_seal_payload(&bytes).unwrap();
            prop_assert_eq!(decoded.source_chain_id, chain_id);
            prop_assert_eq!(decoded.nft_contract, contract);
            prop_assert_eq!(decoded.token_id, token);
            prop_assert_eq!(decoded.deposit_address, deposit);
            prop_assert_eq!(decoded.receiver, receiver);
            prop_assert_eq!(decoded.token_uri, uri.as_bytes());
        }
    }
}
