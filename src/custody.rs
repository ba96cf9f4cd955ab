//! Custody verification seam between the protocol core and a host chain.

use crate::error::SealError;
use crate::payload::MAX_URI_LENGTH;

/// What a host binding attests about one asset at one point in time:
/// the canonical identity triple plus the current owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAttestation {
    pub nft_contract: [u8; 32],
    pub token_id: [u8; 32],
    /// Current owner in the same canonical 32-byte form as deposit
    /// addresses, so the two compare directly.
    pub owner: [u8; 32],
    /// Metadata URI as read from the chain. May legitimately be empty.
    pub token_uri: String,
}

/// Host-chain adapter supplying custody reads and identity encoding.
/// This is the only part of the protocol each chain implements itself;
/// the registry, orchestrator, and codec are shared.
pub trait CustodyVerifier {
    /// Chain-native asset handle (e.g. a contract account + token id pair,
    /// a mint pubkey, an object id).
    type Asset;

    /// Canonical (nft_contract, token_id) identity pair for an asset
    /// handle. Pure identity encoding, no chain state is read — this is
    /// what makes the replay check cheap for already-sealed assets.
    fn asset_identity(&self, asset: &Self::Asset) -> ([u8; 32], [u8; 32]);

    /// Read the asset's current owner and metadata URI. An asset the chain
    /// does not know about cannot be at any deposit address: fail with
    /// `NotAtDepositAddress`.
    fn attest(&self, asset: &Self::Asset) -> Result<AssetAttestation, SealError>;
}

impl AssetAttestation {
    /// Custody check: the asset must currently sit at the claimed deposit
    /// address.
    pub fn require_held_at(&self, deposit_address: &[u8; 32]) -> Result<(), SealError> {
        if &self.owner != deposit_address {
            return Err(SealError::NotAtDepositAddress);
        }
        Ok(())
    }

    /// Bound the URI so dispatch cost and the relayer's read size stay
    /// bounded.
    pub fn check_uri_length(&self) -> Result<(), SealError> {
        if self.token_uri.len() > MAX_URI_LENGTH {
            return Err(SealError::UriTooLong(self.token_uri.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attestation(uri: &str) -> AssetAttestation {
        AssetAttestation {
            nft_contract: [1; 32],
            token_id: [2; 32],
            owner: [3; 32],
            token_uri: uri.to_string(),
        }
    }

    #[test]
    fn test_require_held_at() {
        let att = attestation("ipfs://x");
        assert!(att.require_held_at(&[3; 32]).is_ok());
        assert_eq!(
            att.require_held_at(&[4; 32]),
            Err(SealError::NotAtDepositAddress)
        );
    }

    #[test]
    fn test_uri_bound() {
        assert!(attestation("").check_uri_length().is_ok());
        assert!(attestation(&"u".repeat(MAX_URI_LENGTH)).check_uri_length().is_ok());
        assert_eq!(
            attestation(&"u".repeat(MAX_URI_LENGTH + 1)).check_uri_length(),
            Err(SealError::UriTooLong(MAX_URI_LENGTH + 1))
        );
    }
}
