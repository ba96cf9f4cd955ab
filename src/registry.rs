//! Per-deployment seal registry: replay guard, nonce, counters, admin state.

use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};

use crate::error::SealError;

/// Compute the replay-protection key for an asset:
/// SHA256(nft_contract_identity || token_identity).
pub fn seal_key(nft_contract: &[u8; 32], token_id: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(nft_contract);
    hasher.update(token_id);
    hasher.finalize().into()
}

/// Record stored for every completed seal, for later lookup by relayers and
/// explorers. Written only when the whole seal call commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealRecord {
    pub nft_contract: [u8; 32],
    pub token_id: [u8; 32],
    pub deposit_address: [u8; 32],
    pub receiver: [u8; 32],
    pub token_uri: String,
    pub nonce: u64,
    pub sequence: u64,
    pub source_chain_id: u16,
}

/// One registry exists per deployment, created by [`SealRegistry::new`]
/// during orchestrator initialization and mutated only through its methods.
///
/// The core safety property lives in `sealed`: an asset key enters the set
/// at most once for the lifetime of the registry. There is no operation
/// that removes a committed key.
#[derive(Debug, Clone)]
pub struct SealRegistry {
    owner: String,
    /// Fixed identity with the messaging bridge, assigned at initialization.
    emitter_identity: [u8; 32],
    /// Replay protection: seal_key -> sealed.
    sealed: HashSet<[u8; 32]>,
    /// Completed seal records, keyed like `sealed`.
    records: HashMap<[u8; 32], SealRecord>,
    /// Monotonically increasing, unique per outbound message.
    nonce: u64,
    /// Informational count of successful seals.
    total_sealed: u64,
    paused: bool,
}

impl SealRegistry {
    pub fn new(owner: impl Into<String>, emitter_identity: [u8; 32]) -> Self {
        Self {
            owner: owner.into(),
            emitter_identity,
            sealed: HashSet::new(),
            records: HashMap::new(),
            nonce: 0,
            total_sealed: 0,
            paused: false,
        }
    }

    /// Atomic check-then-insert into the replay set. Fails with
    /// `AlreadySealed` if the key is already present, otherwise inserts it.
    pub fn check_and_mark_sealed(&mut self, key: [u8; 32]) -> Result<(), SealError> {
        if !self.sealed.insert(key) {
            return Err(SealError::AlreadySealed);
        }
        Ok(())
    }

    /// Return the current nonce and advance it. Never reused, never
    /// decreases.
    pub fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }

    /// Store the record for a committed seal and bump the counter.
    pub(crate) fn record_seal(&mut self, key: [u8; 32], record: SealRecord) {
        self.records.insert(key, record);
        self.total_sealed += 1;
    }

    /// Undo the mutations of an aborted seal call. The host chain discards
    /// aborted transactions wholesale; in-process we restore explicitly.
    pub(crate) fn rollback_seal(&mut self, key: &[u8; 32], nonce_before: u64) {
        self.sealed.remove(key);
        self.nonce = nonce_before;
    }

    pub fn set_paused(&mut self, caller: &str, paused: bool) -> Result<(), SealError> {
        self.require_owner(caller)?;
        self.paused = paused;
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &str,
        new_owner: impl Into<String>,
    ) -> Result<(), SealError> {
        self.require_owner(caller)?;
        self.owner = new_owner.into();
        Ok(())
    }

    fn require_owner(&self, caller: &str) -> Result<(), SealError> {
        if caller != self.owner {
            return Err(SealError::NotOwner);
        }
        Ok(())
    }

    pub fn is_sealed(&self, key: &[u8; 32]) -> bool {
        self.sealed.contains(key)
    }

    pub fn get_seal_record(&self, key: &[u8; 32]) -> Option<&SealRecord> {
        self.records.get(key)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn emitter_identity(&self) -> [u8; 32] {
        self.emitter_identity
    }

    pub fn current_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn total_sealed(&self) -> u64 {
        self.total_sealed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SealRegistry {
        SealRegistry::new("alice.near", [0xEE; 32])
    }

    #[test]
    fn test_seal_key_deterministic() {
        let contract = [1u8; 32];
        let token = [2u8; 32];
        assert_eq!(seal_key(&contract, &token), seal_key(&contract, &token));
        assert_ne!(seal_key(&contract, &token), seal_key(&token, &contract));
    }

    #[test]
    fn test_check_and_mark_sealed_once() {
        let mut reg = registry();
        let key = [7u8; 32];
        assert!(!reg.is_sealed(&key));
        reg.check_and_mark_sealed(key).unwrap();
        assert!(reg.is_sealed(&key));
        assert_eq!(
            reg.check_and_mark_sealed(key),
            Err(SealError::AlreadySealed)
        );
    }

    #[test]
    fn test_nonce_strictly_increasing() {
        let mut reg = registry();
        assert_eq!(reg.next_nonce(), 0);
        assert_eq!(reg.next_nonce(), 1);
        assert_eq!(reg.next_nonce(), 2);
        assert_eq!(reg.current_nonce(), 3);
    }

    #[test]
    fn test_rollback_restores_state() {
        let mut reg = registry();
        let key = [9u8; 32];
        let nonce_before = reg.current_nonce();
        reg.check_and_mark_sealed(key).unwrap();
        reg.next_nonce();
        reg.rollback_seal(&key, nonce_before);
        assert!(!reg.is_sealed(&key));
        assert_eq!(reg.current_nonce(), nonce_before);
        assert_eq!(reg.total_sealed(), 0);
    }

    #[test]
    fn test_admin_gating() {
        let mut reg = registry();
        assert_eq!(reg.set_paused("mallory.near", true), Err(SealError::NotOwner));
        assert!(!reg.paused());

        reg.set_paused("alice.near", true).unwrap();
        assert!(reg.paused());

        assert_eq!(
            reg.transfer_ownership("mallory.near", "mallory.near"),
            Err(SealError::NotOwner)
        );
        reg.transfer_ownership("alice.near", "bob.near").unwrap();
        assert_eq!(reg.owner(), "bob.near");
        reg.set_paused("bob.near", false).unwrap();
        assert_eq!(reg.set_paused("alice.near", true), Err(SealError::NotOwner));
    }
}
