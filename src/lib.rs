//! Seal Initiation Protocol core.
//!
//! An NFT held at a custody (deposit) address on a source chain is
//! attested, encoded into a canonical binary message, and handed to a
//! generic cross-chain messaging bridge so the destination chain can mint
//! a reborn representation. Sealing is one-time and irreversible: once an
//! asset's identity enters the replay guard there is no way to remove it.
//!
//! This crate is the chain-agnostic core: the orchestrator, the seal
//! registry, and the binary payload codec are single-sourced here. A host
//! chain binds in through two seams — [`CustodyVerifier`] for custody
//! reads and identity encoding, and [`MessagingBridge`] for message
//! dispatch. Host transactions give each call all-or-nothing semantics;
//! in-process the orchestrator restores registry state itself when a call
//! aborts, so the two behave identically from the outside.

pub mod bridge;
pub mod custody;
pub mod error;
pub mod events;
pub mod payload;
pub mod registry;

pub use bridge::MessagingBridge;
pub use custody::{AssetAttestation, CustodyVerifier};
pub use error::SealError;
pub use events::{Event, EventSink, LogSink, SealInitiated, TokenUriUnavailable, VecSink};
pub use payload::{
    build_seal_payload, encode_evm_address, encode_string_identity, parse_seal_payload,
    PayloadDecodeError, SealPayload, MAX_URI_LENGTH, PAYLOAD_TYPE_SEAL, SEAL_PAYLOAD_MIN_LEN,
};
pub use registry::{seal_key, SealRecord, SealRegistry};

/// Returned to the caller of a committed seal. The emitted
/// [`SealInitiated`] event carries the same data for the relayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealReceipt {
    pub nonce: u64,
    pub sequence: u64,
    pub payload: Vec<u8>,
}

/// One deployment of the seal protocol: custody verifier and bridge
/// handles, the source chain id, and the registry context object.
///
/// Lifecycle: [`SealInitiator::new`] (no registry yet) →
/// [`SealInitiator::initialize`] exactly once → any number of seal, admin,
/// and query calls. There is no teardown.
pub struct SealInitiator<V, B, S = LogSink> {
    verifier: V,
    bridge: B,
    events: S,
    source_chain_id: u16,
    registry: Option<SealRegistry>,
}

impl<V, B, S> SealInitiator<V, B, S>
where
    V: CustodyVerifier,
    B: MessagingBridge,
    S: EventSink,
{
    pub fn new(verifier: V, bridge: B, events: S, source_chain_id: u16) -> Self {
        Self {
            verifier,
            bridge,
            events,
            source_chain_id,
            registry: None,
        }
    }

    /// Create the registry owned by `admin` and register this deployment
    /// as a bridge emitter. Exactly one registry per deployment, forever.
    pub fn initialize(&mut self, admin: &str) -> Result<(), SealError> {
        if self.registry.is_some() {
            return Err(SealError::AlreadyInitialized);
        }
        let emitter_identity = self.bridge.register_emitter();
        self.registry = Some(SealRegistry::new(admin, emitter_identity));
        tracing::info!(
            target: "seal_initiator",
            owner = admin,
            emitter = %hex::encode(emitter_identity),
            "registry initialized"
        );
        Ok(())
    }

    /// Seal an asset: verify custody at `deposit_address`, mark it sealed,
    /// publish the attestation payload to the bridge, and emit the
    /// [`SealInitiated`] event.
    ///
    /// Permissionless — correctness rests on custody verification, not on
    /// who calls. `attached_fee` is the caller's funds for the bridge fee;
    /// the fee is read live from the bridge and only the fee amount is
    /// forwarded. Any failure aborts with no state change and no events.
    pub fn initiate_seal(
        &mut self,
        caller: &str,
        asset: &V::Asset,
        deposit_address: [u8; 32],
        receiver: &[u8],
        attached_fee: u128,
    ) -> Result<SealReceipt, SealError> {
        let Self {
            verifier,
            bridge,
            events,
            source_chain_id,
            registry,
        } = self;
        let registry = registry.as_mut().ok_or(SealError::NotInitialized)?;

        if registry.paused() {
            return Err(SealError::Paused);
        }

        let receiver: [u8; 32] = receiver
            .try_into()
            .map_err(|_| SealError::InvalidReceiver(receiver.len()))?;

        // Replay check first: a second call against a sealed asset fails
        // cheaply, without re-reading ownership.
        let (nft_contract, token_id) = verifier.asset_identity(asset);
        let key = seal_key(&nft_contract, &token_id);
        let nonce_before = registry.current_nonce();
        registry.check_and_mark_sealed(key)?;

        // Events raised past this point are buffered and only reach the
        // sink if the call commits, mirroring host-chain event semantics.
        let mut pending = Vec::new();
        match run_seal(
            registry,
            verifier,
            bridge,
            *source_chain_id,
            asset,
            key,
            (nft_contract, token_id),
            deposit_address,
            receiver,
            attached_fee,
            &mut pending,
        ) {
            Ok(receipt) => {
                for event in pending {
                    events.emit(event);
                }
                tracing::info!(
                    target: "seal_initiator",
                    "SealInitiated: caller={} seq={} nonce={}",
                    caller,
                    receipt.sequence,
                    receipt.nonce
                );
                Ok(receipt)
            }
            Err(err) => {
                registry.rollback_seal(&key, nonce_before);
                Err(err)
            }
        }
    }

    // ── Admin ──

    /// Pause or unpause seal initiation. Owner only.
    pub fn set_paused(&mut self, caller: &str, paused: bool) -> Result<(), SealError> {
        let registry = self.registry.as_mut().ok_or(SealError::NotInitialized)?;
        registry.set_paused(caller, paused)?;
        tracing::info!(target: "seal_initiator", caller, paused, "pause flag updated");
        Ok(())
    }

    /// Hand the registry to a new owner. Owner only.
    pub fn transfer_ownership(&mut self, caller: &str, new_owner: &str) -> Result<(), SealError> {
        let registry = self.registry.as_mut().ok_or(SealError::NotInitialized)?;
        registry.transfer_ownership(caller, new_owner)?;
        tracing::info!(
            target: "seal_initiator",
            "ownership transferred: {} -> {}",
            caller,
            new_owner
        );
        Ok(())
    }

    // ── Views ──

    /// Has this (collection, token) identity pair been sealed?
    pub fn is_sealed(&self, nft_contract: &[u8; 32], token_id: &[u8; 32]) -> bool {
        let key = seal_key(nft_contract, token_id);
        self.registry.as_ref().is_some_and(|r| r.is_sealed(&key))
    }

    /// [`Self::is_sealed`] resolved from a chain-native asset handle.
    pub fn is_asset_sealed(&self, asset: &V::Asset) -> bool {
        let (nft_contract, token_id) = self.verifier.asset_identity(asset);
        self.is_sealed(&nft_contract, &token_id)
    }

    pub fn get_seal_record(
        &self,
        nft_contract: &[u8; 32],
        token_id: &[u8; 32],
    ) -> Option<&SealRecord> {
        let key = seal_key(nft_contract, token_id);
        self.registry.as_ref()?.get_seal_record(&key)
    }

    pub fn total_sealed(&self) -> u64 {
        self.registry.as_ref().map_or(0, SealRegistry::total_sealed)
    }

    pub fn current_nonce(&self) -> u64 {
        self.registry.as_ref().map_or(0, SealRegistry::current_nonce)
    }

    pub fn paused(&self) -> bool {
        self.registry.as_ref().is_some_and(SealRegistry::paused)
    }

    pub fn owner(&self) -> Option<&str> {
        self.registry.as_ref().map(SealRegistry::owner)
    }

    pub fn emitter_identity(&self) -> Option<[u8; 32]> {
        self.registry.as_ref().map(SealRegistry::emitter_identity)
    }

    pub fn source_chain_id(&self) -> u16 {
        self.source_chain_id
    }

    /// Current bridge fee, read live.
    pub fn message_fee(&self) -> u128 {
        self.bridge.message_fee()
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn verifier_mut(&mut self) -> &mut V {
        &mut self.verifier
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn event_sink(&self) -> &S {
        &self.events
    }
}

/// The fallible tail of a seal call, everything after the replay mark.
/// On `Err` the caller rolls the registry back, so each step here can bail
/// with `?` without worrying about partial state.
#[allow(clippy::too_many_arguments)]
fn run_seal<V: CustodyVerifier, B: MessagingBridge>(
    registry: &mut SealRegistry,
    verifier: &V,
    bridge: &mut B,
    source_chain_id: u16,
    asset: &V::Asset,
    key: [u8; 32],
    identity: ([u8; 32], [u8; 32]),
    deposit_address: [u8; 32],
    receiver: [u8; 32],
    attached_fee: u128,
    pending: &mut Vec<Event>,
) -> Result<SealReceipt, SealError> {
    let attestation = verifier.attest(asset)?;
    debug_assert_eq!(
        (attestation.nft_contract, attestation.token_id),
        identity,
        "verifier attested a different asset than it identified"
    );
    attestation.require_held_at(&deposit_address)?;

    if attestation.token_uri.is_empty() {
        pending.push(Event::TokenUriUnavailable(TokenUriUnavailable {
            nft_contract: attestation.nft_contract,
            token_id: attestation.token_id,
        }));
    }
    attestation.check_uri_length()?;

    let nonce = registry.next_nonce();

    let required = bridge.message_fee();
    if attached_fee < required {
        return Err(SealError::InsufficientFee {
            required,
            attached: attached_fee,
        });
    }

    let payload = build_seal_payload(
        source_chain_id,
        &attestation.nft_contract,
        &attestation.token_id,
        &deposit_address,
        &receiver,
        &attestation.token_uri,
    );
    // Bridge nonces are u32; the registry nonce truncates on the wire.
    let wire_nonce = (nonce & 0xFFFF_FFFF) as u32;
    let sequence = bridge.publish_message(&registry.emitter_identity(), wire_nonce, &payload, required);

    let record = SealRecord {
        nft_contract: attestation.nft_contract,
        token_id: attestation.token_id,
        deposit_address,
        receiver,
        token_uri: attestation.token_uri,
        nonce,
        sequence,
        source_chain_id,
    };
    pending.push(Event::SealInitiated(SealInitiated::from_record(
        &record,
        payload.clone(),
    )));
    registry.record_seal(key, record);

    Ok(SealReceipt {
        nonce,
        sequence,
        payload,
    })
}
