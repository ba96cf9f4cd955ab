//! Messaging-bridge seam.
//!
//! The cross-chain bridge (e.g. a Wormhole core contract) is an external
//! collaborator: the core publishes a message and gets back a sequence
//! number. Sequence numbers are opaque tokens assigned by the bridge; they
//! are monotone per emitter from the bridge's point of view, not from ours.

/// Generic "publish message, get sequence number" service.
pub trait MessagingBridge {
    /// Register the calling deployment as an emitter. Called exactly once,
    /// at registry initialization; the returned identity is immutable
    /// thereafter.
    fn register_emitter(&mut self) -> [u8; 32];

    /// Current message fee, read live before every dispatch.
    fn message_fee(&self) -> u128;

    /// Publish a payload. `nonce` distinguishes messages from the same
    /// emitter (bridge convention caps it at u32). Returns the assigned
    /// sequence number.
    fn publish_message(
        &mut self,
        emitter_identity: &[u8; 32],
        nonce: u32,
        payload: &[u8],
        fee: u128,
    ) -> u64;
}
