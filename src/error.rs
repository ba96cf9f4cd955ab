use thiserror::Error;

use crate::payload::MAX_URI_LENGTH;

/// Every way a seal-protocol operation can abort.
///
/// All variants are terminal for the call that raised them: the caller sees
/// the error and the registry is left exactly as it was before the call.
/// Nothing here is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SealError {
    #[error("registry already initialized")]
    AlreadyInitialized,

    #[error("registry not initialized")]
    NotInitialized,

    #[error("contract is paused")]
    Paused,

    #[error("receiver must be exactly 32 bytes, got {0}")]
    InvalidReceiver(usize),

    #[error("this NFT has already been sealed")]
    AlreadySealed,

    #[error("NFT is not held at the claimed deposit address")]
    NotAtDepositAddress,

    #[error("token URI is {0} bytes, limit is {MAX_URI_LENGTH}")]
    UriTooLong(usize),

    #[error("attached {attached} does not cover the bridge fee {required}")]
    InsufficientFee { required: u128, attached: u128 },

    #[error("caller is not the registry owner")]
    NotOwner,
}
