//! Signed envelope plumbing shared by all three preconfirmation message kinds.

use crate::{SignedEnv, SignedFrag, SignedSeal};
use alloy_primitives::FixedBytes;
use thiserror::Error;

/// A raw 65-byte secp256k1 signature as it appears on the wire.
///
/// The ordering core never interprets this field; it is carried opaquely and
/// checked by an [`EnvelopeVerifier`] before admission.
pub type Bytes65 = FixedBytes<65>;

/// A signed envelope failed signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid envelope signature: {reason}")]
pub struct InvalidSignatureError {
    /// Why the signature was rejected.
    pub reason: String,
}

/// Signature verification capability for signed preconfirmation envelopes.
///
/// Verification happens at admission, before an event reaches the ordering
/// state; once admitted, payloads are treated as trusted. Implementations live
/// with the transport that knows the expected signer set.
pub trait EnvelopeVerifier {
    /// Verifies the signature of a [`SignedEnv`].
    fn verify_env(&self, env: &SignedEnv) -> Result<(), InvalidSignatureError>;

    /// Verifies the signature of a [`SignedFrag`].
    fn verify_frag(&self, frag: &SignedFrag) -> Result<(), InvalidSignatureError>;

    /// Verifies the signature of a [`SignedSeal`].
    fn verify_seal(&self, seal: &SignedSeal) -> Result<(), InvalidSignatureError>;
}
