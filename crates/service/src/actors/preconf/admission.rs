//! Admission of signed events into the ordering pipeline.

use crate::actors::preconf::actor::{PreconfInboundData, PreconfSendError};
use derive_more::Constructor;
use preconf_protocol::{
    EnvelopeVerifier, InvalidSignatureError, SignedEnv, SignedFrag, SignedSeal,
};
use thiserror::Error;

/// An error admitting an event into the ordering pipeline.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The envelope signature failed verification.
    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignatureError),
    /// The ordering actor is no longer accepting events.
    #[error(transparent)]
    ChannelClosed(#[from] PreconfSendError),
}

/// Admission gate in front of the [`PreconfActor`]'s inbound channels.
///
/// Applies the injected signature-verification capability to every envelope
/// and forwards only verified events, so nothing unverified reaches the
/// ordering state. Rejected envelopes are never buffered. Undecodable input
/// does not get this far at all; it fails in the transport's wire decoding.
///
/// [`PreconfActor`]: crate::PreconfActor
#[derive(Constructor, Debug)]
pub struct PreconfAdmission<V> {
    /// The injected signature-verification capability.
    verifier: V,
    /// The actor's inbound channels.
    channels: PreconfInboundData,
}

impl<V: EnvelopeVerifier> PreconfAdmission<V> {
    /// Verifies and submits a signed environment.
    pub async fn submit_env(&self, env: SignedEnv) -> Result<(), AdmissionError> {
        self.verifier.verify_env(&env)?;
        self.channels.send_env(env).await?;
        Ok(())
    }

    /// Verifies and submits a signed fragment.
    pub async fn submit_frag(&self, frag: SignedFrag) -> Result<(), AdmissionError> {
        self.verifier.verify_frag(&frag)?;
        self.channels.send_frag(frag).await?;
        Ok(())
    }

    /// Verifies and submits a signed seal.
    pub async fn submit_seal(&self, seal: SignedSeal) -> Result<(), AdmissionError> {
        self.verifier.verify_seal(&seal)?;
        self.channels.send_seal(seal).await?;
        Ok(())
    }
}
