//! The execution engine client contract.

use async_trait::async_trait;
use preconf_protocol::{SignedEnv, SignedFrag, SignedSeal};
use std::fmt::Debug;
use thiserror::Error;

/// The result of a preconfirmation engine client call.
pub type PreconfEngineResult<T> = Result<T, PreconfEngineClientError>;

/// Error making requests to the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconfEngineClientError {
    /// Error making a request to the engine. The request never made it there.
    #[error("error making a request to the engine: {0}")]
    RequestError(String),

    /// Error receiving a response from the engine.
    /// The request may or may not have been applied.
    #[error("error receiving a response from the engine: {0}")]
    ResponseError(String),
}

/// Client used to stream preconfirmation events to the execution engine.
///
/// Each call is expected to apply its payload and report success or failure.
/// The ordering service performs no retries and keeps advancing the causal
/// chain past a failed call, so implementations must tolerate at-least-once
/// redelivery if a surrounding layer retries.
#[async_trait]
pub trait PreconfEngineClient: Debug + Send + Sync {
    /// Opens the execution environment for a new block.
    async fn env(&self, env: &SignedEnv) -> PreconfEngineResult<()>;

    /// Applies the next transaction fragment of an open block.
    async fn new_frag(&self, frag: &SignedFrag) -> PreconfEngineResult<()>;

    /// Seals a block whose terminal fragment has been applied.
    async fn seal_frag(&self, seal: &SignedSeal) -> PreconfEngineResult<()>;
}
