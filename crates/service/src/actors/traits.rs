//! [`NodeActor`] trait.

use async_trait::async_trait;

/// The [`NodeActor`] is an actor-like service of the node.
///
/// Actors may:
/// - Handle incoming messages.
/// - Perform background tasks.
/// - Emit new events for other components to process.
///
/// An actor is built with the configuration known up front, wired to its
/// peers through channels, and then driven to completion by `start`.
#[async_trait]
pub trait NodeActor: Send + 'static {
    /// The error type for the actor.
    type Error: std::fmt::Debug;
    /// The type necessary to pass to the start function.
    type StartData: Sized;

    /// Starts the actor.
    async fn start(self, start_data: Self::StartData) -> Result<(), Self::Error>;
}
