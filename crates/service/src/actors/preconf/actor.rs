//! [`NodeActor`] implementation for the preconfirmation ordering sub-routine.

use crate::{
    Metrics, NodeActor,
    actors::preconf::state::{OrderingState, ReadyEvent},
};
use async_trait::async_trait;
use preconf_engine::{PreconfEngineClient, PreconfEngineResult};
use preconf_protocol::{SignedEnv, SignedFrag, SignedSeal};
use thiserror::Error;
use tokio::{select, sync::mpsc};
use tokio_util::sync::CancellationToken;

/// Default capacity of each inbound event channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default buffered-event count above which the actor warns operators.
const DEFAULT_PENDING_WARN_THRESHOLD: usize = 1024;

/// Configuration for the [`PreconfActor`].
#[derive(Debug, Clone)]
pub struct PreconfConfig {
    /// Capacity of each of the three inbound event channels.
    pub channel_capacity: usize,
    /// Buffered-event count above which the actor emits a warning.
    ///
    /// An event whose predecessor never arrives is buffered indefinitely;
    /// this threshold surfaces such growth to operators before it becomes a
    /// memory problem.
    pub pending_warn_threshold: usize,
}

impl Default for PreconfConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            pending_warn_threshold: DEFAULT_PENDING_WARN_THRESHOLD,
        }
    }
}

/// The inbound channels for the [`PreconfActor`].
///
/// These are the submission entry points of the ordering engine: producers
/// push signed events in whatever order they become available and the actor
/// delivers them in causal order. Sends are fire-and-forget; delivery
/// failures surface through logs and metrics.
#[derive(Debug, Clone)]
pub struct PreconfInboundData {
    /// Sender for block environments.
    pub env_tx: mpsc::Sender<SignedEnv>,
    /// Sender for transaction fragments.
    pub frag_tx: mpsc::Sender<SignedFrag>,
    /// Sender for block seals.
    pub seal_tx: mpsc::Sender<SignedSeal>,
}

impl PreconfInboundData {
    /// Submits a signed environment for ordering.
    pub async fn send_env(&self, env: SignedEnv) -> Result<(), PreconfSendError> {
        self.env_tx.send(env).await.map_err(|_| PreconfSendError::ChannelClosed)
    }

    /// Submits a signed fragment for ordering.
    pub async fn send_frag(&self, frag: SignedFrag) -> Result<(), PreconfSendError> {
        self.frag_tx.send(frag).await.map_err(|_| PreconfSendError::ChannelClosed)
    }

    /// Submits a signed seal for ordering.
    pub async fn send_seal(&self, seal: SignedSeal) -> Result<(), PreconfSendError> {
        self.seal_tx.send(seal).await.map_err(|_| PreconfSendError::ChannelClosed)
    }
}

/// Errors submitting an event to the [`PreconfActor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconfSendError {
    /// The actor's inbound channel is closed.
    #[error("preconf actor inbound channel closed")]
    ChannelClosed,
}

/// An error from the [`PreconfActor`].
#[derive(Debug, Error)]
pub enum PreconfActorError {
    /// An inbound channel closed while the actor was still running.
    #[error("preconf actor inbound {0} channel closed unexpectedly")]
    InboundChannelClosed(&'static str),
}

/// The [`NodeActor`] enforcing the preconfirmation delivery order.
///
/// One logical consumer selects across the three inbound channels and
/// processes exactly one event at a time: evaluate readiness, deliver the
/// full run of events it releases, then select again. Delivery calls are
/// made synchronously from within the processing step, so the execution
/// engine never observes overlapping or reordered calls.
///
/// A failed delivery call does not stall the chain: the bookkeeping has
/// already advanced, the failure is logged and counted, and subsequent
/// events keep flowing. Reconciliation of the failed call belongs to the
/// engine-client layer.
#[derive(Debug)]
pub struct PreconfActor<EC: PreconfEngineClient> {
    /// The client used to reach the execution engine.
    engine_client: EC,
    /// The actor's configuration.
    config: PreconfConfig,
    /// Readiness bookkeeping, exclusively owned by the actor task.
    state: OrderingState,
    /// Inbound environments.
    env_rx: mpsc::Receiver<SignedEnv>,
    /// Inbound fragments.
    frag_rx: mpsc::Receiver<SignedFrag>,
    /// Inbound seals.
    seal_rx: mpsc::Receiver<SignedSeal>,
    /// The cancellation token, shared between all tasks.
    cancellation: CancellationToken,
    /// Whether the buffer-depth warning is currently latched.
    above_high_water: bool,
}

impl<EC: PreconfEngineClient> PreconfActor<EC> {
    /// Creates the actor together with the inbound channel handles that feed
    /// it.
    pub fn new(
        engine_client: EC,
        config: PreconfConfig,
        cancellation: CancellationToken,
    ) -> (Self, PreconfInboundData) {
        let (env_tx, env_rx) = mpsc::channel(config.channel_capacity);
        let (frag_tx, frag_rx) = mpsc::channel(config.channel_capacity);
        let (seal_tx, seal_rx) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            engine_client,
            config,
            state: OrderingState::new(),
            env_rx,
            frag_rx,
            seal_rx,
            cancellation,
            above_high_water: false,
        };
        (actor, PreconfInboundData { env_tx, frag_tx, seal_tx })
    }

    /// Delivers the ordered run of events released by one submission.
    ///
    /// Returns `false` if cancellation was observed mid-delivery, in which
    /// case buffered state is abandoned.
    async fn dispatch(&mut self, ready: Vec<ReadyEvent>) -> bool {
        for event in ready {
            let result = select! {
                biased;

                _ = self.cancellation.cancelled() => {
                    warn!(target: "preconf", "Cancelled during delivery. Abandoning buffered state.");
                    return false;
                }
                result = self.deliver(&event) => result,
            };
            match result {
                Ok(()) => {
                    info!(
                        target: "preconf",
                        kind = event.kind(),
                        block_number = event.block_number(),
                        seq = event.seq(),
                        "Event delivered to the execution engine"
                    );
                    metrics::counter!(Metrics::EVENTS_DELIVERED, "kind" => event.kind())
                        .increment(1);
                }
                Err(err) => {
                    // The bookkeeping has already advanced past this event;
                    // stalling here would wedge every subsequent block.
                    error!(
                        target: "preconf",
                        %err,
                        kind = event.kind(),
                        block_number = event.block_number(),
                        seq = event.seq(),
                        "Execution engine rejected event delivery"
                    );
                    metrics::counter!(Metrics::DELIVERY_FAILURES).increment(1);
                }
            }
        }
        self.observe_buffers();
        true
    }

    async fn deliver(&self, event: &ReadyEvent) -> PreconfEngineResult<()> {
        match event {
            ReadyEvent::Env(env) => self.engine_client.env(env).await,
            ReadyEvent::Frag(frag) => self.engine_client.new_frag(frag).await,
            ReadyEvent::Seal(seal) => self.engine_client.seal_frag(seal).await,
        }
    }

    /// Publishes the buffer depth and warns when it crosses the configured
    /// threshold.
    fn observe_buffers(&mut self) {
        let pending = self.state.pending_len();
        metrics::gauge!(Metrics::EVENTS_BUFFERED).set(pending as f64);
        if pending > self.config.pending_warn_threshold {
            if !self.above_high_water {
                self.above_high_water = true;
                warn!(
                    target: "preconf",
                    pending,
                    threshold = self.config.pending_warn_threshold,
                    "Buffered preconfirmation events exceed the warning threshold; a predecessor event may be missing"
                );
            }
        } else {
            self.above_high_water = false;
        }
    }

    fn halt(&self, channel: &'static str) -> Result<(), PreconfActorError> {
        error!(target: "preconf", channel, "Inbound channel closed unexpectedly");
        self.cancellation.cancel();
        Err(PreconfActorError::InboundChannelClosed(channel))
    }
}

#[async_trait]
impl<EC> NodeActor for PreconfActor<EC>
where
    EC: PreconfEngineClient + 'static,
{
    type Error = PreconfActorError;
    type StartData = ();

    async fn start(mut self, _: Self::StartData) -> Result<(), Self::Error> {
        info!(target: "preconf", "Starting preconfirmation ordering actor");
        loop {
            select! {
                biased;

                _ = self.cancellation.cancelled() => {
                    info!(target: "preconf", "Received shutdown signal. Exiting preconf ordering task.");
                    return Ok(());
                }
                env = self.env_rx.recv() => {
                    let Some(env) = env else { return self.halt("env"); };
                    let ready = self.state.submit_env(env);
                    if !self.dispatch(ready).await { return Ok(()); }
                }
                frag = self.frag_rx.recv() => {
                    let Some(frag) = frag else { return self.halt("frag"); };
                    let ready = self.state.submit_frag(frag);
                    if !self.dispatch(ready).await { return Ok(()); }
                }
                seal = self.seal_rx.recv() => {
                    let Some(seal) = seal else { return self.halt("seal"); };
                    let ready = self.state.submit_seal(seal);
                    if !self.dispatch(ready).await { return Ok(()); }
                }
            }
        }
    }
}
