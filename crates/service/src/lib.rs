//! # preconf-service
//!
//! Causal ordering and delivery of preconfirmation events.
//!
//! A block producer streams each block's construction as three message kinds:
//! one environment, an ordered run of transaction fragments, and one seal.
//! Submissions arrive in arbitrary order, across many in-flight blocks at
//! once; the execution engine must observe them in exactly the order each
//! block's semantics require:
//!
//! ```text
//! Env(N) -> Frag(N, 0) -> ... -> Frag(N, last) -> Seal(N) -> Env(N + 1)
//! ```
//!
//! The [`PreconfActor`] is the single consumer of the three inbound streams.
//! It evaluates readiness for each received event, buffers events whose
//! predecessor has not been delivered, and on every delivery cascades through
//! the buffers to flush everything the delivery newly satisfied. Exactly one
//! event is processed to completion, cascade included, before the next
//! receive, so the per-block bookkeeping needs no locks.
//!
//! [`PreconfAdmission`] sits in front of the actor's inbound channels and
//! applies the injected signature-verification capability, so nothing
//! unverified reaches the ordering state.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod metrics;
pub use metrics::Metrics;

mod actors;
pub use actors::{
    AdmissionError, NodeActor, OrderingState, PreconfActor, PreconfActorError, PreconfAdmission,
    PreconfConfig, PreconfInboundData, PreconfSendError, ReadyEvent,
};
