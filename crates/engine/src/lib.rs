//! # preconf-engine
//!
//! The client boundary between the preconfirmation ordering service and the
//! execution engine.
//!
//! The ordering service streams a block's construction to the execution layer
//! as three ordered calls per block: `env`, `new_frag` (repeated), and
//! `seal_frag`. [`PreconfEngineClient`] is the contract those calls go
//! through; implementations wrap whatever transport reaches the engine and
//! are consumed, not provided, by this workspace.
//!
//! The `test-utils` feature ships a recording [`MockPreconfEngine`] for
//! asserting delivery order in tests.
//!
//! [`MockPreconfEngine`]: test_utils::MockPreconfEngine

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod client;
pub use client::{PreconfEngineClient, PreconfEngineClientError, PreconfEngineResult};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
