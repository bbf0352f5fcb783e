//! # preconf-protocol
//!
//! Message types for the preconfirmation pipeline of an OP Stack block
//! producer, and the assembler that materializes a block's content from them.
//!
//! A block's construction streams as three message kinds: one [`Env`] opening
//! the block's execution context, an ordered sequence of [`Frag`]s carrying
//! slices of its transactions, and one [`Seal`] closing it. Each kind travels
//! inside a signed envelope ([`SignedEnv`], [`SignedFrag`], [`SignedSeal`])
//! whose signature is checked by an [`EnvelopeVerifier`] before admission and
//! never inspected past that point.
//!
//! [`UnsealedBlock`] accumulates delivered fragments into an ordered,
//! structurally contiguous transaction set and becomes immutable once sealed.
//!
//! Transactions are carried natively as [`OpTxEnvelope`]s; on the wire they
//! cross as their canonical EIP-2718 binary encodings, keeping the pipeline
//! decoupled from the chain's transaction format.
//!
//! [`OpTxEnvelope`]: op_alloy_consensus::OpTxEnvelope

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod envelope;
pub use envelope::{Bytes65, EnvelopeVerifier, InvalidSignatureError};

mod env;
pub use env::{Env, SignedEnv};

mod frag;
pub use frag::{Frag, FragIndex, SignedFrag};

mod seal;
pub use seal::{Seal, SignedSeal};

mod block;
pub use block::{BlockAssemblyError, UnsealedBlock};

#[cfg(test)]
pub(crate) mod test_utils;
