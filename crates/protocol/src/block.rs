//! Assembly of an in-progress block from its delivered fragments.

use crate::{Env, Frag, Seal};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{B256, Bytes};
use op_alloy_consensus::OpTxEnvelope;
use thiserror::Error;

/// An error extending or sealing an [`UnsealedBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockAssemblyError {
    /// The fragment does not extend the block's current tail.
    #[error("fragment ({block_number}, {seq}) does not extend the unsealed block (expected seq {expected:?})")]
    NonContiguousFrag {
        /// The block number of the rejected fragment.
        block_number: u64,
        /// The sequence number of the rejected fragment.
        seq: u64,
        /// The sequence number that would extend the block, if the block is
        /// still extendable.
        expected: Option<u64>,
    },
    /// Sealing was attempted before the terminal fragment was appended.
    #[error("block {0} is not ready to be sealed: terminal fragment not yet appended")]
    NotReadyToSeal(u64),
    /// The block was already sealed.
    #[error("block {0} is already sealed")]
    AlreadySealed(u64),
}

/// A block under construction, accumulating fragments in delivery order until
/// it is sealed.
///
/// The assembler enforces structural contiguity independently of the ordering
/// engine's delivery-order guarantee: a fragment is accepted only if it
/// extends the current tail. Once sealed, the block is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsealedBlock {
    env: Env,
    frags: Vec<Frag>,
    seal: Option<Seal>,
}

impl UnsealedBlock {
    /// Creates an empty assembler bound to `env`.
    pub const fn new(env: Env) -> Self {
        Self { env, frags: Vec::new(), seal: None }
    }

    /// The environment this block was opened with.
    pub const fn env(&self) -> &Env {
        &self.env
    }

    /// The fragments appended so far, in ascending `seq` order.
    pub fn frags(&self) -> &[Frag] {
        &self.frags
    }

    /// Whether the block is still under construction.
    pub const fn is_open(&self) -> bool {
        self.seal.is_none()
    }

    /// Whether no fragment has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.frags.is_empty()
    }

    /// Whether the block has been sealed.
    pub const fn is_sealed(&self) -> bool {
        self.seal.is_some()
    }

    /// The seal closing this block, once [`Self::finalize`] has accepted one.
    pub const fn seal(&self) -> Option<&Seal> {
        self.seal.as_ref()
    }

    /// The hash of the sealed block, once sealed.
    pub fn hash(&self) -> Option<B256> {
        self.seal.as_ref().map(|seal| seal.block_hash)
    }

    /// The sequence number that would extend the block, or `None` once the
    /// terminal fragment has been appended.
    fn expected_seq(&self) -> Option<u64> {
        match self.frags.last() {
            None => Some(0),
            Some(tail) if tail.is_last => None,
            Some(tail) => Some(tail.seq + 1),
        }
    }

    /// Whether `candidate` structurally extends the block's current tail.
    ///
    /// True iff the candidate opens the block (`seq == 0`, nothing appended)
    /// or directly follows the most recently appended fragment, which must not
    /// be the terminal one. This check holds regardless of what the ordering
    /// engine delivered, guarding against duplicated or misrouted fragments.
    pub fn is_next_frag(&self, candidate: &Frag) -> bool {
        self.expected_seq().is_some_and(|expected| candidate.seq == expected)
    }

    /// Appends `frag` iff it extends the current tail.
    ///
    /// On a contiguity violation the block is left unchanged.
    pub fn append_frag(&mut self, frag: Frag) -> Result<(), BlockAssemblyError> {
        if !self.is_next_frag(&frag) {
            return Err(BlockAssemblyError::NonContiguousFrag {
                block_number: frag.block_number,
                seq: frag.seq,
                expected: self.expected_seq(),
            });
        }
        self.frags.push(frag);
        Ok(())
    }

    /// The block's transactions so far, flattened across fragments in
    /// fragment-then-within-fragment order.
    pub fn transactions(&self) -> impl Iterator<Item = &OpTxEnvelope> {
        self.frags.iter().flat_map(|frag| frag.txs.iter())
    }

    /// The block's transactions rendered to their canonical binary encodings,
    /// ready to hand to an execution engine that does not understand the
    /// native transaction representation.
    pub fn byte_transactions(&self) -> Vec<Bytes> {
        self.transactions().map(|tx| Bytes::from(tx.encoded_2718())).collect()
    }

    /// Seals the block, making it immutable.
    ///
    /// Accepted only after the terminal fragment has been appended and only
    /// once; the failing cases leave the block unchanged.
    pub fn finalize(&mut self, seal: Seal) -> Result<(), BlockAssemblyError> {
        if self.is_sealed() {
            return Err(BlockAssemblyError::AlreadySealed(self.env.number));
        }
        if !self.frags.last().is_some_and(|tail| tail.is_last) {
            return Err(BlockAssemblyError::NotReadyToSeal(self.env.number));
        }
        self.seal = Some(seal);
        Ok(())
    }
}
