//! Readiness bookkeeping for the ordering engine.

use crate::Metrics;
use preconf_protocol::{FragIndex, SignedEnv, SignedFrag, SignedSeal};
use std::collections::{HashMap, HashSet, VecDeque};

/// An event the ordering state has released for delivery to the execution
/// engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyEvent {
    /// A block environment.
    Env(SignedEnv),
    /// A transaction fragment.
    Frag(SignedFrag),
    /// A block seal.
    Seal(SignedSeal),
}

impl ReadyEvent {
    /// The event kind, for logs and metric labels.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Env(_) => "env",
            Self::Frag(_) => "frag",
            Self::Seal(_) => "seal",
        }
    }

    /// The block number the event belongs to.
    pub const fn block_number(&self) -> u64 {
        match self {
            Self::Env(env) => env.env.number,
            Self::Frag(frag) => frag.frag.block_number,
            Self::Seal(seal) => seal.seal.block_number,
        }
    }

    /// The fragment sequence number, for fragment events.
    pub const fn seq(&self) -> Option<u64> {
        match self {
            Self::Frag(frag) => Some(frag.frag.seq),
            Self::Env(_) | Self::Seal(_) => None,
        }
    }
}

/// A delivery whose buffered dependents still need to be re-evaluated.
#[derive(Debug, Clone, Copy)]
enum Delivered {
    Env(u64),
    Frag { index: FragIndex, is_last: bool },
    Seal(u64),
}

/// Holds the current known preconfirmation state: which events have been
/// released to the execution engine and which are buffered awaiting a
/// predecessor.
///
/// Each `submit_*` entry point evaluates readiness for the submitted event
/// and returns the ordered run of events its delivery releases. A submitted
/// event that is not ready is buffered, never rejected; late and out-of-order
/// arrival is the expected mode of operation. Every delivery cascades through
/// the buffers until nothing further becomes ready, so dependency chains that
/// were buffered ahead of time flush as a single ordered run.
///
/// Cross-block gating makes seals deliver in strictly increasing block order,
/// so a sealed-block watermark replaces a delivered-seals set and bounds the
/// per-block bookkeeping: sealing a block retires its markers and purges
/// anything still buffered at or below it.
///
/// The state is exclusively owned by the ordering actor's task; nothing here
/// is safe for concurrent mutation.
#[derive(Debug)]
pub struct OrderingState {
    /// Whether no environment has been processed yet. The first one needs no
    /// predecessor.
    just_started: bool,
    /// The highest sealed block. Sealed blocks form a contiguous range ending
    /// here.
    last_sealed: Option<u64>,
    /// Environments buffered until the previous block seals.
    pending_envs: HashMap<u64, SignedEnv>,
    /// Fragments buffered until their predecessor delivers.
    pending_frags: HashMap<FragIndex, SignedFrag>,
    /// Seals buffered until their block's terminal fragment delivers.
    pending_seals: HashMap<u64, SignedSeal>,
    /// Blocks whose environment has been delivered but not yet sealed.
    sent_envs: HashSet<u64>,
    /// Fragments delivered for blocks not yet sealed.
    sent_frags: HashSet<FragIndex>,
    /// Unsealed blocks whose terminal fragment has been delivered.
    last_frag_sent: HashSet<u64>,
}

impl OrderingState {
    /// Creates an empty state; the next environment processed is treated as
    /// the first block and needs no predecessor.
    pub fn new() -> Self {
        Self {
            just_started: true,
            last_sealed: None,
            pending_envs: HashMap::new(),
            pending_frags: HashMap::new(),
            pending_seals: HashMap::new(),
            sent_envs: HashSet::new(),
            sent_frags: HashSet::new(),
            last_frag_sent: HashSet::new(),
        }
    }

    /// The number of buffered events awaiting a predecessor.
    pub fn pending_len(&self) -> usize {
        self.pending_envs.len() + self.pending_frags.len() + self.pending_seals.len()
    }

    /// Whether `number` falls inside the sealed, retired range.
    fn is_sealed(&self, number: u64) -> bool {
        self.last_sealed.is_some_and(|sealed| number <= sealed)
    }

    /// Submits an environment. Ready iff it is the first block ever processed
    /// or the previous block has been sealed.
    pub fn submit_env(&mut self, env: SignedEnv) -> Vec<ReadyEvent> {
        let number = env.env.number;
        if self.is_sealed(number) {
            self.drop_duplicate("env", number, None);
            return Vec::new();
        }
        if self.sent_envs.contains(&number) {
            self.drop_duplicate("env", number, None);
            return Vec::new();
        }
        let prev_sealed = number.checked_sub(1).is_some_and(|prev| self.is_sealed(prev));
        if !self.just_started && !prev_sealed {
            trace!(target: "preconf", block_number = number, "Buffering env until the previous block seals");
            self.pending_envs.insert(number, env);
            return Vec::new();
        }
        self.mark_env_sent(number);
        let mut ready = vec![ReadyEvent::Env(env)];
        self.cascade(Delivered::Env(number), &mut ready);
        ready
    }

    /// Submits a fragment. Ready iff it opens its block under a delivered
    /// environment or directly extends the last delivered fragment.
    pub fn submit_frag(&mut self, frag: SignedFrag) -> Vec<ReadyEvent> {
        let index = frag.frag.index();
        if self.is_sealed(index.block_number) {
            self.drop_stale("frag", index.block_number, Some(index.seq));
            return Vec::new();
        }
        if self.sent_frags.contains(&index) {
            self.drop_duplicate("frag", index.block_number, Some(index.seq));
            return Vec::new();
        }
        let opens_block = frag.frag.is_first() && self.sent_envs.contains(&index.block_number);
        let extends_tail = index.prev().is_some_and(|prev| self.sent_frags.contains(&prev));
        if !opens_block && !extends_tail {
            trace!(
                target: "preconf",
                block_number = index.block_number,
                seq = index.seq,
                "Buffering frag until its predecessor delivers"
            );
            self.pending_frags.insert(index, frag);
            return Vec::new();
        }
        let is_last = frag.frag.is_last;
        self.mark_frag_sent(index, is_last);
        let mut ready = vec![ReadyEvent::Frag(frag)];
        self.cascade(Delivered::Frag { index, is_last }, &mut ready);
        ready
    }

    /// Submits a seal. Ready iff the block's terminal fragment has been
    /// delivered.
    pub fn submit_seal(&mut self, seal: SignedSeal) -> Vec<ReadyEvent> {
        let number = seal.seal.block_number;
        if self.is_sealed(number) {
            self.drop_duplicate("seal", number, None);
            return Vec::new();
        }
        if !self.last_frag_sent.contains(&number) {
            trace!(target: "preconf", block_number = number, "Buffering seal until the terminal fragment delivers");
            self.pending_seals.insert(number, seal);
            return Vec::new();
        }
        self.mark_sealed(number);
        let mut ready = vec![ReadyEvent::Seal(seal)];
        self.cascade(Delivered::Seal(number), &mut ready);
        ready
    }

    /// Re-evaluates every buffered event a delivery could have satisfied,
    /// releasing transitively until nothing further becomes ready.
    fn cascade(&mut self, root: Delivered, ready: &mut Vec<ReadyEvent>) {
        let mut work = VecDeque::from([root]);
        while let Some(delivered) = work.pop_front() {
            match delivered {
                Delivered::Env(number) => {
                    if let Some(frag) = self.pending_frags.remove(&FragIndex::new(number, 0)) {
                        let index = frag.frag.index();
                        let is_last = frag.frag.is_last;
                        self.mark_frag_sent(index, is_last);
                        ready.push(ReadyEvent::Frag(frag));
                        work.push_back(Delivered::Frag { index, is_last });
                    }
                }
                Delivered::Frag { index, is_last } => {
                    if is_last {
                        if let Some(seal) = self.pending_seals.remove(&index.block_number) {
                            self.mark_sealed(index.block_number);
                            ready.push(ReadyEvent::Seal(seal));
                            work.push_back(Delivered::Seal(index.block_number));
                        }
                    } else if let Some(frag) = self.pending_frags.remove(&index.next()) {
                        let next = frag.frag.index();
                        let next_is_last = frag.frag.is_last;
                        self.mark_frag_sent(next, next_is_last);
                        ready.push(ReadyEvent::Frag(frag));
                        work.push_back(Delivered::Frag { index: next, is_last: next_is_last });
                    }
                }
                Delivered::Seal(number) => {
                    self.retire(number);
                    if let Some(env) = self.pending_envs.remove(&(number + 1)) {
                        self.mark_env_sent(number + 1);
                        ready.push(ReadyEvent::Env(env));
                        work.push_back(Delivered::Env(number + 1));
                    }
                }
            }
        }
    }

    fn mark_env_sent(&mut self, number: u64) {
        self.just_started = false;
        self.sent_envs.insert(number);
        self.pending_envs.remove(&number);
    }

    fn mark_frag_sent(&mut self, index: FragIndex, is_last: bool) {
        self.sent_frags.insert(index);
        if is_last {
            self.last_frag_sent.insert(index.block_number);
        }
        self.pending_frags.remove(&index);
    }

    fn mark_sealed(&mut self, number: u64) {
        debug_assert!(self.last_sealed.is_none_or(|sealed| sealed < number));
        self.last_sealed = Some(number);
        self.pending_seals.remove(&number);
    }

    /// Releases a sealed block's bookkeeping. Anything still buffered at or
    /// below the sealed block can never deliver and is purged with it.
    fn retire(&mut self, number: u64) {
        self.sent_envs.remove(&number);
        self.last_frag_sent.remove(&number);
        self.sent_frags.retain(|index| index.block_number != number);
        self.pending_envs.retain(|block, _| *block > number);
        self.pending_seals.retain(|block, _| *block > number);
        self.pending_frags.retain(|index, _| index.block_number > number);
    }

    fn drop_duplicate(&self, kind: &'static str, block_number: u64, seq: Option<u64>) {
        debug!(target: "preconf", kind, block_number, seq, "Dropping already-delivered duplicate event");
        metrics::counter!(Metrics::DUPLICATE_EVENTS, "kind" => kind).increment(1);
    }

    fn drop_stale(&self, kind: &'static str, block_number: u64, seq: Option<u64>) {
        debug!(target: "preconf", kind, block_number, seq, "Dropping event for an already-sealed block");
        metrics::counter!(Metrics::STALE_EVENTS, "kind" => kind).increment(1);
    }
}

impl Default for OrderingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preconf_protocol::{Env, Frag, Seal};

    fn env(number: u64) -> SignedEnv {
        SignedEnv { env: Env { number, ..Default::default() }, ..Default::default() }
    }

    fn frag(block_number: u64, seq: u64, is_last: bool) -> SignedFrag {
        SignedFrag {
            frag: Frag { block_number, seq, is_last, ..Default::default() },
            ..Default::default()
        }
    }

    fn seal(block_number: u64) -> SignedSeal {
        SignedSeal { seal: Seal { block_number, ..Default::default() }, ..Default::default() }
    }

    /// Shorthand for asserting a run of released events by (kind, block, seq).
    fn shape(ready: &[ReadyEvent]) -> Vec<(&'static str, u64, Option<u64>)> {
        ready.iter().map(|event| (event.kind(), event.block_number(), event.seq())).collect()
    }

    #[test]
    fn test_in_order_single_block() {
        let mut state = OrderingState::new();
        assert_eq!(shape(&state.submit_env(env(1))), vec![("env", 1, None)]);
        assert_eq!(shape(&state.submit_frag(frag(1, 0, false))), vec![("frag", 1, Some(0))]);
        assert_eq!(shape(&state.submit_frag(frag(1, 1, true))), vec![("frag", 1, Some(1))]);
        assert_eq!(shape(&state.submit_seal(seal(1))), vec![("seal", 1, None)]);
        assert_eq!(state.pending_len(), 0);
    }

    #[test]
    fn test_in_order_two_blocks() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));
        state.submit_frag(frag(1, 0, false));
        state.submit_frag(frag(1, 1, true));
        state.submit_seal(seal(1));

        assert_eq!(shape(&state.submit_env(env(2))), vec![("env", 2, None)]);
        assert_eq!(shape(&state.submit_frag(frag(2, 0, false))), vec![("frag", 2, Some(0))]);
        assert_eq!(shape(&state.submit_frag(frag(2, 1, false))), vec![("frag", 2, Some(1))]);
        assert_eq!(shape(&state.submit_frag(frag(2, 2, true))), vec![("frag", 2, Some(2))]);
        assert_eq!(shape(&state.submit_seal(seal(2))), vec![("seal", 2, None)]);
    }

    #[test]
    fn test_out_of_order_full_buffer_cascade() {
        let mut state = OrderingState::new();
        assert!(state.submit_frag(frag(1, 1, true)).is_empty());
        assert!(state.submit_frag(frag(1, 0, false)).is_empty());
        assert_eq!(state.pending_len(), 2);

        // The env releases both buffered fragments in a single cascade.
        let ready = state.submit_env(env(1));
        assert_eq!(
            shape(&ready),
            vec![("env", 1, None), ("frag", 1, Some(0)), ("frag", 1, Some(1))]
        );
        assert_eq!(state.pending_len(), 0);

        assert_eq!(shape(&state.submit_seal(seal(1))), vec![("seal", 1, None)]);
    }

    #[test]
    fn test_frag_gap_buffers_until_filled() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));
        assert!(state.submit_frag(frag(1, 2, true)).is_empty());
        assert!(state.submit_frag(frag(1, 1, false)).is_empty());

        let ready = state.submit_frag(frag(1, 0, false));
        assert_eq!(
            shape(&ready),
            vec![("frag", 1, Some(0)), ("frag", 1, Some(1)), ("frag", 1, Some(2))]
        );
    }

    #[test]
    fn test_seal_buffers_until_terminal_fragment() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));
        assert!(state.submit_seal(seal(1)).is_empty());

        let ready = state.submit_frag(frag(1, 0, true));
        assert_eq!(shape(&ready), vec![("frag", 1, Some(0)), ("seal", 1, None)]);
    }

    #[test]
    fn test_cross_block_gating() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));

        // The next block's env must wait for the current block's seal.
        assert!(state.submit_env(env(2)).is_empty());

        state.submit_frag(frag(1, 0, true));
        let ready = state.submit_seal(seal(1));
        assert_eq!(shape(&ready), vec![("seal", 1, None), ("env", 2, None)]);
    }

    #[test]
    fn test_no_cross_contamination() {
        let mut state = OrderingState::new();
        assert_eq!(shape(&state.submit_env(env(1))), vec![("env", 1, None)]);
        assert!(state.submit_frag(frag(2, 0, true)).is_empty());
        assert_eq!(shape(&state.submit_frag(frag(1, 0, true))), vec![("frag", 1, Some(0))]);
        assert!(state.submit_env(env(2)).is_empty());
        assert!(state.submit_seal(seal(2)).is_empty());

        // Block 1's seal releases block 2's whole buffered chain, in order.
        let ready = state.submit_seal(seal(1));
        assert_eq!(
            shape(&ready),
            vec![("seal", 1, None), ("env", 2, None), ("frag", 2, Some(0)), ("seal", 2, None)]
        );
    }

    #[test]
    fn test_duplicate_events_dropped() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));
        state.submit_frag(frag(1, 0, false));

        assert!(state.submit_env(env(1)).is_empty());
        assert!(state.submit_frag(frag(1, 0, false)).is_empty());
        assert_eq!(state.pending_len(), 0);

        state.submit_frag(frag(1, 1, true));
        state.submit_seal(seal(1));
        assert!(state.submit_seal(seal(1)).is_empty());
    }

    #[test]
    fn test_buffered_duplicate_is_last_write_wins() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));

        // A retried copy of a buffered fragment replaces the earlier one.
        assert!(state.submit_frag(frag(1, 1, false)).is_empty());
        assert!(state.submit_frag(frag(1, 1, true)).is_empty());
        assert_eq!(state.pending_len(), 1);

        let ready = state.submit_frag(frag(1, 0, false));
        assert_eq!(shape(&ready), vec![("frag", 1, Some(0)), ("frag", 1, Some(1))]);
        let ReadyEvent::Frag(released) = &ready[1] else { panic!("expected a frag") };
        assert!(released.frag.is_last);
    }

    #[test]
    fn test_stale_events_dropped_after_retirement() {
        let mut state = OrderingState::new();
        state.submit_env(env(1));
        state.submit_frag(frag(1, 0, true));
        state.submit_seal(seal(1));

        assert!(state.submit_env(env(1)).is_empty());
        assert!(state.submit_frag(frag(1, 7, false)).is_empty());
        assert!(state.submit_seal(seal(1)).is_empty());
        assert_eq!(state.pending_len(), 0);
    }

    #[test]
    fn test_first_env_needs_no_predecessor() {
        let mut state = OrderingState::new();

        // The chain can start at any height; only the first env is free.
        assert_eq!(shape(&state.submit_env(env(10))), vec![("env", 10, None)]);
        assert!(state.submit_env(env(12)).is_empty());
    }

    #[test]
    fn test_retirement_purges_unreachable_buffers() {
        let mut state = OrderingState::new();
        state.submit_env(env(10));

        // Buffered below the first block; its predecessor can never seal.
        assert!(state.submit_env(env(5)).is_empty());
        assert_eq!(state.pending_len(), 1);

        state.submit_frag(frag(10, 0, true));
        state.submit_seal(seal(10));
        assert_eq!(state.pending_len(), 0);
    }

    #[test]
    fn test_seal_only_block_buffers_without_env() {
        let mut state = OrderingState::new();
        assert!(state.submit_seal(seal(3)).is_empty());
        assert!(state.submit_frag(frag(3, 0, true)).is_empty());

        let ready = state.submit_env(env(3));
        assert_eq!(
            shape(&ready),
            vec![("env", 3, None), ("frag", 3, Some(0)), ("seal", 3, None)]
        );
    }
}
