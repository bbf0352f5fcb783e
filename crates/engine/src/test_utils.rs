//! Mock implementations for testing engine client interactions.

use crate::{PreconfEngineClient, PreconfEngineClientError, PreconfEngineResult};
use async_trait::async_trait;
use preconf_protocol::{FragIndex, SignedEnv, SignedFrag, SignedSeal};
use std::sync::{Arc, Mutex};

/// A call observed by the [`MockPreconfEngine`], in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedCall {
    /// An `env` call for the block number.
    Env(u64),
    /// A `new_frag` call for the fragment index.
    Frag(FragIndex),
    /// A `seal_frag` call for the block number.
    Seal(u64),
}

#[derive(Debug, Default)]
struct MockEngineInner {
    calls: Vec<RecordedCall>,
    seen_envs: Vec<SignedEnv>,
    seen_frags: Vec<SignedFrag>,
    seen_seals: Vec<SignedSeal>,
    fail_requests: bool,
}

/// A recording [`PreconfEngineClient`].
///
/// Every call is recorded in a unified arrival-order log plus per-kind payload
/// vectors. With failure injection enabled, calls are still recorded but
/// return a request error, exercising the caller's failure path.
#[derive(Debug, Clone, Default)]
pub struct MockPreconfEngine {
    inner: Arc<Mutex<MockEngineInner>>,
}

impl MockPreconfEngine {
    /// Creates a new mock with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again) while still being
    /// recorded.
    pub fn set_fail_requests(&self, fail: bool) {
        self.inner.lock().unwrap().fail_requests = fail;
    }

    /// All observed calls, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// The `env` payloads observed so far.
    pub fn seen_envs(&self) -> Vec<SignedEnv> {
        self.inner.lock().unwrap().seen_envs.clone()
    }

    /// The `new_frag` payloads observed so far.
    pub fn seen_frags(&self) -> Vec<SignedFrag> {
        self.inner.lock().unwrap().seen_frags.clone()
    }

    /// The `seal_frag` payloads observed so far.
    pub fn seen_seals(&self) -> Vec<SignedSeal> {
        self.inner.lock().unwrap().seen_seals.clone()
    }

    fn record(&self, call: RecordedCall, store: impl FnOnce(&mut MockEngineInner)) -> PreconfEngineResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        store(&mut inner);
        if inner.fail_requests {
            return Err(PreconfEngineClientError::RequestError("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PreconfEngineClient for MockPreconfEngine {
    async fn env(&self, env: &SignedEnv) -> PreconfEngineResult<()> {
        self.record(RecordedCall::Env(env.env.number), |inner| {
            inner.seen_envs.push(env.clone());
        })
    }

    async fn new_frag(&self, frag: &SignedFrag) -> PreconfEngineResult<()> {
        self.record(RecordedCall::Frag(frag.frag.index()), |inner| {
            inner.seen_frags.push(frag.clone());
        })
    }

    async fn seal_frag(&self, seal: &SignedSeal) -> PreconfEngineResult<()> {
        self.record(RecordedCall::Seal(seal.seal.block_number), |inner| {
            inner.seen_seals.push(seal.clone());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preconf_protocol::{Env, Frag};

    #[tokio::test]
    async fn test_mock_records_calls_in_arrival_order() {
        let mock = MockPreconfEngine::new();

        let env = SignedEnv { env: Env { number: 1, ..Default::default() }, ..Default::default() };
        let frag = SignedFrag {
            frag: Frag { block_number: 1, seq: 0, is_last: true, ..Default::default() },
            ..Default::default()
        };

        mock.env(&env).await.unwrap();
        mock.new_frag(&frag).await.unwrap();
        assert_eq!(
            mock.calls(),
            vec![RecordedCall::Env(1), RecordedCall::Frag(FragIndex::new(1, 0))]
        );
        assert_eq!(mock.seen_envs(), vec![env]);
        assert_eq!(mock.seen_frags(), vec![frag]);
    }

    #[tokio::test]
    async fn test_mock_failure_injection_still_records() {
        let mock = MockPreconfEngine::new();
        mock.set_fail_requests(true);

        let result = mock.seal_frag(&SignedSeal::default()).await;
        assert!(matches!(result, Err(PreconfEngineClientError::RequestError(_))));
        assert_eq!(mock.calls(), vec![RecordedCall::Seal(0)]);
    }
}
