//! The block finalization message.

use crate::Bytes65;
use alloy_primitives::B256;

/// The finalization record closing a preconfirmed block, delivered after the
/// block's terminal fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seal {
    /// Total number of fragments the block was built from.
    pub total_frags: u64,
    /// The block being sealed.
    pub block_number: u64,
    /// Gas consumed by the block.
    pub gas_used: u64,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// Root of the block's transaction trie.
    pub transactions_root: B256,
    /// Root of the block's receipt trie.
    pub receipts_root: B256,
    /// State root after executing the block.
    pub state_root: B256,
    /// Hash of the sealed block.
    pub block_hash: B256,
}

/// A [`Seal`] wrapped with its producer signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedSeal {
    /// Signature over the seal payload.
    pub signature: Bytes65,
    /// The seal payload.
    pub seal: Seal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_seal_wire_format() {
        let seal = Seal {
            total_frags: 10,
            block_number: 1,
            gas_used: 30_000,
            gas_limit: 60_000,
            block_hash: b256!("aabbccdd00000000000000000000000000000000000000000000000000000000"),
            ..Default::default()
        };

        let raw = serde_json::to_value(&seal).unwrap();
        assert_eq!(raw["totalFrags"], 10);
        assert_eq!(raw["blockNumber"], 1);
        assert_eq!(raw["gasUsed"], 30_000);
        assert!(raw.get("transactionsRoot").is_some());
        assert!(raw.get("stateRoot").is_some());

        let decoded: Seal = serde_json::from_value(raw).unwrap();
        assert_eq!(decoded, seal);
    }
}
