//! Transaction fragment messages and their position index.

use crate::Bytes65;
use op_alloy_consensus::OpTxEnvelope;

/// A contiguous slice of a block's transactions.
///
/// Fragments of a block are numbered from zero by `seq`; the terminal fragment
/// carries `is_last`. No fragment may follow the terminal one.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frag {
    /// The block this fragment extends.
    pub block_number: u64,
    /// The fragment's zero-based position within the block.
    pub seq: u64,
    /// Whether this is the terminal fragment of the block.
    pub is_last: bool,
    /// Transactions carried by this fragment, in execution order.
    #[serde(with = "opaque_txs")]
    pub txs: Vec<OpTxEnvelope>,
}

impl Frag {
    /// The [`FragIndex`] identifying this fragment's position.
    pub const fn index(&self) -> FragIndex {
        FragIndex::new(self.block_number, self.seq)
    }

    /// Whether this is the opening fragment of its block.
    pub const fn is_first(&self) -> bool {
        self.seq == 0
    }
}

/// Composite key identifying a fragment's position: `(block_number, seq)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragIndex {
    /// The block the fragment belongs to.
    pub block_number: u64,
    /// The fragment's zero-based position within the block.
    pub seq: u64,
}

impl FragIndex {
    /// Creates the index for `(block_number, seq)`.
    pub const fn new(block_number: u64, seq: u64) -> Self {
        Self { block_number, seq }
    }

    /// The index of the preceding fragment in the same block, if any.
    pub const fn prev(&self) -> Option<Self> {
        match self.seq.checked_sub(1) {
            Some(seq) => Some(Self { block_number: self.block_number, seq }),
            None => None,
        }
    }

    /// The index of the succeeding fragment in the same block.
    pub const fn next(&self) -> Self {
        Self { block_number: self.block_number, seq: self.seq + 1 }
    }
}

/// A [`Frag`] wrapped with its producer signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedFrag {
    /// Signature over the fragment payload.
    pub signature: Bytes65,
    /// The fragment payload.
    pub frag: Frag,
}

/// Wire codec for fragment transactions.
///
/// Each transaction crosses the wire as its canonical EIP-2718 binary
/// encoding, not as a structured object, so the receiving side can hand the
/// bytes straight to its own transaction codec.
mod opaque_txs {
    use alloy_eips::eip2718::{Decodable2718, Encodable2718};
    use alloy_primitives::Bytes;
    use op_alloy_consensus::OpTxEnvelope;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(
        txs: &[OpTxEnvelope],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        txs.iter().map(|tx| Bytes::from(tx.encoded_2718())).collect::<Vec<_>>().serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<OpTxEnvelope>, D::Error> {
        let raw = Vec::<Bytes>::deserialize(deserializer)?;
        raw.iter()
            .map(|blob| {
                OpTxEnvelope::decode_2718(&mut blob.as_ref()).map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::signed_legacy_tx;
    use alloy_eips::eip2718::Encodable2718;

    #[test]
    fn test_frag_index_ordering() {
        let index = FragIndex::new(4, 2);
        assert_eq!(index.prev(), Some(FragIndex::new(4, 1)));
        assert_eq!(index.next(), FragIndex::new(4, 3));
        assert_eq!(FragIndex::new(4, 0).prev(), None);
        assert!(FragIndex::new(4, 1) < FragIndex::new(4, 2));
        assert!(FragIndex::new(4, 9) < FragIndex::new(5, 0));
    }

    #[test]
    fn test_frag_wire_format() {
        let frag = Frag {
            block_number: 1,
            seq: 0,
            is_last: false,
            txs: vec![signed_legacy_tx(0), signed_legacy_tx(1)],
        };

        let raw = serde_json::to_value(&frag).unwrap();
        assert_eq!(raw["blockNumber"], 1);
        assert_eq!(raw["seq"], 0);
        assert_eq!(raw["isLast"], false);

        // Transactions cross the wire as canonical binary blobs.
        let blobs = raw["txs"].as_array().unwrap();
        assert_eq!(blobs.len(), 2);
        for (blob, tx) in blobs.iter().zip(&frag.txs) {
            let expected = alloy_primitives::Bytes::from(tx.encoded_2718());
            assert_eq!(blob.as_str().unwrap(), expected.to_string());
        }

        let decoded: Frag = serde_json::from_value(raw).unwrap();
        assert_eq!(decoded, frag);

        // Byte-for-byte identity of the re-parsed transactions.
        for (decoded_tx, tx) in decoded.txs.iter().zip(&frag.txs) {
            assert_eq!(decoded_tx.encoded_2718(), tx.encoded_2718());
        }
    }

    #[test]
    fn test_frag_rejects_undecodable_tx() {
        let raw = serde_json::json!({
            "blockNumber": 1,
            "seq": 0,
            "isLast": true,
            "txs": ["0xdeadbeef"],
        });
        assert!(serde_json::from_value::<Frag>(raw).is_err());
    }
}
