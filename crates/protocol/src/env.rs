//! The per-block execution environment message.

use crate::Bytes65;
use alloy_primitives::{Address, B256, Bytes, U256};

/// The execution context of one preconfirmed block, delivered exactly once
/// before any fragment of that block.
///
/// On the wire, numeric fields serialize as JSON numbers except `difficulty`,
/// which is a big integer and crosses as a hex quantity string. Addresses and
/// hashes use their fixed-width hex encodings.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Env {
    /// The block number this environment opens.
    pub number: u64,
    /// The fee recipient of the block.
    pub beneficiary: Address,
    /// The block timestamp.
    pub timestamp: u64,
    /// The gas limit of the block.
    pub gas_limit: u64,
    /// The base fee of the block.
    pub basefee: u64,
    /// The block difficulty.
    pub difficulty: U256,
    /// The prevrandao value exposed to the EVM.
    pub prevrandao: B256,
    /// The hash of the parent block.
    pub parent_hash: B256,
    /// The parent beacon block root.
    pub parent_beacon_root: B256,
    /// Arbitrary extra data committed into the block header.
    pub extra_data: Bytes,
}

/// An [`Env`] wrapped with its producer signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedEnv {
    /// Signature over the environment payload.
    pub signature: Bytes65,
    /// The environment payload.
    pub env: Env,
}
