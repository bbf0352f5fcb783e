//! Shared fixtures for protocol tests.

use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{Address, Bytes, Signature, TxKind, U256};
use op_alloy_consensus::OpTxEnvelope;

/// A deterministic signed legacy transaction, distinguished by `nonce`.
pub(crate) fn signed_legacy_tx(nonce: u64) -> OpTxEnvelope {
    let tx = TxLegacy {
        chain_id: Some(10),
        nonce,
        gas_price: 100,
        gas_limit: 21_000,
        to: TxKind::Call(Address::with_last_byte(0x42)),
        value: U256::from(1),
        input: Bytes::new(),
    };
    let signature = Signature::new(U256::from(1), U256::from(2), false);
    OpTxEnvelope::Legacy(tx.into_signed(signature))
}
