//! Chain access boundary
//!
//! Everything the agent needs from the network goes through [`ChainClient`]:
//! token reads, signed submissions, and confirmation waits. The production
//! implementation is [`AlloyChainClient`]; tests substitute a mock.

mod alloy_client;
#[cfg(test)]
pub(crate) mod mock;

pub use alloy_client::AlloyChainClient;

use crate::Result;
use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

/// Parameters of a single-pool exact-input swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapInstruction {
    pub token_in: Address,
    pub token_out: Address,
    /// Pool fee tier (uint24 on chain)
    pub fee_tier: u32,
    pub recipient: Address,
    /// Unix timestamp after which the router rejects the swap
    pub deadline: u64,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// Zero means no price limit
    pub sqrt_price_limit_x96: U160,
    pub gas_limit: u64,
}

/// A mined, successful transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Read and write access to the chain for a single signing account
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The signing account's address
    fn account(&self) -> Address;

    /// ERC-20 balance of `owner`, in smallest units
    async fn balance_of(&self, asset: Address, owner: Address) -> Result<U256>;

    /// ERC-20 allowance granted by `owner` to `spender`
    async fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Sign and broadcast `approve(spender, amount)` on `asset`
    async fn submit_approval(
        &self,
        asset: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash>;

    /// Sign and broadcast `exactInputSingle` on `router`
    async fn submit_swap(&self, router: Address, instruction: &SwapInstruction) -> Result<TxHash>;

    /// Block until the transaction is mined; a reverted receipt is an error
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TxConfirmation>;
}
