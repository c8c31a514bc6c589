//! Swap submission
//!
//! Builds an `exactInputSingle` instruction for a pair and waits for it to be
//! mined. The minimum output comes from [`MinOutputPolicy`]; with the default
//! `Unprotected` policy the swap accepts any output.

use crate::chain::{ChainClient, SwapInstruction, TxConfirmation};
use crate::config::SwapSettings;
use crate::pairs::TradingPair;
use crate::tokens::format_units;
use crate::{Error, Result};
use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, U256};
use chrono::Utc;
use tracing::info;

/// Submits swaps to the exchange router
#[derive(Debug, Clone)]
pub struct TradeExecutor {
    router: Address,
    settings: SwapSettings,
}

impl TradeExecutor {
    pub fn new(router: Address, settings: SwapSettings) -> Self {
        Self { router, settings }
    }

    pub fn router(&self) -> Address {
        self.router
    }

    /// Build the instruction for swapping `amount` of `pair.source`
    pub fn build_instruction(
        &self,
        pair: &TradingPair,
        amount: U256,
        recipient: Address,
        now_unix: u64,
    ) -> Result<SwapInstruction> {
        let deadline = now_unix
            .checked_add(self.settings.deadline_secs)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Swap deadline of {}s overflows the clock",
                    self.settings.deadline_secs
                ))
            })?;

        Ok(SwapInstruction {
            token_in: pair.source.address,
            token_out: pair.destination.address,
            fee_tier: self.settings.fee_tier,
            recipient,
            deadline,
            amount_in: amount,
            amount_out_minimum: self.settings.min_output.min_amount_out()?,
            sqrt_price_limit_x96: U160::ZERO,
            gas_limit: self.settings.gas_limit,
        })
    }

    /// Swap `amount` (smallest units) of `pair.source` into `pair.destination`
    pub async fn execute_swap<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        pair: &TradingPair,
        amount: U256,
    ) -> Result<TxConfirmation> {
        let now = Utc::now().timestamp().max(0) as u64;
        let instruction = self.build_instruction(pair, amount, client.account(), now)?;
        let human_amount = format_units(amount, pair.decimals());

        info!(
            amount = %human_amount,
            from = %pair.source.symbol,
            to = %pair.destination.symbol,
            "Swap {} {} -> {}",
            human_amount,
            pair.source.symbol,
            pair.destination.symbol
        );

        let tx_hash = client.submit_swap(self.router, &instruction).await?;
        info!(tx = %tx_hash, "Swap submitted");

        let confirmation = client.await_confirmation(tx_hash).await?;
        info!(
            tx = %tx_hash,
            block = ?confirmation.block_number,
            gas_used = confirmation.gas_used,
            "Swap confirmed"
        );

        Ok(confirmation)
    }
}
