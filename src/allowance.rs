//! Router allowance management
//!
//! Approvals are always for `U256::MAX`. Under the default
//! [`AllowancePolicy::NonZero`] any nonzero allowance counts as sufficient, so
//! an allowance drawn down below a later trade size is never topped up and
//! that swap reverts. [`AllowancePolicy::CoverAmount`] re-approves instead.

use crate::chain::{ChainClient, TxConfirmation};
use crate::config::AllowancePolicy;
use crate::tokens::Asset;
use crate::Result;
use alloy::primitives::{Address, U256};
use tracing::{debug, info};

/// What `ensure_approved` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Existing allowance was accepted; nothing submitted
    AlreadyApproved { allowance: U256 },
    /// An unlimited approval was submitted and confirmed
    Approved { confirmation: TxConfirmation },
}

/// Ensures a spender may move the agent's tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowanceManager {
    policy: AllowancePolicy,
}

impl AllowanceManager {
    pub fn new(policy: AllowancePolicy) -> Self {
        Self { policy }
    }

    /// Approve `spender` for `asset` if the policy finds the allowance short
    ///
    /// `required` is the amount about to be spent; the default policy ignores
    /// it. Chain errors propagate without retry.
    pub async fn ensure_approved<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        asset: &Asset,
        spender: Address,
        required: U256,
    ) -> Result<ApprovalOutcome> {
        let allowance = client
            .allowance(asset.address, client.account(), spender)
            .await?;

        if self.is_sufficient(allowance, required) {
            debug!(
                token = %asset.symbol,
                allowance = %allowance,
                "Allowance sufficient"
            );
            return Ok(ApprovalOutcome::AlreadyApproved { allowance });
        }

        info!(
            token = %asset.symbol,
            spender = %spender,
            "Approving unlimited {}",
            asset.symbol
        );
        let tx_hash = client
            .submit_approval(asset.address, spender, U256::MAX)
            .await?;
        info!(token = %asset.symbol, tx = %tx_hash, "Approval submitted");

        let confirmation = client.await_confirmation(tx_hash).await?;
        info!(
            token = %asset.symbol,
            tx = %tx_hash,
            block = ?confirmation.block_number,
            "Approval confirmed"
        );

        Ok(ApprovalOutcome::Approved { confirmation })
    }

    fn is_sufficient(&self, allowance: U256, required: U256) -> bool {
        match self.policy {
            AllowancePolicy::NonZero => !allowance.is_zero(),
            AllowancePolicy::CoverAmount => allowance >= required && !allowance.is_zero(),
        }
    }
}
