//! alloy-backed chain client
//!
//! Talks to one HTTP JSON-RPC endpoint and signs with the agent's wallet.

use super::{ChainClient, SwapInstruction, TxConfirmation};
use crate::config::RpcEndpoint;
use crate::wallet::SecureWallet;
use crate::{Error, Result};
use alloy::primitives::aliases::U24;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
    }

    #[sol(rpc)]
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);
    }
}

/// Chain client over an alloy provider with a local signer
pub struct AlloyChainClient {
    provider: DynProvider,
    account: Address,
}

impl AlloyChainClient {
    /// Connect to the endpoint, signing with `wallet`
    ///
    /// No request is made here; connectivity problems surface on first use.
    pub fn connect(endpoint: &RpcEndpoint, wallet: &SecureWallet) -> Self {
        let provider = ProviderBuilder::new()
            .wallet(wallet.wallet().clone())
            .connect_http(endpoint.url().clone())
            .erased();

        tracing::debug!(
            endpoint = %endpoint,
            account = %wallet.address(),
            "Created chain client"
        );

        Self {
            provider,
            account: wallet.address(),
        }
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn account(&self) -> Address {
        self.account
    }

    async fn balance_of(&self, asset: Address, owner: Address) -> Result<U256> {
        IERC20::new(asset, self.provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| {
                Error::Rpc(format!(
                    "balanceOf({:#x}) on {:#x} failed: {}",
                    owner, asset, e
                ))
            })
    }

    async fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Result<U256> {
        IERC20::new(asset, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("allowance on {:#x} failed: {}", asset, e)))
    }

    async fn submit_approval(
        &self,
        asset: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        let pending = IERC20::new(asset, self.provider.clone())
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| Error::Contract(format!("approve on {:#x} failed: {}", asset, e)))?;

        Ok(*pending.tx_hash())
    }

    async fn submit_swap(&self, router: Address, instruction: &SwapInstruction) -> Result<TxHash> {
        let params = ISwapRouter::ExactInputSingleParams {
            tokenIn: instruction.token_in,
            tokenOut: instruction.token_out,
            fee: U24::from(instruction.fee_tier),
            recipient: instruction.recipient,
            deadline: U256::from(instruction.deadline),
            amountIn: instruction.amount_in,
            amountOutMinimum: instruction.amount_out_minimum,
            sqrtPriceLimitX96: instruction.sqrt_price_limit_x96,
        };

        let pending = ISwapRouter::new(router, self.provider.clone())
            .exactInputSingle(params)
            .gas(instruction.gas_limit)
            .send()
            .await
            .map_err(|e| Error::Contract(format!("exactInputSingle failed: {}", e)))?;

        Ok(*pending.tx_hash())
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TxConfirmation> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| Error::Confirmation(format!("{}: {}", tx_hash, e)))?;

        if !receipt.status() {
            return Err(Error::Reverted { tx_hash });
        }

        Ok(TxConfirmation {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_erc20_selectors() {
        assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(IERC20::allowanceCall::SELECTOR, [0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_exact_input_single_selector() {
        assert_eq!(
            ISwapRouter::exactInputSingleCall::SELECTOR,
            [0x41, 0x4b, 0xf3, 0x89]
        );
    }

    #[test]
    fn test_connect_does_not_touch_network() {
        let endpoint = RpcEndpoint::parse("http://127.0.0.1:8545").unwrap();
        let wallet = SecureWallet::from_hex(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let client = AlloyChainClient::connect(&endpoint, &wallet);
        assert_eq!(client.account(), wallet.address());
    }
}
