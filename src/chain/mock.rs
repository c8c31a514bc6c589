//! In-memory chain client for tests

use super::{ChainClient, SwapInstruction, TxConfirmation};
use crate::{Error, Result};
use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A transaction the mock has accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Approval {
        asset: Address,
        spender: Address,
        amount: U256,
    },
    Swap {
        router: Address,
        instruction: SwapInstruction,
    },
}

#[derive(Default)]
struct State {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    submitted: Vec<(TxHash, Submitted)>,
    confirmed: Vec<TxHash>,
    balance_error: Option<String>,
    swap_confirmation_error: Option<String>,
    approval_error: Option<String>,
    approval_attempts: usize,
    revert_swaps: bool,
    balance_queries: usize,
}

pub struct MockChainClient {
    account: Address,
    state: Mutex<State>,
}

impl MockChainClient {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            state: Mutex::new(State::default()),
        }
    }

    pub fn set_balance(&self, asset: Address, amount: U256) {
        self.state.lock().unwrap().balances.insert(asset, amount);
    }

    pub fn set_allowance(&self, asset: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((asset, spender), amount);
    }

    pub fn allowance_of(&self, asset: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(asset, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn fail_balance_queries(&self, message: &str) {
        self.state.lock().unwrap().balance_error = Some(message.to_string());
    }

    pub fn fail_swap_confirmations(&self, message: &str) {
        self.state.lock().unwrap().swap_confirmation_error = Some(message.to_string());
    }

    pub fn fail_approvals(&self, message: &str) {
        self.state.lock().unwrap().approval_error = Some(message.to_string());
    }

    pub fn revert_swaps(&self) {
        self.state.lock().unwrap().revert_swaps = true;
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.state
            .lock()
            .unwrap()
            .submitted
            .iter()
            .map(|(_, s)| s.clone())
            .collect()
    }

    pub fn approvals(&self) -> Vec<Submitted> {
        self.submitted()
            .into_iter()
            .filter(|s| matches!(s, Submitted::Approval { .. }))
            .collect()
    }

    pub fn swaps(&self) -> Vec<SwapInstruction> {
        self.submitted()
            .into_iter()
            .filter_map(|s| match s {
                Submitted::Swap { instruction, .. } => Some(instruction),
                _ => None,
            })
            .collect()
    }

    pub fn confirmed(&self) -> Vec<TxHash> {
        self.state.lock().unwrap().confirmed.clone()
    }

    pub fn balance_queries(&self) -> usize {
        self.state.lock().unwrap().balance_queries
    }

    pub fn approval_attempts(&self) -> usize {
        self.state.lock().unwrap().approval_attempts
    }

    fn record(state: &mut State, tx: Submitted) -> TxHash {
        let n = state.submitted.len() as u64 + 1;
        let hash = B256::left_padding_from(&n.to_be_bytes());
        state.submitted.push((hash, tx));
        hash
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn account(&self) -> Address {
        self.account
    }

    async fn balance_of(&self, asset: Address, _owner: Address) -> Result<U256> {
        let mut state = self.state.lock().unwrap();
        state.balance_queries += 1;
        if let Some(message) = &state.balance_error {
            return Err(Error::Rpc(message.clone()));
        }
        Ok(state.balances.get(&asset).copied().unwrap_or_default())
    }

    async fn allowance(&self, asset: Address, _owner: Address, spender: Address) -> Result<U256> {
        Ok(self.allowance_of(asset, spender))
    }

    async fn submit_approval(
        &self,
        asset: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.approval_attempts += 1;
        if let Some(message) = &state.approval_error {
            return Err(Error::Contract(message.clone()));
        }
        Ok(Self::record(
            &mut state,
            Submitted::Approval {
                asset,
                spender,
                amount,
            },
        ))
    }

    async fn submit_swap(&self, router: Address, instruction: &SwapInstruction) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        Ok(Self::record(
            &mut state,
            Submitted::Swap {
                router,
                instruction: instruction.clone(),
            },
        ))
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TxConfirmation> {
        let mut state = self.state.lock().unwrap();
        let tx = state
            .submitted
            .iter()
            .find(|(hash, _)| *hash == tx_hash)
            .map(|(_, tx)| tx.clone())
            .ok_or_else(|| Error::Confirmation(format!("unknown transaction {}", tx_hash)))?;

        match tx {
            Submitted::Approval {
                asset,
                spender,
                amount,
            } => {
                state.allowances.insert((asset, spender), amount);
            }
            Submitted::Swap { .. } => {
                if let Some(message) = &state.swap_confirmation_error {
                    return Err(Error::Confirmation(message.clone()));
                }
                if state.revert_swaps {
                    return Err(Error::Reverted { tx_hash });
                }
            }
        }

        state.confirmed.push(tx_hash);
        Ok(TxConfirmation {
            tx_hash,
            block_number: Some(100 + state.confirmed.len() as u64),
            gas_used: 21_000,
        })
    }
}
