//! Configuration for the swap agent
//!
//! Two layers:
//! - [`Config`]: process configuration from the environment (endpoint, key,
//!   contract addresses). Missing or malformed values are fatal at startup.
//! - [`AgentSettings`]: tunables with defaults, optionally overridden by a
//!   JSON file.

pub mod rpc;

use crate::tokens::AssetBook;
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub use rpc::RpcEndpoint;

/// Environment variable names
pub mod env_vars {
    pub const RPC_URL: &str = super::rpc::RPC_URL_ENV;
    pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
    pub const ROUTER_ADDRESS: &str = "ROUTER_ADDRESS";
    pub const USDT_ADDRESS: &str = "USDT_ADDRESS";
    pub const ETH_ADDRESS: &str = "ETH_ADDRESS";
    pub const BTC_ADDRESS: &str = "BTC_ADDRESS";
}

/// Minimum output guard applied to every swap
///
/// `Unprotected` sets `amountOutMinimum = 0`: the swap executes at whatever
/// price the pool gives. This is a known risk, kept as the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum MinOutputPolicy {
    #[default]
    Unprotected,
    /// Fixed floor in the destination asset's smallest unit, as a decimal integer string
    Fixed { amount: String },
}

impl MinOutputPolicy {
    /// Minimum output for a swap, in the destination asset's smallest unit
    pub fn min_amount_out(&self) -> Result<U256> {
        match self {
            MinOutputPolicy::Unprotected => Ok(U256::ZERO),
            MinOutputPolicy::Fixed { amount } => U256::from_str_radix(amount.trim(), 10)
                .map_err(|e| {
                    Error::Config(format!("Invalid fixed min output '{}': {}", amount, e))
                }),
        }
    }
}

/// When to (re-)approve the router for a source asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllowancePolicy {
    /// Approve only when the allowance is exactly zero
    #[default]
    NonZero,
    /// Approve whenever the allowance is below the trade amount
    CoverAmount,
}

/// Longest accepted swap deadline, one day
pub const MAX_DEADLINE_SECS: u64 = 86_400;

/// Swap submission parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapSettings {
    /// Pool fee tier in hundredths of a bip (3000 = 0.3%)
    pub fee_tier: u32,
    /// Seconds from submission until the swap expires
    pub deadline_secs: u64,
    /// Gas limit for the swap transaction
    pub gas_limit: u64,
    pub min_output: MinOutputPolicy,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            fee_tier: 3000,
            deadline_secs: 300,
            gas_limit: 150_000,
            min_output: MinOutputPolicy::Unprotected,
        }
    }
}

/// Fraction of the available balance to trade, sampled in `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub min_fraction: f64,
    pub max_fraction: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            min_fraction: 0.30,
            max_fraction: 0.70,
        }
    }
}

/// Inter-iteration delay bounds, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 30,
            max_delay_secs: 90,
        }
    }
}

/// Tunable agent behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub swap: SwapSettings,
    pub sizing: SizingConfig,
    pub pacing: PacingConfig,
    pub allowance_policy: AllowancePolicy,
}

impl AgentSettings {
    /// Load settings from a JSON file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let sizing = &self.sizing;
        if !(sizing.min_fraction > 0.0
            && sizing.min_fraction < sizing.max_fraction
            && sizing.max_fraction <= 1.0)
        {
            return Err(Error::Config(format!(
                "Sizing fractions must satisfy 0 < min < max <= 1 (got {} and {})",
                sizing.min_fraction, sizing.max_fraction
            )));
        }

        let pacing = &self.pacing;
        if pacing.min_delay_secs > pacing.max_delay_secs {
            return Err(Error::Config(format!(
                "Pacing min delay {}s exceeds max delay {}s",
                pacing.min_delay_secs, pacing.max_delay_secs
            )));
        }

        // uint24 on chain
        if self.swap.fee_tier >= 1 << 24 {
            return Err(Error::Config(format!(
                "Fee tier {} does not fit in uint24",
                self.swap.fee_tier
            )));
        }
        if self.swap.deadline_secs == 0 || self.swap.deadline_secs > MAX_DEADLINE_SECS {
            return Err(Error::Config(format!(
                "Swap deadline must be between 1 and {} seconds (got {})",
                MAX_DEADLINE_SECS, self.swap.deadline_secs
            )));
        }
        self.swap.min_output.min_amount_out()?;
        if self.swap.gas_limit == 0 {
            return Err(Error::Config("Gas limit must be nonzero".to_string()));
        }

        Ok(())
    }
}

/// Process configuration
pub struct Config {
    pub rpc: RpcEndpoint,
    /// Hex-encoded signing key; handed to the wallet and nowhere else
    pub private_key: SecretString,
    /// Exchange router contract
    pub router: Address,
    pub assets: AssetBook,
    pub settings: AgentSettings,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env(settings: AgentSettings) -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), settings)
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, settings: AgentSettings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    Error::Config(format!("Environment variable {} not set", name))
                })
        };
        let address = |name: &str| -> Result<Address> {
            let raw = require(name)?;
            Address::from_str(raw.trim())
                .map_err(|e| Error::Config(format!("Invalid {}: {}", name, e)))
        };

        settings.validate()?;

        let rpc = RpcEndpoint::parse(&require(env_vars::RPC_URL)?)?;
        let private_key = SecretString::from(require(env_vars::PRIVATE_KEY)?);
        let router = address(env_vars::ROUTER_ADDRESS)?;
        let assets = AssetBook::new(
            address(env_vars::ETH_ADDRESS)?,
            address(env_vars::USDT_ADDRESS)?,
            address(env_vars::BTC_ADDRESS)?,
        );

        Ok(Self {
            rpc,
            private_key,
            router,
            assets,
            settings,
        })
    }
}

// Manual Debug so the key never reaches a log line
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc", &self.rpc)
            .field("private_key", &"[REDACTED]")
            .field("router", &self.router)
            .field("assets", &self.assets)
            .field("settings", &self.settings)
            .finish()
    }
}
