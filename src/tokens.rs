//! Asset metadata and unit conversion
//!
//! Every tradable asset is an ERC-20 token. Native ETH and BTC are traded
//! through their wrapped representations, whose addresses come from the
//! environment.

use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use serde::Serialize;

/// Largest decimals value for which `10^decimals` fits in a U256
pub const MAX_DECIMALS: u8 = 77;

/// Known decimals for the three catalog assets
pub mod decimals {
    pub const ETH: u8 = 18;
    pub const USDT: u8 = 6;
    pub const BTC: u8 = 8;
}

/// A fungible on-chain token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// Display label (e.g., "ETH", "USDT")
    pub symbol: String,
    /// Token contract address
    pub address: Address,
    /// Precision of the smallest unit
    pub decimals: u8,
}

impl Asset {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }
}

/// The assets the agent trades between
#[derive(Debug, Clone, Serialize)]
pub struct AssetBook {
    pub eth: Asset,
    pub usdt: Asset,
    pub btc: Asset,
}

impl AssetBook {
    /// Build the book from token addresses
    pub fn new(eth: Address, usdt: Address, btc: Address) -> Self {
        Self {
            eth: Asset::new("ETH", eth, decimals::ETH),
            usdt: Asset::new("USDT", usdt, decimals::USDT),
            btc: Asset::new("BTC", btc, decimals::BTC),
        }
    }

    /// All assets in a stable order
    pub fn all(&self) -> [&Asset; 3] {
        [&self.eth, &self.usdt, &self.btc]
    }
}

/// Format a smallest-unit amount as a human-readable decimal string
pub fn format_units(value: U256, decimals: u8) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let remainder_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = remainder_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

/// Parse a non-negative human-readable decimal string into smallest units
///
/// Fractional digits beyond `decimals` are rejected rather than rounded.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256> {
    if decimals > MAX_DECIMALS {
        return Err(Error::InvalidArgument(format!(
            "decimals {} exceeds maximum {}",
            decimals, MAX_DECIMALS
        )));
    }

    let value = value.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(Error::InvalidArgument(format!(
            "Invalid decimal amount: '{}'",
            value
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidArgument(format!(
            "Amount '{}' has more than {} fractional digits",
            value, decimals
        )));
    }

    let digits = format!("{}{:0<width$}", whole, fraction, width = decimals as usize);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|e| Error::InvalidArgument(format!("Amount '{}' out of range: {}", value, e)))
}
