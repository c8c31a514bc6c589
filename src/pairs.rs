//! Trading pair catalog
//!
//! A fixed, ordered list of directed pairs. Built once at startup and never
//! mutated.

use crate::tokens::{parse_units, Asset, AssetBook, MAX_DECIMALS};
use crate::{Error, Result};
use alloy::primitives::U256;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// A directed trading pair
#[derive(Debug, Clone, Serialize)]
pub struct TradingPair {
    /// Asset being sold
    pub source: Asset,
    /// Asset being bought
    pub destination: Asset,
    /// Minimum source balance (human units) that must remain untouched
    pub min_reserve: String,
    #[serde(skip)]
    min_reserve_raw: U256,
}

impl TradingPair {
    /// Create a pair, validating its invariants
    pub fn new(source: Asset, destination: Asset, min_reserve: &str) -> Result<Self> {
        if source.address == destination.address {
            return Err(Error::InvalidArgument(format!(
                "Pair {}/{} uses the same asset on both sides",
                source.symbol, destination.symbol
            )));
        }
        if source.decimals > MAX_DECIMALS {
            return Err(Error::InvalidArgument(format!(
                "{} decimals {} exceeds maximum {}",
                source.symbol, source.decimals, MAX_DECIMALS
            )));
        }
        let min_reserve_raw = parse_units(min_reserve, source.decimals)?;

        Ok(Self {
            source,
            destination,
            min_reserve: min_reserve.trim().to_string(),
            min_reserve_raw,
        })
    }

    /// Precision of the source asset
    pub fn decimals(&self) -> u8 {
        self.source.decimals
    }

    /// Minimum reserve in the source asset's smallest unit
    pub fn min_reserve_raw(&self) -> U256 {
        self.min_reserve_raw
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.symbol, self.destination.symbol)
    }
}

/// The static set of pairs the agent picks from
#[derive(Debug, Clone)]
pub struct PairCatalog {
    pairs: Vec<TradingPair>,
}

impl PairCatalog {
    /// Create a catalog; it must contain at least one pair
    pub fn new(pairs: Vec<TradingPair>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::Config("Pair catalog must not be empty".to_string()));
        }
        Ok(Self { pairs })
    }

    /// The standard six-pair catalog over ETH, USDT and BTC
    pub fn standard(assets: &AssetBook) -> Result<Self> {
        let AssetBook { eth, usdt, btc } = assets;

        Self::new(vec![
            // ETH <> USDT
            TradingPair::new(eth.clone(), usdt.clone(), "0.005")?,
            TradingPair::new(usdt.clone(), eth.clone(), "10")?,
            // BTC <> USDT
            TradingPair::new(btc.clone(), usdt.clone(), "0.0005")?,
            TradingPair::new(usdt.clone(), btc.clone(), "10")?,
            // ETH <> BTC
            TradingPair::new(eth.clone(), btc.clone(), "0.005")?,
            TradingPair::new(btc.clone(), eth.clone(), "0.0005")?,
        ])
    }

    /// Pick a pair uniformly at random
    pub fn select_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &TradingPair {
        &self.pairs[rng.gen_range(0..self.pairs.len())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradingPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn book() -> AssetBook {
        AssetBook::new(
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            Address::repeat_byte(0x33),
        )
    }

    #[test]
    fn test_standard_catalog_pairs_are_distinct() {
        let catalog = PairCatalog::standard(&book()).unwrap();
        assert_eq!(catalog.len(), 6);
        for pair in catalog.iter() {
            assert_ne!(pair.source.address, pair.destination.address);
        }
    }

    #[test]
    fn test_standard_catalog_reserves() {
        let catalog = PairCatalog::standard(&book()).unwrap();
        let eth_usdt = catalog.iter().next().unwrap();
        assert_eq!(eth_usdt.to_string(), "ETH -> USDT");
        assert_eq!(eth_usdt.decimals(), 18);
        assert_eq!(
            eth_usdt.min_reserve_raw(),
            U256::from(5_000_000_000_000_000u64)
        );

        let usdt_eth = catalog.iter().nth(1).unwrap();
        assert_eq!(usdt_eth.decimals(), 6);
        assert_eq!(usdt_eth.min_reserve_raw(), U256::from(10_000_000u64));
    }

    #[test]
    fn test_rejects_same_asset_pair() {
        let assets = book();
        let result = TradingPair::new(assets.eth.clone(), assets.eth.clone(), "0.1");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_negative_reserve() {
        let assets = book();
        let result = TradingPair::new(assets.eth.clone(), assets.usdt.clone(), "-1");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(PairCatalog::new(vec![]), Err(Error::Config(_))));
    }

    #[test]
    fn test_select_random_covers_catalog() {
        let catalog = PairCatalog::standard(&book()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<String, usize> = HashMap::new();

        for _ in 0..6_000 {
            let pair = catalog.select_random(&mut rng);
            *counts.entry(pair.to_string()).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            // Expected 1000 each
            assert!(*count > 800 && *count < 1200, "skewed selection: {}", count);
        }
    }
}
