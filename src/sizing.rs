//! Balance-aware trade sizing
//!
//! Trades a random share of whatever sits above the pair's reserve. All
//! arithmetic is exact in the source asset's smallest unit; the sampled
//! fraction has parts-per-million resolution and the product is truncated
//! toward zero, which is the quantization to `decimals` fractional digits.

use crate::config::SizingConfig;
use crate::pairs::TradingPair;
use alloy::primitives::U256;
use rand::Rng;

const PPM: u32 = 1_000_000;

/// Outcome of sizing a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingDecision {
    /// Balance does not exceed the reserve (or the share rounds to zero)
    NoViableAmount,
    /// Trade this many smallest units of the source asset
    Trade { amount: U256 },
}

impl SizingDecision {
    pub fn amount(&self) -> Option<U256> {
        match self {
            SizingDecision::NoViableAmount => None,
            SizingDecision::Trade { amount } => Some(*amount),
        }
    }
}

/// Computes randomized, reserve-respecting trade amounts
#[derive(Debug, Clone, Copy)]
pub struct AmountSizer {
    min_ppm: u32,
    max_ppm: u32,
}

impl AmountSizer {
    pub fn new(config: SizingConfig) -> Self {
        let to_ppm = |f: f64| (f.clamp(0.0, 1.0) * PPM as f64).round() as u32;
        let min_ppm = to_ppm(config.min_fraction).min(PPM - 1);
        let max_ppm = to_ppm(config.max_fraction).max(min_ppm + 1);
        Self { min_ppm, max_ppm }
    }

    /// Size a trade of `pair.source` given the wallet's raw `balance`
    pub fn size_trade<R: Rng + ?Sized>(
        &self,
        pair: &TradingPair,
        balance: U256,
        rng: &mut R,
    ) -> SizingDecision {
        let available = balance.saturating_sub(pair.min_reserve_raw());
        if available.is_zero() {
            return SizingDecision::NoViableAmount;
        }

        let ppm = rng.gen_range(self.min_ppm..self.max_ppm);
        let amount = share_of(available, ppm);

        tracing::debug!(
            pair = %pair,
            available = %available,
            fraction_ppm = ppm,
            amount = %amount,
            "Sized trade"
        );

        if amount.is_zero() {
            return SizingDecision::NoViableAmount;
        }
        SizingDecision::Trade { amount }
    }
}

impl Default for AmountSizer {
    fn default() -> Self {
        Self::new(SizingConfig::default())
    }
}

/// `floor(available * ppm / 1e6)` without intermediate overflow
fn share_of(available: U256, ppm: u32) -> U256 {
    let ppm = U256::from(ppm);
    let scale = U256::from(PPM);
    let quotient = available / scale;
    let remainder = available % scale;
    quotient * ppm + remainder * ppm / scale
}
