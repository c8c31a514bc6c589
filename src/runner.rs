//! Agent runner module
//!
//! The main loop: pick a pair, size a trade from the live balance, make sure
//! the router is approved, swap, then pause. Any failure inside an iteration
//! is logged and followed by the usual pause; the loop only ends when its
//! shutdown token is cancelled.

use crate::allowance::AllowanceManager;
use crate::chain::{ChainClient, TxConfirmation};
use crate::config::AgentSettings;
use crate::executor::TradeExecutor;
use crate::pacing::Pacer;
use crate::pairs::PairCatalog;
use crate::sizing::{AmountSizer, SizingDecision};
use crate::tokens::format_units;
use crate::Result;
use alloy::primitives::{Address, U256};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Result of one loop iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Swap mined successfully
    Swapped {
        pair: String,
        amount: U256,
        confirmation: TxConfirmation,
    },
    /// Balance did not exceed the pair's reserve
    Skipped { pair: String },
    /// Dry run: a trade was sized but nothing was submitted
    DryRun { pair: String, amount: U256 },
    /// A balance query, approval, or swap failed
    Failed { error: String },
}

/// Counters over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub swaps: u64,
    pub skips: u64,
    pub dry_runs: u64,
    pub failures: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: &IterationOutcome) {
        self.iterations += 1;
        match outcome {
            IterationOutcome::Swapped { .. } => self.swaps += 1,
            IterationOutcome::Skipped { .. } => self.skips += 1,
            IterationOutcome::DryRun { .. } => self.dry_runs += 1,
            IterationOutcome::Failed { .. } => self.failures += 1,
        }
    }
}

/// Agent runner that owns the trading loop
pub struct AgentRunner<C: ChainClient + ?Sized, R: Rng = StdRng> {
    client: Arc<C>,
    catalog: PairCatalog,
    sizer: AmountSizer,
    allowances: AllowanceManager,
    executor: TradeExecutor,
    pacer: Pacer,
    rng: R,
    dry_run: bool,
    stats: LoopStats,
}

impl<C: ChainClient + ?Sized> AgentRunner<C, StdRng> {
    /// Create a runner with an entropy-seeded RNG
    pub fn new(
        client: Arc<C>,
        catalog: PairCatalog,
        router: Address,
        settings: &AgentSettings,
    ) -> Self {
        Self::with_rng(client, catalog, router, settings, StdRng::from_entropy())
    }
}

impl<C: ChainClient + ?Sized, R: Rng> AgentRunner<C, R> {
    /// Create a runner with an explicit random source
    pub fn with_rng(
        client: Arc<C>,
        catalog: PairCatalog,
        router: Address,
        settings: &AgentSettings,
        rng: R,
    ) -> Self {
        Self {
            client,
            catalog,
            sizer: AmountSizer::new(settings.sizing),
            allowances: AllowanceManager::new(settings.allowance_policy),
            executor: TradeExecutor::new(router, settings.swap.clone()),
            pacer: Pacer::new(settings.pacing),
            rng,
            dry_run: false,
            stats: LoopStats::default(),
        }
    }

    /// Size trades and log them without submitting transactions
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Run until `shutdown` is cancelled
    pub async fn run(&mut self, shutdown: CancellationToken) -> LoopStats {
        info!(
            account = %self.client.account(),
            pairs = self.catalog.len(),
            dry_run = self.dry_run,
            "Starting auto swap loop"
        );

        while !shutdown.is_cancelled() {
            self.step(&shutdown).await;
        }

        info!(
            iterations = self.stats.iterations,
            swaps = self.stats.swaps,
            skips = self.stats.skips,
            dry_runs = self.stats.dry_runs,
            failures = self.stats.failures,
            "Auto swap loop stopped"
        );
        self.stats
    }

    /// One full iteration, including the trailing pause
    pub async fn step(&mut self, shutdown: &CancellationToken) -> IterationOutcome {
        let outcome = match self.attempt().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Error: {}", e);
                info!("Retrying after delay");
                IterationOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        self.stats.record(&outcome);
        self.pacer.pace(&mut self.rng, shutdown).await;
        outcome
    }

    async fn attempt(&mut self) -> Result<IterationOutcome> {
        let pair = self.catalog.select_random(&mut self.rng);
        let account = self.client.account();
        info!(pair = %pair, "Selected pair");

        let balance = self.client.balance_of(pair.source.address, account).await?;
        let amount = match self.sizer.size_trade(pair, balance, &mut self.rng) {
            SizingDecision::Trade { amount } => amount,
            SizingDecision::NoViableAmount => {
                info!(
                    token = %pair.source.symbol,
                    balance = %format_units(balance, pair.decimals()),
                    min_reserve = %pair.min_reserve,
                    "Insufficient {} balance, trying another pair",
                    pair.source.symbol
                );
                return Ok(IterationOutcome::Skipped {
                    pair: pair.to_string(),
                });
            }
        };
        info!(
            pair = %pair,
            amount = %format_units(amount, pair.decimals()),
            "Sized trade"
        );

        if self.dry_run {
            info!(
                pair = %pair,
                router = %self.executor.router(),
                "Dry run: skipping approval and swap"
            );
            return Ok(IterationOutcome::DryRun {
                pair: pair.to_string(),
                amount,
            });
        }

        self.allowances
            .ensure_approved(
                self.client.as_ref(),
                &pair.source,
                self.executor.router(),
                amount,
            )
            .await?;

        let confirmation = self
            .executor
            .execute_swap(self.client.as_ref(), pair, amount)
            .await?;
        info!(tx = %confirmation.tx_hash, "Swap succeeded");

        Ok(IterationOutcome::Swapped {
            pair: pair.to_string(),
            amount,
            confirmation,
        })
    }
}
