//! The ingestion-reconciliation-computation pipeline.
//!
//! One run: resolve the FX rate once, load the reference supply data
//! (missing or unreadable file is fatal, nothing is written), then process
//! each configured set to completion before finally writing all snapshots
//! plus the update marker. Per-card and per-page failures reduce the
//! output; they never abort the run.
//!
//! Execution is sequential and single-threaded; the only state shared
//! across sets is the immutable FX rate.

use tracing::info;

use crate::error::{Error, Result};
use crate::models::supply::{load_print_run_list, load_rarity_table, PrintRunEntry};
use crate::models::{
    CardRecord, FxRate, NormalizedCard, PipelineConfig, RunReport, SetConfig, SetRunSummary,
    SupplyMode,
};
use crate::services::catalog::CatalogClient;
use crate::services::snapshot::SnapshotWriter;
use crate::services::supply::SupplyResolver;
use crate::services::{aggregator, fx, normalizer};

enum FetchPlan {
    Bulk,
    Targeted(Vec<PrintRunEntry>),
}

pub struct Pipeline {
    config: PipelineConfig,
    client: reqwest::Client,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub async fn run(&self) -> Result<RunReport> {
        let fx_rate = fx::resolve_eur_usd(&self.client).await;

        let (resolver, plan) = self.load_supply_data()?;
        let catalog = CatalogClient::new(self.client.clone());

        let mut aggregates = Vec::with_capacity(self.config.sets.len());
        let mut summaries = Vec::with_capacity(self.config.sets.len());

        for set in &self.config.sets {
            info!("Processing set {} ({})", set.name, set.catalog_code);

            let records = match &plan {
                FetchPlan::Bulk => catalog.fetch_set_bulk(set).await,
                FetchPlan::Targeted(entries) => catalog.fetch_set_targeted(set, entries).await,
            };

            let cards = process_cards(&records, &fx_rate, &resolver, set);
            let aggregate = aggregator::aggregate(&set.name, cards);

            summaries.push(SetRunSummary {
                name: set.name.clone(),
                cards: aggregate.cards.len(),
                capped: aggregate
                    .cards
                    .iter()
                    .filter(|c| c.market_cap.is_some())
                    .count(),
                total_market_cap: aggregate.total_market_cap,
            });
            aggregates.push(aggregate);
        }

        SnapshotWriter::new(self.config.output_dir.clone()).write_all(&aggregates)?;

        Ok(RunReport {
            rate: fx_rate.value,
            rate_is_fallback: fx_rate.is_fallback,
            sets: summaries,
        })
    }

    /// Load the reference supply file in the shape the run mode expects.
    /// Failure here is fatal for the whole run: aggregation has no valid
    /// basis without supply data, so nothing gets written.
    fn load_supply_data(&self) -> Result<(SupplyResolver, FetchPlan)> {
        match self.config.mode {
            SupplyMode::Rarity => {
                let table = load_rarity_table(&self.config.prints_file)?;
                Ok((SupplyResolver::rarity(table), FetchPlan::Bulk))
            }
            SupplyMode::Explicit => {
                let entries = load_print_run_list(&self.config.prints_file)?;
                Ok((
                    SupplyResolver::explicit(&entries),
                    FetchPlan::Targeted(entries),
                ))
            }
        }
    }
}

/// Normalize, resolve supply and compute market cap for each fetched card,
/// preserving catalog order
pub fn process_cards(
    records: &[CardRecord],
    fx_rate: &FxRate,
    resolver: &SupplyResolver,
    set: &SetConfig,
) -> Vec<NormalizedCard> {
    records
        .iter()
        .map(|record| {
            let usd = normalizer::normalize_price(record, fx_rate);
            let prints = resolver.resolve(record, set);
            let market_cap = normalizer::compute_market_cap(usd, prints);

            NormalizedCard {
                name: record.name.clone(),
                collector_number: record.collector_number.clone(),
                rarity: record.rarity.clone(),
                prints,
                usd,
                market_cap,
                thumbnail: record.thumbnail.clone(),
            }
        })
        .collect()
}
