//! Durable snapshot output for the presentation layer.
//!
//! Three artifacts per run:
//! - `data_<set>.csv`: one row per card, catalog order, unknown values as
//!   empty fields;
//! - `crawler_output.json`: all sets with their cards and per-set totals;
//! - `last_update.json`: a single ISO-8601 timestamp, written last and
//!   only after every set succeeded.
//!
//! Every file goes through write-temp-then-rename so a concurrent reader
//! never observes a partial snapshot.

use chrono::Utc;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{CSV_COLUMNS, SNAPSHOT_FILE, UPDATE_MARKER_FILE};
use crate::error::{Error, Result};
use crate::models::SetAggregate;

pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Persist all artifacts for a completed run, marker last
    pub fn write_all(&self, aggregates: &[SetAggregate]) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;

        for aggregate in aggregates {
            self.write_set_csv(aggregate)?;
        }
        self.write_combined_json(aggregates)?;
        self.write_update_marker()?;

        Ok(())
    }

    fn write_set_csv(&self, aggregate: &SetAggregate) -> Result<()> {
        let path = self
            .output_dir
            .join(format!("data_{}.csv", aggregate.set_name));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_COLUMNS)?;
        for card in &aggregate.cards {
            writer.write_record(card.to_csv_row())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(format!("CSV flush failed: {}", e)))?;

        replace_file(&path, &bytes)?;
        info!(
            "Wrote {} ({} cards)",
            path.display(),
            aggregate.cards.len()
        );
        Ok(())
    }

    fn write_combined_json(&self, aggregates: &[SetAggregate]) -> Result<()> {
        let path = self.output_dir.join(SNAPSHOT_FILE);

        let mut combined = serde_json::Map::new();
        for aggregate in aggregates {
            let cards = serde_json::to_value(&aggregate.cards)
                .map_err(|e| Error::Parse(format!("Failed to serialize cards: {}", e)))?;
            combined.insert(
                aggregate.set_name.clone(),
                json!({
                    "cards": cards,
                    "total_marketcap": aggregate.total_market_cap,
                }),
            );
        }

        let body = serde_json::to_string_pretty(&Value::Object(combined))
            .map_err(|e| Error::Parse(format!("Failed to serialize snapshot: {}", e)))?;

        replace_file(&path, body.as_bytes())?;
        info!("Wrote combined snapshot to {}", path.display());
        Ok(())
    }

    fn write_update_marker(&self) -> Result<()> {
        let path = self.output_dir.join(UPDATE_MARKER_FILE);
        let marker = json!({ "last_update": Utc::now().to_rfc3339() });

        let body = serde_json::to_string(&marker)
            .map_err(|e| Error::Parse(format!("Failed to serialize marker: {}", e)))?;

        replace_file(&path, body.as_bytes())?;
        info!("Wrote update marker to {}", path.display());
        Ok(())
    }
}

/// Write to a sibling temp file, then rename over the target. Rename within
/// one directory is atomic on the platforms this runs on.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)
        .map_err(|e| Error::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| Error::Io(format!("Failed to replace {}: {}", path.display(), e)))?;
    Ok(())
}
