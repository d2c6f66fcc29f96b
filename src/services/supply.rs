//! Supply resolution: estimated print count per card.
//!
//! Two strategies observed across the system's history, selected per run
//! and never intermixed. Both answer the same question through one dispatch
//! site so card processing stays strategy-agnostic.

use std::collections::HashMap;

use crate::models::{CardRecord, PrintRunEntry, RarityTable, SetConfig};

pub enum SupplyResolver {
    /// Look the card's rarity up in the per-set table of estimates
    Rarity { table: RarityTable },
    /// Authoritative per-card counts keyed by (set code, collector number),
    /// built from the reference list that drove the targeted fetch
    Explicit {
        counts: HashMap<(String, String), u64>,
    },
}

impl SupplyResolver {
    pub fn rarity(table: RarityTable) -> Self {
        SupplyResolver::Rarity { table }
    }

    pub fn explicit(entries: &[PrintRunEntry]) -> Self {
        let counts = entries
            .iter()
            .map(|e| {
                (
                    (e.set_code.clone(), e.collector_number.clone()),
                    e.prints,
                )
            })
            .collect();
        SupplyResolver::Explicit { counts }
    }

    /// Resolve the estimated print count for a card; `None` means unknown.
    ///
    /// A zero rarity estimate counts as unknown: a zero print run is not a
    /// thing, it is a placeholder row in the reference data.
    pub fn resolve(&self, record: &CardRecord, set: &SetConfig) -> Option<u64> {
        match self {
            SupplyResolver::Rarity { table } => table
                .get(&set.supply_key)
                .and_then(|rarities| rarities.get(&record.rarity.to_lowercase()))
                .copied()
                .filter(|&count| count > 0),
            SupplyResolver::Explicit { counts } => counts
                .get(&(record.set_code.clone(), record.collector_number.clone()))
                .copied(),
        }
    }
}
