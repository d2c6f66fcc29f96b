//! Per-set aggregation of normalized cards.

use crate::models::{NormalizedCard, SetAggregate};
use crate::utils::round2;

/// Collect a set's cards (catalog order preserved) and compute the set
/// total. Only cards with a known market cap contribute; unknown cards are
/// carried through untouched and are not errors.
pub fn aggregate(set_name: &str, cards: Vec<NormalizedCard>) -> SetAggregate {
    let total_market_cap = round2(cards.iter().filter_map(|card| card.market_cap).sum());

    SetAggregate {
        set_name: set_name.to_string(),
        cards,
        total_market_cap,
    }
}
