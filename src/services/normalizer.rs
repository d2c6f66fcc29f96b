//! Price normalization and market-cap arithmetic.
//!
//! The canonical unit price is USD. A direct USD price is used verbatim; a
//! EUR-only price is converted with the run's FX rate and rounded to cents.
//! Anything unparseable degrades to unknown (`None`), never to zero and
//! never to an error, so one bad price field cannot poison a set.

use tracing::warn;

use crate::models::{CardRecord, FxRate};
use crate::utils::round2;

/// Derive the canonical USD unit price for a card.
///
/// Parse failures are treated identically to absent fields: the next source
/// in the fallback chain (USD -> EUR * rate -> unknown) is tried.
pub fn normalize_price(record: &CardRecord, fx_rate: &FxRate) -> Option<f64> {
    if let Some(usd) = parse_price(record.usd_raw.as_deref()) {
        return Some(usd);
    }

    match parse_price(record.eur_raw.as_deref()) {
        Some(eur) => Some(round2(eur * fx_rate.value)),
        None => {
            if record.eur_raw.is_some() {
                warn!(
                    "Set {} card {} ({}): EUR price {:?} not parseable, price unknown",
                    record.set_code, record.collector_number, record.name, record.eur_raw
                );
            }
            None
        }
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Market cap = unit price * supply, rounded to cents.
///
/// Unknown unless both inputs are known. Pure, no failure modes beyond
/// propagating unknown.
pub fn compute_market_cap(usd: Option<f64>, prints: Option<u64>) -> Option<f64> {
    match (usd, prints) {
        (Some(price), Some(count)) => Some(round2(price * count as f64)),
        _ => None,
    }
}
