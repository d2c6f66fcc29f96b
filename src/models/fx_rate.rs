use crate::constants::FALLBACK_EUR_USD_RATE;

/// EUR -> USD conversion multiplier, resolved once per pipeline run and
/// shared read-only by every price normalization in that run.
#[derive(Debug, Clone, Copy)]
pub struct FxRate {
    /// Strictly positive multiplier
    pub value: f64,
    /// True when the fixed fallback constant was substituted for a live rate
    pub is_fallback: bool,
}

impl FxRate {
    pub fn live(value: f64) -> Self {
        Self {
            value,
            is_fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            value: FALLBACK_EUR_USD_RATE,
            is_fallback: true,
        }
    }
}
