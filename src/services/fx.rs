use serde_json::Value;
use tracing::{info, warn};

use crate::constants::FX_RATE_URL;
use crate::models::FxRate;

/// Resolve the EUR -> USD conversion rate, once per pipeline run.
///
/// One GET against the rate service, no retries. Any failure (transport
/// error, non-success status, malformed payload, non-positive rate) is
/// logged and degrades to the fixed fallback constant. This call is total:
/// the pipeline never blocks or aborts on the rate service.
pub async fn resolve_eur_usd(client: &reqwest::Client) -> FxRate {
    match fetch_rate(client).await {
        Ok(value) => {
            info!("Using live EUR->USD rate: {:.4}", value);
            FxRate::live(value)
        }
        Err(reason) => {
            warn!(
                "Failed to fetch EUR->USD rate ({}), using fallback {}",
                reason,
                FxRate::fallback().value
            );
            FxRate::fallback()
        }
    }
}

async fn fetch_rate(client: &reqwest::Client) -> Result<f64, String> {
    let response = client
        .get(FX_RATE_URL)
        .send()
        .await
        .map_err(|e| format!("request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("rate service returned status {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("failed to read response body: {}", e))?;

    let json: Value =
        serde_json::from_str(&body).map_err(|e| format!("invalid JSON payload: {}", e))?;

    parse_usd_rate(&json)
}

/// Extract the USD rate from a `{"rates": {"USD": <f64>}}` payload
fn parse_usd_rate(json: &Value) -> Result<f64, String> {
    let rate = json["rates"]["USD"]
        .as_f64()
        .ok_or("missing rates.USD field")?;

    if rate <= 0.0 {
        return Err(format!("non-positive rate {}", rate));
    }

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_usd_rate() {
        let payload = json!({"amount": 1.0, "base": "EUR", "rates": {"USD": 1.0832}});
        assert_eq!(parse_usd_rate(&payload).unwrap(), 1.0832);
    }

    #[test]
    fn test_parse_rejects_missing_rate() {
        let payload = json!({"rates": {"GBP": 0.85}});
        assert!(parse_usd_rate(&payload).is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_rate() {
        let payload = json!({"rates": {"USD": "about one"}});
        assert!(parse_usd_rate(&payload).is_err());
    }

    #[test]
    fn test_parse_rejects_non_positive_rate() {
        let payload = json!({"rates": {"USD": 0.0}});
        assert!(parse_usd_rate(&payload).is_err());
    }
}
