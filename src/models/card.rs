use serde::{Serialize, Serializer};

/// Raw card record as fetched from the catalog service.
///
/// Price fields keep the wire strings untouched; parsing happens during
/// normalization so a malformed price degrades that one value instead of
/// failing the fetch.
#[derive(Debug, Clone)]
pub struct CardRecord {
    pub name: String,
    /// Collector number with decoration (`#`, whitespace) already stripped
    pub collector_number: String,
    /// Lower-cased rarity tag ("common", "uncommon", "rare", "land", ...)
    pub rarity: String,
    pub usd_raw: Option<String>,
    pub eur_raw: Option<String>,
    pub thumbnail: String,
    pub set_code: String,
}

/// Card with reconciled USD price, resolved supply and computed market cap.
///
/// `None` means unknown: the value could not be determined from available
/// data. Unknown is never written as zero; it serializes as an empty field
/// so downstream consumers can tell "no data" from "worthless".
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedCard {
    pub name: String,
    pub collector_number: String,
    pub rarity: String,
    #[serde(serialize_with = "serialize_opt_count")]
    pub prints: Option<u64>,
    #[serde(serialize_with = "serialize_opt_price")]
    pub usd: Option<f64>,
    #[serde(serialize_with = "serialize_opt_price")]
    pub market_cap: Option<f64>,
    pub thumbnail: String,
}

/// One fully processed set: cards in catalog order plus the set total.
#[derive(Debug, Clone)]
pub struct SetAggregate {
    pub set_name: String,
    pub cards: Vec<NormalizedCard>,
    /// Sum of the known per-card market caps, rounded to cents.
    /// Cards with unknown market cap contribute nothing.
    pub total_market_cap: f64,
}

/// Known prices render as two-decimal strings ("10.40"), unknown as ""
fn serialize_opt_price<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_str(&format!("{:.2}", v)),
        None => serializer.serialize_str(""),
    }
}

/// Known supply renders as an integer, unknown as ""
fn serialize_opt_count<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_u64(*v),
        None => serializer.serialize_str(""),
    }
}

impl NormalizedCard {
    /// CSV row in `CSV_COLUMNS` order; unknown values become empty fields
    pub fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.collector_number.clone(),
            self.prints.map(|p| p.to_string()).unwrap_or_default(),
            self.usd.map(|v| format!("{:.2}", v)).unwrap_or_default(),
            self.market_cap
                .map(|v| format!("{:.2}", v))
                .unwrap_or_default(),
            self.thumbnail.clone(),
        ]
    }
}
