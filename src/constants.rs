//! Endpoint and pipeline constants.
//!
//! The catalog endpoints follow the Scryfall API surface; the FX endpoint
//! follows the Frankfurter API surface. Both are plain HTTP GET + JSON.

/// Card search endpoint for bulk (paginated) set fetches
pub const CATALOG_SEARCH_URL: &str = "https://api.scryfall.com/cards/search";

/// Base URL for targeted per-card lookups: `{base}/{set_code}/{collector_number}`
pub const CATALOG_CARD_URL: &str = "https://api.scryfall.com/cards";

/// EUR -> USD conversion rate endpoint
pub const FX_RATE_URL: &str = "https://api.frankfurter.app/latest?from=EUR&to=USD";

/// Conversion rate substituted when the FX service is unreachable or returns
/// garbage. Keeping this fixed makes offline runs deterministic.
pub const FALLBACK_EUR_USD_RATE: f64 = 1.04;

/// Base URL for synthesized thumbnail links when the catalog response carries
/// no image. Best-effort: the resulting URL is well-formed but may 404.
pub const THUMBNAIL_FALLBACK_BASE: &str = "https://img.scryfall.com/cards/small/en";

/// Timeout applied to every catalog and FX request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default reference supply file
pub const DEFAULT_PRINTS_FILE: &str = "prints.json";

/// Sets crawled when no `--sets` filter is given.
/// Columns: (set name, catalog code, supply key in the reference file)
pub const DEFAULT_SETS: &[(&str, &str, &str)] = &[
    ("alpha", "lea", "Alpha"),
    ("beta", "leb", "Beta"),
    ("unlimited", "2ed", "Unlimited"),
];

/// Combined snapshot filename (all sets, consumed by the presentation layer)
pub const SNAPSHOT_FILE: &str = "crawler_output.json";

/// Update marker filename
pub const UPDATE_MARKER_FILE: &str = "last_update.json";

/// Per-set CSV column order
pub const CSV_COLUMNS: &[&str] = &[
    "name",
    "collector_number",
    "prints",
    "usd",
    "market_cap",
    "thumbnail",
];
