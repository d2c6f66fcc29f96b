//! Reference supply (print-run) dataset.
//!
//! Two historical shapes of `prints.json` are supported, selected by run
//! mode and never mixed within one run:
//!
//! - *Rarity-keyed*: `{ "Alpha": { "rare": 1100, "uncommon": 4500 } }`,
//!   a per-set map from rarity tag to an estimated print count.
//! - *Explicit-count*: `[ { "set": "lea", "collector_number": "232",
//!   "name": "...", "prints": 1100 } ]`, one authoritative count per card;
//!   the same entries drive the targeted fetch.
//!
//! A missing or unreadable file is fatal (the run has no valid basis
//! without it); a malformed individual entry is warned about and skipped.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};

/// Set key -> rarity tag (lower-cased) -> estimated print count
pub type RarityTable = HashMap<String, HashMap<String, u64>>;

/// One entry of the explicit-count reference list
#[derive(Debug, Clone)]
pub struct PrintRunEntry {
    pub set_code: String,
    pub collector_number: String,
    pub name: String,
    pub prints: u64,
}

fn read_reference_file(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Reference supply file {} not readable: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        Error::Parse(format!(
            "Reference supply file {} is not valid JSON: {}",
            path.display(),
            e
        ))
    })
}

/// Load the rarity-keyed shape.
///
/// Rarity tags are lower-cased on load so lookups match catalog rarities.
/// Entries whose count is not a non-negative integer are skipped with a
/// warning; the rest of the table still loads.
pub fn load_rarity_table(path: &Path) -> Result<RarityTable> {
    let json = read_reference_file(path)?;

    let sets = json.as_object().ok_or_else(|| {
        Error::Parse(format!(
            "{}: expected a top-level object mapping set keys to rarity counts",
            path.display()
        ))
    })?;

    let mut table = RarityTable::new();
    for (set_key, rarities) in sets {
        let Some(rarities) = rarities.as_object() else {
            warn!("{}: entry for set {} is not an object, skipping", path.display(), set_key);
            continue;
        };

        let mut counts = HashMap::new();
        for (rarity, count) in rarities {
            match count.as_u64() {
                Some(n) => {
                    counts.insert(rarity.to_lowercase(), n);
                }
                None => {
                    warn!(
                        "{}: set {} rarity {} has non-integer count {}, skipping entry",
                        path.display(),
                        set_key,
                        rarity,
                        count
                    );
                }
            }
        }
        table.insert(set_key.clone(), counts);
    }

    Ok(table)
}

/// Load the explicit-count shape.
///
/// Every surviving entry carries a parseable print count; entries with a
/// missing identifier or a non-integer count are skipped with a warning
/// since a broken entry can drive neither fetch nor supply resolution.
pub fn load_print_run_list(path: &Path) -> Result<Vec<PrintRunEntry>> {
    let json = read_reference_file(path)?;

    let items = json.as_array().ok_or_else(|| {
        Error::Parse(format!(
            "{}: expected a top-level array of print-run entries",
            path.display()
        ))
    })?;

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_print_run_entry(item) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                warn!("{}: entry {} skipped: {}", path.display(), index, reason);
            }
        }
    }

    Ok(entries)
}

fn parse_print_run_entry(item: &Value) -> std::result::Result<PrintRunEntry, String> {
    let set_code = item["set"]
        .as_str()
        .ok_or("missing 'set' field")?
        .to_lowercase();

    let collector_number = item["collector_number"]
        .as_str()
        .ok_or("missing 'collector_number' field")?;
    let collector_number = collector_number.replace('#', "").trim().to_string();
    if collector_number.is_empty() {
        return Err("empty collector number".to_string());
    }

    let name = item["name"].as_str().unwrap_or("").to_string();

    let prints = item["prints"]
        .as_u64()
        .ok_or_else(|| format!("non-integer print count {}", item["prints"]))?;

    Ok(PrintRunEntry {
        set_code,
        collector_number,
        name,
        prints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rarity_table() {
        let file = write_temp(r#"{"Alpha": {"Rare": 1100, "uncommon": 4500}}"#);
        let table = load_rarity_table(file.path()).unwrap();

        let alpha = table.get("Alpha").expect("Alpha should be present");
        assert_eq!(alpha.get("rare"), Some(&1100), "rarity keys are lower-cased");
        assert_eq!(alpha.get("uncommon"), Some(&4500));
    }

    #[test]
    fn test_rarity_table_skips_non_integer_counts() {
        let file = write_temp(r#"{"Alpha": {"rare": "lots", "uncommon": 4500}}"#);
        let table = load_rarity_table(file.path()).unwrap();

        let alpha = &table["Alpha"];
        assert!(alpha.get("rare").is_none(), "malformed count should be dropped");
        assert_eq!(alpha.get("uncommon"), Some(&4500));
    }

    #[test]
    fn test_load_print_run_list() {
        let file = write_temp(
            r##"[
                {"set": "LEA", "collector_number": "#232", "name": "Black Lotus", "prints": 1100},
                {"set": "lea", "collector_number": "233", "name": "Mox Pearl", "prints": 1100}
            ]"##,
        );
        let entries = load_print_run_list(file.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].set_code, "lea", "set codes are lower-cased");
        assert_eq!(entries[0].collector_number, "232", "decoration is stripped");
        assert_eq!(entries[0].prints, 1100);
    }

    #[test]
    fn test_print_run_list_skips_bad_counts_without_aborting() {
        let file = write_temp(
            r#"[
                {"set": "lea", "collector_number": "1", "name": "A", "prints": "many"},
                {"set": "lea", "collector_number": "2", "name": "B", "prints": 500}
            ]"#,
        );
        let entries = load_print_run_list(file.path()).unwrap();

        assert_eq!(entries.len(), 1, "bad entry is skipped, not fatal");
        assert_eq!(entries[0].collector_number, "2");
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = load_rarity_table(Path::new("/nonexistent/prints.json"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
