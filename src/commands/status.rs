use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{SNAPSHOT_FILE, UPDATE_MARKER_FILE};
use crate::utils::get_data_dir;

pub fn run(output_dir: Option<PathBuf>) {
    println!("🃏 Card Market Snapshot Status\n");

    let dir = output_dir.unwrap_or_else(get_data_dir);
    match show_status(&dir) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_status(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let marker_path = dir.join(UPDATE_MARKER_FILE);
    match fs::read_to_string(&marker_path) {
        Ok(body) => {
            let marker: Value = serde_json::from_str(&body)?;
            let stamp = marker["last_update"].as_str().unwrap_or("N/A");
            println!("🕒 Last update: {}", stamp);
        }
        Err(_) => {
            println!("⚠️  No update marker found. Run 'crawl' first.");
            return Ok(());
        }
    }

    let snapshot_path = dir.join(SNAPSHOT_FILE);
    let body = fs::read_to_string(&snapshot_path)?;
    let snapshot: Value = serde_json::from_str(&body)?;

    let Some(sets) = snapshot.as_object() else {
        println!("⚠️  Snapshot at {} is not readable", snapshot_path.display());
        return Ok(());
    };

    println!();
    for (name, entry) in sets {
        let cards = entry["cards"].as_array().map(|c| c.len()).unwrap_or(0);
        let capped = entry["cards"]
            .as_array()
            .map(|c| {
                c.iter()
                    .filter(|card| card["market_cap"].as_str().is_some_and(|m| !m.is_empty()))
                    .count()
            })
            .unwrap_or(0);
        let total = entry["total_marketcap"].as_f64().unwrap_or(0.0);

        println!("🔹 {}", name);
        println!("   Cards:      {:>6} ({} with market cap)", cards, capped);
        println!("   Market cap: ${:.2}", total);
    }

    Ok(())
}
