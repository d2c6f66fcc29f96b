use std::path::PathBuf;

use crate::error::Error;
use crate::models::{PipelineConfig, RunReport, SupplyMode};
use crate::services::Pipeline;

pub fn run(
    mode_arg: String,
    sets: Option<String>,
    prints_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
) {
    let mode = match SupplyMode::from_str(&mode_arg) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("❌ Error parsing mode: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = PipelineConfig {
        mode,
        ..PipelineConfig::default()
    };
    if let Some(selection) = sets {
        if let Err(e) = config.filter_sets(&selection) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
    if let Some(path) = prints_file {
        config.prints_file = path;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(secs) = timeout_secs {
        config.timeout_secs = secs;
    }

    println!(
        "🃏 Crawling {} set(s) in {} mode",
        config.sets.len(),
        mode_arg.to_lowercase()
    );
    println!("📁 Output directory: {}", config.output_dir.display());

    match run_pipeline(config) {
        Ok(report) => {
            print_report(&report);
            println!("\n✅ Crawl completed successfully!");
        }
        Err(e) => {
            eprintln!("\n❌ Crawl failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_pipeline(config: PipelineConfig) -> Result<RunReport, Error> {
    // Create Tokio runtime
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Network(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let pipeline = Pipeline::new(config)?;
        pipeline.run().await
    })
}

fn print_report(report: &RunReport) {
    if report.rate_is_fallback {
        println!("\n💱 EUR->USD rate: {:.4} (fallback)", report.rate);
    } else {
        println!("\n💱 EUR->USD rate: {:.4}", report.rate);
    }

    for set in &report.sets {
        println!(
            "   {}: {} cards ({} with market cap), total ${:.2}",
            set.name, set.cards, set.capped, set.total_market_cap
        );
    }
}
