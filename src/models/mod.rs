mod card;
mod fx_rate;
mod run_config;
pub mod supply;

pub use card::{CardRecord, NormalizedCard, SetAggregate};
pub use fx_rate::FxRate;
pub use run_config::{PipelineConfig, RunReport, SetConfig, SetRunSummary, SupplyMode};
pub use supply::{PrintRunEntry, RarityTable};
