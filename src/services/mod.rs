pub mod aggregator;
pub mod catalog;
pub mod fx;
pub mod normalizer;
pub mod pipeline;
pub mod snapshot;
pub mod supply;

pub use catalog::CatalogClient;
pub use pipeline::Pipeline;
pub use snapshot::SnapshotWriter;
pub use supply::SupplyResolver;
