mod climate;
mod engine;
mod error;
mod ingest;
mod report;
mod store;
mod types;
mod utils;

pub use climate::{ClimateAnalyzer, ClimateReport};
pub use error::ClimateError;

pub use ingest::bom_reader::{BomReader, IngestSummary};
pub use store::backend::{ObservationSnapshot, StoreBackend};
pub use store::observation_store::ObservationStore;

pub use types::climate::*;
pub use types::diurnal_period::*;
pub use types::observation::*;

pub use engine::error::AggregationError;
pub use ingest::error::IngestError;
pub use store::error::{Discarded, StoreError};
