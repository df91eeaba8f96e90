pub mod aggregator;
pub mod columns;
pub mod deltas;
pub mod error;
pub mod extract;
pub mod normalizer;
pub mod summary;
