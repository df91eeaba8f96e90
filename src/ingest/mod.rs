pub mod bom_reader;
pub mod error;
