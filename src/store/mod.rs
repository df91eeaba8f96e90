pub mod backend;
pub mod error;
pub mod observation_store;
