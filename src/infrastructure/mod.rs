pub mod config;
pub mod dns;
pub mod store;
pub mod tracing;
