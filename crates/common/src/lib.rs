pub mod config;
pub mod dataset;
pub mod filter_rules;
pub mod observability;
pub mod types;
