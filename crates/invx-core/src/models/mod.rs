//! Data models: extracted invoice records and configuration.

pub mod config;
pub mod record;
