//! Core library for Hospitalia - session ledger, spreadsheet export, offline
//! asset cache and configuration.
//!
//! - `ledger`: form input, running totals and rendered rows
//! - `export`: spreadsheet writer collaborator (CSV)
//! - `cache`: versioned offline cache shell (install / fetch / activate)
//! - `config`: configuration file and environment overrides
//! - `utils`: currency and text formatting

pub mod cache;
pub mod config;
pub mod export;
pub mod ledger;
pub mod utils;

pub use config::Config;
