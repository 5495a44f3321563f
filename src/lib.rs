//! # War Ledger
//!
//! Company war-report ledger: reads exported war CSVs, classifies builds and
//! computes per-war and cross-war statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (player records, wars, builds, outcomes)
//! - **ingest**: CSV text parsing and row normalization
//! - **calculate**: Statistics, grouping and cross-war comparisons
//! - **storage**: The loaded war repository
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
