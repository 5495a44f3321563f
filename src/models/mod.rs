//! Core data models for the war ledger.

mod build;
mod outcome;
mod player;
mod stats;
mod war;

pub use build::*;
pub use outcome::*;
pub use player::*;
pub use stats::*;
pub use war::*;
