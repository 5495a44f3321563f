//! Statistics calculation engine.
//!
//! Pure functions over loaded records and wars:
//! - `totals`: sums, averages, best-by and heat scores
//! - `grouping`: squad partitions and per-group summaries
//! - `outcome`: win/loss inference from free text
//! - `synergy`: baseline-group and player-pair comparisons across wars
//! - `overview`: company record and player lifetime profiles

pub mod grouping;
pub mod outcome;
pub mod overview;
pub mod synergy;
pub mod totals;

pub use grouping::*;
pub use outcome::*;
pub use overview::*;
pub use synergy::*;
pub use totals::*;
