//! Route handlers, grouped by resource.

pub mod overview;
pub mod reload;
pub mod synergy;
pub mod wars;
