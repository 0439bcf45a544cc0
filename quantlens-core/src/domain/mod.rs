//! Domain types for quantlens

pub mod bar;
pub mod ids;

pub use bar::{Bar, PriceField};
pub use ids::{ConfigHash, DatasetHash};
