pub mod executor;

pub use executor::{normalize_items, NormalizeExecutor};
