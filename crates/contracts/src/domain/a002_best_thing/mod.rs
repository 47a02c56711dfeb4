//! Подборка "Best Things to Do" для главной страницы.

pub mod aggregate;
pub mod builder;

pub use aggregate::{SpotlightCategory, SpotlightItem, SpotlightRow};
pub use builder::{build_spotlight, SpotlightBuild, DEFAULT_CAP_PER_CATEGORY, REQUIRED_COLUMNS};
