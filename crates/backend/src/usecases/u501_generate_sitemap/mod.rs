pub mod executor;

pub use executor::{build_sitemap, SitemapExecutor};
