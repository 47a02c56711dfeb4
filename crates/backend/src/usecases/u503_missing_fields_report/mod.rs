pub mod executor;

pub use executor::{format_report, MissingFieldsExecutor};
