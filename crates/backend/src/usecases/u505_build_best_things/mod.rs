pub mod csv_reader;
pub mod executor;

pub use csv_reader::read_rows;
pub use executor::BestThingsExecutor;
