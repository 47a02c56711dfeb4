pub mod csv_reader;
pub mod executor;
pub mod mapper;

pub use csv_reader::read_places;
pub use executor::{ImportPlacesExecutor, ImportSummary};
pub use mapper::{map_row, merge, PlaceRow};
