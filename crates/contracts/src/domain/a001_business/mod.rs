pub mod aggregate;
pub mod dataset;
pub mod hours;
pub mod normalizer;

pub use aggregate::BusinessRecord;
pub use dataset::Dataset;
pub use hours::{Interval, WeeklyHours, Weekday};
pub use normalizer::normalize;
