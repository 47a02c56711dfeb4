pub mod dataset;
pub mod policy;
