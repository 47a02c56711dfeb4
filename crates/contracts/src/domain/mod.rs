pub mod a001_business;
pub mod a002_best_thing;
