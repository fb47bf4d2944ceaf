pub mod classifier;
pub mod processor;
pub mod runner;
pub mod staging;
