pub mod api;
pub mod classification;
pub mod job;
