//! Resume classification service
//!
//! Accepts uploaded resumes, classifies each one into a job category on a
//! bounded pool of background workers, and keeps job status and results in
//! memory for clients to poll.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
