pub mod config;
pub mod main_lib;
pub mod report;
pub mod schedule;

pub use main_lib::{execute, init_tracing, RunOutcome};
