mod resampler;
mod run_context;

pub use resampler::{resample, week_close_day};
pub use run_context::RunContext;
