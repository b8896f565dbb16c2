//! Run orchestration: the pure engine and the service that feeds it.

mod trend_engine;
mod trend_service;


pub use trend_engine::{backfill_sessions, InstrumentEvaluation, InstrumentInput, TrendEngine};
pub use trend_service::TrendService;
