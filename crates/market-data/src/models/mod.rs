//! Market data models
//!
//! This module contains the core data types shared by providers and the engine:
//! - `types` - Source tag type
//! - `bar` - One OHLCV bar
//! - `series` - Date-ordered bars with construction-time ordering checks
//! - `timeframe` - Daily / weekly / monthly
//! - `instrument` - Instrument specification, category and ranking board

mod bar;
mod instrument;
mod series;
mod timeframe;
mod types;

pub use bar::Bar;
pub use instrument::{Board, InstrumentCategory, InstrumentSpec};
pub use series::{Series, SeriesError};
pub use timeframe::Timeframe;
pub use types::SourceTag;
