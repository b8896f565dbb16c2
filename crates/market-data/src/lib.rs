//! Trendwatch Market Data Crate
//!
//! This crate provides the source-agnostic market data types and the
//! provider seam used by the trend engine.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+
//! |  InstrumentSpec  | --> |  ProviderRouter  |  (routes by source tag)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  SeriesProvider  |  (CSV, exchange APIs, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  BarValidator    |
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Series       |  (strictly ascending bars)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Bar`] - One OHLCV bar
//! - [`Series`] - Bars ordered strictly ascending by date
//! - [`Timeframe`] - Daily, weekly or monthly
//! - [`InstrumentSpec`] - Code, name, category and source tag of an instrument
//! - [`Board`] - Ranking board an instrument competes on

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;

pub use models::{
    Bar, Board, InstrumentCategory, InstrumentSpec, Series, SeriesError, SourceTag, Timeframe,
};

pub use provider::{ProviderCapabilities, SeriesProvider};

pub use registry::{BarValidator, ProviderRouter, ValidationSeverity, ValidatorConfig};
