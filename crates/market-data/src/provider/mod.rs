//! Series provider abstractions.
//!
//! This module contains:
//! - The `SeriesProvider` trait that all data sources implement
//! - Provider capabilities used for routing by source tag

mod capabilities;
mod traits;

pub use capabilities::ProviderCapabilities;
pub use traits::SeriesProvider;
