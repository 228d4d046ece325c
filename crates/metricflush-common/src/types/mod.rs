//! Core types for metricflush

pub mod identity;
pub mod point;
pub mod time_series;

pub use identity::*;
pub use point::*;
pub use time_series::*;
