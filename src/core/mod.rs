//! Core conversion abstractions

pub mod amount;
pub mod error;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use amount::{UsdAmount, convert};
pub use error::ConvertError;
pub use rate::{RateSource, RateTable};
