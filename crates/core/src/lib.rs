#![forbid(unsafe_code)]

pub mod cloud;
pub mod config;
pub mod error;
pub mod point;
pub mod range;

pub use cloud::MergedCloud;
pub use config::{CellRounding, CompareConfig};
pub use error::{DiffError, Result, Side};
pub use point::{MergedPoint, Rgba, Sample};
pub use range::ElevationRange;
