#![forbid(unsafe_code)]

//! Elevation diff of two point-cloud files on a shared planar grid.
//!
//! [`compare`] decodes both files, merges their elevation ranges and returns
//! one colored point per occupied cell. [`DiffSession`] wraps it with the
//! state a viewer needs: the displayed cloud, display attributes and the
//! paths last compared.

pub mod compare;
pub mod session;

pub use cloudiff_core::{
    CellRounding, CompareConfig, DiffError, ElevationRange, MergedCloud, MergedPoint, Result,
    Rgba, Sample, Side,
};
pub use cloudiff_diff::{DiffSummary, A_ONLY_COLOR, B_ONLY_COLOR};
pub use compare::{compare, compare_bytes, compare_with_summary};
pub use session::{CloudSink, DiffSession, DisplayAttributes};
