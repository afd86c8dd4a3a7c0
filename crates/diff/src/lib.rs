#![forbid(unsafe_code)]

pub mod color;
pub mod engine;

pub use color::{delta_color, delta_ratio, Classification, A_ONLY_COLOR, B_ONLY_COLOR};
pub use engine::{diff_grids, diff_grids_with_summary, DiffSummary};
