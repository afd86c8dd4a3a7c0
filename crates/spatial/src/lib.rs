#![forbid(unsafe_code)]

pub mod grid;

pub use grid::{Cell, CollisionPolicy, PlanarGrid};
