#![forbid(unsafe_code)]

pub mod bin;
pub mod ply;

pub use bin::{decode_bin, encode_bin, read_bin, read_bin_from, read_header};
pub use ply::{write_ply, write_ply_binary};
