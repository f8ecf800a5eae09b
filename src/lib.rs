#![doc = include_str!("../README.md")]

pub mod bucket;
mod error;
pub mod metric;
pub mod tree;

pub use error::GhtError;
