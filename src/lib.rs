//! diffy library
//!
//! The comparison engine lives in [`engine`]; [`unified`] and [`render`] turn
//! its output into text, and the remaining modules back the `diffy` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod constant;
pub mod engine;
pub mod render;
pub mod unified;
pub mod worker;

pub use engine::{
    ChangeKind, CompareOptions, ComparisonResult, Granularity, Row, Segment, compare, compare_with,
};
