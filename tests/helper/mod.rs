//! Shared helpers for integration tests

pub mod catalog;

pub use catalog::*;
