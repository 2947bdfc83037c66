//! Shared test utilities used across pagrowth crates.

pub mod ci;
pub mod tracing;
