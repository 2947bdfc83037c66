//! Benchmark support crate for pagrowth.
//!
//! Provides parameter types and pre-grown graph fixtures for the Criterion
//! benchmarks covering simulation throughput and distance analytics.

pub mod error;
pub mod fixtures;
pub mod params;
