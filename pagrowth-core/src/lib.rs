//! Pagrowth core library.
//!
//! Simulates preferential-attachment graph growth (Hofstad models (a) and
//! (b), an edge/vertex hybrid and an edge-step function model) over an
//! append-only multigraph, and computes distance statistics on the result.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analytics;
mod builder;
mod distribution;
mod error;
pub mod export;
mod graph;
mod policy;
mod sampler;
mod simulation;

#[cfg(test)]
mod test_utils;

pub use crate::{
    analytics::{AnalyticsError, AnalyticsErrorCode, DistanceMap, DistanceSummary},
    builder::SimulationBuilder,
    distribution::{AttachmentDistribution, PROBABILITY_TOLERANCE},
    error::{
        DistributionError, DistributionErrorCode, GraphError, GraphErrorCode, Result,
        SimulationError, SimulationErrorCode,
    },
    graph::{Edge, MultiGraph, VertexId},
    policy::{
        AttachmentPolicy, DecayFunction, DrawContext, EdgeStepFunction, EdgeVertexHybrid,
        HofstadA, HofstadB, ModelKind, ModelPolicy, StepKind,
    },
    sampler::{SampleCount, sample, sample_from},
    simulation::{
        SchedulerState, Simulation, StepOutcome, run,
        telemetry::{DrawRecord, StepObserver, StepRecord},
    },
};
