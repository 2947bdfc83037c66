//! Error types for the pagrowth core library.
//!
//! Defines the error enums exposed by the graph store, the degree-weighted
//! sampler and the simulation driver, each with a stable machine-readable
//! code, plus a convenient result alias.

use thiserror::Error;

use crate::graph::VertexId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::core::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// An error produced by [`crate::MultiGraph`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The referenced vertex has not been inserted.
    #[error("vertex {vertex} does not exist (graph has {vertex_count} vertices)")]
    InvalidVertex {
        /// The identifier that was looked up.
        vertex: VertexId,
        /// Number of vertices present when the lookup failed.
        vertex_count: usize,
    },
    /// The graph cannot allocate another vertex identifier.
    #[error("vertex identifier space exhausted after {vertex_count} vertices")]
    CapacityExceeded {
        /// Number of vertices present when insertion failed.
        vertex_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The referenced vertex has not been inserted.
        InvalidVertex => InvalidVertex { .. } => "GRAPH_INVALID_VERTEX",
        /// The graph cannot allocate another vertex identifier.
        CapacityExceeded => CapacityExceeded { .. } => "GRAPH_CAPACITY_EXCEEDED",
    }
}

/// A malformed probability vector handed to the sampler.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistributionError {
    /// No candidates were supplied.
    #[error("distribution has no candidates")]
    Empty,
    /// Candidate and weight slices differ in length.
    #[error("distribution has {candidates} candidates but {weights} weights")]
    LengthMismatch {
        /// Number of candidate vertices.
        candidates: usize,
        /// Number of weights.
        weights: usize,
    },
    /// A weight was negative, NaN or infinite.
    #[error("weight {weight} at position {index} is not a finite non-negative number")]
    InvalidWeight {
        /// Position of the offending weight.
        index: usize,
        /// The offending value.
        weight: f64,
    },
    /// Weights do not sum to one within tolerance.
    #[error("weights sum to {total}, expected 1 within {tolerance}")]
    NotNormalised {
        /// Observed total probability mass.
        total: f64,
        /// Accepted absolute deviation from one.
        tolerance: f64,
    },
    /// A distinct pair was requested but fewer than two candidates can be drawn.
    #[error("distinct pair requested but only {positive} candidates carry positive weight")]
    NoDistinctPair {
        /// Number of candidates with strictly positive weight.
        positive: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`DistributionError`] variants.
    enum DistributionErrorCode for DistributionError {
        /// No candidates were supplied.
        Empty => Empty => "DISTRIBUTION_EMPTY",
        /// Candidate and weight slices differ in length.
        LengthMismatch => LengthMismatch { .. } => "DISTRIBUTION_LENGTH_MISMATCH",
        /// A weight was negative, NaN or infinite.
        InvalidWeight => InvalidWeight { .. } => "DISTRIBUTION_INVALID_WEIGHT",
        /// Weights do not sum to one within tolerance.
        NotNormalised => NotNormalised { .. } => "DISTRIBUTION_NOT_NORMALISED",
        /// A distinct pair was requested but fewer than two candidates can be drawn.
        NoDistinctPair => NoDistinctPair { .. } => "DISTRIBUTION_NO_DISTINCT_PAIR",
    }
}

/// Error type produced when configuring or running a [`crate::Simulation`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A configuration value was missing or outside its valid range.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable explanation of the constraint that failed.
        reason: String,
    },
    /// A policy referenced a vertex the graph does not contain.
    #[error("graph mutation failed at t={t}: {error}")]
    InvalidVertex {
        /// Timestep being executed.
        t: u64,
        #[source]
        /// Underlying graph error.
        error: GraphError,
    },
    /// A policy produced a probability vector the sampler rejected.
    #[error("attachment distribution rejected at t={t}: {error}")]
    InvalidDistribution {
        /// Timestep being executed.
        t: u64,
        #[source]
        /// Underlying sampler error.
        error: DistributionError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SimulationError`] variants.
    enum SimulationErrorCode for SimulationError {
        /// A configuration value was missing or outside its valid range.
        InvalidParameter => InvalidParameter { .. } => "SIMULATION_INVALID_PARAMETER",
        /// A policy referenced a vertex the graph does not contain.
        InvalidVertex => InvalidVertex { .. } => "SIMULATION_INVALID_VERTEX",
        /// A policy produced a probability vector the sampler rejected.
        InvalidDistribution => InvalidDistribution { .. } => "SIMULATION_INVALID_DISTRIBUTION",
    }
}

impl SimulationError {
    pub(crate) fn invalid_parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    /// Retrieve the inner [`GraphErrorCode`] when the error originated in the graph store.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::InvalidVertex { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`DistributionErrorCode`] when the sampler rejected a distribution.
    #[must_use]
    pub const fn distribution_code(&self) -> Option<DistributionErrorCode> {
        match self {
            Self::InvalidDistribution { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SimulationError>;

/// Attaches the executing timestep to errors raised inside a policy step.
pub(crate) trait AtTimestep<T> {
    fn at(self, t: u64) -> Result<T>;
}

impl<T> AtTimestep<T> for core::result::Result<T, GraphError> {
    fn at(self, t: u64) -> Result<T> {
        self.map_err(|error| SimulationError::InvalidVertex { t, error })
    }
}

impl<T> AtTimestep<T> for core::result::Result<T, DistributionError> {
    fn at(self, t: u64) -> Result<T> {
        self.map_err(|error| SimulationError::InvalidDistribution { t, error })
    }
}
