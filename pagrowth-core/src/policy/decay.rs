//! Decaying vertex-step probability functions.

use std::{fmt, str::FromStr};

use crate::SimulationError;

/// Named decay function giving the vertex-step probability at timestep `t`.
///
/// Values are clamped into `[0, 1]`, so the logarithmic variants yield 1 at
/// `t <= 2`.
///
/// # Examples
/// ```
/// use pagrowth_core::DecayFunction;
///
/// let f: DecayFunction = "inverse-log".parse()?;
/// assert_eq!(f.vertex_step_probability(4), 0.5);
/// assert_eq!(f.vertex_step_probability(1), 1.0);
/// # Ok::<(), pagrowth_core::SimulationError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecayFunction {
    /// `1 / t^1.01`.
    InverseLinear,
    /// `1 / log2(t)^2`.
    InverseLogSquared,
    /// `1 / log2(t)`.
    InverseLog,
}

impl DecayFunction {
    /// All decay functions in selector order.
    pub const ALL: [Self; 3] = [
        Self::InverseLinear,
        Self::InverseLogSquared,
        Self::InverseLog,
    ];

    /// Returns the stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InverseLinear => "inverse-linear",
            Self::InverseLogSquared => "inverse-log-squared",
            Self::InverseLog => "inverse-log",
        }
    }

    /// Evaluates the function at `t`, clamped into `[0, 1]`.
    #[must_use]
    pub fn vertex_step_probability(self, t: u64) -> f64 {
        let t = t as f64;
        let raw = match self {
            Self::InverseLinear => t.powf(1.01).recip(),
            Self::InverseLogSquared => t.log2().powi(2).recip(),
            Self::InverseLog => t.log2().recip(),
        };
        if raw.is_nan() {
            return 1.0;
        }
        raw.clamp(0.0, 1.0)
    }
}

impl fmt::Display for DecayFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecayFunction {
    type Err = SimulationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|function| function.as_str() == normalised)
            .ok_or_else(|| {
                SimulationError::invalid_parameter(
                    "edgestep_fn",
                    format!("unknown decay function `{raw}`"),
                )
            })
    }
}
