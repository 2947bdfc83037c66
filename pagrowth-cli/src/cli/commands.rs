use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use pagrowth_core::{
    DecayFunction, DistanceSummary, ModelKind, MultiGraph, SimulationBuilder, SimulationError,
    export,
};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::render::{TelemetryWriter, write_graph_summary, write_stats_header, write_stats_row};

/// Number of distances sampled per `stats` row when `--samples` is absent.
pub const DEFAULT_SAMPLES: usize = 100;

/// Mixed into the simulation seed so distance sampling draws from its own
/// stream and never perturbs graph growth.
const STATS_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Top-level command-line arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pagrowth",
    author,
    version,
    about = "Simulate preferential-attachment graph growth"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Grow a graph and print its final summary.
    Simulate(SimulateCommand),
    /// Grow a graph and report distance statistics as it grows.
    Stats(StatsCommand),
}

/// Model selection and growth parameters shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Attachment model to simulate.
    #[arg(long, value_enum)]
    pub model: ModelArg,
    /// Edges added per timestep.
    #[arg(short = 'm')]
    pub m: u32,
    /// Affine attachment parameter of the Hofstad models.
    #[arg(long, allow_negative_numbers = true)]
    pub delta: Option<f64>,
    /// Vertex-step probability of the edge/vertex hybrid.
    #[arg(short = 'p')]
    pub p: Option<f64>,
    /// Decay function of the edge-step function model.
    #[arg(long = "edge-step-fn", value_enum)]
    pub edge_step_fn: Option<DecayArg>,
    /// First timestep; defaults to the model's seed timestep.
    #[arg(long)]
    pub t_start: Option<u64>,
    /// Exclusive stop timestep.
    #[arg(long)]
    pub t_stop: u64,
    /// Seed for the random source; entropy is used when absent.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ModelArgs {
    /// Maps the arguments onto a [`SimulationBuilder`] without validating them.
    #[must_use]
    pub fn builder(&self) -> SimulationBuilder {
        let mut builder = SimulationBuilder::new(self.model.into())
            .with_m(self.m)
            .with_t_stop(self.t_stop);
        if let Some(delta) = self.delta {
            builder = builder.with_delta(delta);
        }
        if let Some(p) = self.p {
            builder = builder.with_p(p);
        }
        if let Some(function) = self.edge_step_fn {
            builder = builder.with_edge_step_fn(function.into());
        }
        if let Some(t_start) = self.t_start {
            builder = builder.with_t_start(t_start);
        }
        if let Some(seed) = self.seed {
            builder = builder.with_seed(seed);
        }
        builder
    }
}

/// Arguments for the `simulate` subcommand.
#[derive(Debug, Args, Clone)]
pub struct SimulateCommand {
    /// Model selection and growth parameters.
    #[command(flatten)]
    pub model: ModelArgs,
    /// Amount of per-step output.
    #[arg(long, value_enum, default_value = "0")]
    pub verbosity: Verbosity,
    /// Writes the final graph in DOT format to this path.
    #[arg(long)]
    pub dot: Option<PathBuf>,
}

/// Arguments for the `stats` subcommand.
#[derive(Debug, Args, Clone)]
pub struct StatsCommand {
    /// Model selection and growth parameters.
    #[command(flatten)]
    pub model: ModelArgs,
    /// Report every this many timesteps.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub every: u64,
    /// Distances sampled for the sampled mean.
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,
}

/// Attachment models selectable on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum ModelArg {
    /// Affine attachment with self-loops.
    HofstadA,
    /// Affine attachment to existing vertices only.
    HofstadB,
    /// Bernoulli mix of vertex-steps and edge-steps.
    EdgeVertexHybrid,
    /// Time-decaying vertex-step probability.
    EdgeStepFunction,
}

impl From<ModelArg> for ModelKind {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::HofstadA => Self::HofstadA,
            ModelArg::HofstadB => Self::HofstadB,
            ModelArg::EdgeVertexHybrid => Self::EdgeVertexHybrid,
            ModelArg::EdgeStepFunction => Self::EdgeStepFunction,
        }
    }
}

/// Decay functions selectable on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum DecayArg {
    /// `1 / t^1.01`.
    InverseLinear,
    /// `1 / log2(t)^2`.
    InverseLogSquared,
    /// `1 / log2(t)`.
    InverseLog,
}

impl From<DecayArg> for DecayFunction {
    fn from(value: DecayArg) -> Self {
        match value {
            DecayArg::InverseLinear => Self::InverseLinear,
            DecayArg::InverseLogSquared => Self::InverseLogSquared,
            DecayArg::InverseLog => Self::InverseLog,
        }
    }
}

/// Per-step output levels of `simulate`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum Verbosity {
    /// Final summary only.
    #[default]
    #[value(name = "0")]
    Quiet,
    /// Per-step draws, distributions and probability mass.
    #[value(name = "1")]
    Steps,
    /// Step telemetry plus a graph summary after every step.
    #[value(name = "2")]
    Graph,
}

impl Verbosity {
    /// Numeric level as accepted on the command line.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Quiet => 0,
            Self::Steps => 1,
            Self::Graph => 2,
        }
    }
}

/// Errors emitted by the CLI when executing commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// The simulation rejected its configuration or failed mid-run.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    /// Writing the DOT export failed.
    #[error("failed to write DOT graph `{path}`: {source}")]
    Export {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    Output(#[from] io::Error),
}

/// Execute the parsed CLI command, writing its output to `writer`.
///
/// # Errors
/// Returns [`CliError`] when the simulation is misconfigured or fails, or
/// when output cannot be written.
#[instrument(name = "cli.run", err, skip(cli, writer), fields(command = field::Empty))]
pub fn run_cli<W: Write + ?Sized>(cli: Cli, writer: &mut W) -> Result<(), CliError> {
    let span = Span::current();
    match cli.command {
        Command::Simulate(command) => {
            span.record("command", "simulate");
            run_simulate(command, writer)
        }
        Command::Stats(command) => {
            span.record("command", "stats");
            run_stats(command, writer)
        }
    }
}

#[instrument(
    name = "cli.simulate",
    err,
    skip(command, writer),
    fields(model = %ModelKind::from(command.model.model), verbosity = command.verbosity.level()),
)]
pub(super) fn run_simulate<W: Write + ?Sized>(
    command: SimulateCommand,
    writer: &mut W,
) -> Result<(), CliError> {
    let SimulateCommand {
        model,
        verbosity,
        dot,
    } = command;
    let builder = model.builder();
    let model_kind = builder.model();
    let simulation = builder.build()?;

    let graph = match verbosity {
        Verbosity::Quiet => simulation.run(None)?,
        Verbosity::Steps | Verbosity::Graph => {
            let mut telemetry = TelemetryWriter::new(&mut *writer, verbosity);
            let graph = simulation.run(Some(&mut telemetry))?;
            telemetry.finish()?;
            graph
        }
    };

    writeln!(writer, "model: {model_kind}")?;
    render(&graph, dot.as_deref(), writer)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "simulate completed"
    );
    Ok(())
}

#[instrument(
    name = "cli.stats",
    err,
    skip(command, writer),
    fields(
        model = %ModelKind::from(command.model.model),
        every = command.every,
        samples = command.samples,
    ),
)]
pub(super) fn run_stats<W: Write + ?Sized>(
    command: StatsCommand,
    writer: &mut W,
) -> Result<(), CliError> {
    let StatsCommand {
        model,
        every,
        samples,
    } = command;
    let builder = model.builder();
    let mut rng = builder.seed().map_or_else(SmallRng::from_entropy, |seed| {
        SmallRng::seed_from_u64(seed ^ STATS_SEED_SALT)
    });
    let mut simulation = builder.build()?;
    let t_start = simulation.t_start();

    write_stats_header(writer)?;
    let mut rows = 0_usize;
    let mut reported_at = None;
    while simulation.step(None)?.is_some() {
        let t = simulation.t();
        if (t - t_start) % every == 0 {
            let summary = DistanceSummary::capture(simulation.graph(), t, samples, &mut rng);
            write_stats_row(&summary, writer)?;
            rows += 1;
            reported_at = Some(t);
        }
    }
    let t = simulation.t();
    if reported_at != Some(t) {
        let summary = DistanceSummary::capture(simulation.graph(), t, samples, &mut rng);
        write_stats_row(&summary, writer)?;
        rows += 1;
    }

    info!(rows, "stats completed");
    Ok(())
}

/// Writes the textual summary of `graph` and, when `destination` is given,
/// exports it in DOT format.
///
/// # Errors
/// Returns [`CliError::Export`] when the DOT file cannot be written and
/// [`CliError::Output`] when `writer` fails.
///
/// # Examples
/// ```
/// # use pagrowth_cli::cli::render;
/// # use pagrowth_core::{ModelKind, SimulationBuilder};
/// let graph = SimulationBuilder::new(ModelKind::HofstadA)
///     .with_m(1)
///     .with_t_stop(4)
///     .with_seed(7)
///     .build()?
///     .run(None)?;
/// let mut buffer = Vec::new();
/// render(&graph, None, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("vertices: 4\n"));
/// assert!(text.contains("degree sum: 8\n"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "cli.render",
    err,
    skip(graph, destination, writer),
    fields(destination = field::Empty),
)]
pub fn render<W: Write + ?Sized>(
    graph: &MultiGraph,
    destination: Option<&Path>,
    writer: &mut W,
) -> Result<(), CliError> {
    write_graph_summary(graph, writer)?;
    if let Some(path) = destination {
        Span::current().record("destination", field::display(path.display()));
        export::write_dot_file(graph, path).map_err(|source| CliError::Export {
            path: path.to_path_buf(),
            source,
        })?;
        writeln!(writer, "dot: {}", path.display())?;
    }
    Ok(())
}
