//! Text rendering for command output.

use std::io::{self, Write};

use pagrowth_core::{DistanceSummary, MultiGraph, StepObserver, StepRecord};

use super::commands::Verbosity;

/// Writes the one-value-per-line graph summary shared by every command.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn write_graph_summary<W: Write + ?Sized>(graph: &MultiGraph, writer: &mut W) -> io::Result<()> {
    let max_degree = graph.degrees().map(|(_, degree)| degree).max().unwrap_or(0);
    writeln!(writer, "vertices: {}", graph.vertex_count())?;
    writeln!(writer, "edges: {}", graph.edge_count())?;
    writeln!(writer, "self-loops: {}", graph.self_loop_count())?;
    writeln!(writer, "degree sum: {}", graph.degree_sum())?;
    writeln!(writer, "max degree: {max_degree}")
}

pub(super) fn write_stats_header<W: Write + ?Sized>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "t\tvertices\tedges\tdiameter\taverage\tsampled")
}

pub(super) fn write_stats_row<W: Write + ?Sized>(
    summary: &DistanceSummary,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}\t{}\t{}\t{}\t{}\t{}",
        summary.t(),
        summary.vertex_count(),
        summary.edge_count(),
        summary
            .diameter()
            .map_or_else(|| "-".to_owned(), |diameter| diameter.to_string()),
        format_mean(summary.average_distance()),
        format_mean(summary.sampled_mean()),
    )
}

fn format_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |mean| format!("{mean:.4}"))
}

/// Observer that streams per-step telemetry to a writer.
///
/// [`StepObserver::on_step`] cannot fail, so the first write error is held
/// and later steps are skipped; [`TelemetryWriter::finish`] surfaces it.
pub struct TelemetryWriter<'w, W: Write + ?Sized> {
    writer: &'w mut W,
    verbosity: Verbosity,
    error: Option<io::Error>,
}

impl<'w, W: Write + ?Sized> TelemetryWriter<'w, W> {
    /// Creates an observer writing at `verbosity`.
    pub const fn new(writer: &'w mut W, verbosity: Verbosity) -> Self {
        Self {
            writer,
            verbosity,
            error: None,
        }
    }

    /// Returns the first write error raised while observing, if any.
    ///
    /// # Errors
    /// Returns the deferred [`io::Error`].
    pub fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    fn write_step(&mut self, record: &StepRecord, graph: &MultiGraph) -> io::Result<()> {
        write!(self.writer, "t={} {}", record.t(), record.kind())?;
        if let Some(probability) = record.vertex_step_probability() {
            write!(self.writer, " p_vertex={probability:.6}")?;
        }
        if let Some(vertex) = record.new_vertex() {
            write!(self.writer, " new={vertex}")?;
        }
        writeln!(self.writer)?;

        for (index, draw) in record.draws().iter().enumerate() {
            let selected: Vec<String> = draw.selected().iter().map(ToString::to_string).collect();
            writeln!(
                self.writer,
                "  draw {}: selected {} mass {:.6}",
                index + 1,
                selected.join(","),
                draw.distribution().total_mass(),
            )?;
            let entries: Vec<String> = draw
                .distribution()
                .iter()
                .map(|(vertex, probability)| format!("{vertex}:{probability:.6}"))
                .collect();
            writeln!(self.writer, "    distribution {}", entries.join(" "))?;
        }

        if self.verbosity == Verbosity::Graph {
            writeln!(
                self.writer,
                "  graph vertices={} edges={} self-loops={} degree-sum={}",
                graph.vertex_count(),
                graph.edge_count(),
                graph.self_loop_count(),
                graph.degree_sum(),
            )?;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> StepObserver for TelemetryWriter<'_, W> {
    fn on_step(&mut self, record: &StepRecord, graph: &MultiGraph) {
        if self.error.is_some() || self.verbosity == Verbosity::Quiet {
            return;
        }
        if let Err(err) = self.write_step(record, graph) {
            self.error = Some(err);
        }
    }
}
