//! Graphviz DOT export.
//!
//! The export lists every vertex, so isolated vertices survive the round
//! trip, followed by one `u -- v` statement per edge instance in insertion
//! order. Parallel edges repeat and self-loops appear as `v -- v`.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::instrument;

use crate::graph::MultiGraph;

/// Writes `graph` as an undirected DOT graph named `name`.
///
/// # Errors
/// Propagates I/O errors from `writer`.
///
/// # Examples
/// ```
/// use pagrowth_core::{MultiGraph, export};
///
/// let mut graph = MultiGraph::new();
/// let a = graph.add_vertex()?;
/// graph.add_edge(a, a)?;
/// let mut out = Vec::new();
/// export::write_dot(&graph, "g", &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "graph g {\n  1;\n  1 -- 1;\n}\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_dot<W: Write>(graph: &MultiGraph, name: &str, mut writer: W) -> io::Result<()> {
    writeln!(writer, "graph {name} {{")?;
    for vertex in graph.vertices() {
        writeln!(writer, "  {vertex};")?;
    }
    for edge in graph.edges() {
        writeln!(writer, "  {} -- {};", edge.low(), edge.high())?;
    }
    writeln!(writer, "}}")?;
    writer.flush()
}

/// Creates or truncates `path` and writes `graph` to it in DOT format.
///
/// # Errors
/// Propagates I/O errors from creating or writing the file.
#[instrument(
    name = "export.dot",
    err,
    skip(graph, path),
    fields(path = %path.as_ref().display(), edges = graph.edge_count()),
)]
pub fn write_dot_file(graph: &MultiGraph, path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path.as_ref())?;
    write_dot(graph, "pagrowth", BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexId;

    fn vid(raw: u32) -> VertexId {
        VertexId::new(raw).expect("test identifiers are non-zero")
    }

    #[test]
    fn parallel_edges_and_isolated_vertices_are_written() {
        let mut graph = MultiGraph::new();
        for _ in 0..3 {
            graph.add_vertex().expect("insert must succeed");
        }
        graph.add_edge(vid(2), vid(1)).expect("endpoints exist");
        graph.add_edge(vid(1), vid(2)).expect("endpoints exist");

        let mut out = Vec::new();
        write_dot(&graph, "g", &mut out).expect("in-memory write succeeds");
        let text = String::from_utf8(out).expect("output is UTF-8");
        assert_eq!(
            text,
            "graph g {\n  1;\n  2;\n  3;\n  1 -- 2;\n  1 -- 2;\n}\n"
        );
    }

    #[test]
    fn file_export_writes_one_line_per_edge_instance() {
        let graph = MultiGraph::vertex_pair_with_parallel_edges(2).expect("seed builds");
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("seed.dot");
        write_dot_file(&graph, &path).expect("export succeeds");

        let text = std::fs::read_to_string(&path).expect("export readable");
        assert!(text.starts_with("graph pagrowth {"));
        assert_eq!(text.matches(" -- ").count(), 4);
    }
}
