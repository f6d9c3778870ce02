//! Persisted run artifacts.
//!
//! [`ResultReporter`] writes into one output directory:
//!
//! - `results_<yyyyMMdd_HHmmss>.txt`: full text report
//! - fitness history CSV (`Generation,BestFitness,SetSize`)
//! - `summary.txt`: one tab-separated line appended per run
//! - graph edge list (`u v` per line, `u < v`)
//!
//! Every write returns a [`ReportError`] instead of aborting; callers decide
//! whether a failed write matters.

use crate::error::ReportError;
use crate::ga::{EngineConfig, EvolutionResult};
use crate::graph::Graph;
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the cumulative summary file.
pub const SUMMARY_FILE: &str = "summary.txt";

/// Header line of [`SUMMARY_FILE`].
pub const SUMMARY_HEADER: &str = "TestName\tGraphSize\tBestSize\tConvergence\tTime(ms)";

/// Header line of the fitness CSV.
pub const CSV_HEADER: &str = "Generation,BestFitness,SetSize";

const RULE: &str = "============================================";

/// Writes run results under a fixed directory.
#[derive(Debug, Clone)]
pub struct ResultReporter {
    output_dir: PathBuf,
}

impl ResultReporter {
    /// Uses `output_dir`, creating it (and its parents) if missing.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the full report to a timestamped file.
    pub fn write_report(
        &self,
        graph: &Graph,
        config: &EngineConfig,
        result: &EvolutionResult,
    ) -> Result<PathBuf, ReportError> {
        self.write_report_at(graph, config, result, Local::now())
    }

    /// [`write_report`](Self::write_report) with an explicit timestamp.
    pub fn write_report_at(
        &self,
        graph: &Graph,
        config: &EngineConfig,
        result: &EvolutionResult,
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf, ReportError> {
        let path = self
            .output_dir
            .join(format!("results_{}.txt", timestamp.format("%Y%m%d_%H%M%S")));
        let mut text = String::new();
        render_report(&mut text, graph, config, result, timestamp)?;
        fs::write(&path, text)?;
        info!(path = %path.display(), "report saved");
        Ok(path)
    }

    /// Writes the fitness history as CSV.
    ///
    /// `SetSize` is `|trunc(fitness)|`, which equals the true set size only
    /// for valid (unpenalized) rows.
    pub fn write_fitness_csv(
        &self,
        fitness_history: &[f64],
        filename: &str,
    ) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(filename);
        let mut csv = String::with_capacity(32 * (fitness_history.len() + 1));
        render_fitness_csv(&mut csv, fitness_history)?;
        fs::write(&path, csv)?;
        info!(path = %path.display(), rows = fitness_history.len(), "fitness history saved");
        Ok(path)
    }

    /// Appends one line to [`SUMMARY_FILE`], writing the header first if the
    /// file is new. A missing convergence is written as `-1`.
    pub fn append_summary(
        &self,
        test_name: &str,
        graph_size: usize,
        best_size: usize,
        convergence: Option<usize>,
        elapsed_ms: u128,
    ) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let is_new = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if is_new {
            writeln!(file, "{SUMMARY_HEADER}")?;
        }
        let convergence = convergence.map_or_else(|| "-1".to_string(), |g| g.to_string());
        writeln!(
            file,
            "{test_name}\t{graph_size}\t{best_size}\t{convergence}\t{elapsed_ms}"
        )?;
        Ok(path)
    }

    /// Writes the graph as an edge list.
    pub fn write_graph_structure(
        &self,
        graph: &Graph,
        filename: &str,
    ) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(filename);
        let mut text = String::new();
        render_graph_structure(&mut text, graph)?;
        fs::write(&path, text)?;
        info!(path = %path.display(), "graph structure saved");
        Ok(path)
    }
}

/// Formats a fitness value with at least one decimal place (`-3.0`).
fn fmt_fitness(f: f64) -> String {
    format!("{f:?}")
}

/// `|trunc(fitness)|`, saturating for penalties beyond the `i64` range.
fn csv_set_size(fitness: f64) -> u64 {
    (fitness as i64).unsigned_abs()
}

/// Renders the full text report into `out`.
pub fn render_report<W: fmt::Write>(
    out: &mut W,
    graph: &Graph,
    config: &EngineConfig,
    result: &EvolutionResult,
    timestamp: DateTime<Local>,
) -> fmt::Result {
    let stats = graph.statistics();
    let best = &result.best;

    writeln!(out, "{RULE}")?;
    writeln!(out, "DOMINATING SET PROBLEM - GENETIC ALGORITHM")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Timestamp: {}", timestamp.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    writeln!(out, "=== GRAPH INFORMATION ===")?;
    writeln!(out, "Number of vertices: {}", stats.vertices)?;
    writeln!(out, "Number of edges: {}", stats.edges)?;
    writeln!(out, "Average degree: {:.2}", stats.average_degree)?;
    writeln!(out, "Min degree: {}", stats.min_degree)?;
    writeln!(out, "Max degree: {}", stats.max_degree)?;
    writeln!(out, "Density: {:.4}", stats.density)?;
    writeln!(out)?;

    writeln!(out, "=== ALGORITHM PARAMETERS ===")?;
    for (key, value) in config.parameters() {
        writeln!(out, "{key}: {value}")?;
    }
    writeln!(out)?;

    writeln!(out, "=== RESULTS ===")?;
    writeln!(out, "Best solution: {}", best.to_compact_string())?;
    writeln!(out, "Dominating set: {:?}", best.dominating_set())?;
    writeln!(out, "Set size: {}", best.dominating_set_size())?;
    writeln!(out, "Fitness: {}", fmt_fitness(result.best_fitness))?;
    writeln!(out, "Valid: {}", if result.is_valid() { "Yes" } else { "No" })?;
    match result.convergence_iteration {
        Some(g) => writeln!(out, "Convergence iteration: {g}")?,
        None => writeln!(out, "Convergence iteration: Did not converge")?,
    }
    writeln!(out, "Execution time: {} ms", result.elapsed_ms())?;
    writeln!(out)?;

    writeln!(out, "=== FITNESS HISTORY ===")?;
    writeln!(out, "Generation\tBest Fitness\tSet Size")?;
    for (generation, &fitness) in result.fitness_history.iter().enumerate() {
        writeln!(
            out,
            "{generation}\t\t{}\t\t{}",
            fmt_fitness(fitness),
            csv_set_size(fitness)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "=== GRAPH STRUCTURE ===")?;
    writeln!(out, "{graph}")?;
    writeln!(out, "{RULE}")
}

/// Renders the fitness CSV into `out`.
pub fn render_fitness_csv<W: fmt::Write>(out: &mut W, fitness_history: &[f64]) -> fmt::Result {
    writeln!(out, "{CSV_HEADER}")?;
    for (generation, &fitness) in fitness_history.iter().enumerate() {
        writeln!(
            out,
            "{generation},{},{}",
            fmt_fitness(fitness),
            csv_set_size(fitness)
        )?;
    }
    Ok(())
}

/// Renders the edge-list file into `out`.
pub fn render_graph_structure<W: fmt::Write>(out: &mut W, graph: &Graph) -> fmt::Result {
    writeln!(out, "# Graph structure")?;
    writeln!(out, "# Format: vertex1 vertex2")?;
    writeln!(out, "# Number of vertices: {}", graph.num_vertices())?;
    writeln!(out, "# Number of edges: {}", graph.num_edges())?;
    writeln!(out)?;
    for (u, v) in graph.edges() {
        writeln!(out, "{u} {v}")?;
    }
    Ok(())
}
