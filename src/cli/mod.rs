//! Interactive menu for the `u-domset` binary.
//!
//! A [`Session`] reads menu choices and parameters line by line from any
//! [`BufRead`] and writes prompts and results to any [`Write`], so it can
//! be driven by stdin/stdout or by a scripted buffer in tests.
//!
//! Each run builds a graph, evolves a dominating set with [`EvolutionEngine`],
//! prints the outcome and hands it to the [`ResultReporter`]. Write failures
//! are reported and the session carries on.

use crate::error::{DomSetError, ReportError};
use crate::ga::{EngineConfig, EvolutionEngine, EvolutionResult, VertexStatus};
use crate::graph::{Graph, GraphGenerator};
use crate::random::rng_from_option;
use crate::report::ResultReporter;
use rand::rngs::StdRng;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, info};

const RULE: &str = "============================================";

/// Error that ends a [`Session`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A graph or engine error; the session reports it and returns to the
    /// menu.
    #[error(transparent)]
    Engine(#[from] DomSetError),

    /// Input closed while a value was expected.
    #[error("input closed")]
    EndOfInput,
}

// =============================================================================
// MENU
// =============================================================================

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Sample,
    Random,
    Path,
    Cycle,
    Star,
    Grid,
    Complete,
    Custom,
    Batch,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 10] = [
        MenuChoice::Sample,
        MenuChoice::Random,
        MenuChoice::Path,
        MenuChoice::Cycle,
        MenuChoice::Star,
        MenuChoice::Grid,
        MenuChoice::Complete,
        MenuChoice::Custom,
        MenuChoice::Batch,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::Exit => 0,
            MenuChoice::Sample => 1,
            MenuChoice::Random => 2,
            MenuChoice::Path => 3,
            MenuChoice::Cycle => 4,
            MenuChoice::Star => 5,
            MenuChoice::Grid => 6,
            MenuChoice::Complete => 7,
            MenuChoice::Custom => 8,
            MenuChoice::Batch => 9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Sample => "Run sample test (10 vertices)",
            MenuChoice::Random => "Run on random graph",
            MenuChoice::Path => "Run on path graph",
            MenuChoice::Cycle => "Run on cycle graph",
            MenuChoice::Star => "Run on star graph",
            MenuChoice::Grid => "Run on grid graph",
            MenuChoice::Complete => "Run on complete graph",
            MenuChoice::Custom => "Run with custom parameters",
            MenuChoice::Batch => "Run batch tests",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// A menu selection that is not a number in `0..=9`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid menu choice: {0:?}")]
pub struct InvalidChoice(pub String);

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(|n| MenuChoice::ALL.into_iter().find(|c| c.number() == n))
            .ok_or_else(|| InvalidChoice(trimmed.to_string()))
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Menu-driven front end over an input and an output stream.
pub struct Session<R, W> {
    input: R,
    output: W,
    reporter: Option<ResultReporter>,
    seed: Option<u64>,
    generator: GraphGenerator<StdRng>,
    runs: u64,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            reporter: None,
            seed: None,
            generator: GraphGenerator::new(rng_from_option(None)),
            runs: 0,
        }
    }

    /// Persists every run through `reporter`.
    pub fn with_reporter(mut self, reporter: ResultReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Makes graphs and runs reproducible. Run `k` of the session uses
    /// seed `seed + k`.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self.generator = GraphGenerator::new(rng_from_option(seed));
        self
    }

    /// Consumes the session and returns the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Shows the menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), CliError> {
        self.print_header()?;
        loop {
            self.print_menu()?;
            let line = match self.read_line("Enter your choice: ") {
                Ok(line) => line,
                Err(CliError::EndOfInput) => return Ok(()),
                Err(e) => return Err(e),
            };

            match line.parse::<MenuChoice>() {
                Ok(MenuChoice::Exit) => {
                    writeln!(self.output, "\nThank you for using the Dominating Set GA!")?;
                    writeln!(self.output, "Goodbye!\n")?;
                    return Ok(());
                }
                Ok(choice) => match self.dispatch(choice) {
                    Ok(()) => {}
                    Err(CliError::Engine(e)) => {
                        error!(choice = choice.number(), error = %e, "run failed");
                        writeln!(self.output, "\nError: {e}")?;
                    }
                    Err(CliError::EndOfInput) => return Ok(()),
                    Err(e) => return Err(e),
                },
                Err(_) => writeln!(self.output, "\nInvalid choice. Please try again.\n")?,
            }

            match self.read_line("\nPress Enter to continue...\n") {
                Ok(_) => {}
                Err(CliError::EndOfInput) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<(), CliError> {
        match choice {
            MenuChoice::Sample => {
                writeln!(self.output, "\n=== Running Sample Test ===\n")?;
                let graph = GraphGenerator::sample10()?;
                self.show_graph(&graph)?;
                self.run_default(&graph, "Sample_10_vertices")
            }
            MenuChoice::Random => {
                writeln!(self.output, "\n=== Random Graph ===")?;
                let n: usize = self.prompt("Enter number of vertices: ")?;
                let m: usize = self.prompt("Enter number of edges: ")?;
                let graph = self.generator.random(n, m)?;
                self.show_graph(&graph)?;
                self.run_default(&graph, &format!("Random_{n}v_{m}e"))
            }
            MenuChoice::Path => {
                writeln!(self.output, "\n=== Path Graph ===")?;
                let n: usize = self.prompt("Enter number of vertices: ")?;
                let graph = GraphGenerator::path(n)?;
                self.show_graph(&graph)?;
                self.note_third(n)?;
                self.run_default(&graph, &format!("Path_{n}"))
            }
            MenuChoice::Cycle => {
                writeln!(self.output, "\n=== Cycle Graph ===")?;
                let n: usize = self.prompt("Enter number of vertices (minimum 3): ")?;
                let graph = GraphGenerator::cycle(n)?;
                self.show_graph(&graph)?;
                self.note_third(n)?;
                self.run_default(&graph, &format!("Cycle_{n}"))
            }
            MenuChoice::Star => {
                writeln!(self.output, "\n=== Star Graph ===")?;
                let n: usize = self.prompt("Enter number of vertices (minimum 2): ")?;
                let graph = GraphGenerator::star(n)?;
                self.show_graph(&graph)?;
                writeln!(
                    self.output,
                    "Note: Optimal dominating set size is 1 (the center vertex)"
                )?;
                self.run_default(&graph, &format!("Star_{n}"))
            }
            MenuChoice::Grid => {
                writeln!(self.output, "\n=== Grid Graph ===")?;
                let rows: usize = self.prompt("Enter number of rows: ")?;
                let cols: usize = self.prompt("Enter number of columns: ")?;
                let graph = GraphGenerator::grid(rows, cols)?;
                self.show_graph(&graph)?;
                self.run_default(&graph, &format!("Grid_{rows}x{cols}"))
            }
            MenuChoice::Complete => {
                writeln!(self.output, "\n=== Complete Graph ===")?;
                let n: usize = self.prompt("Enter number of vertices: ")?;
                let graph = GraphGenerator::complete(n)?;
                self.show_graph(&graph)?;
                writeln!(
                    self.output,
                    "Note: Optimal dominating set size is 1 (any single vertex)"
                )?;
                self.run_default(&graph, &format!("Complete_{n}"))
            }
            MenuChoice::Custom => self.run_custom(),
            MenuChoice::Batch => self.run_batch(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn run_custom(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "\n=== Custom Parameters ===")?;
        let n: usize = self.prompt("Enter number of vertices: ")?;
        let m: usize = self.prompt("Enter number of edges: ")?;

        let defaults = EngineConfig::default();
        let config = EngineConfig::default()
            .with_population_size(self.prompt_or(
                "Enter population size (default 100): ",
                defaults.population_size,
            )?)
            .with_crossover_rate(
                self.prompt_or("Enter crossover rate (default 0.4): ", defaults.crossover_rate)?,
            )
            .with_mutation_rate(
                self.prompt_or("Enter mutation rate (default 0.1): ", defaults.mutation_rate)?,
            )
            .with_max_iterations(
                self.prompt_or("Enter max iterations (default 50): ", defaults.max_iterations)?,
            );
        config.validate()?;

        let graph = self.generator.random(n, m)?;
        self.show_graph(&graph)?;
        self.run_algorithm(&graph, "Custom", config)
    }

    fn run_batch(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "\n=== Running Batch Tests ===\n")?;

        writeln!(self.output, "Test 1: Small random graph (10 vertices)")?;
        let g1 = self.generator.random(10, 15)?;
        self.run_default(&g1, "Batch_Small_10v")?;

        writeln!(self.output, "\nTest 2: Medium random graph (30 vertices)")?;
        let g2 = self.generator.random(30, 60)?;
        self.run_default(&g2, "Batch_Medium_30v")?;

        writeln!(self.output, "\nTest 3: Path graph (20 vertices)")?;
        let g3 = GraphGenerator::path(20)?;
        self.run_default(&g3, "Batch_Path_20v")?;

        writeln!(self.output, "\nTest 4: Grid graph (5x5)")?;
        let g4 = GraphGenerator::grid(5, 5)?;
        self.run_default(&g4, "Batch_Grid_5x5")?;

        writeln!(self.output, "\n=== Batch Tests Completed ===")?;
        if let Some(reporter) = &self.reporter {
            writeln!(
                self.output,
                "Check the '{}' directory for detailed output.",
                reporter.output_dir().display()
            )?;
        }
        Ok(())
    }

    fn run_default(&mut self, graph: &Graph, test_name: &str) -> Result<(), CliError> {
        self.run_algorithm(graph, test_name, EngineConfig::default())
    }

    /// Evolves, prints and persists one run.
    fn run_algorithm(
        &mut self,
        graph: &Graph,
        test_name: &str,
        config: EngineConfig,
    ) -> Result<(), CliError> {
        let config = match self.seed {
            Some(seed) => config.with_seed(seed.wrapping_add(self.runs)),
            None => config,
        };
        self.runs += 1;

        writeln!(self.output)?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "Starting Genetic Algorithm")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "Population Size: {}", config.population_size)?;
        writeln!(self.output, "Crossover Rate: {}", config.crossover_rate)?;
        writeln!(self.output, "Mutation Rate: {}", config.mutation_rate)?;
        writeln!(self.output, "Max Iterations: {}", config.max_iterations)?;
        writeln!(self.output, "Elite Size: {}", config.elite_size())?;
        writeln!(self.output, "Num Crossover: {}", config.num_crossover())?;
        writeln!(self.output)?;

        info!(test = test_name, vertices = graph.num_vertices(), "run started");
        let mut engine = EvolutionEngine::new(graph, config.clone())?;
        let result = engine.run_with(|engine, generation| -> Result<(), CliError> {
            if engine.is_progress_generation(generation) {
                self.print_progress(engine, generation)?;
            }
            Ok(())
        })?;

        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "Algorithm Completed")?;
        writeln!(self.output, "{RULE}")?;
        self.print_results(&engine, &result)?;
        self.persist(graph, &config, &result, test_name)?;
        Ok(())
    }

    fn persist(
        &mut self,
        graph: &Graph,
        config: &EngineConfig,
        result: &EvolutionResult,
        test_name: &str,
    ) -> io::Result<()> {
        let Some(reporter) = self.reporter.clone() else {
            return Ok(());
        };

        let outcomes: [(&str, &str, Result<PathBuf, ReportError>); 3] = [
            (
                "Results saved to",
                "Error writing results to file",
                reporter.write_report(graph, config, result),
            ),
            (
                "Fitness history saved to",
                "Error writing CSV file",
                reporter.write_fitness_csv(
                    &result.fitness_history,
                    &format!("fitness_{test_name}.csv"),
                ),
            ),
            (
                "Summary appended to",
                "Error writing summary",
                reporter.append_summary(
                    test_name,
                    graph.num_vertices(),
                    result.best.dominating_set_size(),
                    result.convergence_iteration,
                    result.elapsed_ms(),
                ),
            ),
        ];

        for (saved, failed, outcome) in outcomes {
            match outcome {
                Ok(path) => writeln!(self.output, "{saved}: {}", path.display())?,
                Err(e) => {
                    error!(test = test_name, error = %e, "failed to persist results");
                    writeln!(self.output, "{failed}: {e}")?;
                }
            }
        }
        Ok(())
    }

    // ---- printing ----

    fn print_header(&mut self) -> io::Result<()> {
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "  DOMINATING SET PROBLEM")?;
        writeln!(self.output, "  Genetic Algorithm Solution")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n============ MAIN MENU ============")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{choice}")?;
        }
        writeln!(self.output, "===================================")
    }

    fn show_graph(&mut self, graph: &Graph) -> io::Result<()> {
        let stats = graph.statistics();
        writeln!(self.output, "\nGraph created:")?;
        writeln!(self.output, "{graph}")?;
        writeln!(self.output, "\nGraph Statistics:")?;
        writeln!(self.output, "  Vertices: {}", stats.vertices)?;
        writeln!(self.output, "  Edges: {}", stats.edges)?;
        writeln!(self.output, "  Average Degree: {:.2}", stats.average_degree)?;
        writeln!(self.output, "  Min Degree: {}", stats.min_degree)?;
        writeln!(self.output, "  Max Degree: {}", stats.max_degree)?;
        writeln!(self.output, "  Density: {:.4}", stats.density)?;
        writeln!(self.output)
    }

    fn note_third(&mut self, n: usize) -> io::Result<()> {
        writeln!(
            self.output,
            "Note: Optimal dominating set size is approximately {}",
            n.div_ceil(3)
        )
    }

    fn print_progress(&mut self, engine: &EvolutionEngine<'_>, generation: usize) -> io::Result<()> {
        let Some(best) = engine.best() else {
            return Ok(());
        };
        let converged = engine.convergence_iteration() == Some(generation);
        writeln!(
            self.output,
            "Generation {generation:3} | Best Fitness: {:6.0} | Set Size: {} | Valid: {}{}",
            best.fitness().unwrap_or(f64::NEG_INFINITY),
            best.dominating_set_size(),
            if best.is_valid() == Some(true) { "Yes" } else { "No" },
            if converged { " (converged)" } else { "" }
        )
    }

    fn print_results(
        &mut self,
        engine: &EvolutionEngine<'_>,
        result: &EvolutionResult,
    ) -> Result<(), CliError> {
        let best = &result.best;
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "FINAL RESULTS")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "Best solution: {}", best.to_compact_string())?;
        writeln!(self.output, "Dominating set: {:?}", best.dominating_set())?;
        writeln!(self.output, "Set size: {}", best.dominating_set_size())?;
        writeln!(self.output, "Fitness: {:?}", result.best_fitness)?;
        writeln!(
            self.output,
            "Valid: {}",
            if result.is_valid() { "Yes" } else { "No" }
        )?;
        match result.convergence_iteration {
            Some(g) => writeln!(self.output, "Convergence iteration: {g}")?,
            None => writeln!(self.output, "Convergence iteration: Did not converge")?,
        }
        writeln!(self.output, "Execution time: {} ms", result.elapsed_ms())?;
        writeln!(self.output)?;

        if result.is_valid() {
            writeln!(self.output, "All vertices are properly dominated")?;
            return Ok(());
        }

        writeln!(self.output, "Solution has violations")?;
        writeln!(self.output, "\n=== Domination Analysis ===")?;
        writeln!(self.output, "Dominating Set: {:?}", best.dominating_set())?;
        writeln!(self.output, "Size: {}", best.dominating_set_size())?;
        for (v, status) in engine.evaluator().domination_report(best)?.into_iter().enumerate() {
            match status {
                VertexStatus::InSet => writeln!(self.output, "Vertex {v}: IN SET")?,
                VertexStatus::DominatedBy(u) => {
                    writeln!(self.output, "Vertex {v}: dominated by {u}")?
                }
                VertexStatus::NotDominated => writeln!(self.output, "Vertex {v}: NOT DOMINATED")?,
            }
        }
        Ok(())
    }

    // ---- input ----

    fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    /// Re-asks until the line parses as `T`.
    fn prompt<T: FromStr>(&mut self, label: &str) -> Result<T, CliError> {
        loop {
            let line = self.read_line(label)?;
            match line.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Invalid input {line:?}. Please try again.")?,
            }
        }
    }

    /// Like [`prompt`](Self::prompt), but an empty line selects `default`.
    fn prompt_or<T: FromStr>(&mut self, label: &str, default: T) -> Result<T, CliError> {
        loop {
            let line = self.read_line(label)?;
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Invalid input {line:?}. Please try again.")?,
            }
        }
    }
}
