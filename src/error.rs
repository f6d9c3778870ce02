//! Error types.
//!
//! [`DomSetError`] covers the engine, operators and graph: invalid arguments
//! supplied by the caller and operations attempted in an illegal state.
//! [`ReportError`] covers persistence of run results, which is recoverable.

use thiserror::Error;

/// Error raised by the graph, the genetic operators and the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomSetError {
    // ---- invalid argument ----
    /// A vertex index outside `[0, num_vertices)`.
    #[error("vertex {vertex} is out of bounds [0, {num_vertices})")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },

    /// An edge from a vertex to itself.
    #[error("self-loops are not allowed (vertex {0})")]
    SelfLoop(usize),

    /// A graph or population must hold at least one element.
    #[error("{what} must be positive")]
    NonPositive { what: &'static str },

    /// Two chromosomes (or a chromosome and a graph) disagree on length.
    #[error("chromosome length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A gene value other than 0 or 1.
    #[error("gene value must be 0 or 1, got {0}")]
    InvalidGene(u8),

    /// A gene index outside the chromosome.
    #[error("gene index {index} is out of bounds for chromosome of length {len}")]
    GeneOutOfRange { index: usize, len: usize },

    /// A probability outside `[0, 1]`.
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    /// Elite size larger than the population it is drawn from.
    #[error("elite size {elite_size} exceeds population size {population_size}")]
    EliteTooLarge {
        elite_size: usize,
        population_size: usize,
    },

    /// Any other rejected parameter combination.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ---- illegal state ----
    /// `best` / `worst` on a population with no members.
    #[error("population is empty")]
    EmptyPopulation,

    /// `add` on a population already at capacity.
    #[error("population is full (capacity {0})")]
    PopulationFull(usize),

    /// Parent selection needs at least two candidates.
    #[error("need at least 2 individuals for parent selection, got {0}")]
    NotEnoughParents(usize),

    /// Engine step requested before initialization.
    #[error("engine has not been initialized")]
    NotInitialized,

    /// Engine step requested after the last generation.
    #[error("evolution already finished after {0} generations")]
    AlreadyFinished(usize),
}

/// Result alias for engine and graph operations.
pub type Result<T> = std::result::Result<T, DomSetError>;

/// Error raised while persisting run results.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("formatting error")]
    Format(#[from] std::fmt::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = DomSetError::VertexOutOfRange {
            vertex: 7,
            num_vertices: 5,
        };
        assert_eq!(err.to_string(), "vertex 7 is out of bounds [0, 5)");

        let err = DomSetError::InvalidRate {
            name: "mutation rate",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "mutation rate must be between 0.0 and 1.0, got 1.5"
        );

        let err = DomSetError::InvalidGene(2);
        assert_eq!(err.to_string(), "gene value must be 0 or 1, got 2");
    }

    #[test]
    fn test_illegal_state_display() {
        assert_eq!(
            DomSetError::EmptyPopulation.to_string(),
            "population is empty"
        );
        assert_eq!(
            DomSetError::PopulationFull(10).to_string(),
            "population is full (capacity 10)"
        );
        assert_eq!(
            DomSetError::NotEnoughParents(1).to_string(),
            "need at least 2 individuals for parent selection, got 1"
        );
    }

    #[test]
    fn test_report_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReportError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
