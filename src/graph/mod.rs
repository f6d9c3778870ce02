//! Undirected simple graphs.
//!
//! [`Graph`] is the read-only input of the evolutionary search. It is built
//! once (by hand or through [`GraphGenerator`]) and then only queried.
//!
//! # Invariants
//!
//! - Adjacency is symmetric: `v ∈ N(u)` iff `u ∈ N(v)`.
//! - No self-loops. Adding an existing edge is a no-op.
//!
//! # Submodules
//!
//! - [`generators`]: random, path, cycle, star, grid and complete builders

pub mod generators;

pub use generators::GraphGenerator;

use crate::error::{DomSetError, Result};
use std::collections::BTreeSet;
use std::fmt;

/// An undirected graph on vertices `0..num_vertices`.
///
/// # Examples
///
/// ```
/// use u_domset::graph::Graph;
///
/// let mut g = Graph::new(3).unwrap();
/// g.add_edge(0, 1).unwrap();
/// g.add_edge(1, 2).unwrap();
/// g.add_edge(1, 0).unwrap(); // already present
///
/// assert_eq!(g.num_edges(), 2);
/// assert_eq!(g.degree(1).unwrap(), 2);
/// assert!(g.has_edge(2, 1).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<BTreeSet<usize>>,
    num_edges: usize,
}

/// Degree and density summary of a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStatistics {
    pub vertices: usize,
    pub edges: usize,
    pub average_degree: f64,
    pub min_degree: usize,
    pub max_degree: usize,
    /// `2·edges / (vertices·(vertices − 1))`; NaN for a single vertex.
    pub density: f64,
}

impl Graph {
    /// Creates an edgeless graph with `num_vertices` vertices.
    ///
    /// # Errors
    /// [`DomSetError::NonPositive`] if `num_vertices == 0`.
    pub fn new(num_vertices: usize) -> Result<Self> {
        if num_vertices == 0 {
            return Err(DomSetError::NonPositive {
                what: "number of vertices",
            });
        }
        Ok(Self {
            adjacency: vec![BTreeSet::new(); num_vertices],
            num_edges: 0,
        })
    }

    /// Builds a graph from an edge list.
    pub fn from_edges(num_vertices: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Self::new(num_vertices)?;
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Adds the undirected edge `{u, v}`. Existing edges are left untouched.
    ///
    /// # Errors
    /// Out-of-range endpoints or `u == v`.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<()> {
        self.validate_vertex(u)?;
        self.validate_vertex(v)?;
        if u == v {
            return Err(DomSetError::SelfLoop(u));
        }
        if self.adjacency[u].insert(v) {
            self.adjacency[v].insert(u);
            self.num_edges += 1;
        }
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Neighbours of `vertex`, in ascending order.
    pub fn neighbors(&self, vertex: usize) -> Result<&BTreeSet<usize>> {
        self.validate_vertex(vertex)?;
        Ok(&self.adjacency[vertex])
    }

    pub fn degree(&self, vertex: usize) -> Result<usize> {
        Ok(self.neighbors(vertex)?.len())
    }

    pub fn has_edge(&self, u: usize, v: usize) -> Result<bool> {
        self.validate_vertex(u)?;
        self.validate_vertex(v)?;
        Ok(self.adjacency[u].contains(&v))
    }

    /// Iterates `(vertex, neighbours)` for every vertex in index order.
    pub fn adjacency(&self) -> impl Iterator<Item = (usize, &BTreeSet<usize>)> + '_ {
        self.adjacency.iter().enumerate()
    }

    /// Iterates every edge once as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency().flat_map(|(u, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| (u, v))
        })
    }

    /// Computes degree and density statistics.
    pub fn statistics(&self) -> GraphStatistics {
        let n = self.num_vertices();
        let degrees = self.adjacency.iter().map(BTreeSet::len);
        let min_degree = degrees.clone().min().unwrap_or(0);
        let max_degree = degrees.max().unwrap_or(0);
        let e = self.num_edges as f64;

        GraphStatistics {
            vertices: n,
            edges: self.num_edges,
            average_degree: 2.0 * e / n as f64,
            min_degree,
            max_degree,
            density: 2.0 * e / (n as f64 * (n as f64 - 1.0)),
        }
    }

    fn validate_vertex(&self, vertex: usize) -> Result<()> {
        if vertex >= self.num_vertices() {
            return Err(DomSetError::VertexOutOfRange {
                vertex,
                num_vertices: self.num_vertices(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph with {} vertices and {} edges:",
            self.num_vertices(),
            self.num_edges
        )?;
        for (v, neighbors) in self.adjacency() {
            writeln!(f, "  Vertex {v}: {neighbors:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_vertices() {
        assert_eq!(
            Graph::new(0),
            Err(DomSetError::NonPositive {
                what: "number of vertices"
            })
        );
    }

    #[test]
    fn test_add_edge_is_symmetric_and_idempotent() {
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 3).unwrap();
        g.add_edge(3, 0).unwrap();
        g.add_edge(0, 3).unwrap();

        assert_eq!(g.num_edges(), 1);
        assert!(g.has_edge(0, 3).unwrap());
        assert!(g.has_edge(3, 0).unwrap());
        assert_eq!(g.degree(0).unwrap(), 1);
        assert_eq!(g.degree(3).unwrap(), 1);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut g = Graph::new(3).unwrap();
        assert_eq!(g.add_edge(1, 1), Err(DomSetError::SelfLoop(1)));
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn test_out_of_range_vertex() {
        let mut g = Graph::new(3).unwrap();
        let expected = DomSetError::VertexOutOfRange {
            vertex: 3,
            num_vertices: 3,
        };
        assert_eq!(g.add_edge(0, 3), Err(expected.clone()));
        assert_eq!(g.neighbors(3).err(), Some(expected.clone()));
        assert_eq!(g.degree(3), Err(expected.clone()));
        assert_eq!(g.has_edge(3, 0), Err(expected));
    }

    #[test]
    fn test_edges_listed_once() {
        let g = Graph::from_edges(4, &[(2, 1), (0, 1), (3, 0)]).unwrap();
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 2)]);
    }

    #[test]
    fn test_statistics_path() {
        // 0-1-2-3
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let stats = g.statistics();
        assert_eq!(stats.vertices, 4);
        assert_eq!(stats.edges, 3);
        assert!((stats.average_degree - 1.5).abs() < 1e-12);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 2);
        assert!((stats.density - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_display_dump() {
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let text = g.to_string();
        assert!(text.starts_with("Graph with 2 vertices and 1 edges:"));
        assert!(text.contains("  Vertex 0: {1}"));
        assert!(text.contains("  Vertex 1: {0}"));
    }
}
