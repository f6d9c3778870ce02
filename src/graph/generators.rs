//! Graph builders used for experiments and demos.
//!
//! Deterministic families (path, cycle, star, grid, complete) need no
//! randomness. Random families draw from the generator's own seeded `Rng`.

use super::Graph;
use crate::error::{DomSetError, Result};
use rand::Rng;

/// Builds test graphs.
///
/// # Examples
///
/// ```
/// use u_domset::graph::GraphGenerator;
///
/// let star = GraphGenerator::star(5).unwrap();
/// assert_eq!(star.degree(0).unwrap(), 4);
///
/// let mut generator = GraphGenerator::seeded(42);
/// let g = generator.random(10, 15).unwrap();
/// assert_eq!(g.num_vertices(), 10);
/// ```
pub struct GraphGenerator<R: Rng> {
    rng: R,
}

impl GraphGenerator<rand::rngs::StdRng> {
    /// A generator with a reproducible random stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(crate::random::create_rng(seed))
    }
}

impl<R: Rng> GraphGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Random graph with up to `num_edges` distinct edges.
    ///
    /// Endpoints are sampled uniformly; collisions and self-pairs are
    /// retried, giving up after `10 · num_edges` draws, so dense requests
    /// may return fewer edges than asked for.
    ///
    /// # Errors
    /// `num_vertices == 0`, or `num_edges` above `n(n−1)/2`.
    pub fn random(&mut self, num_vertices: usize, num_edges: usize) -> Result<Graph> {
        let mut graph = Graph::new(num_vertices)?;
        let max_edges = num_vertices * (num_vertices - 1) / 2;
        if num_edges > max_edges {
            return Err(DomSetError::InvalidConfig(format!(
                "too many edges: maximum for {num_vertices} vertices is {max_edges}"
            )));
        }
        self.add_random_edges(&mut graph, num_edges)?;
        Ok(graph)
    }

    /// Random graph with `floor(density · n(n−1)/2)` edges.
    pub fn random_by_density(&mut self, num_vertices: usize, density: f64) -> Result<Graph> {
        if !(0.0..=1.0).contains(&density) {
            return Err(DomSetError::InvalidRate {
                name: "density",
                value: density,
            });
        }
        let max_edges = num_vertices * num_vertices.saturating_sub(1) / 2;
        self.random(num_vertices, (max_edges as f64 * density) as usize)
    }

    /// Connected random graph: a random spanning tree plus extra edges.
    ///
    /// # Errors
    /// `num_edges < num_vertices − 1`.
    pub fn connected_random(&mut self, num_vertices: usize, num_edges: usize) -> Result<Graph> {
        let mut graph = Graph::new(num_vertices)?;
        if num_edges < num_vertices - 1 {
            return Err(DomSetError::InvalidConfig(
                "need at least n-1 edges for a connected graph".into(),
            ));
        }
        for v in 1..num_vertices {
            let parent = self.rng.random_range(0..v);
            graph.add_edge(parent, v)?;
        }
        self.add_random_edges(&mut graph, num_edges - (num_vertices - 1))?;
        Ok(graph)
    }

    fn add_random_edges(&mut self, graph: &mut Graph, count: usize) -> Result<()> {
        let n = graph.num_vertices();
        let max_attempts = count * 10;
        let mut added = 0;
        let mut attempts = 0;
        while added < count && attempts < max_attempts {
            let u = self.rng.random_range(0..n);
            let v = self.rng.random_range(0..n);
            if u != v && !graph.has_edge(u, v)? {
                graph.add_edge(u, v)?;
                added += 1;
            }
            attempts += 1;
        }
        Ok(())
    }
}

impl GraphGenerator<rand::rngs::StdRng> {
    /// Every pair of vertices adjacent.
    pub fn complete(num_vertices: usize) -> Result<Graph> {
        let mut graph = Graph::new(num_vertices)?;
        for u in 0..num_vertices {
            for v in (u + 1)..num_vertices {
                graph.add_edge(u, v)?;
            }
        }
        Ok(graph)
    }

    /// `0 - 1 - ... - (n−1)`.
    pub fn path(num_vertices: usize) -> Result<Graph> {
        let mut graph = Graph::new(num_vertices)?;
        for v in 1..num_vertices {
            graph.add_edge(v - 1, v)?;
        }
        Ok(graph)
    }

    /// A path closed back to vertex 0. Needs at least 3 vertices.
    pub fn cycle(num_vertices: usize) -> Result<Graph> {
        if num_vertices < 3 {
            return Err(DomSetError::InvalidConfig(
                "cycle graph needs at least 3 vertices".into(),
            ));
        }
        let mut graph = Self::path(num_vertices)?;
        graph.add_edge(num_vertices - 1, 0)?;
        Ok(graph)
    }

    /// Vertex 0 joined to every other vertex. Needs at least 2 vertices.
    pub fn star(num_vertices: usize) -> Result<Graph> {
        if num_vertices < 2 {
            return Err(DomSetError::InvalidConfig(
                "star graph needs at least 2 vertices".into(),
            ));
        }
        let mut graph = Graph::new(num_vertices)?;
        for v in 1..num_vertices {
            graph.add_edge(0, v)?;
        }
        Ok(graph)
    }

    /// `rows × cols` lattice; vertex `r·cols + c` sits at row `r`, column `c`.
    pub fn grid(rows: usize, cols: usize) -> Result<Graph> {
        if rows == 0 || cols == 0 {
            return Err(DomSetError::NonPositive {
                what: "rows and columns",
            });
        }
        let mut graph = Graph::new(rows * cols)?;
        for r in 0..rows {
            for c in 0..cols {
                let current = r * cols + c;
                if c + 1 < cols {
                    graph.add_edge(current, current + 1)?;
                }
                if r + 1 < rows {
                    graph.add_edge(current, current + cols)?;
                }
            }
        }
        Ok(graph)
    }

    /// The fixed 10-vertex demo graph: a strip of triangles.
    pub fn sample10() -> Result<Graph> {
        Graph::from_edges(
            10,
            &[
                (0, 1),
                (0, 2),
                (1, 2),
                (1, 3),
                (2, 3),
                (2, 4),
                (3, 4),
                (3, 5),
                (4, 5),
                (4, 6),
                (5, 6),
                (5, 7),
                (6, 7),
                (6, 8),
                (7, 8),
                (7, 9),
                (8, 9),
            ],
        )
    }
}
