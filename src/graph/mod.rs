//! Traits and implementations of dense integer-indexed graphs.
//!
//! # Index graphs
//!
//! Some graph libraries allow customized types of vertices and edges.
//! But for algorithm authors, these customized types are hard to deal with.
//! Can we copy a vertex? Can we use one as an array subscript?
//!
//! In this crate vertices of a graph are exactly the integers `0..n` and
//! edges are exactly `0..m`. Algorithm authors may freely copy these
//! indices and use them to address plain arrays. Removal keeps both
//! ranges contiguous by swapping the removed element with the last one
//! (see [`MutableGraph`]).
//!
//! There is also [`MappedGraph`] to name vertices and edges by arbitrary
//! hashable ids. It composes the id↔index translation on the boundary;
//! every algorithm in this crate works on indices.
//!
//! # Back-ends
//!
//! Two interchangeable adjacency representations are provided.
//! [`ArrayGraph`] stores per-vertex arrays of edge indices: O(1) append,
//! O(deg) edge removal. [`LinkedGraph`] threads doubly-linked edge lists
//! through an edge arena: O(1) edge removal. Algorithms are generic over
//! [`IndexGraph`] and must not care which one they are given.

mod array_backed;
pub use self::array_backed::*;
mod linked;
pub use self::linked::*;
mod builder;
pub use self::builder::*;
mod weights;
pub use self::weights::*;
mod mapped;
pub use self::mapped::*;
pub mod pg;

use crate::{GraphError, Result};

/// A trait for querying the topology of an index graph.
///
/// Vertices are `0..vertex_count()`, edges are `0..edge_count()`.
/// Accessors taking an index panic if it is out of range; use
/// [`IndexGraph::check_vertex`] / [`IndexGraph::check_edge`] to turn a
/// caller-supplied index into a typed error first.
pub trait IndexGraph {
    /// When the graph is directed, it is true; otherwise, it is false.
    fn is_directed(&self) -> bool;
    /// Number of vertices in the graph.
    fn vertex_count(&self) -> usize;
    /// Number of edges in the graph.
    fn edge_count(&self) -> usize;
    /// Source endpoint of an edge, in O(1).
    fn edge_source(&self, e: usize) -> usize;
    /// Target endpoint of an edge, in O(1).
    fn edge_target(&self, e: usize) -> usize;

    /// Iteration over all edges going out of `v`.
    ///
    /// For undirected graphs this lists every edge touching `v`,
    /// self-loops exactly once.
    fn out_edges(&self, v: usize) -> Box<dyn Iterator<Item = usize> + '_>;
    /// Iteration over all edges going into `v`.
    ///
    /// For undirected graphs this is the same edge set as
    /// [`IndexGraph::out_edges`].
    fn in_edges(&self, v: usize) -> Box<dyn Iterator<Item = usize> + '_>;

    /// The endpoint of `e` opposite to `v`.
    ///
    /// For a self-loop, returns `v` itself.
    fn edge_endpoint(&self, e: usize, v: usize) -> usize {
        let s = self.edge_source(e);
        let t = self.edge_target(e);
        debug_assert!(v == s || v == t);
        if v == s {
            t
        } else {
            s
        }
    }

    /// Iteration over all edges from `source` to `sink`, or between the
    /// two in undirected graphs.
    fn edges_connecting(&self, source: usize, sink: usize) -> Box<dyn Iterator<Item = usize> + '_>
    where
        Self: Sized,
    {
        let it = self
            .out_edges(source)
            .filter(move |&e| self.edge_endpoint(e, source) == sink);
        Box::new(it)
    }

    /// Number of outgoing edges of `v`.
    fn degree_out(&self, v: usize) -> usize {
        self.out_edges(v).count()
    }

    /// Number of incoming edges of `v`.
    fn degree_in(&self, v: usize) -> usize {
        self.in_edges(v).count()
    }

    /// Read access to the vertex weight columns.
    fn vertices_weights(&self) -> &WeightsRegistry;
    /// Read access to the edge weight columns.
    fn edges_weights(&self) -> &WeightsRegistry;

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::NoSuchVertex(v))
        }
    }

    fn check_edge(&self, e: usize) -> Result<()> {
        if e < self.edge_count() {
            Ok(())
        } else {
            Err(GraphError::NoSuchEdge(e))
        }
    }

    /// Returns something that can inspect into the graph.
    fn debug(&self) -> GraphDebug<'_, Self>
    where
        Self: Sized,
    {
        GraphDebug(self)
    }
}

/// A trait for index graphs whose topology can change.
///
/// # Index compaction
///
/// `remove_vertex(v)` swaps `v` with the vertex `n-1` before shrinking,
/// so the vertex range stays contiguous; `remove_edge` follows the same
/// policy over edges. Callers holding an index across a removal must
/// tolerate that it now names the swapped element. Weight columns are
/// compacted in the same step.
pub trait MutableGraph: IndexGraph {
    /// Add a new vertex and return its index, which is always the
    /// previous `vertex_count()`.
    fn add_vertex(&mut self) -> Result<usize>;
    /// Remove a vertex together with all of its incident edges.
    fn remove_vertex(&mut self, v: usize) -> Result<()>;
    /// Add a new edge from `source` to `sink` for directed graphs or
    /// between them for undirected graphs. Parallel edges and self-loops
    /// are allowed.
    fn add_edge(&mut self, source: usize, sink: usize) -> Result<usize>;
    /// Remove a single edge.
    fn remove_edge(&mut self, e: usize) -> Result<()>;

    /// Forbid further topology mutation. Weight column *values* stay
    /// writable; everything else answers `IllegalState`.
    fn freeze(&mut self);
    fn is_frozen(&self) -> bool;

    /// Create a typed vertex weight column filled with `default`.
    fn add_vertices_weights<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()>;
    /// Create a typed edge weight column filled with `default`.
    fn add_edges_weights<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()>;
    /// Write access to the vertex weight columns.
    fn vertices_weights_mut(&mut self) -> &mut WeightsRegistry;
    /// Write access to the edge weight columns.
    fn edges_weights_mut(&mut self) -> &mut WeightsRegistry;
}

/// Renders a graph in the graphviz dot language.
pub trait DumpInGraphviz: IndexGraph {
    fn dump_in_graphviz<W>(&self, out: &mut W, graph_name: &str) -> std::io::Result<()>
    where
        W: std::io::Write,
    {
        if self.is_directed() {
            writeln!(out, "digraph {} {{", graph_name)?;
        } else {
            writeln!(out, "graph {} {{", graph_name)?;
        }
        for v in 0..self.vertex_count() {
            writeln!(out, "  {} ;", v)?;
        }
        for e in 0..self.edge_count() {
            if self.is_directed() {
                writeln!(out, "  {} -> {} ;", self.edge_source(e), self.edge_target(e))?;
            } else {
                writeln!(out, "  {} -- {} ;", self.edge_source(e), self.edge_target(e))?;
            }
        }
        writeln!(out, "}}")?;
        Ok(())
    }
}

impl<G: IndexGraph> DumpInGraphviz for G {}

pub struct GraphDebug<'a, G: IndexGraph>(&'a G);

impl<'a, G: IndexGraph> std::fmt::Debug for GraphDebug<'a, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut m = f.debug_map();
        for v in 0..self.0.vertex_count() {
            let outs: Vec<_> = self
                .0
                .out_edges(v)
                .map(|e| (e, self.0.edge_endpoint(e, v)))
                .collect();
            m.entry(&v, &outs);
        }
        m.finish()
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use quickcheck::{Arbitrary, Gen};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Op {
        AddVertex,
        RemoveVertex(usize),
        AddEdge(usize, usize),
        RemoveEdge(usize),
    }

    /// A random but always-valid mutation sequence. The generator keeps a
    /// tiny model of the graph so every index it draws is in range at the
    /// time its op runs.
    #[derive(Clone)]
    pub(crate) struct Ops {
        pub directed: bool,
        pub ops: Vec<Op>,
    }

    impl std::fmt::Debug for Ops {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "directed={} {:?}", self.directed, self.ops)
        }
    }

    struct Model {
        n: usize,
        edges: Vec<(usize, usize)>,
    }

    impl Model {
        fn apply(&mut self, op: Op) {
            match op {
                Op::AddVertex => self.n += 1,
                Op::AddEdge(u, v) => self.edges.push((u, v)),
                Op::RemoveEdge(e) => {
                    self.edges.swap_remove(e);
                }
                Op::RemoveVertex(v) => {
                    self.edges.retain(|&(a, b)| a != v && b != v);
                    let last = self.n - 1;
                    for (a, b) in self.edges.iter_mut() {
                        if *a == last {
                            *a = v;
                        }
                        if *b == last {
                            *b = v;
                        }
                    }
                    self.n -= 1;
                }
            }
        }
    }

    impl Arbitrary for Ops {
        fn arbitrary(g: &mut Gen) -> Self {
            let directed = bool::arbitrary(g);
            let len = usize::arbitrary(g) % 60;
            let mut model = Model { n: 0, edges: vec![] };
            let mut ops = vec![];
            for _ in 0..len {
                let op = match u8::arbitrary(g) % 4 {
                    0 => Some(Op::AddVertex),
                    1 => {
                        if model.n == 0 {
                            None
                        } else {
                            Some(Op::RemoveVertex(usize::arbitrary(g) % model.n))
                        }
                    }
                    2 => {
                        if model.n == 0 {
                            None
                        } else {
                            Some(Op::AddEdge(
                                usize::arbitrary(g) % model.n,
                                usize::arbitrary(g) % model.n,
                            ))
                        }
                    }
                    3 => {
                        if model.edges.is_empty() {
                            None
                        } else {
                            Some(Op::RemoveEdge(usize::arbitrary(g) % model.edges.len()))
                        }
                    }
                    _ => unreachable!(),
                };
                if let Some(op) = op {
                    model.apply(op);
                    ops.push(op);
                }
            }
            Self { directed, ops }
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            // any prefix of a valid sequence is valid
            let directed = self.directed;
            let ops = self.ops.clone();
            Box::new(
                (0..self.ops.len()).rev().map(move |l| Ops {
                    directed,
                    ops: ops[..l].to_vec(),
                }),
            )
        }
    }

    pub(crate) trait TestGraph: MutableGraph + Sized {
        fn empty(directed: bool) -> Self;
    }

    impl TestGraph for ArrayGraph {
        fn empty(directed: bool) -> Self {
            ArrayGraph::new(directed)
        }
    }

    impl TestGraph for LinkedGraph {
        fn empty(directed: bool) -> Self {
            LinkedGraph::new(directed)
        }
    }

    impl Ops {
        pub(crate) fn replay<G: TestGraph>(&self) -> G {
            let mut g = G::empty(self.directed);
            for &op in self.ops.iter() {
                match op {
                    Op::AddVertex => {
                        g.add_vertex().unwrap();
                    }
                    Op::RemoveVertex(v) => g.remove_vertex(v).unwrap(),
                    Op::AddEdge(u, v) => {
                        g.add_edge(u, v).unwrap();
                    }
                    Op::RemoveEdge(e) => g.remove_edge(e).unwrap(),
                }
            }
            g
        }
    }

    pub(crate) fn check_same_topology(a: &impl IndexGraph, b: &impl IndexGraph) {
        assert_eq!(a.is_directed(), b.is_directed());
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.edge_count(), b.edge_count());
        for e in 0..a.edge_count() {
            assert_eq!(a.edge_source(e), b.edge_source(e), "edge {}", e);
            assert_eq!(a.edge_target(e), b.edge_target(e), "edge {}", e);
        }
        for v in 0..a.vertex_count() {
            let mut outs_a: Vec<_> = a.out_edges(v).collect();
            let mut outs_b: Vec<_> = b.out_edges(v).collect();
            outs_a.sort_unstable();
            outs_b.sort_unstable();
            assert_eq!(outs_a, outs_b, "out edges of {}", v);
            let mut ins_a: Vec<_> = a.in_edges(v).collect();
            let mut ins_b: Vec<_> = b.in_edges(v).collect();
            ins_a.sort_unstable();
            ins_b.sort_unstable();
            assert_eq!(ins_a, ins_b, "in edges of {}", v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digraph_to_graphviz() {
        let mut g = ArrayGraph::new_directed();
        let v = g.add_vertex().unwrap();
        g.add_edge(v, v).unwrap();
        let trial = {
            let mut trial = vec![];
            g.dump_in_graphviz(&mut trial, "trial").unwrap();
            String::from_utf8(trial).unwrap()
        };
        assert_eq!(
            trial,
            r#"digraph trial {
  0 ;
  0 -> 0 ;
}
"#
        );
    }

    #[test]
    fn undigraph_to_graphviz() {
        let mut g = LinkedGraph::new_undirected();
        let v = g.add_vertex().unwrap();
        g.add_edge(v, v).unwrap();
        let trial = {
            let mut trial = vec![];
            g.dump_in_graphviz(&mut trial, "trial").unwrap();
            String::from_utf8(trial).unwrap()
        };
        assert_eq!(
            trial,
            r#"graph trial {
  0 ;
  0 -- 0 ;
}
"#
        );
    }
}
