//! Classical graph algorithms over a dense integer-indexed graph
//! representation.
//!
//! Vertices and edges of a [`graph::IndexGraph`] are contiguous integers,
//! so algorithms address plain arrays instead of hash maps. On top of the
//! substrate this crate provides:
//!
//! * a family of referenceable heaps with `decrease-key` ([`heap`]),
//! * union-find and split-find-min ([`union_find`]),
//! * link/cut dynamic trees ([`dynamic_tree`]),
//! * single-source shortest paths ([`shortest_path`]),
//! * minimum spanning trees ([`mst`]),
//! * maximum flow ([`flow`]).
//!
//! ```
//! use graphalgo::graph::{GraphBuilder, IndexGraph};
//! use graphalgo::shortest_path::Dijkstra;
//!
//! let mut b = GraphBuilder::directed();
//! b.add_vertices(3);
//! b.add_edge(0, 1).unwrap();
//! b.add_edge(1, 2).unwrap();
//! b.add_edges_weights::<f64>("w", 1.0).unwrap();
//! let g = b.build_array();
//!
//! let w = g.edges_weights().get::<f64>("w").unwrap();
//! let sp = Dijkstra::new().compute(&g, w, 0).unwrap();
//! assert_eq!(sp.distance(2), 2.0);
//! ```

mod error;
pub use self::error::*;

pub mod graph;

pub mod heap;

pub mod union_find;

pub mod dynamic_tree;

pub mod shortest_path;

pub mod mst;

pub mod flow;
