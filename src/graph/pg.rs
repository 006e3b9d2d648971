//! Conversions to petgraph.
//!
//! Index graphs are contiguous, so vertex `v` maps to `NodeIndex::new(v)`
//! and edge `e` to `EdgeIndex::new(e)` with nothing in between. The tests
//! use these conversions to check the algorithms here against petgraph's.

use super::{IndexGraph, WeightFn};
use petgraph::graph::{DiGraph, UnGraph};

/// Copy a directed index graph into a petgraph `DiGraph`, attaching `w`
/// as edge weights.
pub fn to_directed<G: IndexGraph, W: WeightFn>(g: &G, w: &W) -> DiGraph<(), f64, usize> {
    assert!(g.is_directed());
    let mut pg = DiGraph::with_capacity(g.vertex_count(), g.edge_count());
    for _ in 0..g.vertex_count() {
        pg.add_node(());
    }
    for e in 0..g.edge_count() {
        pg.add_edge(
            g.edge_source(e).into(),
            g.edge_target(e).into(),
            w.weight(e),
        );
    }
    pg
}

/// Copy an undirected index graph into a petgraph `UnGraph`.
pub fn to_undirected<G: IndexGraph, W: WeightFn>(g: &G, w: &W) -> UnGraph<(), f64, usize> {
    assert!(!g.is_directed());
    let mut pg = UnGraph::with_capacity(g.vertex_count(), g.edge_count());
    for _ in 0..g.vertex_count() {
        pg.add_node(());
    }
    for e in 0..g.edge_count() {
        pg.add_edge(
            g.edge_source(e).into(),
            g.edge_target(e).into(),
            w.weight(e),
        );
    }
    pg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn indices_line_up() {
        let mut b = GraphBuilder::directed();
        b.add_vertices(3);
        b.add_edge(0, 1).unwrap();
        b.add_edge(2, 0).unwrap();
        let g = b.build_array();
        let pg = to_directed(&g, &|_e: usize| 1.0);
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
        let (a, b) = pg.edge_endpoints(petgraph::graph::EdgeIndex::new(1)).unwrap();
        assert_eq!((a.index(), b.index()), (2, 0));
    }
}
