//! Minimum spanning trees and forests.
//!
//! All algorithms take an undirected weighted graph and return the edge
//! set of a minimum spanning forest, one tree per connected component.
//! Ties are broken by edge index, so on distinct weights every algorithm
//! returns the same edge set.

mod boruvka;
pub use self::boruvka::*;
mod fredman_tarjan;
pub use self::fredman_tarjan::*;
mod kruskal;
pub use self::kruskal::*;
mod prim;
pub use self::prim::*;
mod yao;
pub use self::yao::*;

use crate::graph::{IndexGraph, WeightFn};
use crate::{GraphError, Result};

/// Edge set of a minimum spanning forest.
#[derive(Debug, Clone, PartialEq)]
pub struct MstResult {
    edges: Vec<usize>,
    weight: f64,
}

impl MstResult {
    pub(crate) fn from_edges<W: WeightFn>(mut edges: Vec<usize>, w: &W) -> Self {
        edges.sort_unstable();
        let weight = edges.iter().map(|&e| w.weight(e)).sum();
        Self { edges, weight }
    }

    /// Chosen edge indices, ascending.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Total weight of the forest.
    pub fn total_weight(&self) -> f64 {
        self.weight
    }
}

/// Shared entry validation: undirected shape, well-formed weights.
pub(crate) fn check_mst_input<G: IndexGraph, W: WeightFn>(g: &G, w: &W) -> Result<()> {
    if g.is_directed() {
        return Err(GraphError::Unsupported(
            "spanning trees are defined on undirected graphs".to_string(),
        ));
    }
    for e in 0..g.edge_count() {
        if w.weight(e).is_nan() {
            return Err(GraphError::InvalidArgument(format!(
                "weight of edge {} is NaN",
                e
            )));
        }
    }
    Ok(())
}

/// Order edges by weight, ties by index.
pub(crate) fn lighter<W: WeightFn>(w: &W, a: usize, b: usize) -> bool {
    let (wa, wb) = (w.weight(a), w.weight(b));
    wa < wb || (wa == wb && a < b)
}

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::graph::{GraphBuilder, IndexGraph};
    use quickcheck::{Arbitrary, Gen};

    /// Random small undirected weighted graph for cross-checking the
    /// algorithms.
    #[derive(Clone, Debug)]
    pub(crate) struct SmallWeightedUngraph {
        pub n: usize,
        pub edges: Vec<(usize, usize, u16)>,
    }

    impl Arbitrary for SmallWeightedUngraph {
        fn arbitrary(g: &mut Gen) -> Self {
            let n = usize::arbitrary(g) % 12 + 1;
            let m = usize::arbitrary(g) % 30;
            let edges = (0..m)
                .map(|_| {
                    (
                        usize::arbitrary(g) % n,
                        usize::arbitrary(g) % n,
                        u16::arbitrary(g) % 50,
                    )
                })
                .collect();
            Self { n, edges }
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let n = self.n;
            let edges = self.edges.clone();
            Box::new((0..self.edges.len()).rev().map(move |l| Self {
                n,
                edges: edges[..l].to_vec(),
            }))
        }
    }

    impl SmallWeightedUngraph {
        pub(crate) fn build(&self) -> (crate::graph::ArrayGraph, crate::graph::Weights<f64>) {
            let mut b = GraphBuilder::undirected();
            b.add_vertices(self.n);
            b.add_edges_weights::<f64>("w", 0.0).unwrap();
            for &(u, v, _) in self.edges.iter() {
                b.add_edge(u, v).unwrap();
            }
            for (e, &(_, _, w)) in self.edges.iter().enumerate() {
                b.edges_weights_mut()
                    .get_mut::<f64>("w")
                    .unwrap()
                    .set(e, w as f64);
            }
            let g = b.build_array();
            let w = g.edges_weights().get::<f64>("w").unwrap().clone();
            (g, w)
        }
    }

    /// Total forest weight according to petgraph's Kruskal.
    pub(crate) fn petgraph_forest_weight<G: IndexGraph, W: crate::graph::WeightFn>(
        g: &G,
        w: &W,
    ) -> f64 {
        use petgraph::data::FromElements;
        let pg = crate::graph::pg::to_undirected(g, w);
        let forest: petgraph::graph::UnGraph<(), f64, usize> =
            petgraph::graph::UnGraph::from_elements(petgraph::algo::min_spanning_tree(&pg));
        forest.edge_weights().copied().sum()
    }

    /// A forest is acyclic and spans every component.
    pub(crate) fn check_spanning_forest<G: IndexGraph>(g: &G, edges: &[usize]) {
        let mut uf = crate::union_find::UnionFind::new(g.vertex_count());
        for &e in edges {
            assert!(
                uf.union(g.edge_source(e), g.edge_target(e)),
                "forest contains a cycle at edge {}",
                e
            );
        }
        let mut all = crate::union_find::UnionFind::new(g.vertex_count());
        for e in 0..g.edge_count() {
            all.union(g.edge_source(e), g.edge_target(e));
        }
        assert_eq!(uf.count_sets(), all.count_sets(), "forest does not span");
    }
}
