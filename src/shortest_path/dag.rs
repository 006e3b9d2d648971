use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::{GraphError, Result};
use ahash::RandomState;
use keyed_priority_queue::KeyedPriorityQueue;
use std::cmp::Reverse;

/// Shortest paths on a directed acyclic graph: topological order, then a
/// single relaxation sweep. O(n + m), any weights.
///
/// The order comes from a Kahn pass driven by a keyed priority queue of
/// in-degrees; popping a vertex whose in-degree is still positive means
/// the graph has a cycle, which is rejected with `InvalidArgument`.
pub struct DagSssp;

impl DagSssp {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        w: &W,
        source: usize,
    ) -> Result<Sssp> {
        if !g.is_directed() {
            return Err(GraphError::Unsupported(
                "DAG shortest paths need a directed graph".to_string(),
            ));
        }
        g.check_vertex(source)?;
        let order = self.toposort(g)?;

        let n = g.vertex_count();
        let mut res = Sssp::new(n, source);
        for &u in order.iter() {
            let du = res.distance(u);
            if !du.is_finite() {
                continue;
            }
            for e in g.out_edges(u) {
                let v = g.edge_target(e);
                let nd = du + w.weight(e);
                if nd < res.distance(v) {
                    res.set(v, nd, e, u);
                }
            }
        }
        Ok(res)
    }

    fn toposort<G: IndexGraph>(&self, g: &G) -> Result<Vec<usize>> {
        let n = g.vertex_count();
        let mut degree_queue: KeyedPriorityQueue<usize, Reverse<usize>, RandomState> =
            KeyedPriorityQueue::with_capacity_and_hasher(n, RandomState::new());
        for v in 0..n {
            degree_queue.push(v, Reverse(g.degree_in(v)));
        }
        let mut order = Vec::with_capacity(n);
        while let Some((u, in_degree)) = degree_queue.pop() {
            if in_degree.0 > 0 {
                return Err(GraphError::InvalidArgument(
                    "graph has a cycle".to_string(),
                ));
            }
            order.push(u);
            for e in g.out_edges(u) {
                let v = g.edge_target(e);
                if let Some(Reverse(d)) = degree_queue.get_priority(&v).copied() {
                    degree_queue.set_priority(&v, Reverse(d - 1)).unwrap();
                }
            }
        }
        Ok(order)
    }
}

impl Default for DagSssp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn dag(n: usize, edges: &[(usize, usize, f64)]) -> (crate::graph::ArrayGraph, crate::graph::Weights<f64>) {
        let mut b = GraphBuilder::directed();
        b.add_vertices(n);
        b.add_edges_weights::<f64>("w", 0.0).unwrap();
        for &(u, v, wt) in edges {
            let e = b.add_edge(u, v).unwrap();
            b.edges_weights_mut().get_mut::<f64>("w").unwrap().set(e, wt);
        }
        let g = b.build_array();
        let w = g.edges_weights().get::<f64>("w").unwrap().clone();
        (g, w)
    }

    #[test]
    fn relaxes_in_topological_order() {
        let (g, w) = dag(
            5,
            &[
                (0, 1, 2.0),
                (0, 2, 6.0),
                (1, 2, 3.0),
                (2, 3, 1.0),
                (1, 3, 9.0),
                (3, 4, -4.0),
            ],
        );
        let sp = DagSssp::new().compute(&g, &w, 0).unwrap();
        assert_eq!(sp.distance(2), 5.0);
        assert_eq!(sp.distance(3), 6.0);
        assert_eq!(sp.distance(4), 2.0);
        assert_eq!(sp.path_to(4), Some(vec![0, 2, 3, 5]));
    }

    #[test]
    fn cycle_is_rejected() {
        let (g, w) = dag(2, &[(0, 1, 1.0), (1, 0, 1.0)]);
        assert!(matches!(
            DagSssp::new().compute(&g, &w, 0),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn undirected_is_unsupported() {
        let mut b = GraphBuilder::undirected();
        b.add_vertices(2);
        let g = b.build_array();
        assert!(matches!(
            DagSssp::new().compute(&g, &|_e: usize| 1.0, 0),
            Err(GraphError::Unsupported(_))
        ));
    }

    #[test]
    fn vertices_before_source_stay_unreachable() {
        let (g, w) = dag(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let sp = DagSssp::new().compute(&g, &w, 1).unwrap();
        assert_eq!(sp.distance(0), f64::INFINITY);
        assert_eq!(sp.distance(2), 1.0);
        assert_eq!(sp.path_to(0), None);
    }
}
