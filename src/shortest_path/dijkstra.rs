use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::heap::{HeapRef, PairingHeap, ReferenceableHeap};
use crate::{GraphError, Result};
use noisy_float::prelude::*;
use std::marker::PhantomData;

/// Dijkstra's algorithm over any referenceable heap.
///
/// Weights must be non-negative; that is checked up front and rejected
/// with `InvalidArgument`. The heap holds at most one entry per vertex,
/// updated in place through the handle kept in a side array, which is
/// what the heap family's `decrease_key` exists for. O(m + n log n) with
/// the Fibonacci heap, O((n + m) log n) otherwise.
pub struct Dijkstra<H = PairingHeap<N64, usize>> {
    _heap: PhantomData<H>,
}

impl Dijkstra {
    /// Dijkstra with the default (pairing) heap.
    pub fn new() -> Self {
        Self { _heap: PhantomData }
    }
}

impl Default for Dijkstra {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ReferenceableHeap<N64, usize>> Dijkstra<H> {
    /// Dijkstra visiting vertices through the heap type `H`.
    pub fn with_heap() -> Self {
        Self { _heap: PhantomData }
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        w: &W,
        source: usize,
    ) -> Result<Sssp> {
        g.check_vertex(source)?;
        for e in 0..g.edge_count() {
            let we = w.weight(e);
            if !(we >= 0.0) {
                return Err(GraphError::InvalidArgument(format!(
                    "negative weight {} on edge {}",
                    we, e
                )));
            }
        }

        let n = g.vertex_count();
        let mut res = Sssp::new(n, source);
        let mut heap = H::new();
        let mut refs: Vec<Option<HeapRef>> = vec![None; n];
        let mut settled = vec![false; n];
        refs[source] = Some(heap.insert(n64(0.0), source));

        while let Some((du, u)) = heap.extract_min() {
            settled[u] = true;
            let du = du.raw();
            for e in g.out_edges(u) {
                let v = g.edge_endpoint(e, u);
                if settled[v] {
                    continue;
                }
                let nd = du + w.weight(e);
                if nd < res.distance(v) {
                    res.set(v, nd, e, u);
                    match refs[v] {
                        None => refs[v] = Some(heap.insert(n64(nd), v)),
                        Some(r) => heap.decrease_key(r, n64(nd))?,
                    }
                }
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::heap::{BinaryHeap, FibonacciHeap, RbHeap};
    use quickcheck_macros::quickcheck;

    fn diamond() -> (crate::graph::ArrayGraph, crate::graph::Weights<f64>) {
        let mut b = GraphBuilder::directed();
        b.add_vertices(3);
        b.add_edge(0, 1).unwrap();
        b.add_edge(1, 2).unwrap();
        b.add_edge(0, 2).unwrap();
        b.add_edges_weights::<f64>("w", 0.0).unwrap();
        {
            let w = b.edges_weights_mut().get_mut::<f64>("w").unwrap();
            w.set(0, 1.2);
            w.set(1, 3.1);
            w.set(2, 15.1);
        }
        let g = b.build_array();
        let w = g.edges_weights().get::<f64>("w").unwrap().clone();
        (g, w)
    }

    #[test]
    fn three_vertex_chain_beats_direct_edge() {
        let (g, w) = diamond();
        let sp = Dijkstra::new().compute(&g, &w, 0).unwrap();
        assert_eq!(sp.distance(0), 0.0);
        assert_eq!(sp.distance(1), 1.2);
        assert!((sp.distance(2) - 4.3).abs() < 1e-9);
        assert_eq!(sp.path_to(2), Some(vec![0, 1]));
        assert_eq!(sp.back_edge(2), Some(1));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut b = GraphBuilder::directed();
        b.add_vertices(2);
        b.add_edge(0, 1).unwrap();
        let g = b.build_array();
        let err = Dijkstra::new().compute(&g, &|_e: usize| -1.0, 0).unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
    }

    #[test]
    fn unknown_source_is_rejected() {
        let (g, w) = diamond();
        assert!(matches!(
            Dijkstra::new().compute(&g, &w, 9),
            Err(GraphError::NoSuchVertex(9))
        ));
    }

    #[quickcheck]
    fn agrees_with_petgraph(s: SmallWeightedDigraph) {
        let (g, w) = s.build();
        let oracle = petgraph_distances(&g, &w, 0);
        let sp = Dijkstra::new().compute(&g, &w, 0).unwrap();
        for v in 0..g.vertex_count() {
            assert!((sp.distance(v) - oracle[v]).abs() < 1e-9 || sp.distance(v) == oracle[v]);
        }
    }

    #[quickcheck]
    fn heap_choice_does_not_matter(s: SmallWeightedDigraph) {
        let (g, w) = s.build();
        let base = Dijkstra::new().compute(&g, &w, 0).unwrap();
        let fib = Dijkstra::<FibonacciHeap<_, _>>::with_heap()
            .compute(&g, &w, 0)
            .unwrap();
        let bin = Dijkstra::<BinaryHeap<_, _>>::with_heap()
            .compute(&g, &w, 0)
            .unwrap();
        let rb = Dijkstra::<RbHeap<_, _>>::with_heap()
            .compute(&g, &w, 0)
            .unwrap();
        for v in 0..g.vertex_count() {
            assert_eq!(base.distance(v), fib.distance(v));
            assert_eq!(base.distance(v), bin.distance(v));
            assert_eq!(base.distance(v), rb.distance(v));
        }
    }

    #[quickcheck]
    fn backend_choice_does_not_matter(s: SmallWeightedDigraph) {
        let (ga, wa) = s.build();
        let (gl, wl) = rebuild_linked(&s);
        let a = Dijkstra::new().compute(&ga, &wa, 0).unwrap();
        let l = Dijkstra::new().compute(&gl, &wl, 0).unwrap();
        for v in 0..ga.vertex_count() {
            assert_eq!(a.distance(v), l.distance(v));
        }
    }

    #[quickcheck]
    fn paths_are_valid_walks(s: SmallWeightedDigraph) {
        let (g, w) = s.build();
        let sp = Dijkstra::new().compute(&g, &w, 0).unwrap();
        for v in 0..g.vertex_count() {
            let Some(path) = sp.path_to(v) else { continue };
            let mut at = 0;
            let mut total = 0.0;
            for e in path {
                assert_eq!(g.edge_source(e), at);
                at = g.edge_target(e);
                total += w.weight(e);
            }
            assert_eq!(at, v);
            assert!((total - sp.distance(v)).abs() < 1e-9);
        }
    }
}
