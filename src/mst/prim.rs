use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::heap::{HeapRef, PairingHeap, ReferenceableHeap};
use crate::Result;
use noisy_float::prelude::*;
use std::marker::PhantomData;

/// Prim's algorithm, growing one tree per component from an arbitrary
/// start vertex.
///
/// The heap is keyed by the lightest edge crossing the cut into each
/// fringe vertex and updated with `decrease_key` on improvement.
/// O(m + n log n) with the Fibonacci heap.
pub struct Prim<H = PairingHeap<N64, usize>> {
    _heap: PhantomData<H>,
}

impl Prim {
    pub fn new() -> Self {
        Self { _heap: PhantomData }
    }
}

impl Default for Prim {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ReferenceableHeap<N64, usize>> Prim<H> {
    pub fn with_heap() -> Self {
        Self { _heap: PhantomData }
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(&self, g: &G, w: &W) -> Result<MstResult> {
        check_mst_input(g, w)?;
        let n = g.vertex_count();
        let mut in_tree = vec![false; n];
        let mut best_edge: Vec<Option<usize>> = vec![None; n];
        let mut refs: Vec<Option<HeapRef>> = vec![None; n];
        let mut chosen = vec![];

        for start in 0..n {
            if in_tree[start] {
                continue;
            }
            let mut heap = H::new();
            in_tree[start] = true;
            self.scan(g, w, start, &mut heap, &mut refs, &mut best_edge, &in_tree)?;
            while let Some((_, v)) = heap.extract_min() {
                refs[v] = None;
                in_tree[v] = true;
                chosen.push(best_edge[v].expect("fringe vertex without an edge"));
                self.scan(g, w, v, &mut heap, &mut refs, &mut best_edge, &in_tree)?;
            }
        }
        Ok(MstResult::from_edges(chosen, w))
    }

    /// Offer every cut-crossing edge of the freshly absorbed vertex `u`.
    fn scan<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        w: &W,
        u: usize,
        heap: &mut H,
        refs: &mut [Option<HeapRef>],
        best_edge: &mut [Option<usize>],
        in_tree: &[bool],
    ) -> Result<()> {
        for e in g.out_edges(u) {
            let v = g.edge_endpoint(e, u);
            if in_tree[v] {
                continue;
            }
            let improves = match best_edge[v] {
                None => true,
                Some(cur) => lighter(w, e, cur),
            };
            if !improves {
                continue;
            }
            best_edge[v] = Some(e);
            let key = n64(w.weight(e));
            match refs[v] {
                None => refs[v] = Some(heap.insert(key, v)),
                // on a pure tie-break win the key does not move
                Some(r) => heap.decrease_key(r, key)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::heap::{BinomialHeap, FibonacciHeap, SplayHeap};
    use crate::mst::Kruskal;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn agrees_with_kruskal(s: SmallWeightedUngraph) {
        let (g, w) = s.build();
        let kr = Kruskal::new().compute(&g, &w).unwrap();
        let pr = Prim::new().compute(&g, &w).unwrap();
        assert_eq!(pr.total_weight(), kr.total_weight());
        check_spanning_forest(&g, pr.edges());
    }

    #[quickcheck]
    fn heap_choice_does_not_matter(s: SmallWeightedUngraph) {
        let (g, w) = s.build();
        let base = Prim::new().compute(&g, &w).unwrap();
        let fib = Prim::<FibonacciHeap<_, _>>::with_heap().compute(&g, &w).unwrap();
        let bin = Prim::<BinomialHeap<_, _>>::with_heap().compute(&g, &w).unwrap();
        let spl = Prim::<SplayHeap<_, _>>::with_heap().compute(&g, &w).unwrap();
        assert_eq!(base.total_weight(), fib.total_weight());
        assert_eq!(base.total_weight(), bin.total_weight());
        assert_eq!(base.total_weight(), spl.total_weight());
    }
}
