use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::heap::{FibonacciHeap, HeapRef, ReferenceableHeap};
use crate::union_find::UnionFind;
use crate::Result;
use ahash::RandomState;
use log::debug;
use noisy_float::prelude::*;
use std::collections::HashMap;

/// Fredman–Tarjan MST: phases of Fibonacci-heap tree growth with a
/// bounded heap size, contracting between phases.
///
/// Each phase picks the bound `k = 2^(2m/t)` from the number of trees
/// `t` it starts with; a growth stops when its heap would exceed `k` or
/// when it runs into a tree grown earlier in the same phase. The phase
/// count is O(β(m, n)).
pub struct FredmanTarjan;

impl FredmanTarjan {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(&self, g: &G, w: &W) -> Result<MstResult> {
        check_mst_input(g, w)?;
        let n = g.vertex_count();
        let m = g.edge_count();
        let mut uf = UnionFind::new(n);
        let mut chosen = vec![];
        let mut phase = 0;

        loop {
            phase += 1;
            // component adjacency, rebuilt after the contractions of the
            // previous phase
            let mut adj: Vec<Vec<(usize, usize)>> = vec![vec![]; n];
            let mut t = 0usize;
            let mut seen_comp = vec![false; n];
            for v in 0..n {
                let c = uf.find(v);
                if !seen_comp[c] {
                    seen_comp[c] = true;
                    t += 1;
                }
            }
            let mut have_inter_edges = false;
            for e in 0..m {
                let cu = uf.find(g.edge_source(e));
                let cv = uf.find(g.edge_target(e));
                if cu == cv {
                    continue;
                }
                have_inter_edges = true;
                adj[cu].push((e, cv));
                adj[cv].push((e, cu));
            }
            if !have_inter_edges {
                break;
            }
            let k = heap_bound(m, t);
            debug!("fredman-tarjan phase {}: {} trees, heap bound {}", phase, t, k);

            // tree id per component for this phase; MAX = not grown yet
            let mut tree_of = vec![usize::MAX; n];
            let mut next_tree = 0usize;
            for root in 0..n {
                if uf.find(root) != root || tree_of[root] != usize::MAX || adj[root].is_empty() {
                    continue;
                }
                let tid = next_tree;
                next_tree += 1;
                tree_of[root] = tid;
                self.grow(g, w, root, tid, k, &adj, &mut tree_of, &mut uf, &mut chosen)?;
            }
            // a phase with inter-component edges always contracts
            debug_assert!(next_tree > 0);
        }
        Ok(MstResult::from_edges(chosen, w))
    }

    /// Grow one tree from component `root` until the heap bound bites,
    /// the fringe dries up, or the tree fuses with an earlier one.
    #[allow(clippy::too_many_arguments)]
    fn grow<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        w: &W,
        root: usize,
        tid: usize,
        k: usize,
        adj: &[Vec<(usize, usize)>],
        tree_of: &mut [usize],
        uf: &mut UnionFind,
        chosen: &mut Vec<usize>,
    ) -> Result<()> {
        let mut heap: FibonacciHeap<N64, usize> = FibonacciHeap::new();
        let mut refs: HashMap<usize, HeapRef, RandomState> =
            HashMap::with_hasher(RandomState::new());
        let mut best_edge: HashMap<usize, usize, RandomState> =
            HashMap::with_hasher(RandomState::new());

        self.offer(w, &adj[root], tid, tree_of, &mut heap, &mut refs, &mut best_edge)?;
        while let Some((_, c)) = heap.extract_min() {
            refs.remove(&c);
            let e = best_edge[&c];
            if !uf.union(g.edge_source(e), g.edge_target(e)) {
                continue;
            }
            chosen.push(e);
            let fused_with_other_tree = tree_of[c] != usize::MAX;
            tree_of[c] = tid;
            if fused_with_other_tree {
                break;
            }
            self.offer(w, &adj[c], tid, tree_of, &mut heap, &mut refs, &mut best_edge)?;
            if heap.len() > k {
                break;
            }
        }
        Ok(())
    }

    /// Push or improve the fringe entries for every neighbour of a
    /// freshly absorbed component.
    #[allow(clippy::too_many_arguments)]
    fn offer<W: WeightFn>(
        &self,
        w: &W,
        edges: &[(usize, usize)],
        tid: usize,
        tree_of: &[usize],
        heap: &mut FibonacciHeap<N64, usize>,
        refs: &mut HashMap<usize, HeapRef, RandomState>,
        best_edge: &mut HashMap<usize, usize, RandomState>,
    ) -> Result<()> {
        for &(e, other) in edges {
            if tree_of[other] == tid {
                continue;
            }
            let improves = match best_edge.get(&other) {
                None => true,
                Some(&cur) => lighter(w, e, cur),
            };
            if !improves {
                continue;
            }
            best_edge.insert(other, e);
            let key = n64(w.weight(e));
            match refs.get(&other) {
                None => {
                    let r = heap.insert(key, other);
                    refs.insert(other, r);
                }
                Some(&r) => heap.decrease_key(r, key)?,
            }
        }
        Ok(())
    }
}

impl Default for FredmanTarjan {
    fn default() -> Self {
        Self::new()
    }
}

/// `2^(2m/t)`, clamped so it neither overflows nor underflows the point
/// of the phase.
fn heap_bound(m: usize, t: usize) -> usize {
    let exp = (2 * m) / t.max(1);
    if exp >= usize::BITS as usize - 1 {
        usize::MAX
    } else {
        (1usize << exp).max(2)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::mst::Kruskal;
    use quickcheck_macros::quickcheck;

    #[test]
    fn bound_grows_with_density() {
        assert_eq!(heap_bound(4, 8), 2);
        assert_eq!(heap_bound(8, 4), 16);
        assert_eq!(heap_bound(1 << 20, 1), usize::MAX);
    }

    #[quickcheck]
    fn agrees_with_kruskal(s: SmallWeightedUngraph) {
        let (g, w) = s.build();
        let kr = Kruskal::new().compute(&g, &w).unwrap();
        let ft = FredmanTarjan::new().compute(&g, &w).unwrap();
        assert_eq!(ft.total_weight(), kr.total_weight());
        check_spanning_forest(&g, ft.edges());
    }

    #[quickcheck]
    fn matches_petgraph_weight(s: SmallWeightedUngraph) {
        let (g, w) = s.build();
        let ft = FredmanTarjan::new().compute(&g, &w).unwrap();
        assert_eq!(ft.total_weight(), petgraph_forest_weight(&g, &w));
    }
}
