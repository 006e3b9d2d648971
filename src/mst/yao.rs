use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::union_find::UnionFind;
use crate::Result;

/// Yao's refinement of Borůvka.
///
/// Each vertex pre-partitions its incident edges into O(log n) weight
/// levels by repeated median selection, never fully sorting. A round
/// then finds a component's lightest outgoing edge by scanning only the
/// lowest level that still has candidates, discarding edges that became
/// internal along the way.
pub struct Yao;

impl Yao {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(&self, g: &G, w: &W) -> Result<MstResult> {
        check_mst_input(g, w)?;
        let n = g.vertex_count();
        let levels = (usize::BITS - n.leading_zeros()) as usize + 1;

        // per-vertex leveled adjacency
        let mut leveled: Vec<Vec<Vec<usize>>> = Vec::with_capacity(n);
        for v in 0..n {
            let mut adj: Vec<usize> = g.out_edges(v).collect();
            let mut groups = vec![];
            split_by_medians(w, &mut adj, levels, &mut groups);
            leveled.push(groups);
        }
        let mut cursor = vec![0usize; n];

        let mut uf = UnionFind::new(n);
        let mut chosen = vec![];
        loop {
            let mut best: Vec<Option<usize>> = vec![None; n];
            for v in 0..n {
                let Some(e) = self.candidate(g, w, v, &mut leveled, &mut cursor, &mut uf) else {
                    continue;
                };
                let c = uf.find(v);
                let improves = match best[c] {
                    None => true,
                    Some(cur) => lighter(w, e, cur),
                };
                if improves {
                    best[c] = Some(e);
                }
            }
            let mut merged_any = false;
            for e in best.into_iter().flatten() {
                if uf.union(g.edge_source(e), g.edge_target(e)) {
                    chosen.push(e);
                    merged_any = true;
                }
            }
            if !merged_any {
                break;
            }
        }
        Ok(MstResult::from_edges(chosen, w))
    }

    /// Lightest edge of `v` leaving its current component, looking only
    /// at the lowest level that still has one.
    fn candidate<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        w: &W,
        v: usize,
        leveled: &mut [Vec<Vec<usize>>],
        cursor: &mut [usize],
        uf: &mut UnionFind,
    ) -> Option<usize> {
        let groups = &mut leveled[v];
        while cursor[v] < groups.len() {
            let group = &mut groups[cursor[v]];
            let mut best: Option<usize> = None;
            let mut i = 0;
            while i < group.len() {
                let e = group[i];
                if uf.in_same(g.edge_source(e), g.edge_target(e)) {
                    group.swap_remove(i);
                    continue;
                }
                best = Some(match best {
                    None => e,
                    Some(cur) if lighter(w, e, cur) => e,
                    Some(cur) => cur,
                });
                i += 1;
            }
            if let Some(e) = best {
                return Some(e);
            }
            cursor[v] += 1;
        }
        None
    }
}

impl Default for Yao {
    fn default() -> Self {
        Self::new()
    }
}

/// Partition `edges` into up to `levels` groups such that every weight
/// in a group is ≤ every weight in the next, using median selection
/// instead of sorting.
fn split_by_medians<W: WeightFn>(
    w: &W,
    edges: &mut [usize],
    levels: usize,
    out: &mut Vec<Vec<usize>>,
) {
    if edges.is_empty() {
        return;
    }
    if levels <= 1 || edges.len() == 1 {
        out.push(edges.to_vec());
        return;
    }
    let mid = edges.len() / 2;
    edges.select_nth_unstable_by(mid, |&a, &b| {
        w.weight(a)
            .partial_cmp(&w.weight(b))
            .unwrap()
            .then(a.cmp(&b))
    });
    let (lo, hi) = edges.split_at_mut(mid);
    split_by_medians(w, lo, levels / 2, out);
    split_by_medians(w, hi, levels / 2, out);
}
