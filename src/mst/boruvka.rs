use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::union_find::UnionFind;
use crate::Result;
use log::debug;

/// Borůvka's algorithm: every round each component picks its lightest
/// outgoing edge, ties by edge index, then all picks are contracted.
/// At most log n rounds, O(m log n) total.
pub struct Boruvka;

impl Boruvka {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(&self, g: &G, w: &W) -> Result<MstResult> {
        check_mst_input(g, w)?;
        let n = g.vertex_count();
        let mut uf = UnionFind::new(n);
        let mut chosen = vec![];
        let mut round = 0;
        loop {
            round += 1;
            // lightest outgoing edge per component
            let mut best: Vec<Option<usize>> = vec![None; n];
            for e in 0..g.edge_count() {
                let cu = uf.find(g.edge_source(e));
                let cv = uf.find(g.edge_target(e));
                if cu == cv {
                    continue;
                }
                for c in [cu, cv] {
                    let improves = match best[c] {
                        None => true,
                        Some(cur) => lighter(w, e, cur),
                    };
                    if improves {
                        best[c] = Some(e);
                    }
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
        debug!("boruvka finished after {} rounds", round);
        Ok(MstResult::from_edges(chosen, w))
    }
}

impl Default for Boruvka {
    fn default() -> Self {
        Self::new()
    }
}
