use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::union_find::UnionFind;
use crate::Result;

/// Kruskal's algorithm: sort all edges, accept those that connect two
/// components. O(m log n).
pub struct Kruskal;

impl Kruskal {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(&self, g: &G, w: &W) -> Result<MstResult> {
        check_mst_input(g, w)?;
        let mut order: Vec<usize> = (0..g.edge_count()).collect();
        // stable on ties through the index itself
        order.sort_by(|&a, &b| {
            w.weight(a)
                .partial_cmp(&w.weight(b))
                .unwrap()
                .then(a.cmp(&b))
        });

        let mut uf = UnionFind::new(g.vertex_count());
        let mut chosen = vec![];
        for e in order {
            if uf.union(g.edge_source(e), g.edge_target(e)) {
                chosen.push(e);
            }
        }
        Ok(MstResult::from_edges(chosen, w))
    }
}

impl Default for Kruskal {
    fn default() -> Self {
        Self::new()
    }
}
