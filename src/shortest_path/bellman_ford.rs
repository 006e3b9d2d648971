use super::*;
use crate::graph::{IndexGraph, WeightFn};
use crate::Result;
use log::debug;

/// Bellman–Ford, the any-weights member of the family.
///
/// `n - 1` relaxation rounds with an early exit; an `n`-th round that
/// still relaxes betrays a negative cycle, and every vertex reachable
/// from one is reported as `-∞`.
pub struct BellmanFord;

impl BellmanFord {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        w: &W,
        source: usize,
    ) -> Result<Sssp> {
        g.check_vertex(source)?;
        let n = g.vertex_count();
        let m = g.edge_count();
        let mut res = Sssp::new(n, source);

        let relax_round = |res: &mut Sssp| -> bool {
            let mut changed = false;
            for e in 0..m {
                let s = g.edge_source(e);
                let t = g.edge_target(e);
                let we = w.weight(e);
                for (u, v) in arcs_of(g, s, t) {
                    let du = res.distance(u);
                    if du.is_finite() && du + we < res.distance(v) {
                        res.set(v, du + we, e, u);
                        changed = true;
                    }
                }
            }
            changed
        };

        let mut rounds = 0;
        for _ in 1..n.max(1) {
            rounds += 1;
            if !relax_round(&mut res) {
                break;
            }
        }
        debug!("bellman-ford settled after {} rounds", rounds);

        // one more round: anything still improving sits on or behind a
        // negative cycle
        let mut tainted = vec![];
        for e in 0..m {
            let s = g.edge_source(e);
            let t = g.edge_target(e);
            let we = w.weight(e);
            for (u, v) in arcs_of(g, s, t) {
                let du = res.distance(u);
                if du.is_finite() && du + we < res.distance(v) {
                    tainted.push(v);
                }
            }
        }
        if !tainted.is_empty() {
            debug!("negative cycle touches {} vertices", tainted.len());
            self.spread_neg_cycle(g, &mut res, tainted);
        }
        Ok(res)
    }

    /// Mark everything reachable from the tainted set as `-∞`.
    fn spread_neg_cycle<G: IndexGraph>(&self, g: &G, res: &mut Sssp, mut queue: Vec<usize>) {
        while let Some(u) = queue.pop() {
            if res.distance(u) == f64::NEG_INFINITY {
                continue;
            }
            res.dist[u] = f64::NEG_INFINITY;
            for e in g.out_edges(u) {
                let v = g.edge_endpoint(e, u);
                if res.distance(v) != f64::NEG_INFINITY {
                    queue.push(v);
                }
            }
        }
    }
}

impl Default for BellmanFord {
    fn default() -> Self {
        Self::new()
    }
}

/// The directions an edge relaxes in: one arc when directed, both when
/// undirected.
fn arcs_of<G: IndexGraph>(g: &G, s: usize, t: usize) -> impl Iterator<Item = (usize, usize)> {
    let both = !g.is_directed() && s != t;
    std::iter::once((s, t)).chain(both.then_some((t, s)))
}
