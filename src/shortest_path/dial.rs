use super::*;
use crate::graph::{IndexGraph, WeightFnInt};
use crate::{GraphError, Result};

/// Dial's bucket-queue variant of Dijkstra for non-negative integer
/// weights.
///
/// Tentative distances live in a modular ring of `max_weight + 1`
/// buckets; the scan pointer only ever moves forward, so the whole run
/// costs O(m + D) where D is the largest distance. Rejects negative
/// weights with `InvalidArgument`.
pub struct Dial;

impl Dial {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFnInt>(
        &self,
        g: &G,
        w: &W,
        source: usize,
    ) -> Result<SsspInt> {
        g.check_vertex(source)?;
        let mut max_weight = 0i64;
        for e in 0..g.edge_count() {
            let we = w.weight_int(e);
            if we < 0 {
                return Err(GraphError::InvalidArgument(format!(
                    "negative weight {} on edge {}",
                    we, e
                )));
            }
            max_weight = max_weight.max(we);
        }

        let n = g.vertex_count();
        let ring = max_weight as usize + 1;
        let mut res = SsspInt::new(n, source);
        let mut buckets: Vec<Vec<usize>> = vec![vec![]; ring];
        let mut settled = vec![false; n];
        buckets[0].push(source);
        // vertices discovered but not yet settled
        let mut remaining = 1usize;
        let mut d = 0i64;

        while remaining > 0 {
            let idx = (d % ring as i64) as usize;
            while let Some(u) = buckets[idx].pop() {
                if settled[u] || res.distance(u) != d {
                    continue; // superseded entry
                }
                settled[u] = true;
                remaining -= 1;
                for e in g.out_edges(u) {
                    let v = g.edge_endpoint(e, u);
                    if settled[v] {
                        continue;
                    }
                    let nd = d + w.weight_int(e);
                    if nd < res.distance(v) {
                        if res.distance(v) == i64::UNREACHABLE {
                            remaining += 1;
                        }
                        res.set(v, nd, e, u);
                        buckets[(nd % ring as i64) as usize].push(v);
                    }
                }
            }
            d += 1;
        }
        Ok(res)
    }
}

impl Default for Dial {
    fn default() -> Self {
        Self::new()
    }
}
