use super::*;
use crate::graph::{IndexGraph, WeightFn, Weights};
use crate::Result;
use log::debug;
use std::collections::VecDeque;

/// Dinic's algorithm: phases of BFS layering followed by a DFS blocking
/// flow inside the layered graph. O(m n²).
pub struct Dinic;

impl Dinic {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<G: IndexGraph, W: WeightFn>(
        &self,
        g: &G,
        capacity: &W,
        flow: &mut Weights<f64>,
        source: usize,
        sink: usize,
    ) -> Result<f64> {
        let mut net = ResidualNetwork::new(g, capacity, source, sink)?;
        let n = g.vertex_count();
        let mut level = vec![usize::MAX; n];
        let mut cursor = vec![0usize; n];
        let mut phases = 0;

        while bfs_levels(&net, &mut level) {
            phases += 1;
            cursor.iter_mut().for_each(|c| *c = 0);
            // grow source→sink paths one arc at a time, retreating on
            // dead ends; together the augmentations form a blocking flow
            let mut path: Vec<usize> = vec![];
            let mut v = source;
            loop {
                if v == sink {
                    let bottleneck = path
                        .iter()
                        .map(|&a| net.residual(a))
                        .fold(f64::INFINITY, f64::min);
                    for &a in path.iter() {
                        net.push(a, bottleneck);
                    }
                    // back up to the first saturated arc
                    let mut cut_at = 0;
                    for (i, &a) in path.iter().enumerate() {
                        if net.residual(a) <= EPS {
                            cut_at = i;
                            break;
                        }
                    }
                    path.truncate(cut_at);
                    v = match path.last() {
                        Some(&a) => net.arc_to(a),
                        None => source,
                    };
                    continue;
                }
                match self.advance(&net, &mut cursor, &level, v) {
                    Some(a) => {
                        path.push(a);
                        v = net.arc_to(a);
                    }
                    None => {
                        // dead end: the vertex leaves this phase
                        level[v] = usize::MAX;
                        match path.pop() {
                            Some(a) => v = net.arc_from(a),
                            None => break, // source exhausted, phase over
                        }
                    }
                }
            }
        }
        debug!("dinic finished after {} phases", phases);
        net.finish(flow)
    }

    /// Next admissible arc out of `v` in the layered graph.
    fn advance<G: IndexGraph>(
        &self,
        net: &ResidualNetwork<'_, G>,
        cursor: &mut [usize],
        level: &[usize],
        v: usize,
    ) -> Option<usize> {
        let arcs = net.out_arcs(v);
        while cursor[v] < arcs.len() {
            let a = arcs[cursor[v]];
            let to = net.arc_to(a);
            if net.residual(a) > EPS && level[to] != usize::MAX && level[to] == level[v] + 1 {
                return Some(a);
            }
            cursor[v] += 1;
        }
        None
    }
}

impl Default for Dinic {
    fn default() -> Self {
        Self::new()
    }
}

/// Residual BFS from the source; true when the sink is still reachable.
pub(crate) fn bfs_levels<G: IndexGraph>(net: &ResidualNetwork<'_, G>, level: &mut [usize]) -> bool {
    level.iter_mut().for_each(|l| *l = usize::MAX);
    level[net.source] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(net.source);
    while let Some(u) = queue.pop_front() {
        for &a in net.out_arcs(u) {
            if net.residual(a) <= EPS {
                continue;
            }
            let v = net.arc_to(a);
            if level[v] == usize::MAX {
                level[v] = level[u] + 1;
                queue.push_back(v);
            }
        }
    }
    level[net.sink] != usize::MAX
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::flow::EdmondsKarp;
    use quickcheck_macros::quickcheck;

    #[test]
    fn diamond_flow_is_five() {
        let (g, cap, mut flow) = diamond();
        let value = Dinic::new().compute(&g, &cap, &mut flow, 0, 3).unwrap();
        assert_eq!(value, 5.0);
        check_flow_valid(&g, &cap, &flow, 0, 3, value);
    }

    #[quickcheck]
    fn agrees_with_edmonds_karp(s: SmallFlowNetwork) {
        let (g, cap, mut flow) = s.build();
        let sink = g.vertex_count() - 1;
        let value = Dinic::new().compute(&g, &cap, &mut flow, 0, sink).unwrap();
        check_flow_valid(&g, &cap, &flow, 0, sink, value);

        let mut flow_ek = crate::graph::Weights::with_size(g.edge_count(), 0.0);
        let value_ek = EdmondsKarp::new()
            .compute(&g, &cap, &mut flow_ek, 0, sink)
            .unwrap();
        assert!((value - value_ek).abs() < 1e-6);
    }
}
