use super::*;
use crate::dynamic_tree::LinkCutTree;
use crate::graph::{IndexGraph, WeightFn, Weights};
use crate::Result;
use log::debug;

/// Dinic with link-cut trees.
///
/// Inside each phase the current DFS forest of admissible arcs lives in
/// a dynamic tree whose edge weights are the arcs' remaining residuals.
/// Reaching the sink augments a whole root path through one path-min
/// and one path-add instead of walking it, which brings a phase down to
/// O(m log n) and the whole run to O(m n log n).
pub struct DinicDynamicTree;

struct Phase<'r, 'a, G: IndexGraph> {
    net: &'r mut ResidualNetwork<'a, G>,
    lct: LinkCutTree,
    parent_arc: Vec<Option<usize>>,
    // residual the arc had when it was linked; the difference to the
    // current tree weight is flow that still has to land on the arc
    linked_residual: Vec<f64>,
    children: Vec<Vec<usize>>,
    cursor: Vec<usize>,
}

impl DinicDynamicTree {
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
        let mut phases = 0;
        while bfs_levels(&net, &mut level) {
            phases += 1;
            let mut phase = Phase {
                net: &mut net,
                lct: LinkCutTree::new(n),
                parent_arc: vec![None; n],
                linked_residual: vec![0.0; n],
                children: vec![vec![]; n],
                cursor: vec![0; n],
            };
            phase.run(source, sink, &mut level)?;
        }
        debug!("dinic/lct finished after {} phases", phases);
        net.finish(flow)
    }
}

impl Default for DinicDynamicTree {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r, 'a, G: IndexGraph> Phase<'r, 'a, G> {
    fn run(&mut self, source: usize, sink: usize, level: &mut [usize]) -> Result<()> {
        loop {
            let v = self.lct.find_root(source);
            if v == sink {
                self.augment(source)?;
                continue;
            }
            match self.advance_arc(v, level) {
                Some(a) => {
                    let to = self.net.arc_to(a);
                    let r = self.net.residual(a);
                    self.linked_residual[v] = r;
                    self.parent_arc[v] = Some(a);
                    self.children[to].push(v);
                    self.lct.link(v, to, r)?;
                }
                None => {
                    if v == source {
                        break;
                    }
                    // retreat: v is exhausted for this phase
                    level[v] = usize::MAX;
                    let orphans = std::mem::take(&mut self.children[v]);
                    for c in orphans {
                        if self.parent_arc[c].is_some() {
                            self.materialize_cut(c)?;
                        }
                    }
                }
            }
        }
        // flush the flow still recorded only as tree weights
        for v in 0..self.parent_arc.len() {
            if self.parent_arc[v].is_some() {
                self.materialize_cut(v)?;
            }
        }
        Ok(())
    }

    /// Push the bottleneck along source→sink, then cut what saturated.
    fn augment(&mut self, source: usize) -> Result<()> {
        let pm = self
            .lct
            .find_path_min(source)
            .expect("sink-rooted path without edges");
        debug_assert!(pm.weight > EPS);
        self.lct.add_path_weight(source, -pm.weight);
        while let Some(pm) = self.lct.find_path_min(source) {
            if pm.weight > EPS {
                break;
            }
            self.materialize_cut(pm.child)?;
        }
        Ok(())
    }

    /// Next admissible arc out of `v` in the layered graph.
    fn advance_arc(&mut self, v: usize, level: &[usize]) -> Option<usize> {
        let arcs = self.net.out_arcs(v);
        while self.cursor[v] < arcs.len() {
            let a = arcs[self.cursor[v]];
            let to = self.net.arc_to(a);
            if self.net.residual(a) > EPS
                && level[v] != usize::MAX
                && level[to] != usize::MAX
                && level[to] == level[v] + 1
            {
                return Some(a);
            }
            self.cursor[v] += 1;
        }
        None
    }

    /// Take `v`'s tree edge out of the forest, writing the flow it
    /// accumulated back into the residual network.
    fn materialize_cut(&mut self, v: usize) -> Result<()> {
        let a = self.parent_arc[v].take().expect("no tree edge to cut");
        let left = self
            .lct
            .parent_edge_weight(v)
            .expect("tree edge without weight");
        let pushed = self.linked_residual[v] - left;
        if pushed > 0.0 {
            self.net.push(a, pushed);
        }
        self.lct.cut(v)?;
        let parent = self.net.arc_to(a);
        if let Some(pos) = self.children[parent].iter().position(|&c| c == v) {
            self.children[parent].swap_remove(pos);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::flow::Dinic;
    use quickcheck_macros::quickcheck;

    #[test]
    fn diamond_flow_is_five() {
        let (g, cap, mut flow) = diamond();
        let value = DinicDynamicTree::new()
            .compute(&g, &cap, &mut flow, 0, 3)
            .unwrap();
        assert_eq!(value, 5.0);
        check_flow_valid(&g, &cap, &flow, 0, 3, value);
    }

    #[quickcheck]
    fn agrees_with_plain_dinic(s: SmallFlowNetwork) {
        let (g, cap, mut flow) = s.build();
        let sink = g.vertex_count() - 1;
        let value = DinicDynamicTree::new()
            .compute(&g, &cap, &mut flow, 0, sink)
            .unwrap();
        check_flow_valid(&g, &cap, &flow, 0, sink, value);

        let mut flow_plain = crate::graph::Weights::with_size(g.edge_count(), 0.0);
        let value_plain = Dinic::new()
            .compute(&g, &cap, &mut flow_plain, 0, sink)
            .unwrap();
        assert!((value - value_plain).abs() < 1e-6);
    }
}
