use super::*;
use crate::graph::{IndexGraph, WeightFn, Weights};
use crate::Result;
use log::{debug, trace};
use std::collections::VecDeque;

/// How a push-relabel run picks the next active vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePolicy {
    /// First-in first-out queue of active vertices.
    Fifo,
    /// Always discharge an active vertex of maximum label.
    HighestFirst,
    /// Always discharge an active vertex of minimum label.
    LowestFirst,
    /// Relabel-to-front over a list of all vertices.
    MoveToFront,
}

/// Push–relabel maximum flow.
///
/// Maintains a preflow with `excess` and `label` per vertex under the
/// invariant `label[u] ≤ label[v] + 1` across every residual arc.
/// Pushes happen only on admissible arcs (`label[u] = label[v] + 1`);
/// a vertex with excess and no admissible arc is relabelled. All
/// policies run the global-relabel heuristic (an exact reverse BFS from
/// the sink every O(n) relabels) and the gap heuristic (labels above an
/// emptied level cannot reach the sink any more and jump past `n`).
pub struct PushRelabel {
    policy: ActivePolicy,
}

impl PushRelabel {
    pub fn fifo() -> Self {
        Self {
            policy: ActivePolicy::Fifo,
        }
    }

    pub fn highest_label() -> Self {
        Self {
            policy: ActivePolicy::HighestFirst,
        }
    }

    pub fn lowest_label() -> Self {
        Self {
            policy: ActivePolicy::LowestFirst,
        }
    }

    pub fn move_to_front() -> Self {
        Self {
            policy: ActivePolicy::MoveToFront,
        }
    }

    pub fn policy(&self) -> ActivePolicy {
        self.policy
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
        let mut engine = Engine::new(&mut net);
        engine.saturate_source();
        match self.policy {
            ActivePolicy::Fifo => engine.run_fifo(),
            ActivePolicy::HighestFirst => engine.run_by_label(true),
            ActivePolicy::LowestFirst => engine.run_by_label(false),
            ActivePolicy::MoveToFront => engine.run_move_to_front(),
        }
        debug!(
            "push-relabel ({:?}) used {} relabels",
            self.policy, engine.total_relabels
        );
        net.finish(flow)
    }
}

/// Shared state of one push-relabel run.
pub(super) struct Engine<'a, 'g, G: IndexGraph> {
    pub(super) net: &'a mut ResidualNetwork<'g, G>,
    pub(super) n: usize,
    pub(super) source: usize,
    pub(super) sink: usize,
    pub(super) label: Vec<usize>,
    pub(super) excess: Vec<f64>,
    pub(super) cur: Vec<usize>,
    label_count: Vec<usize>,
    pub(super) relabels_since_global: usize,
    pub(super) total_relabels: usize,
    /// Set when global relabel or the gap heuristic rewrote labels
    /// behind the policy's back.
    pub(super) labels_rewritten: bool,
}

impl<'a, 'g, G: IndexGraph> Engine<'a, 'g, G> {
    pub(super) fn new(net: &'a mut ResidualNetwork<'g, G>) -> Self {
        let n = net.g.vertex_count();
        let source = net.source;
        let sink = net.sink;
        let mut engine = Self {
            net,
            n,
            source,
            sink,
            label: vec![0; n],
            excess: vec![0.0; n],
            cur: vec![0; n],
            label_count: vec![0; 2 * n + 2],
            relabels_since_global: 0,
            total_relabels: 0,
            labels_rewritten: false,
        };
        engine.global_relabel();
        engine
    }

    pub(super) fn saturate_source(&mut self) {
        let arcs: Vec<usize> = self.net.out_arcs(self.source).to_vec();
        for a in arcs {
            let r = self.net.residual(a);
            if r > EPS {
                let to = self.net.arc_to(a);
                self.net.push(a, r);
                self.excess[to] += r;
                self.excess[self.source] -= r;
            }
        }
    }

    pub(super) fn is_inner(&self, v: usize) -> bool {
        v != self.source && v != self.sink
    }

    pub(super) fn active(&self, v: usize) -> bool {
        self.is_inner(v) && self.excess[v] > EPS
    }

    /// Push out of `v` until its excess is gone, relabelling on demand.
    /// `on_activate` hears about vertices that went from idle to active.
    fn discharge(&mut self, v: usize, mut on_activate: impl FnMut(&Self, usize)) {
        while self.excess[v] > EPS {
            if self.cur[v] == self.net.out_arcs(v).len() {
                self.relabel(v);
                self.cur[v] = 0;
                continue;
            }
            let a = self.net.out_arcs(v)[self.cur[v]];
            let to = self.net.arc_to(a);
            let r = self.net.residual(a);
            if r > EPS && self.label[v] == self.label[to] + 1 {
                let delta = r.min(self.excess[v]);
                trace!("push {} along arc {} ({} -> {})", delta, a, v, to);
                self.net.push(a, delta);
                self.excess[v] -= delta;
                let was_idle = self.excess[to] <= EPS;
                self.excess[to] += delta;
                if was_idle && self.is_inner(to) {
                    on_activate(self, to);
                }
            } else {
                self.cur[v] += 1;
            }
        }
    }

    pub(super) fn relabel(&mut self, v: usize) {
        debug_assert!(self.is_inner(v));
        let old = self.label[v];
        let mut least = None;
        for &a in self.net.out_arcs(v) {
            if self.net.residual(a) > EPS {
                let l = self.label[self.net.arc_to(a)];
                least = Some(least.map_or(l, |cur: usize| cur.min(l)));
            }
        }
        // excess always has a residual way back, so `least` exists
        let new = least.expect("active vertex with no residual arc") + 1;
        debug_assert!(new > old);
        self.label[v] = new;
        self.label_count[old] -= 1;
        self.label_count[new] += 1;
        self.total_relabels += 1;
        self.relabels_since_global += 1;
        if self.label_count[old] == 0 && old < self.n {
            self.close_gap(old);
        }
    }

    /// Nobody is left on level `gap`: everything strictly above it (but
    /// below `n`) can no longer reach the sink.
    fn close_gap(&mut self, gap: usize) {
        trace!("gap at label {}", gap);
        for v in 0..self.n {
            if v == self.source {
                continue;
            }
            let l = self.label[v];
            if l > gap && l <= self.n {
                self.label_count[l] -= 1;
                self.label[v] = self.n + 1;
                self.label_count[self.n + 1] += 1;
                self.cur[v] = 0;
            }
        }
        self.labels_rewritten = true;
    }

    /// Replace labels with exact residual distances to the sink.
    pub(super) fn global_relabel(&mut self) {
        trace!("global relabel");
        self.relabels_since_global = 0;
        let mut dist = vec![usize::MAX; self.n];
        dist[self.sink] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(self.sink);
        while let Some(w) = queue.pop_front() {
            for &a in self.net.out_arcs(w) {
                // the twin of an out-arc of w is an arc into w
                let twin = ResidualNetwork::<G>::twin(a);
                if self.net.residual(twin) <= EPS {
                    continue;
                }
                let u = self.net.arc_to(a);
                if u != self.source && dist[u] == usize::MAX {
                    dist[u] = dist[w] + 1;
                    queue.push_back(u);
                }
            }
        }
        for v in 0..self.n {
            let new = if v == self.source {
                self.n
            } else if dist[v] != usize::MAX {
                // labels stay monotone
                self.label[v].max(dist[v])
            } else {
                self.label[v].max(self.n + 1)
            };
            if new != self.label[v] {
                self.cur[v] = 0;
            }
            self.label[v] = new;
        }
        self.label_count.iter_mut().for_each(|c| *c = 0);
        for v in 0..self.n {
            self.label_count[self.label[v]] += 1;
        }
        self.labels_rewritten = true;
    }

    pub(super) fn maybe_global_relabel(&mut self) {
        if self.relabels_since_global >= self.n.max(1) {
            self.global_relabel();
        }
    }

    fn run_fifo(&mut self) {
        let mut queued = vec![false; self.n];
        let mut queue: VecDeque<usize> = VecDeque::new();
        for v in 0..self.n {
            if self.active(v) {
                queued[v] = true;
                queue.push_back(v);
            }
        }
        while let Some(v) = queue.pop_front() {
            queued[v] = false;
            if !self.active(v) {
                continue;
            }
            let mut woken = vec![];
            self.discharge(v, |_, u| woken.push(u));
            for u in woken {
                if !queued[u] {
                    queued[u] = true;
                    queue.push_back(u);
                }
            }
            self.maybe_global_relabel();
        }
    }

    fn run_by_label(&mut self, highest: bool) {
        let levels = 2 * self.n + 2;
        let mut buckets: Vec<Vec<usize>> = vec![vec![]; levels];
        for v in 0..self.n {
            if self.active(v) {
                buckets[self.label[v]].push(v);
            }
        }
        loop {
            if self.labels_rewritten {
                // bucket layout is stale, rebuild
                self.labels_rewritten = false;
                buckets.iter_mut().for_each(|b| b.clear());
                for v in 0..self.n {
                    if self.active(v) {
                        buckets[self.label[v]].push(v);
                    }
                }
            }
            let range: Box<dyn Iterator<Item = usize>> = if highest {
                Box::new((0..levels).rev())
            } else {
                Box::new(0..levels)
            };
            let mut picked = None;
            'scan: for l in range {
                while let Some(v) = buckets[l].pop() {
                    if !self.active(v) {
                        continue;
                    }
                    if self.label[v] != l {
                        let l2 = self.label[v];
                        buckets[l2].push(v);
                        continue;
                    }
                    picked = Some(v);
                    break 'scan;
                }
            }
            let Some(v) = picked else { break };
            let mut woken = vec![];
            self.discharge(v, |engine, u| woken.push((u, engine.label[u])));
            for (u, l) in woken {
                buckets[l.min(levels - 1)].push(u);
            }
            self.maybe_global_relabel();
        }
    }

    fn run_move_to_front(&mut self) {
        let mut list: Vec<usize> = (0..self.n).filter(|&v| self.is_inner(v)).collect();
        let mut i = 0;
        while i < list.len() {
            let v = list[i];
            let old_label = self.label[v];
            self.labels_rewritten = false;
            if self.active(v) {
                self.discharge(v, |_, _| {});
                self.maybe_global_relabel();
            }
            if self.labels_rewritten {
                // heuristics rewrote labels wholesale, rescan
                self.labels_rewritten = false;
                i = 0;
            } else if self.label[v] != old_label {
                list.remove(i);
                list.insert(0, v);
                i = 1;
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::flow::EdmondsKarp;
    use quickcheck_macros::quickcheck;

    fn all_policies() -> Vec<PushRelabel> {
        vec![
            PushRelabel::fifo(),
            PushRelabel::highest_label(),
            PushRelabel::lowest_label(),
            PushRelabel::move_to_front(),
        ]
    }

    #[test]
    fn diamond_flow_is_five_for_every_policy() {
        for pr in all_policies() {
            let (g, cap, mut flow) = diamond();
            let value = pr.compute(&g, &cap, &mut flow, 0, 3).unwrap();
            assert_eq!(value, 5.0, "policy {:?}", pr.policy());
            check_flow_valid(&g, &cap, &flow, 0, 3, value);
        }
    }

    #[quickcheck]
    fn all_policies_agree_with_edmonds_karp(s: SmallFlowNetwork) {
        let (g, cap, mut flow_ek) = s.build();
        let sink = g.vertex_count() - 1;
        let value_ek = EdmondsKarp::new()
            .compute(&g, &cap, &mut flow_ek, 0, sink)
            .unwrap();
        for pr in all_policies() {
            let mut flow = crate::graph::Weights::with_size(g.edge_count(), 0.0);
            let value = pr.compute(&g, &cap, &mut flow, 0, sink).unwrap();
            assert!(
                (value - value_ek).abs() < 1e-6,
                "policy {:?}: {} vs {}",
                pr.policy(),
                value,
                value_ek
            );
            check_flow_valid(&g, &cap, &flow, 0, sink, value);
        }
    }
}
