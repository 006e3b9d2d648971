//! Maximum flow.
//!
//! Every algorithm drives the same [`ResidualNetwork`]: per graph edge
//! `e` there is a forward arc `2e` and its conjugate twin `2e + 1` at a
//! fixed offset, so residual capacities derive from one signed flow
//! value per edge. Undirected edges share their capacity between the
//! two directions, with the sign of the flow telling the orientation.
//!
//! `compute` takes the capacity function and a caller-supplied flow
//! column, fills the column, and returns the total flow value. All
//! algorithms return identical values on the same input; they differ in
//! how they find augmenting structure.

mod dinic;
pub use self::dinic::*;
mod dinic_dynamic_tree;
pub use self::dinic_dynamic_tree::*;
mod edmonds_karp;
pub use self::edmonds_karp::*;
mod push_relabel;
pub use self::push_relabel::*;
mod push_relabel_dynamic_tree;
pub use self::push_relabel_dynamic_tree::*;

use crate::graph::{IndexGraph, WeightFn, Weights};
use crate::{GraphError, Result};

/// Residuals below this are treated as saturated.
pub(crate) const EPS: f64 = 1e-9;

/// Flow state over the twin-arc view of a graph.
///
/// Arc `2e` runs source→target of edge `e`, arc `2e + 1` the other way.
pub(crate) struct ResidualNetwork<'a, G: IndexGraph> {
    pub g: &'a G,
    pub source: usize,
    pub sink: usize,
    capacity: Vec<f64>,
    flow: Vec<f64>,
    // arcs leaving each vertex, self-loops dropped
    out_arcs: Vec<Vec<usize>>,
}

impl<'a, G: IndexGraph> ResidualNetwork<'a, G> {
    pub fn new<W: WeightFn>(g: &'a G, capacity: &W, source: usize, sink: usize) -> Result<Self> {
        g.check_vertex(source)?;
        g.check_vertex(sink)?;
        if source == sink {
            return Err(GraphError::InvalidArgument(
                "source and sink must differ".to_string(),
            ));
        }
        let m = g.edge_count();
        let mut caps = Vec::with_capacity(m);
        for e in 0..m {
            let c = capacity.weight(e);
            if !(c >= 0.0) {
                return Err(GraphError::InvalidArgument(format!(
                    "negative capacity {} on edge {}",
                    c, e
                )));
            }
            caps.push(c);
        }
        let mut out_arcs = vec![vec![]; g.vertex_count()];
        for e in 0..m {
            let (u, v) = (g.edge_source(e), g.edge_target(e));
            if u == v {
                continue;
            }
            out_arcs[u].push(2 * e);
            out_arcs[v].push(2 * e + 1);
        }
        Ok(Self {
            g,
            source,
            sink,
            capacity: caps,
            flow: vec![0.0; m],
            out_arcs,
        })
    }

    pub fn arc_count(&self) -> usize {
        2 * self.capacity.len()
    }

    pub fn twin(arc: usize) -> usize {
        arc ^ 1
    }

    pub fn edge_of(arc: usize) -> usize {
        arc >> 1
    }

    pub fn is_forward(arc: usize) -> bool {
        arc & 1 == 0
    }

    pub fn arc_from(&self, arc: usize) -> usize {
        let e = Self::edge_of(arc);
        if Self::is_forward(arc) {
            self.g.edge_source(e)
        } else {
            self.g.edge_target(e)
        }
    }

    pub fn arc_to(&self, arc: usize) -> usize {
        let e = Self::edge_of(arc);
        if Self::is_forward(arc) {
            self.g.edge_target(e)
        } else {
            self.g.edge_source(e)
        }
    }

    pub fn out_arcs(&self, v: usize) -> &[usize] {
        &self.out_arcs[v]
    }

    /// Residual capacity of an arc.
    pub fn residual(&self, arc: usize) -> f64 {
        let e = Self::edge_of(arc);
        if Self::is_forward(arc) {
            self.capacity[e] - self.flow[e]
        } else if self.g.is_directed() {
            self.flow[e]
        } else {
            self.capacity[e] + self.flow[e]
        }
    }

    /// Push `delta` units along an arc.
    pub fn push(&mut self, arc: usize, delta: f64) {
        debug_assert!(delta >= 0.0);
        debug_assert!(delta <= self.residual(arc) + EPS);
        let e = Self::edge_of(arc);
        if Self::is_forward(arc) {
            self.flow[e] += delta;
        } else {
            self.flow[e] -= delta;
        }
    }

    /// Write the flow column and return the net flow out of the source.
    pub fn finish(self, flow_out: &mut Weights<f64>) -> Result<f64> {
        if flow_out.len() != self.capacity.len() {
            return Err(GraphError::InvalidArgument(format!(
                "flow column has {} slots, graph has {} edges",
                flow_out.len(),
                self.capacity.len()
            )));
        }
        for (e, &f) in self.flow.iter().enumerate() {
            flow_out.set(e, f);
        }
        let mut total = 0.0;
        for e in 0..self.capacity.len() {
            let (u, v) = (self.g.edge_source(e), self.g.edge_target(e));
            if u == self.source {
                total += self.flow[e];
            }
            if v == self.source {
                total -= self.flow[e];
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::graph::{GraphBuilder, IndexGraph, WeightFn, Weights};
    use quickcheck::{Arbitrary, Gen};

    /// Random small flow instance over a digraph.
    #[derive(Clone, Debug)]
    pub(crate) struct SmallFlowNetwork {
        pub n: usize,
        pub edges: Vec<(usize, usize, u16)>,
    }

    impl Arbitrary for SmallFlowNetwork {
        fn arbitrary(g: &mut Gen) -> Self {
            let n = usize::arbitrary(g) % 8 + 2;
            let m = usize::arbitrary(g) % 24;
            let edges = (0..m)
                .map(|_| {
                    (
                        usize::arbitrary(g) % n,
                        usize::arbitrary(g) % n,
                        u16::arbitrary(g) % 20,
                    )
                })
                .collect();
            Self { n, edges }
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let n = self.n;
            let edges = self.edges.clone();
            Box::new((0..self.edges.len()).rev().map(move |l| Self {
                n,
                edges: edges[..l].to_vec(),
            }))
        }
    }

    impl SmallFlowNetwork {
        pub(crate) fn build(&self) -> (crate::graph::ArrayGraph, Weights<f64>, Weights<f64>) {
            let mut b = GraphBuilder::directed();
            b.add_vertices(self.n);
            b.add_edges_weights::<f64>("capacity", 0.0).unwrap();
            for &(u, v, _) in self.edges.iter() {
                b.add_edge(u, v).unwrap();
            }
            for (e, &(_, _, c)) in self.edges.iter().enumerate() {
                b.edges_weights_mut()
                    .get_mut::<f64>("capacity")
                    .unwrap()
                    .set(e, c as f64);
            }
            let g = b.build_array();
            let cap = g.edges_weights().get::<f64>("capacity").unwrap().clone();
            let flow = Weights::with_size(g.edge_count(), 0.0);
            (g, cap, flow)
        }
    }

    /// Conservation at every inner vertex, capacity bounds everywhere.
    pub(crate) fn check_flow_valid<G: IndexGraph, W: WeightFn>(
        g: &G,
        cap: &W,
        flow: &Weights<f64>,
        source: usize,
        sink: usize,
        value: f64,
    ) {
        let n = g.vertex_count();
        let mut net = vec![0.0f64; n];
        for e in 0..g.edge_count() {
            let f = *flow.get(e);
            if g.is_directed() {
                assert!(f >= -1e-6, "negative flow on directed edge {}", e);
            }
            assert!(
                f.abs() <= cap.weight(e) + 1e-6,
                "flow {} exceeds capacity {} on edge {}",
                f,
                cap.weight(e),
                e
            );
            net[g.edge_source(e)] += f;
            net[g.edge_target(e)] -= f;
        }
        for v in 0..n {
            if v == source || v == sink {
                continue;
            }
            assert!(net[v].abs() < 1e-6, "conservation violated at {}", v);
        }
        assert!((net[source] - value).abs() < 1e-6);
        assert!((net[sink] + value).abs() < 1e-6);
    }

    /// On a directed instance, the capacity of the cut left behind by
    /// the residual reachability of the source must equal the flow
    /// value.
    pub(crate) fn check_min_cut<G: IndexGraph, W: WeightFn>(
        g: &G,
        cap: &W,
        flow: &Weights<f64>,
        source: usize,
        value: f64,
    ) {
        assert!(g.is_directed());
        let n = g.vertex_count();
        let mut reach = vec![false; n];
        reach[source] = true;
        let mut stack = vec![source];
        while let Some(u) = stack.pop() {
            for e in g.out_edges(u) {
                let v = g.edge_target(e);
                if !reach[v] && cap.weight(e) - *flow.get(e) > 1e-9 {
                    reach[v] = true;
                    stack.push(v);
                }
            }
            for e in g.in_edges(u) {
                let v = g.edge_source(e);
                if !reach[v] && *flow.get(e) > 1e-9 {
                    reach[v] = true;
                    stack.push(v);
                }
            }
        }
        let mut cut = 0.0;
        for e in 0..g.edge_count() {
            if reach[g.edge_source(e)] && !reach[g.edge_target(e)] {
                cut += cap.weight(e);
            }
        }
        assert!(
            (cut - value).abs() < 1e-6,
            "min cut {} differs from flow value {}",
            cut,
            value
        );
    }

    /// The textbook 4-vertex diamond; its max flow is 5.
    pub(crate) fn diamond() -> (crate::graph::ArrayGraph, Weights<f64>, Weights<f64>) {
        SmallFlowNetwork {
            n: 4,
            edges: vec![(0, 1, 3), (0, 2, 2), (1, 2, 1), (1, 3, 2), (2, 3, 3)],
        }
        .build()
    }
}
