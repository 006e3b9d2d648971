use super::*;
use crate::graph::{IndexGraph, WeightFn, Weights};
use crate::Result;
use std::collections::VecDeque;

/// Edmonds–Karp: repeatedly augment along a shortest (fewest-arcs) path
/// found by BFS in the residual network. O(m² n).
pub struct EdmondsKarp;

impl EdmondsKarp {
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
        let mut back_arc: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::new();

        loop {
            back_arc.iter_mut().for_each(|b| *b = None);
            queue.clear();
            queue.push_back(source);
            let mut reached = false;
            'bfs: while let Some(u) = queue.pop_front() {
                for &a in net.out_arcs(u) {
                    if net.residual(a) <= EPS {
                        continue;
                    }
                    let v = net.arc_to(a);
                    if v == source || back_arc[v].is_some() {
                        continue;
                    }
                    back_arc[v] = Some(a);
                    if v == sink {
                        reached = true;
                        break 'bfs;
                    }
                    queue.push_back(v);
                }
            }
            if !reached {
                break;
            }
            // bottleneck, then augment
            let mut bottleneck = f64::INFINITY;
            let mut v = sink;
            while v != source {
                let a = back_arc[v].unwrap();
                bottleneck = bottleneck.min(net.residual(a));
                v = net.arc_from(a);
            }
            let mut v = sink;
            while v != source {
                let a = back_arc[v].unwrap();
                net.push(a, bottleneck);
                v = net.arc_from(a);
            }
        }
        net.finish(flow)
    }
}

impl Default for EdmondsKarp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use crate::graph::GraphBuilder;
    use quickcheck_macros::quickcheck;

    #[test]
    fn diamond_flow_is_five() {
        let (g, cap, mut flow) = diamond();
        let value = EdmondsKarp::new().compute(&g, &cap, &mut flow, 0, 3).unwrap();
        assert_eq!(value, 5.0);
        check_flow_valid(&g, &cap, &flow, 0, 3, value);
    }

    #[test]
    fn source_equals_sink_is_rejected() {
        let (g, cap, mut flow) = diamond();
        assert!(matches!(
            EdmondsKarp::new().compute(&g, &cap, &mut flow, 1, 1),
            Err(crate::GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let mut b = GraphBuilder::directed();
        b.add_vertices(2);
        b.add_edge(0, 1).unwrap();
        let g = b.build_array();
        let mut flow = Weights::with_size(1, 0.0);
        assert!(matches!(
            EdmondsKarp::new().compute(&g, &|_e: usize| -2.0, &mut flow, 0, 1),
            Err(crate::GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn undirected_edges_share_capacity() {
        let mut b = GraphBuilder::undirected();
        b.add_vertices(3);
        b.add_edge(0, 1).unwrap();
        b.add_edge(2, 1).unwrap(); // oriented against the flow direction
        let g = b.build_array();
        let mut flow = Weights::with_size(2, 0.0);
        let value = EdmondsKarp::new()
            .compute(&g, &|_e: usize| 4.0, &mut flow, 0, 2)
            .unwrap();
        assert_eq!(value, 4.0);
        // the second edge carries the flow against its orientation
        assert_eq!(*flow.get(1), -4.0);
        check_flow_valid(&g, &|_e: usize| 4.0, &flow, 0, 2, value);
    }

    #[quickcheck]
    fn flow_is_always_valid(s: SmallFlowNetwork) {
        let (g, cap, mut flow) = s.build();
        let value = EdmondsKarp::new()
            .compute(&g, &cap, &mut flow, 0, g.vertex_count() - 1)
            .unwrap();
        check_flow_valid(&g, &cap, &flow, 0, g.vertex_count() - 1, value);
        check_min_cut(&g, &cap, &flow, 0, value);
    }
}
