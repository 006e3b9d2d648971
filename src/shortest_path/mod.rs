//! Single-source shortest paths.
//!
//! Every algorithm here is a pure function of (graph, weight function,
//! source) producing an [`SsspResult`]: distances, one back edge per
//! vertex, and path reconstruction by walking the back edges. The real
//! track runs on [`crate::graph::WeightFn`]; Dial runs on the integer
//! track [`crate::graph::WeightFnInt`].
//!
//! Unreachable vertices answer the `UNREACHABLE` sentinel of their
//! scalar (`+∞` for `f64`); vertices pulled down by a negative cycle
//! answer `NEG_CYCLE` (`-∞`). Paths to either kind are `None`.

mod bellman_ford;
pub use self::bellman_ford::*;
mod dag;
pub use self::dag::*;
mod dial;
pub use self::dial::*;
mod dijkstra;
pub use self::dijkstra::*;

/// Distance scalar of a shortest-path result; implemented for the real
/// and the integer track.
pub trait DistanceScalar: Copy + PartialEq + PartialOrd {
    const ZERO: Self;
    const UNREACHABLE: Self;
    const NEG_CYCLE: Self;

    fn reachable(self) -> bool;
}

impl DistanceScalar for f64 {
    const ZERO: Self = 0.0;
    const UNREACHABLE: Self = f64::INFINITY;
    const NEG_CYCLE: Self = f64::NEG_INFINITY;

    fn reachable(self) -> bool {
        self.is_finite()
    }
}

impl DistanceScalar for i64 {
    const ZERO: Self = 0;
    const UNREACHABLE: Self = i64::MAX;
    const NEG_CYCLE: Self = i64::MIN;

    fn reachable(self) -> bool {
        self != Self::UNREACHABLE && self != Self::NEG_CYCLE
    }
}

/// Distances and back edges from one source.
#[derive(Debug, Clone)]
pub struct SsspResult<D: DistanceScalar> {
    source: usize,
    dist: Vec<D>,
    back_edge: Vec<Option<usize>>,
    pred: Vec<usize>,
}

/// Real-valued shortest-path result.
pub type Sssp = SsspResult<f64>;
/// Integer shortest-path result, as produced by [`Dial`].
pub type SsspInt = SsspResult<i64>;

impl<D: DistanceScalar> SsspResult<D> {
    pub(crate) fn new(n: usize, source: usize) -> Self {
        let mut res = Self {
            source,
            dist: vec![D::UNREACHABLE; n],
            back_edge: vec![None; n],
            pred: vec![usize::MAX; n],
        };
        res.dist[source] = D::ZERO;
        res
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Distance from the source to `v`.
    pub fn distance(&self, v: usize) -> D {
        self.dist[v]
    }

    /// The edge the shortest path enters `v` through, if any.
    pub fn back_edge(&self, v: usize) -> Option<usize> {
        self.back_edge[v]
    }

    /// The edges of a shortest path source→`v`, or `None` when `v` is
    /// unreachable or dragged down by a negative cycle.
    pub fn path_to(&self, v: usize) -> Option<Vec<usize>> {
        if !self.dist[v].reachable() {
            return None;
        }
        let mut edges = vec![];
        let mut cur = v;
        while cur != self.source {
            let e = self.back_edge[cur].expect("reachable vertex without back edge");
            edges.push(e);
            cur = self.pred[cur];
        }
        edges.reverse();
        Some(edges)
    }

    pub(crate) fn set(&mut self, v: usize, dist: D, back_edge: usize, pred: usize) {
        self.dist[v] = dist;
        self.back_edge[v] = Some(back_edge);
        self.pred[v] = pred;
    }
}
