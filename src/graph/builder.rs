use super::*;
use crate::Result;

/// Accumulates vertices, edges, and weight columns, then builds a frozen
/// graph on either back-end.
///
/// ```
/// use graphalgo::graph::{GraphBuilder, IndexGraph};
///
/// let mut b = GraphBuilder::directed();
/// let u = b.add_vertex();
/// let v = b.add_vertex();
/// b.add_edge(u, v).unwrap();
/// b.add_edges_weights::<f64>("w", 1.0).unwrap();
/// let g = b.build_array();
/// assert_eq!(g.vertex_count(), 2);
/// assert!(g.is_directed());
/// ```
pub struct GraphBuilder {
    directed: bool,
    n: usize,
    edges: Vec<(usize, usize)>,
    vweights: WeightsRegistry,
    eweights: WeightsRegistry,
}

impl GraphBuilder {
    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    fn new(directed: bool) -> Self {
        Self {
            directed,
            n: 0,
            edges: vec![],
            vweights: WeightsRegistry::new(),
            eweights: WeightsRegistry::new(),
        }
    }

    pub fn add_vertex(&mut self) -> usize {
        let v = self.n;
        self.n += 1;
        self.vweights.grow_one();
        v
    }

    pub fn add_vertices(&mut self, count: usize) -> std::ops::Range<usize> {
        let start = self.n;
        for _ in 0..count {
            self.add_vertex();
        }
        start..self.n
    }

    pub fn add_edge(&mut self, source: usize, sink: usize) -> Result<usize> {
        if source >= self.n {
            return Err(crate::GraphError::NoSuchVertex(source));
        }
        if sink >= self.n {
            return Err(crate::GraphError::NoSuchVertex(sink));
        }
        let e = self.edges.len();
        self.edges.push((source, sink));
        self.eweights.grow_one();
        Ok(e)
    }

    pub fn add_vertices_weights<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()> {
        self.vweights.add(key, default)
    }

    pub fn add_edges_weights<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()> {
        self.eweights.add(key, default)
    }

    pub fn vertices_weights_mut(&mut self) -> &mut WeightsRegistry {
        &mut self.vweights
    }

    pub fn edges_weights_mut(&mut self) -> &mut WeightsRegistry {
        &mut self.eweights
    }

    /// Build a frozen [`ArrayGraph`].
    pub fn build_array(self) -> ArrayGraph {
        let mut g = ArrayGraph::new(self.directed);
        Self::replay_topology(&mut g, self.n, &self.edges);
        *g.vertices_weights_mut() = self.vweights;
        *g.edges_weights_mut() = self.eweights;
        g.freeze();
        g
    }

    /// Build a frozen [`LinkedGraph`].
    pub fn build_linked(self) -> LinkedGraph {
        let mut g = LinkedGraph::new(self.directed);
        Self::replay_topology(&mut g, self.n, &self.edges);
        *g.vertices_weights_mut() = self.vweights;
        *g.edges_weights_mut() = self.eweights;
        g.freeze();
        g
    }

    fn replay_topology<G: MutableGraph>(g: &mut G, n: usize, edges: &[(usize, usize)]) {
        for _ in 0..n {
            g.add_vertex().unwrap();
        }
        for &(u, v) in edges {
            g.add_edge(u, v).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_graph_is_frozen_with_columns() {
        let mut b = GraphBuilder::undirected();
        let vs = b.add_vertices(3);
        assert_eq!(vs, 0..3);
        b.add_edge(0, 1).unwrap();
        b.add_edge(1, 2).unwrap();
        b.add_edges_weights::<f64>("w", 0.5).unwrap();
        b.edges_weights_mut().get_mut::<f64>("w").unwrap().set(1, 2.5);

        let g = b.build_array();
        assert!(g.is_frozen());
        assert_eq!(g.edge_count(), 2);
        let w = g.edges_weights().get::<f64>("w").unwrap();
        assert_eq!(*w.get(0), 0.5);
        assert_eq!(*w.get(1), 2.5);
    }

    #[test]
    fn builder_rejects_unknown_vertex() {
        let mut b = GraphBuilder::directed();
        b.add_vertex();
        assert!(b.add_edge(0, 7).is_err());
    }
}
