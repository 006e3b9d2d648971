use super::*;
use crate::{GraphError, Result};
use bimap::BiHashMap;
use std::hash::Hash;

/// Names vertices and edges of an index graph by arbitrary hashable ids.
///
/// This wraps an [`ArrayGraph`] and two bijections id↔index. Algorithms
/// never see ids; callers translate on the boundary with
/// [`MappedGraph::vertex_index`] / [`MappedGraph::vertex_id`] and the
/// edge counterparts. The wrapper keeps the bijections aligned with the
/// swap-with-last compaction of the underlying graph.
pub struct MappedGraph<VId, EId = VId>
where
    VId: Hash + Eq + Clone,
    EId: Hash + Eq + Clone,
{
    graph: ArrayGraph,
    vmap: BiHashMap<VId, usize>,
    emap: BiHashMap<EId, usize>,
}

impl<VId, EId> MappedGraph<VId, EId>
where
    VId: Hash + Eq + Clone,
    EId: Hash + Eq + Clone,
{
    pub fn new_directed() -> Self {
        Self::new(true)
    }

    pub fn new_undirected() -> Self {
        Self::new(false)
    }

    fn new(directed: bool) -> Self {
        Self {
            graph: ArrayGraph::new(directed),
            vmap: BiHashMap::new(),
            emap: BiHashMap::new(),
        }
    }

    /// The wrapped index graph; hand this to the algorithms.
    pub fn graph(&self) -> &ArrayGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ArrayGraph {
        &mut self.graph
    }

    pub fn vertex_index(&self, id: &VId) -> Option<usize> {
        self.vmap.get_by_left(id).copied()
    }

    pub fn vertex_id(&self, v: usize) -> Option<&VId> {
        self.vmap.get_by_right(&v)
    }

    pub fn edge_index(&self, id: &EId) -> Option<usize> {
        self.emap.get_by_left(id).copied()
    }

    pub fn edge_id(&self, e: usize) -> Option<&EId> {
        self.emap.get_by_right(&e)
    }

    pub fn add_vertex(&mut self, id: VId) -> Result<usize> {
        if self.vmap.contains_left(&id) {
            return Err(GraphError::InvalidArgument(
                "duplicate vertex id".to_string(),
            ));
        }
        let v = self.graph.add_vertex()?;
        self.vmap.insert(id, v);
        Ok(v)
    }

    pub fn add_edge(&mut self, id: EId, source: &VId, sink: &VId) -> Result<usize> {
        if self.emap.contains_left(&id) {
            return Err(GraphError::InvalidArgument("duplicate edge id".to_string()));
        }
        let u = self
            .vertex_index(source)
            .ok_or_else(|| GraphError::InvalidArgument("unknown source id".to_string()))?;
        let v = self
            .vertex_index(sink)
            .ok_or_else(|| GraphError::InvalidArgument("unknown sink id".to_string()))?;
        let e = self.graph.add_edge(u, v)?;
        self.emap.insert(id, e);
        Ok(e)
    }

    pub fn remove_edge(&mut self, id: &EId) -> Result<()> {
        let e = self
            .edge_index(id)
            .ok_or_else(|| GraphError::InvalidArgument("unknown edge id".to_string()))?;
        self.graph.remove_edge(e)?;
        self.emap.remove_by_left(id);
        self.fix_edge_swap(e);
        Ok(())
    }

    pub fn remove_vertex(&mut self, id: &VId) -> Result<()> {
        let v = self
            .vertex_index(id)
            .ok_or_else(|| GraphError::InvalidArgument("unknown vertex id".to_string()))?;
        // Remove incident edges through the wrapper so the edge bijection
        // tracks every individual swap.
        loop {
            let next = self
                .graph
                .out_edges(v)
                .chain(if self.graph.is_directed() {
                    self.graph.in_edges(v)
                } else {
                    Box::new(std::iter::empty()) as Box<dyn Iterator<Item = usize>>
                })
                .next();
            match next {
                Some(e) => {
                    let eid = self.edge_id(e).unwrap().clone();
                    self.remove_edge(&eid)?;
                }
                None => break,
            }
        }
        self.graph.remove_vertex(v)?;
        self.vmap.remove_by_left(id);
        let last = self.graph.vertex_count();
        if v != last {
            let (moved_id, _) = self.vmap.remove_by_right(&last).unwrap();
            self.vmap.insert(moved_id, v);
        }
        Ok(())
    }

    /// After the underlying graph swap-removed edge `e`, re-point the id
    /// of the former last edge at its new index.
    fn fix_edge_swap(&mut self, e: usize) {
        let last = self.graph.edge_count();
        if e != last {
            let (moved_id, _) = self.emap.remove_by_right(&last).unwrap();
            self.emap.insert(moved_id, e);
        }
    }

    /// Out edges of `id`, named by edge ids.
    pub fn out_edges<'a>(&'a self, id: &VId) -> Box<dyn Iterator<Item = &'a EId> + 'a> {
        match self.vertex_index(id) {
            Some(v) => Box::new(self.graph.out_edges(v).map(move |e| self.edge_id(e).unwrap())),
            None => Box::new(std::iter::empty()),
        }
    }
}
