use super::*;
use crate::{GraphError, Result};

/// Index graph backed by per-vertex arrays of edge indices.
///
/// Appending is O(1), removing an edge is O(deg) because the edge has to
/// be found in the endpoint lists. For removal-heavy workloads prefer
/// [`LinkedGraph`].
#[derive(Clone)]
pub struct ArrayGraph {
    directed: bool,
    frozen: bool,
    endpoints: Vec<(usize, usize)>,
    out: Vec<Vec<usize>>,
    inn: Vec<Vec<usize>>,
    vweights: WeightsRegistry,
    eweights: WeightsRegistry,
}

impl ArrayGraph {
    pub fn new_directed() -> Self {
        Self::new(true)
    }

    pub fn new_undirected() -> Self {
        Self::new(false)
    }

    pub(crate) fn new(directed: bool) -> Self {
        Self {
            directed,
            frozen: false,
            endpoints: vec![],
            out: vec![],
            inn: vec![],
            vweights: WeightsRegistry::new(),
            eweights: WeightsRegistry::new(),
        }
    }

    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(GraphError::IllegalState("graph is frozen".to_string()))
        } else {
            Ok(())
        }
    }

    fn unlink(list: &mut Vec<usize>, e: usize) {
        let pos = list.iter().position(|&x| x == e).unwrap();
        list.swap_remove(pos);
    }

    /// Remove `e` from the endpoint lists it appears in.
    fn unlink_edge(&mut self, e: usize) {
        let (s, t) = self.endpoints[e];
        if self.directed {
            Self::unlink(&mut self.out[s], e);
            Self::unlink(&mut self.inn[t], e);
        } else {
            Self::unlink(&mut self.out[s], e);
            if s != t {
                Self::unlink(&mut self.out[t], e);
            }
        }
    }

    /// Rename edge `from` to `to` in every endpoint list and in the
    /// endpoint table.
    fn rename_edge(&mut self, from: usize, to: usize) {
        let (s, t) = self.endpoints[from];
        let rename = |list: &mut Vec<usize>| {
            let pos = list.iter().position(|&x| x == from).unwrap();
            list[pos] = to;
        };
        if self.directed {
            rename(&mut self.out[s]);
            rename(&mut self.inn[t]);
        } else {
            rename(&mut self.out[s]);
            if s != t {
                rename(&mut self.out[t]);
            }
        }
        self.endpoints[to] = (s, t);
    }
}

impl IndexGraph for ArrayGraph {
    fn is_directed(&self) -> bool {
        self.directed
    }

    fn vertex_count(&self) -> usize {
        self.out.len()
    }

    fn edge_count(&self) -> usize {
        self.endpoints.len()
    }

    fn edge_source(&self, e: usize) -> usize {
        self.endpoints[e].0
    }

    fn edge_target(&self, e: usize) -> usize {
        self.endpoints[e].1
    }

    fn out_edges(&self, v: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.out[v].iter().copied())
    }

    fn in_edges(&self, v: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        if self.directed {
            Box::new(self.inn[v].iter().copied())
        } else {
            Box::new(self.out[v].iter().copied())
        }
    }

    fn degree_out(&self, v: usize) -> usize {
        self.out[v].len()
    }

    fn degree_in(&self, v: usize) -> usize {
        if self.directed {
            self.inn[v].len()
        } else {
            self.out[v].len()
        }
    }

    fn vertices_weights(&self) -> &WeightsRegistry {
        &self.vweights
    }

    fn edges_weights(&self) -> &WeightsRegistry {
        &self.eweights
    }
}

impl MutableGraph for ArrayGraph {
    fn add_vertex(&mut self) -> Result<usize> {
        self.check_mutable()?;
        let v = self.out.len();
        self.out.push(vec![]);
        self.inn.push(vec![]);
        self.vweights.grow_one();
        Ok(v)
    }

    fn remove_vertex(&mut self, v: usize) -> Result<()> {
        self.check_mutable()?;
        self.check_vertex(v)?;
        while let Some(&e) = self.out[v].last() {
            self.remove_edge(e)?;
        }
        while let Some(&e) = self.inn[v].last() {
            self.remove_edge(e)?;
        }
        let last = self.out.len() - 1;
        if v != last {
            // Relabel vertex `last` as `v` in its incident edges before the
            // lists are swapped into place.
            let moved_out = std::mem::take(&mut self.out[last]);
            for &e in moved_out.iter() {
                let (s, t) = self.endpoints[e];
                self.endpoints[e] = (
                    if s == last { v } else { s },
                    if t == last { v } else { t },
                );
            }
            self.out[last] = moved_out;
            if self.directed {
                let moved_in = std::mem::take(&mut self.inn[last]);
                for &e in moved_in.iter() {
                    let (s, t) = self.endpoints[e];
                    self.endpoints[e] = (
                        if s == last { v } else { s },
                        if t == last { v } else { t },
                    );
                }
                self.inn[last] = moved_in;
            }
        }
        self.out.swap_remove(v);
        self.inn.swap_remove(v);
        self.vweights.compact_swap(v);
        Ok(())
    }

    fn add_edge(&mut self, source: usize, sink: usize) -> Result<usize> {
        self.check_mutable()?;
        self.check_vertex(source)?;
        self.check_vertex(sink)?;
        let e = self.endpoints.len();
        self.endpoints.push((source, sink));
        if self.directed {
            self.out[source].push(e);
            self.inn[sink].push(e);
        } else {
            self.out[source].push(e);
            if source != sink {
                self.out[sink].push(e);
            }
        }
        self.eweights.grow_one();
        Ok(e)
    }

    fn remove_edge(&mut self, e: usize) -> Result<()> {
        self.check_mutable()?;
        self.check_edge(e)?;
        self.unlink_edge(e);
        let last = self.endpoints.len() - 1;
        if e != last {
            self.rename_edge(last, e);
        }
        self.endpoints.pop();
        self.eweights.compact_swap(e);
        Ok(())
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn add_vertices_weights<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()> {
        self.check_mutable()?;
        self.vweights.add(key, default)
    }

    fn add_edges_weights<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()> {
        self.check_mutable()?;
        self.eweights.add(key, default)
    }

    fn vertices_weights_mut(&mut self) -> &mut WeightsRegistry {
        &mut self.vweights
    }

    fn edges_weights_mut(&mut self) -> &mut WeightsRegistry {
        &mut self.eweights
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{check_same_topology, Ops};
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn swap_with_last_on_edge_removal() {
        let mut g = ArrayGraph::new_directed();
        for _ in 0..3 {
            g.add_vertex().unwrap();
        }
        let e0 = g.add_edge(0, 1).unwrap();
        let _e1 = g.add_edge(1, 2).unwrap();
        let _e2 = g.add_edge(2, 0).unwrap();
        g.remove_edge(e0).unwrap();
        // edge 2 was renamed to 0
        assert_eq!(g.edge_count(), 2);
        assert_eq!((g.edge_source(0), g.edge_target(0)), (2, 0));
        assert_eq!((g.edge_source(1), g.edge_target(1)), (1, 2));
    }

    #[test]
    fn swap_with_last_on_vertex_removal() {
        let mut g = ArrayGraph::new_directed();
        for _ in 0..4 {
            g.add_vertex().unwrap();
        }
        g.add_edge(3, 2).unwrap();
        g.add_vertices_weights::<i64>("tag", 0).unwrap();
        g.vertices_weights_mut()
            .get_mut::<i64>("tag")
            .unwrap()
            .set(3, 33);
        g.remove_vertex(0).unwrap();
        // vertex 3 now answers to index 0, its edge and weight follow
        assert_eq!(g.vertex_count(), 3);
        assert_eq!((g.edge_source(0), g.edge_target(0)), (0, 2));
        assert_eq!(*g.vertices_weights().get::<i64>("tag").unwrap().get(0), 33);
    }

    #[test]
    fn frozen_graph_rejects_mutation() {
        let mut g = ArrayGraph::new_undirected();
        g.add_vertex().unwrap();
        g.add_edges_weights::<f64>("w", 0.0).unwrap();
        g.freeze();
        assert!(matches!(
            g.add_vertex(),
            Err(GraphError::IllegalState(_))
        ));
        assert!(matches!(
            g.add_edge(0, 0),
            Err(GraphError::IllegalState(_))
        ));
        // values stay writable
        g.edges_weights_mut();
    }

    #[test]
    fn undirected_self_loop_listed_once() {
        let mut g = ArrayGraph::new_undirected();
        let v = g.add_vertex().unwrap();
        g.add_edge(v, v).unwrap();
        assert_eq!(g.out_edges(v).count(), 1);
        assert_eq!(g.degree_out(v), 1);
    }

    #[quickcheck]
    fn array_backed_matches_linked(ops: Ops) {
        let trial = ops.replay::<ArrayGraph>();
        let oracle = ops.replay::<LinkedGraph>();
        check_same_topology(&trial, &oracle);
    }
}
