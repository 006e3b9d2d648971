use super::*;
use crate::{GraphError, Result};

/// One direction of the doubly-linked membership of an edge.
///
/// Slot 0 threads the list of edges whose *source* is a given vertex,
/// slot 1 the list of edges whose *target* is. Within one list every
/// member uses the same slot, so neighbour fixups never have to guess.
#[derive(Debug, Clone, Copy, Default)]
struct Half {
    next: Option<usize>,
    prev: Option<usize>,
}

#[derive(Debug, Clone)]
struct EdgeRec {
    ends: (usize, usize),
    links: [Half; 2],
    in_list: [bool; 2],
}

/// Index graph threading doubly-linked edge lists through an edge arena.
///
/// Removing an edge is O(1) given its index; everything else matches
/// [`ArrayGraph`]. Undirected self-loops live only in the slot-0 list so
/// they are enumerated once.
#[derive(Clone)]
pub struct LinkedGraph {
    directed: bool,
    frozen: bool,
    recs: Vec<EdgeRec>,
    heads: Vec<[Option<usize>; 2]>,
    vweights: WeightsRegistry,
    eweights: WeightsRegistry,
}

struct LinkWalk<'a> {
    recs: &'a [EdgeRec],
    cur: Option<usize>,
    slot: usize,
}

impl<'a> Iterator for LinkWalk<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let e = self.cur?;
        self.cur = self.recs[e].links[self.slot].next;
        Some(e)
    }
}

impl LinkedGraph {
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
            recs: vec![],
            heads: vec![],
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

    fn end_of(&self, e: usize, slot: usize) -> usize {
        if slot == 0 {
            self.recs[e].ends.0
        } else {
            self.recs[e].ends.1
        }
    }

    fn walk(&self, v: usize, slot: usize) -> LinkWalk<'_> {
        LinkWalk {
            recs: &self.recs,
            cur: self.heads[v][slot],
            slot,
        }
    }

    fn link(&mut self, e: usize, slot: usize) {
        let v = self.end_of(e, slot);
        let old = self.heads[v][slot];
        self.recs[e].links[slot] = Half {
            next: old,
            prev: None,
        };
        self.recs[e].in_list[slot] = true;
        if let Some(o) = old {
            self.recs[o].links[slot].prev = Some(e);
        }
        self.heads[v][slot] = Some(e);
    }

    fn unlink(&mut self, e: usize, slot: usize) {
        if !self.recs[e].in_list[slot] {
            return;
        }
        let Half { next, prev } = self.recs[e].links[slot];
        let v = self.end_of(e, slot);
        match prev {
            Some(p) => self.recs[p].links[slot].next = next,
            None => self.heads[v][slot] = next,
        }
        if let Some(nx) = next {
            self.recs[nx].links[slot].prev = prev;
        }
        self.recs[e].in_list[slot] = false;
    }

    /// Point the neighbours (or list head) of edge `last` at its new
    /// index before the arena slot is moved.
    fn redirect_neighbors(&mut self, last: usize, to: usize) {
        for slot in 0..2 {
            if !self.recs[last].in_list[slot] {
                continue;
            }
            let Half { next, prev } = self.recs[last].links[slot];
            let v = self.end_of(last, slot);
            match prev {
                Some(p) => self.recs[p].links[slot].next = Some(to),
                None => self.heads[v][slot] = Some(to),
            }
            if let Some(nx) = next {
                self.recs[nx].links[slot].prev = Some(to);
            }
        }
    }

    fn collect_list(&self, v: usize, slot: usize) -> Vec<usize> {
        self.walk(v, slot).collect()
    }
}

impl IndexGraph for LinkedGraph {
    fn is_directed(&self) -> bool {
        self.directed
    }

    fn vertex_count(&self) -> usize {
        self.heads.len()
    }

    fn edge_count(&self) -> usize {
        self.recs.len()
    }

    fn edge_source(&self, e: usize) -> usize {
        self.recs[e].ends.0
    }

    fn edge_target(&self, e: usize) -> usize {
        self.recs[e].ends.1
    }

    fn out_edges(&self, v: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        assert!(v < self.heads.len());
        if self.directed {
            Box::new(self.walk(v, 0))
        } else {
            Box::new(self.walk(v, 0).chain(self.walk(v, 1)))
        }
    }

    fn in_edges(&self, v: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        assert!(v < self.heads.len());
        if self.directed {
            Box::new(self.walk(v, 1))
        } else {
            Box::new(self.walk(v, 0).chain(self.walk(v, 1)))
        }
    }

    fn vertices_weights(&self) -> &WeightsRegistry {
        &self.vweights
    }

    fn edges_weights(&self) -> &WeightsRegistry {
        &self.eweights
    }
}

impl MutableGraph for LinkedGraph {
    fn add_vertex(&mut self) -> Result<usize> {
        self.check_mutable()?;
        let v = self.heads.len();
        self.heads.push([None, None]);
        self.vweights.grow_one();
        Ok(v)
    }

    fn remove_vertex(&mut self, v: usize) -> Result<()> {
        self.check_mutable()?;
        self.check_vertex(v)?;
        while let Some(e) = self.heads[v][0] {
            self.remove_edge(e)?;
        }
        while let Some(e) = self.heads[v][1] {
            self.remove_edge(e)?;
        }
        let last = self.heads.len() - 1;
        if v != last {
            for slot in 0..2 {
                for e in self.collect_list(last, slot) {
                    let (s, t) = self.recs[e].ends;
                    self.recs[e].ends = (
                        if s == last { v } else { s },
                        if t == last { v } else { t },
                    );
                }
            }
        }
        self.heads.swap_remove(v);
        self.vweights.compact_swap(v);
        Ok(())
    }

    fn add_edge(&mut self, source: usize, sink: usize) -> Result<usize> {
        self.check_mutable()?;
        self.check_vertex(source)?;
        self.check_vertex(sink)?;
        let e = self.recs.len();
        self.recs.push(EdgeRec {
            ends: (source, sink),
            links: [Half::default(), Half::default()],
            in_list: [false, false],
        });
        self.link(e, 0);
        if self.directed || source != sink {
            self.link(e, 1);
        }
        self.eweights.grow_one();
        Ok(e)
    }

    fn remove_edge(&mut self, e: usize) -> Result<()> {
        self.check_mutable()?;
        self.check_edge(e)?;
        self.unlink(e, 0);
        self.unlink(e, 1);
        let last = self.recs.len() - 1;
        if e != last {
            self.redirect_neighbors(last, e);
        }
        self.recs.swap_remove(e);
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
