use super::*;
use crate::{GraphError, Result};

struct BinomNode<K, V> {
    key: K,
    value: V,
    parent: Option<u32>,
    // leftmost (highest-degree) child; siblings run by decreasing degree
    child: Option<u32>,
    sibling: Option<u32>,
    degree: u32,
    token: u32,
}

struct HandleEntry {
    gen: u32,
    node: Option<u32>,
}

/// Binomial heap.
///
/// A forest of binomial trees with a degree-ordered root list; uniting
/// two heaps is a binary-adder merge over that list. `decrease_key`
/// bubbles the payload towards the root, so unlike the other heaps the
/// handles here go through one extra indirection (`token` ↔ node slot)
/// that is repointed whenever payloads swap.
pub struct BinomialHeap<K: Ord, V> {
    nodes: Vec<Option<BinomNode<K, V>>>,
    free_nodes: Vec<u32>,
    handles: Vec<HandleEntry>,
    free_handles: Vec<u32>,
    head: Option<u32>,
    len: usize,
}

impl<K: Ord, V> BinomialHeap<K, V> {
    fn node(&self, slot: u32) -> &BinomNode<K, V> {
        self.nodes[slot as usize].as_ref().unwrap()
    }

    fn node_mut(&mut self, slot: u32) -> &mut BinomNode<K, V> {
        self.nodes[slot as usize].as_mut().unwrap()
    }

    fn alloc_node(&mut self, node: BinomNode<K, V>) -> u32 {
        if let Some(slot) = self.free_nodes.pop() {
            self.nodes[slot as usize] = Some(node);
            slot
        } else {
            self.nodes.push(Some(node));
            (self.nodes.len() - 1) as u32
        }
    }

    fn free_node(&mut self, slot: u32) -> BinomNode<K, V> {
        let node = self.nodes[slot as usize].take().unwrap();
        self.free_nodes.push(slot);
        node
    }

    fn alloc_handle(&mut self, node_slot: u32) -> HeapRef {
        if let Some(slot) = self.free_handles.pop() {
            let entry = &mut self.handles[slot as usize];
            entry.node = Some(node_slot);
            HeapRef {
                slot,
                gen: entry.gen,
            }
        } else {
            let slot = self.handles.len() as u32;
            self.handles.push(HandleEntry {
                gen: 0,
                node: Some(node_slot),
            });
            HeapRef { slot, gen: 0 }
        }
    }

    fn free_handle(&mut self, token: u32) {
        let entry = &mut self.handles[token as usize];
        entry.node = None;
        entry.gen = entry.gen.wrapping_add(1);
        self.free_handles.push(token);
    }

    fn resolve(&self, r: HeapRef) -> Result<u32> {
        match self.handles.get(r.slot as usize) {
            Some(entry) if entry.gen == r.gen => match entry.node {
                Some(slot) => Ok(slot),
                None => Err(GraphError::IllegalState("heap handle is stale".to_string())),
            },
            _ => Err(GraphError::IllegalState("heap handle is stale".to_string())),
        }
    }

    /// Make root `child` the new highest-degree child of root `parent`.
    fn link(&mut self, child: u32, parent: u32) {
        debug_assert_eq!(self.node(child).degree, self.node(parent).degree);
        let old = self.node(parent).child;
        let c = self.node_mut(child);
        c.parent = Some(parent);
        c.sibling = old;
        let p = self.node_mut(parent);
        p.child = Some(child);
        p.degree += 1;
    }

    /// Merge two degree-sorted root lists into one.
    fn merge(&mut self, a: Option<u32>, b: Option<u32>) -> Option<u32> {
        let mut head = None;
        let mut tail: Option<u32> = None;
        let (mut a, mut b) = (a, b);
        while let (Some(x), Some(y)) = (a, b) {
            let pick = if self.node(x).degree <= self.node(y).degree {
                a = self.node(x).sibling;
                x
            } else {
                b = self.node(y).sibling;
                y
            };
            self.node_mut(pick).sibling = None;
            match tail {
                None => head = Some(pick),
                Some(t) => self.node_mut(t).sibling = Some(pick),
            }
            tail = Some(pick);
        }
        let rest = a.or(b);
        match tail {
            None => rest,
            Some(t) => {
                self.node_mut(t).sibling = rest;
                head
            }
        }
    }

    /// The binary-adder pass: after merging, no two roots may share a
    /// degree.
    fn union(&mut self, other: Option<u32>) {
        let merged = self.merge(self.head, other);
        let Some(mut x) = merged else {
            self.head = None;
            return;
        };
        let mut head = Some(x);
        let mut prev: Option<u32> = None;
        let mut next = self.node(x).sibling;
        while let Some(nx) = next {
            let same_degree = self.node(x).degree == self.node(nx).degree;
            let third_same = self
                .node(nx)
                .sibling
                .map(|s| self.node(s).degree == self.node(x).degree)
                .unwrap_or(false);
            if !same_degree || third_same {
                prev = Some(x);
                x = nx;
            } else if self.node(x).key <= self.node(nx).key {
                self.node_mut(x).sibling = self.node(nx).sibling;
                self.link(nx, x);
            } else {
                match prev {
                    None => head = Some(nx),
                    Some(p) => self.node_mut(p).sibling = Some(nx),
                }
                self.link(x, nx);
                x = nx;
            }
            next = self.node(x).sibling;
        }
        self.head = head;
    }

    fn min_root(&self) -> Option<u32> {
        let mut best: Option<u32> = None;
        let mut cur = self.head;
        while let Some(x) = cur {
            best = match best {
                None => Some(x),
                Some(b) if self.node(x).key < self.node(b).key => Some(x),
                keep => keep,
            };
            cur = self.node(x).sibling;
        }
        best
    }

    /// Unhook root `x` from the root list, reverse its child list into a
    /// degree-ascending root list, and fold it back in.
    fn dissolve_root(&mut self, x: u32) {
        let mut prev: Option<u32> = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            if c == x {
                break;
            }
            prev = Some(c);
            cur = self.node(c).sibling;
        }
        debug_assert_eq!(cur, Some(x));
        match prev {
            None => self.head = self.node(x).sibling,
            Some(p) => {
                let sib = self.node(x).sibling;
                self.node_mut(p).sibling = sib;
            }
        }
        let mut reversed: Option<u32> = None;
        let mut child = self.node(x).child;
        while let Some(c) = child {
            let next = self.node(c).sibling;
            let n = self.node_mut(c);
            n.parent = None;
            n.sibling = reversed;
            reversed = Some(c);
            child = next;
        }
        self.union(reversed);
    }

    /// Swap the payloads (and handle tokens) of a node and its parent.
    fn swap_payload(&mut self, a: u32, b: u32) {
        let mut na = self.nodes[a as usize].take().unwrap();
        let mut nb = self.nodes[b as usize].take().unwrap();
        std::mem::swap(&mut na.key, &mut nb.key);
        std::mem::swap(&mut na.value, &mut nb.value);
        std::mem::swap(&mut na.token, &mut nb.token);
        self.handles[na.token as usize].node = Some(a);
        self.handles[nb.token as usize].node = Some(b);
        self.nodes[a as usize] = Some(na);
        self.nodes[b as usize] = Some(nb);
    }

    /// Bubble the payload at `x` rootwards while it beats its parent, or
    /// all the way when `always` is set.
    fn bubble_up(&mut self, mut x: u32, always: bool) -> u32 {
        while let Some(p) = self.node(x).parent {
            if !always && self.node(p).key <= self.node(x).key {
                break;
            }
            self.swap_payload(x, p);
            x = p;
        }
        x
    }
}

impl<K: Ord, V> ReferenceableHeap<K, V> for BinomialHeap<K, V> {
    fn new() -> Self {
        Self {
            nodes: vec![],
            free_nodes: vec![],
            handles: vec![],
            free_handles: vec![],
            head: None,
            len: 0,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn insert(&mut self, key: K, value: V) -> HeapRef {
        let slot = self.alloc_node(BinomNode {
            key,
            value,
            parent: None,
            child: None,
            sibling: None,
            degree: 0,
            token: 0,
        });
        let r = self.alloc_handle(slot);
        self.node_mut(slot).token = r.slot;
        self.union(Some(slot));
        self.len += 1;
        r
    }

    fn find_min(&self) -> Option<(&K, &V)> {
        let n = self.node(self.min_root()?);
        Some((&n.key, &n.value))
    }

    fn extract_min(&mut self) -> Option<(K, V)> {
        let x = self.min_root()?;
        self.dissolve_root(x);
        let node = self.free_node(x);
        self.free_handle(node.token);
        self.len -= 1;
        Some((node.key, node.value))
    }

    fn decrease_key(&mut self, r: HeapRef, new_key: K) -> Result<()> {
        let slot = self.resolve(r)?;
        if new_key > self.node(slot).key {
            return Err(GraphError::InvalidArgument(
                "decrease_key got a greater key".to_string(),
            ));
        }
        self.node_mut(slot).key = new_key;
        self.bubble_up(slot, false);
        Ok(())
    }

    fn remove(&mut self, r: HeapRef) -> Result<(K, V)> {
        let slot = self.resolve(r)?;
        let root = self.bubble_up(slot, true);
        self.dissolve_root(root);
        let node = self.free_node(root);
        self.free_handle(node.token);
        self.len -= 1;
        Ok((node.key, node.value))
    }

    fn get(&self, r: HeapRef) -> Result<(&K, &V)> {
        let slot = self.resolve(r)?;
        let n = self.node(slot);
        Ok((&n.key, &n.value))
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.free_nodes.clear();
        for entry in self.handles.iter_mut() {
            if entry.node.take().is_some() {
                entry.gen = entry.gen.wrapping_add(1);
            }
        }
        self.free_handles.clear();
        for i in 0..self.handles.len() {
            self.free_handles.push(i as u32);
        }
        self.head = None;
        self.len = 0;
    }
}

impl<K: Ord, V> MeldableHeap<K, V> for BinomialHeap<K, V> {
    fn meld(&mut self, other: Self) {
        for node in other.nodes.into_iter().flatten() {
            self.insert(node.key, node.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::*;
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn behaves_like_ordered_model(ops: HeapOps) {
        exercise(BinomialHeap::new(), &ops);
    }

    #[test]
    fn meld_is_multiset_union() {
        exercise_meld::<BinomialHeap<i64, usize>>(&[10, 4], &[7, 7, 0, 12]);
    }

    #[test]
    fn handles_follow_bubbled_payloads() {
        let mut h: BinomialHeap<i64, usize> = BinomialHeap::new();
        let refs: Vec<_> = (0..8).map(|k| h.insert(10 + k, k as usize)).collect();
        h.decrease_key(refs[7], 0).unwrap();
        assert_eq!(h.find_min(), Some((&0, &7)));
        assert_eq!(h.remove(refs[7]).unwrap(), (0, 7));
        assert_eq!(h.remove(refs[3]).unwrap(), (13, 3));
        assert_eq!(h.extract_min().unwrap(), (10, 0));
    }
}
