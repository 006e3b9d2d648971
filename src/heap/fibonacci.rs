use super::*;
use crate::{GraphError, Result};

struct FibNode<K, V> {
    key: K,
    value: V,
    parent: Option<u32>,
    child: Option<u32>,
    // circular sibling ring; a singleton points at itself
    left: u32,
    right: u32,
    degree: u32,
    marked: bool,
}

/// Fibonacci heap.
///
/// Roots form a circular list with a designated `min` pointer.
/// `extract_min` splices the children of the minimum into the root ring
/// and consolidates roots of equal degree through a degree-indexed
/// table. `decrease_key` cuts a node that came to violate heap order
/// with its parent and cascading-cuts marked ancestors.
pub struct FibonacciHeap<K: Ord, V> {
    slab: Slab<FibNode<K, V>>,
    min: Option<u32>,
}

impl<K: Ord, V> FibonacciHeap<K, V> {
    fn ring_insert(&mut self, anchor: u32, x: u32) {
        let right = self.slab.node(anchor).right;
        self.slab.node_mut(x).left = anchor;
        self.slab.node_mut(x).right = right;
        self.slab.node_mut(anchor).right = x;
        self.slab.node_mut(right).left = x;
    }

    fn ring_remove(&mut self, x: u32) {
        let left = self.slab.node(x).left;
        let right = self.slab.node(x).right;
        self.slab.node_mut(left).right = right;
        self.slab.node_mut(right).left = left;
        self.slab.node_mut(x).left = x;
        self.slab.node_mut(x).right = x;
    }

    fn ring_to_vec(&self, start: u32) -> Vec<u32> {
        let mut out = vec![start];
        let mut x = self.slab.node(start).right;
        while x != start {
            out.push(x);
            x = self.slab.node(x).right;
        }
        out
    }

    /// Make root `child` a child of root `parent`.
    fn link_under(&mut self, child: u32, parent: u32) {
        self.ring_remove(child);
        self.slab.node_mut(child).parent = Some(parent);
        self.slab.node_mut(child).marked = false;
        match self.slab.node(parent).child {
            None => self.slab.node_mut(parent).child = Some(child),
            Some(first) => self.ring_insert(first, child),
        }
        self.slab.node_mut(parent).degree += 1;
    }

    fn consolidate(&mut self) {
        let bound = (usize::BITS - self.slab.len().leading_zeros()) as usize * 2 + 2;
        let mut by_degree: Vec<Option<u32>> = vec![None; bound];
        let roots = self.ring_to_vec(self.min.unwrap());
        for mut w in roots {
            if self.slab.node(w).parent.is_some() {
                // already linked under an equal-degree root this round
                continue;
            }
            let mut d = self.slab.node(w).degree as usize;
            while d < by_degree.len() {
                let Some(y) = by_degree[d] else { break };
                by_degree[d] = None;
                let (parent, child) = if self.slab.node(y).key < self.slab.node(w).key {
                    (y, w)
                } else {
                    (w, y)
                };
                self.link_under(child, parent);
                w = parent;
                d = self.slab.node(w).degree as usize;
                if d >= by_degree.len() {
                    by_degree.resize(d + 1, None);
                }
            }
            by_degree[d] = Some(w);
        }
        self.min = None;
        for slot in by_degree.into_iter().flatten() {
            match self.min {
                None => self.min = Some(slot),
                Some(m) => {
                    if self.slab.node(slot).key < self.slab.node(m).key {
                        self.min = Some(slot);
                    }
                }
            }
        }
    }

    /// Detach `x` from its parent `p` and promote it to a root.
    fn cut(&mut self, x: u32, p: u32) {
        if self.slab.node(p).child == Some(x) {
            let right = self.slab.node(x).right;
            self.slab.node_mut(p).child = if right == x { None } else { Some(right) };
        }
        self.ring_remove(x);
        self.slab.node_mut(p).degree -= 1;
        self.slab.node_mut(x).parent = None;
        self.slab.node_mut(x).marked = false;
        let anchor = self.min.unwrap();
        self.ring_insert(anchor, x);
    }

    fn cascading_cut(&mut self, mut y: u32) {
        while let Some(z) = self.slab.node(y).parent {
            if !self.slab.node(y).marked {
                self.slab.node_mut(y).marked = true;
                break;
            }
            self.cut(y, z);
            y = z;
        }
    }

    /// Splice every child of `slot` into the root ring.
    fn promote_children(&mut self, slot: u32) {
        if let Some(first) = self.slab.node(slot).child {
            for c in self.ring_to_vec(first) {
                self.slab.node_mut(c).parent = None;
                self.slab.node_mut(c).marked = false;
                self.ring_remove(c);
                self.ring_insert(slot, c);
            }
            self.slab.node_mut(slot).child = None;
            self.slab.node_mut(slot).degree = 0;
        }
    }
}

impl<K: Ord, V> ReferenceableHeap<K, V> for FibonacciHeap<K, V> {
    fn new() -> Self {
        Self {
            slab: Slab::new(),
            min: None,
        }
    }

    fn len(&self) -> usize {
        self.slab.len()
    }

    fn insert(&mut self, key: K, value: V) -> HeapRef {
        let r = self.slab.alloc(FibNode {
            key,
            value,
            parent: None,
            child: None,
            left: 0,
            right: 0,
            degree: 0,
            marked: false,
        });
        self.slab.node_mut(r.slot).left = r.slot;
        self.slab.node_mut(r.slot).right = r.slot;
        match self.min {
            None => self.min = Some(r.slot),
            Some(m) => {
                self.ring_insert(m, r.slot);
                if self.slab.node(r.slot).key < self.slab.node(m).key {
                    self.min = Some(r.slot);
                }
            }
        }
        r
    }

    fn find_min(&self) -> Option<(&K, &V)> {
        let n = self.slab.node(self.min?);
        Some((&n.key, &n.value))
    }

    fn extract_min(&mut self) -> Option<(K, V)> {
        let minslot = self.min?;
        self.promote_children(minslot);
        let right = self.slab.node(minslot).right;
        self.ring_remove(minslot);
        if right == minslot {
            self.min = None;
        } else {
            self.min = Some(right);
            self.consolidate();
        }
        let n = self.slab.release(minslot);
        Some((n.key, n.value))
    }

    fn decrease_key(&mut self, r: HeapRef, new_key: K) -> Result<()> {
        let slot = self.slab.resolve(r)?;
        if new_key > self.slab.node(slot).key {
            return Err(GraphError::InvalidArgument(
                "decrease_key got a greater key".to_string(),
            ));
        }
        self.slab.node_mut(slot).key = new_key;
        if let Some(p) = self.slab.node(slot).parent {
            if self.slab.node(slot).key < self.slab.node(p).key {
                self.cut(slot, p);
                self.cascading_cut(p);
            }
        }
        let m = self.min.unwrap();
        if self.slab.node(slot).key < self.slab.node(m).key {
            self.min = Some(slot);
        }
        Ok(())
    }

    fn remove(&mut self, r: HeapRef) -> Result<(K, V)> {
        let slot = self.slab.resolve(r)?;
        if self.min == Some(slot) {
            return Ok(self.extract_min().unwrap());
        }
        if let Some(p) = self.slab.node(slot).parent {
            self.cut(slot, p);
            self.cascading_cut(p);
        }
        self.promote_children(slot);
        self.ring_remove(slot);
        let n = self.slab.release(slot);
        Ok((n.key, n.value))
    }

    fn get(&self, r: HeapRef) -> Result<(&K, &V)> {
        let slot = self.slab.resolve(r)?;
        let n = self.slab.node(slot);
        Ok((&n.key, &n.value))
    }

    fn clear(&mut self) {
        self.slab.clear();
        self.min = None;
    }
}

impl<K: Ord, V> MeldableHeap<K, V> for FibonacciHeap<K, V> {
    fn meld(&mut self, other: Self) {
        for node in other.slab.drain_nodes() {
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
        exercise(FibonacciHeap::new(), &ops);
    }

    #[test]
    fn extracts_in_order() {
        let mut h: FibonacciHeap<i64, usize> = FibonacciHeap::new();
        for (i, k) in [5, 2, 8, 1, 9, 3].into_iter().enumerate() {
            h.insert(k, i);
        }
        let drained: Vec<i64> = std::iter::from_fn(|| h.extract_min().map(|(k, _)| k)).collect();
        assert_eq!(drained, vec![1, 2, 3, 5, 8, 9]);
    }

    #[test]
    fn decrease_key_reorders_extraction() {
        let mut h: FibonacciHeap<i64, usize> = FibonacciHeap::new();
        let mut r8 = None;
        for (i, k) in [5, 2, 8, 1, 9, 3].into_iter().enumerate() {
            let r = h.insert(k, i);
            if k == 8 {
                r8 = Some(r);
            }
        }
        h.decrease_key(r8.unwrap(), 0).unwrap();
        let (k, v) = h.extract_min().unwrap();
        assert_eq!((k, v), (0, 2));
    }

    #[test]
    fn meld_is_multiset_union() {
        exercise_meld::<FibonacciHeap<i64, usize>>(&[6, 0, 6], &[5, 11, 2, 2]);
    }
}
