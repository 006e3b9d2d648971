use super::*;
use crate::{GraphError, Result};

struct PairNode<K, V> {
    key: K,
    value: V,
    child: Option<u32>,
    next: Option<u32>,
    // previous sibling, or the parent if this is a first child
    prev: Option<u32>,
}

/// Pairing heap.
///
/// Roots of multi-way trees linked through `child`/`next`/`prev`.
/// `extract_min` runs the classic two-pass merge: pair children left to
/// right, then meld the pairs right to left. `decrease_key` detaches the
/// node and melds it with the root, which is where the heap gets its
/// O(log log n) amortised bound.
pub struct PairingHeap<K: Ord, V> {
    slab: Slab<PairNode<K, V>>,
    root: Option<u32>,
}

impl<K: Ord, V> PairingHeap<K, V> {
    /// Meld two detached trees, returning the new root.
    fn link(&mut self, a: u32, b: u32) -> u32 {
        debug_assert!(self.slab.node(a).prev.is_none());
        debug_assert!(self.slab.node(b).prev.is_none());
        let (parent, child) = if self.slab.node(b).key < self.slab.node(a).key {
            (b, a)
        } else {
            (a, b)
        };
        let first = self.slab.node(parent).child;
        self.slab.node_mut(child).next = first;
        self.slab.node_mut(child).prev = Some(parent);
        if let Some(f) = first {
            self.slab.node_mut(f).prev = Some(child);
        }
        self.slab.node_mut(parent).child = Some(child);
        parent
    }

    /// Unhook a non-root node from its parent or sibling list.
    fn detach(&mut self, slot: u32) {
        let prev = self.slab.node(slot).prev.unwrap();
        let next = self.slab.node(slot).next;
        if self.slab.node(prev).child == Some(slot) {
            self.slab.node_mut(prev).child = next;
        } else {
            self.slab.node_mut(prev).next = next;
        }
        if let Some(nx) = next {
            self.slab.node_mut(nx).prev = Some(prev);
        }
        self.slab.node_mut(slot).prev = None;
        self.slab.node_mut(slot).next = None;
    }

    /// Two-pass merge of a child list into a single tree.
    fn two_pass(&mut self, head: Option<u32>) -> Option<u32> {
        let mut pairs = vec![];
        let mut cur = head;
        while let Some(a) = cur {
            let next_a = self.slab.node(a).next;
            self.slab.node_mut(a).prev = None;
            self.slab.node_mut(a).next = None;
            match next_a {
                Some(b) => {
                    let next_b = self.slab.node(b).next;
                    self.slab.node_mut(b).prev = None;
                    self.slab.node_mut(b).next = None;
                    pairs.push(self.link(a, b));
                    cur = next_b;
                }
                None => {
                    pairs.push(a);
                    cur = None;
                }
            }
        }
        let mut merged: Option<u32> = None;
        for &t in pairs.iter().rev() {
            merged = Some(match merged {
                Some(m) => self.link(m, t),
                None => t,
            });
        }
        merged
    }
}

impl<K: Ord, V> ReferenceableHeap<K, V> for PairingHeap<K, V> {
    fn new() -> Self {
        Self {
            slab: Slab::new(),
            root: None,
        }
    }

    fn len(&self) -> usize {
        self.slab.len()
    }

    fn insert(&mut self, key: K, value: V) -> HeapRef {
        let r = self.slab.alloc(PairNode {
            key,
            value,
            child: None,
            next: None,
            prev: None,
        });
        self.root = Some(match self.root {
            Some(root) => self.link(root, r.slot),
            None => r.slot,
        });
        r
    }

    fn find_min(&self) -> Option<(&K, &V)> {
        let n = self.slab.node(self.root?);
        Some((&n.key, &n.value))
    }

    fn extract_min(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let head = self.slab.node(root).child;
        self.root = self.two_pass(head);
        let n = self.slab.release(root);
        Some((n.key, n.value))
    }

    fn decrease_key(&mut self, r: HeapRef, new_key: K) -> Result<()> {
        let slot = self.slab.resolve(r)?;
        let node = self.slab.node_mut(slot);
        if new_key > node.key {
            return Err(GraphError::InvalidArgument(
                "decrease_key got a greater key".to_string(),
            ));
        }
        node.key = new_key;
        if self.root == Some(slot) {
            return Ok(());
        }
        self.detach(slot);
        let root = self.root.unwrap();
        self.root = Some(self.link(root, slot));
        Ok(())
    }

    fn remove(&mut self, r: HeapRef) -> Result<(K, V)> {
        let slot = self.slab.resolve(r)?;
        if self.root == Some(slot) {
            return Ok(self.extract_min().unwrap());
        }
        self.detach(slot);
        let head = self.slab.node(slot).child;
        if let Some(merged) = self.two_pass(head) {
            let root = self.root.unwrap();
            self.root = Some(self.link(root, merged));
        }
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
        self.root = None;
    }
}

impl<K: Ord, V> MeldableHeap<K, V> for PairingHeap<K, V> {
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
        exercise(PairingHeap::new(), &ops);
    }

    #[test]
    fn meld_is_multiset_union() {
        exercise_meld::<PairingHeap<i64, usize>>(&[3, 3, 7], &[2, 8, 1]);
    }

    #[test]
    fn decrease_key_rejects_increase() {
        let mut h: PairingHeap<i64, usize> = PairingHeap::new();
        let r = h.insert(5, 0);
        assert!(matches!(
            h.decrease_key(r, 6),
            Err(GraphError::InvalidArgument(_))
        ));
    }
}
