use super::*;
use crate::{GraphError, Result};

struct SplayNode<K, V> {
    key: K,
    value: V,
    left: Option<u32>,
    right: Option<u32>,
    parent: Option<u32>,
}

/// Splay-tree heap.
///
/// A self-adjusting BST keyed by the element keys, duplicates to the
/// right. `decrease_key` unlinks the node and re-inserts it under the
/// same arena slot, so the handle never moves.
pub struct SplayHeap<K: Ord, V> {
    slab: Slab<SplayNode<K, V>>,
    root: Option<u32>,
}

impl<K: Ord, V> SplayHeap<K, V> {
    fn rotate(&mut self, x: u32) {
        let p = self.slab.node(x).parent.unwrap();
        let g = self.slab.node(p).parent;
        if self.slab.node(p).left == Some(x) {
            let b = self.slab.node(x).right;
            self.slab.node_mut(p).left = b;
            if let Some(b) = b {
                self.slab.node_mut(b).parent = Some(p);
            }
            self.slab.node_mut(x).right = Some(p);
        } else {
            let b = self.slab.node(x).left;
            self.slab.node_mut(p).right = b;
            if let Some(b) = b {
                self.slab.node_mut(b).parent = Some(p);
            }
            self.slab.node_mut(x).left = Some(p);
        }
        self.slab.node_mut(p).parent = Some(x);
        self.slab.node_mut(x).parent = g;
        match g {
            None => self.root = Some(x),
            Some(g) => {
                if self.slab.node(g).left == Some(p) {
                    self.slab.node_mut(g).left = Some(x);
                } else {
                    self.slab.node_mut(g).right = Some(x);
                }
            }
        }
    }

    /// Splay `x` to the root of the tree (or detached subtree) it lives
    /// in.
    fn splay(&mut self, x: u32) {
        while let Some(p) = self.slab.node(x).parent {
            match self.slab.node(p).parent {
                None => self.rotate(x),
                Some(g) => {
                    let zig_zig = (self.slab.node(g).left == Some(p))
                        == (self.slab.node(p).left == Some(x));
                    if zig_zig {
                        self.rotate(p);
                        self.rotate(x);
                    } else {
                        self.rotate(x);
                        self.rotate(x);
                    }
                }
            }
        }
    }

    fn leftmost(&self, mut x: u32) -> u32 {
        while let Some(l) = self.slab.node(x).left {
            x = l;
        }
        x
    }

    fn rightmost(&self, mut x: u32) -> u32 {
        while let Some(r) = self.slab.node(x).right {
            x = r;
        }
        x
    }

    /// BST-insert an already allocated slot; assumes its links are clear.
    fn insert_slot(&mut self, slot: u32) {
        let Some(mut cur) = self.root else {
            self.root = Some(slot);
            return;
        };
        loop {
            if self.slab.node(slot).key < self.slab.node(cur).key {
                match self.slab.node(cur).left {
                    Some(l) => cur = l,
                    None => {
                        self.slab.node_mut(cur).left = Some(slot);
                        break;
                    }
                }
            } else {
                match self.slab.node(cur).right {
                    Some(r) => cur = r,
                    None => {
                        self.slab.node_mut(cur).right = Some(slot);
                        break;
                    }
                }
            }
        }
        self.slab.node_mut(slot).parent = Some(cur);
        self.splay(slot);
    }

    /// Remove `slot` from the tree, leaving the slot allocated with
    /// cleared links.
    fn unlink(&mut self, slot: u32) {
        self.splay(slot);
        let l = self.slab.node(slot).left;
        let r = self.slab.node(slot).right;
        if let Some(l) = l {
            self.slab.node_mut(l).parent = None;
        }
        if let Some(r) = r {
            self.slab.node_mut(r).parent = None;
        }
        self.root = match l {
            None => r,
            Some(l) => {
                let mx = self.rightmost(l);
                self.splay(mx);
                self.slab.node_mut(mx).right = r;
                if let Some(r) = r {
                    self.slab.node_mut(r).parent = Some(mx);
                }
                Some(mx)
            }
        };
        let n = self.slab.node_mut(slot);
        n.left = None;
        n.right = None;
        n.parent = None;
    }
}

impl<K: Ord, V> ReferenceableHeap<K, V> for SplayHeap<K, V> {
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
        let r = self.slab.alloc(SplayNode {
            key,
            value,
            left: None,
            right: None,
            parent: None,
        });
        self.insert_slot(r.slot);
        r
    }

    fn find_min(&self) -> Option<(&K, &V)> {
        let n = self.slab.node(self.leftmost(self.root?));
        Some((&n.key, &n.value))
    }

    fn extract_min(&mut self) -> Option<(K, V)> {
        let slot = self.leftmost(self.root?);
        self.unlink(slot);
        let n = self.slab.release(slot);
        Some((n.key, n.value))
    }

    fn decrease_key(&mut self, r: HeapRef, new_key: K) -> Result<()> {
        let slot = self.slab.resolve(r)?;
        if new_key > self.slab.node(slot).key {
            return Err(GraphError::InvalidArgument(
                "decrease_key got a greater key".to_string(),
            ));
        }
        self.unlink(slot);
        self.slab.node_mut(slot).key = new_key;
        self.insert_slot(slot);
        Ok(())
    }

    fn remove(&mut self, r: HeapRef) -> Result<(K, V)> {
        let slot = self.slab.resolve(r)?;
        self.unlink(slot);
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

impl<K: Ord, V> MeldableHeap<K, V> for SplayHeap<K, V> {
    fn meld(&mut self, other: Self) {
        for node in other.slab.drain_nodes() {
            self.insert(node.key, node.value);
        }
    }
}
