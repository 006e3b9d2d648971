use super::*;
use crate::{GraphError, Result};

struct RbNode<K, V> {
    key: K,
    value: V,
    left: Option<u32>,
    right: Option<u32>,
    parent: Option<u32>,
    red: bool,
}

/// Red-black-tree heap.
///
/// The balanced-BST member of the family. Worst-case O(log n) for every
/// operation instead of amortised bounds; `decrease_key` re-inserts the
/// node under its existing arena slot, keeping the handle valid.
pub struct RbHeap<K: Ord, V> {
    slab: Slab<RbNode<K, V>>,
    root: Option<u32>,
}

impl<K: Ord, V> RbHeap<K, V> {
    fn is_red(&self, x: Option<u32>) -> bool {
        x.map(|n| self.slab.node(n).red).unwrap_or(false)
    }

    fn leftmost(&self, mut x: u32) -> u32 {
        while let Some(l) = self.slab.node(x).left {
            x = l;
        }
        x
    }

    fn rotate_left(&mut self, x: u32) {
        let y = self.slab.node(x).right.unwrap();
        let b = self.slab.node(y).left;
        self.slab.node_mut(x).right = b;
        if let Some(b) = b {
            self.slab.node_mut(b).parent = Some(x);
        }
        let p = self.slab.node(x).parent;
        self.slab.node_mut(y).parent = p;
        match p {
            None => self.root = Some(y),
            Some(p) => {
                if self.slab.node(p).left == Some(x) {
                    self.slab.node_mut(p).left = Some(y);
                } else {
                    self.slab.node_mut(p).right = Some(y);
                }
            }
        }
        self.slab.node_mut(y).left = Some(x);
        self.slab.node_mut(x).parent = Some(y);
    }

    fn rotate_right(&mut self, x: u32) {
        let y = self.slab.node(x).left.unwrap();
        let b = self.slab.node(y).right;
        self.slab.node_mut(x).left = b;
        if let Some(b) = b {
            self.slab.node_mut(b).parent = Some(x);
        }
        let p = self.slab.node(x).parent;
        self.slab.node_mut(y).parent = p;
        match p {
            None => self.root = Some(y),
            Some(p) => {
                if self.slab.node(p).left == Some(x) {
                    self.slab.node_mut(p).left = Some(y);
                } else {
                    self.slab.node_mut(p).right = Some(y);
                }
            }
        }
        self.slab.node_mut(y).right = Some(x);
        self.slab.node_mut(x).parent = Some(y);
    }

    /// BST-insert an already allocated slot, then restore the red-black
    /// shape.
    fn insert_slot(&mut self, slot: u32) {
        self.slab.node_mut(slot).red = true;
        let Some(mut cur) = self.root else {
            self.slab.node_mut(slot).red = false;
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
        self.insert_fixup(slot);
    }

    fn insert_fixup(&mut self, mut z: u32) {
        while let Some(p) = self.slab.node(z).parent {
            if !self.slab.node(p).red {
                break;
            }
            // a red parent always has a grandparent
            let g = self.slab.node(p).parent.unwrap();
            if self.slab.node(g).left == Some(p) {
                let uncle = self.slab.node(g).right;
                if self.is_red(uncle) {
                    self.slab.node_mut(p).red = false;
                    self.slab.node_mut(uncle.unwrap()).red = false;
                    self.slab.node_mut(g).red = true;
                    z = g;
                } else {
                    if self.slab.node(p).right == Some(z) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.slab.node(z).parent.unwrap();
                    let g = self.slab.node(p).parent.unwrap();
                    self.slab.node_mut(p).red = false;
                    self.slab.node_mut(g).red = true;
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.slab.node(g).left;
                if self.is_red(uncle) {
                    self.slab.node_mut(p).red = false;
                    self.slab.node_mut(uncle.unwrap()).red = false;
                    self.slab.node_mut(g).red = true;
                    z = g;
                } else {
                    if self.slab.node(p).left == Some(z) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.slab.node(z).parent.unwrap();
                    let g = self.slab.node(p).parent.unwrap();
                    self.slab.node_mut(p).red = false;
                    self.slab.node_mut(g).red = true;
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root.unwrap();
        self.slab.node_mut(root).red = false;
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`.
    fn transplant(&mut self, u: u32, v: Option<u32>) {
        let p = self.slab.node(u).parent;
        match p {
            None => self.root = v,
            Some(p) => {
                if self.slab.node(p).left == Some(u) {
                    self.slab.node_mut(p).left = v;
                } else {
                    self.slab.node_mut(p).right = v;
                }
            }
        }
        if let Some(v) = v {
            self.slab.node_mut(v).parent = p;
        }
    }

    /// Remove `z` from the tree, leaving the slot allocated with cleared
    /// links.
    fn unlink(&mut self, z: u32) {
        let zl = self.slab.node(z).left;
        let zr = self.slab.node(z).right;
        let x;
        let x_parent;
        let removed_red;
        match (zl, zr) {
            (None, _) => {
                x = zr;
                x_parent = self.slab.node(z).parent;
                removed_red = self.slab.node(z).red;
                self.transplant(z, zr);
            }
            (_, None) => {
                x = zl;
                x_parent = self.slab.node(z).parent;
                removed_red = self.slab.node(z).red;
                self.transplant(z, zl);
            }
            (Some(_), Some(zr)) => {
                let y = self.leftmost(zr);
                removed_red = self.slab.node(y).red;
                x = self.slab.node(y).right;
                if self.slab.node(y).parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.slab.node(y).parent;
                    self.transplant(y, self.slab.node(y).right);
                    let zr = self.slab.node(z).right.unwrap();
                    self.slab.node_mut(y).right = Some(zr);
                    self.slab.node_mut(zr).parent = Some(y);
                }
                self.transplant(z, Some(y));
                let zl = self.slab.node(z).left.unwrap();
                self.slab.node_mut(y).left = Some(zl);
                self.slab.node_mut(zl).parent = Some(y);
                let z_red = self.slab.node(z).red;
                self.slab.node_mut(y).red = z_red;
            }
        }
        if !removed_red {
            self.delete_fixup(x, x_parent);
        }
        let n = self.slab.node_mut(z);
        n.left = None;
        n.right = None;
        n.parent = None;
        n.red = false;
    }

    fn delete_fixup(&mut self, mut x: Option<u32>, mut parent: Option<u32>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else { break };
            if self.slab.node(p).left == x {
                let mut w = self.slab.node(p).right.unwrap();
                if self.slab.node(w).red {
                    self.slab.node_mut(w).red = false;
                    self.slab.node_mut(p).red = true;
                    self.rotate_left(p);
                    w = self.slab.node(p).right.unwrap();
                }
                let wl = self.slab.node(w).left;
                let wr = self.slab.node(w).right;
                if !self.is_red(wl) && !self.is_red(wr) {
                    self.slab.node_mut(w).red = true;
                    x = Some(p);
                    parent = self.slab.node(p).parent;
                } else {
                    if !self.is_red(wr) {
                        if let Some(wl) = wl {
                            self.slab.node_mut(wl).red = false;
                        }
                        self.slab.node_mut(w).red = true;
                        self.rotate_right(w);
                        w = self.slab.node(p).right.unwrap();
                    }
                    let p_red = self.slab.node(p).red;
                    self.slab.node_mut(w).red = p_red;
                    self.slab.node_mut(p).red = false;
                    if let Some(wr) = self.slab.node(w).right {
                        self.slab.node_mut(wr).red = false;
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let mut w = self.slab.node(p).left.unwrap();
                if self.slab.node(w).red {
                    self.slab.node_mut(w).red = false;
                    self.slab.node_mut(p).red = true;
                    self.rotate_right(p);
                    w = self.slab.node(p).left.unwrap();
                }
                let wl = self.slab.node(w).left;
                let wr = self.slab.node(w).right;
                if !self.is_red(wl) && !self.is_red(wr) {
                    self.slab.node_mut(w).red = true;
                    x = Some(p);
                    parent = self.slab.node(p).parent;
                } else {
                    if !self.is_red(wl) {
                        if let Some(wr) = wr {
                            self.slab.node_mut(wr).red = false;
                        }
                        self.slab.node_mut(w).red = true;
                        self.rotate_left(w);
                        w = self.slab.node(p).left.unwrap();
                    }
                    let p_red = self.slab.node(p).red;
                    self.slab.node_mut(w).red = p_red;
                    self.slab.node_mut(p).red = false;
                    if let Some(wl) = self.slab.node(w).left {
                        self.slab.node_mut(wl).red = false;
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        if let Some(x) = x {
            self.slab.node_mut(x).red = false;
        }
    }
}

impl<K: Ord, V> ReferenceableHeap<K, V> for RbHeap<K, V> {
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
        let r = self.slab.alloc(RbNode {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            red: true,
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

impl<K: Ord, V> MeldableHeap<K, V> for RbHeap<K, V> {
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
        exercise(RbHeap::new(), &ops);
    }

    #[test]
    fn meld_is_multiset_union() {
        exercise_meld::<RbHeap<i64, usize>>(&[9, 1, 5, 5], &[3]);
    }

    #[test]
    fn survives_many_ordered_inserts() {
        let mut h: RbHeap<i64, usize> = RbHeap::new();
        for i in 0..200 {
            h.insert(i, i as usize);
        }
        for i in 0..200 {
            assert_eq!(h.extract_min().unwrap(), (i, i as usize));
        }
    }
}
