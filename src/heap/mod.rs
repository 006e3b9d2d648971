//! Referenceable heaps.
//!
//! An ordered bag of `(key, value)` pairs. Every insertion hands back a
//! [`HeapRef`] that stays valid across arbitrary heap mutations until
//! that element is removed, which is what lets Dijkstra and Prim call
//! [`ReferenceableHeap::decrease_key`] on elements sitting somewhere in
//! the middle of the structure.
//!
//! All implementations allocate nodes from an internal arena and address
//! them by 32-bit slot indices, so there are no ownership cycles and
//! handle resolution is O(1). Slots carry a reuse generation: a handle
//! used after its element left the heap fails with `IllegalState` instead
//! of silently touching a recycled node.
//!
//! One caveat on [`MeldableHeap::meld`]: the melded-in heap's nodes are
//! rehomed into the surviving arena, so handles into the *consumed* heap
//! are invalidated. Handles into the surviving heap stay valid.

mod binary;
pub use self::binary::*;
mod binomial;
pub use self::binomial::*;
mod fibonacci;
pub use self::fibonacci::*;
mod pairing;
pub use self::pairing::*;
mod rb_tree;
pub use self::rb_tree::*;
mod splay;
pub use self::splay::*;

use crate::{GraphError, Result};

/// Stable, opaque handle to one heap element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapRef {
    pub(crate) slot: u32,
    pub(crate) gen: u32,
}

/// A priority queue whose elements can be addressed after insertion.
pub trait ReferenceableHeap<K: Ord, V> {
    fn new() -> Self
    where
        Self: Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an element and return a handle to it.
    fn insert(&mut self, key: K, value: V) -> HeapRef;

    /// The element with the least key, untouched.
    fn find_min(&self) -> Option<(&K, &V)>;

    /// Remove and return the element with the least key.
    fn extract_min(&mut self) -> Option<(K, V)>;

    /// Lower the key of the element behind `r` to `new_key`.
    ///
    /// Fails with `InvalidArgument` if `new_key` is greater than the
    /// current key and with `IllegalState` if `r` is stale.
    fn decrease_key(&mut self, r: HeapRef, new_key: K) -> Result<()>;

    /// Remove the element behind `r`, wherever it sits.
    fn remove(&mut self, r: HeapRef) -> Result<(K, V)>;

    /// Peek the element behind `r`.
    fn get(&self, r: HeapRef) -> Result<(&K, &V)>;

    fn clear(&mut self);
}

/// Heaps that can absorb another instance of themselves.
pub trait MeldableHeap<K: Ord, V>: ReferenceableHeap<K, V> {
    /// Move every element of `other` into `self`.
    ///
    /// Handles into `other` become stale; see the module docs.
    fn meld(&mut self, other: Self);
}

/// Runtime choice of a heap implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    Binary,
    Binomial,
    Fibonacci,
    Pairing,
    RedBlack,
    Splay,
}

/// Build a boxed heap of the requested kind.
///
/// Algorithms in this crate monomorphise over a heap type parameter
/// instead; this factory is for callers who pick the kind at runtime.
pub fn new_heap<K, V>(kind: HeapKind) -> Box<dyn ReferenceableHeap<K, V>>
where
    K: Ord + 'static,
    V: 'static,
{
    match kind {
        HeapKind::Binary => Box::new(BinaryHeap::new()),
        HeapKind::Binomial => Box::new(BinomialHeap::new()),
        HeapKind::Fibonacci => Box::new(FibonacciHeap::new()),
        HeapKind::Pairing => Box::new(PairingHeap::new()),
        HeapKind::RedBlack => Box::new(RbHeap::new()),
        HeapKind::Splay => Box::new(SplayHeap::new()),
    }
}

/// Generation-tagged node arena shared by the heap implementations.
///
/// Internal links between nodes are raw slot indices; only the handles
/// that cross the API boundary carry the generation tag.
pub(crate) struct Slab<N> {
    entries: Vec<SlabEntry<N>>,
    free: Vec<u32>,
    live: usize,
}

struct SlabEntry<N> {
    gen: u32,
    node: Option<N>,
}

impl<N> Slab<N> {
    pub(crate) fn new() -> Self {
        Self {
            entries: vec![],
            free: vec![],
            live: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn alloc(&mut self, node: N) -> HeapRef {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.entries[slot as usize];
            debug_assert!(entry.node.is_none());
            entry.node = Some(node);
            HeapRef {
                slot,
                gen: entry.gen,
            }
        } else {
            let slot = self.entries.len() as u32;
            self.entries.push(SlabEntry { gen: 0, node: Some(node) });
            HeapRef { slot, gen: 0 }
        }
    }

    pub(crate) fn release(&mut self, slot: u32) -> N {
        let entry = &mut self.entries[slot as usize];
        let node = entry.node.take().unwrap();
        entry.gen = entry.gen.wrapping_add(1);
        self.free.push(slot);
        self.live -= 1;
        node
    }

    pub(crate) fn node(&self, slot: u32) -> &N {
        self.entries[slot as usize].node.as_ref().unwrap()
    }

    pub(crate) fn node_mut(&mut self, slot: u32) -> &mut N {
        self.entries[slot as usize].node.as_mut().unwrap()
    }

    /// Turn an externally supplied handle into a live slot index.
    pub(crate) fn resolve(&self, r: HeapRef) -> Result<u32> {
        match self.entries.get(r.slot as usize) {
            Some(entry) if entry.gen == r.gen && entry.node.is_some() => Ok(r.slot),
            _ => Err(GraphError::IllegalState(
                "heap handle is stale".to_string(),
            )),
        }
    }

    pub(crate) fn clear(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if entry.node.take().is_some() {
                entry.gen = entry.gen.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
        self.live = 0;
    }

    /// Drain all live nodes, for melding into another arena.
    pub(crate) fn drain_nodes(self) -> impl Iterator<Item = N> {
        self.entries.into_iter().filter_map(|e| e.node)
    }
}
