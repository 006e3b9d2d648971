use crate::{GraphError, Result};
use ahash::RandomState;
use std::any::Any;

/// A total function from vertex or edge indices to values of one scalar
/// type.
///
/// A column always covers the whole index range of its domain; the graph
/// extends and compacts it in the same step as the vertex/edge set
/// changes. On a frozen graph the structure is fixed but values stay
/// writable.
#[derive(Debug, Clone)]
pub struct Weights<T> {
    data: Vec<T>,
    default: T,
}

impl<T: Clone> Weights<T> {
    /// A standalone column of `len` slots, each holding `default`.
    ///
    /// Useful for scratch columns owned by the caller, e.g. the flow
    /// column handed to max-flow.
    pub fn with_size(len: usize, default: T) -> Self {
        Self {
            data: vec![default.clone(); len],
            default,
        }
    }

    pub fn get(&self, idx: usize) -> &T {
        &self.data[idx]
    }

    pub fn set(&mut self, idx: usize, value: T) {
        self.data[idx] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn fill(&mut self, value: T) {
        for slot in self.data.iter_mut() {
            *slot = value.clone();
        }
    }

    fn push_default(&mut self) {
        self.data.push(self.default.clone());
    }

    fn swap_remove(&mut self, idx: usize) {
        self.data.swap_remove(idx);
    }
}

/// Type-erased view the registry uses to resize columns in lockstep with
/// the graph.
trait Column: Any {
    fn push_default(&mut self);
    fn swap_remove(&mut self, idx: usize);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_box(&self) -> Box<dyn Column>;
}

impl<T: Clone + 'static> Column for Weights<T> {
    fn push_default(&mut self) {
        Weights::push_default(self)
    }

    fn swap_remove(&mut self, idx: usize) {
        Weights::swap_remove(self, idx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_box(&self) -> Box<dyn Column> {
        Box::new(self.clone())
    }
}

/// Named weight columns over one index domain (the vertices or the edges
/// of a graph).
pub struct WeightsRegistry {
    len: usize,
    columns: hashbrown::HashMap<String, Box<dyn Column>, RandomState>,
}

impl Clone for WeightsRegistry {
    fn clone(&self) -> Self {
        let mut columns =
            hashbrown::HashMap::with_capacity_and_hasher(self.columns.len(), RandomState::new());
        for (key, col) in self.columns.iter() {
            columns.insert(key.clone(), col.clone_box());
        }
        Self {
            len: self.len,
            columns,
        }
    }
}

impl WeightsRegistry {
    pub(crate) fn new() -> Self {
        Self {
            len: 0,
            columns: hashbrown::HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Create a column under `key`. Fails with `IllegalState` if the key
    /// is taken.
    pub fn add<T: Clone + 'static>(&mut self, key: &str, default: T) -> Result<()> {
        if self.columns.contains_key(key) {
            return Err(GraphError::IllegalState(format!(
                "weights column {:?} already exists",
                key
            )));
        }
        self.columns
            .insert(key.to_string(), Box::new(Weights::with_size(self.len, default)));
        Ok(())
    }

    /// Fetch a column for reading. `None` if the key is absent or names a
    /// column of a different scalar type.
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<&Weights<T>> {
        self.columns.get(key)?.as_any().downcast_ref()
    }

    /// Fetch a column for writing.
    pub fn get_mut<T: Clone + 'static>(&mut self, key: &str) -> Option<&mut Weights<T>> {
        self.columns.get_mut(key)?.as_any_mut().downcast_mut()
    }

    /// Detach a column from the registry, handing ownership to the
    /// caller. The registry no longer resizes it.
    pub fn take<T: Clone + 'static>(&mut self, key: &str) -> Option<Weights<T>> {
        if self.get::<T>(key).is_none() {
            return None;
        }
        let boxed = self.columns.remove(key)?;
        boxed.into_any().downcast::<Weights<T>>().ok().map(|b| *b)
    }

    /// Re-attach a previously taken column. Its length must match the
    /// current index range.
    pub fn put_back<T: Clone + 'static>(&mut self, key: &str, column: Weights<T>) -> Result<()> {
        if self.columns.contains_key(key) {
            return Err(GraphError::IllegalState(format!(
                "weights column {:?} already exists",
                key
            )));
        }
        if column.len() != self.len {
            return Err(GraphError::InvalidArgument(format!(
                "column has {} slots, domain has {}",
                column.len(),
                self.len
            )));
        }
        self.columns.insert(key.to_string(), Box::new(column));
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.columns.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(|k| k.as_str())
    }

    pub(crate) fn grow_one(&mut self) {
        self.len += 1;
        for col in self.columns.values_mut() {
            col.push_default();
        }
    }

    pub(crate) fn compact_swap(&mut self, idx: usize) {
        debug_assert!(idx < self.len);
        self.len -= 1;
        for col in self.columns.values_mut() {
            col.swap_remove(idx);
        }
    }
}

/// Real-valued edge weight function, the default track of the
/// algorithms.
pub trait WeightFn {
    fn weight(&self, e: usize) -> f64;
}

impl WeightFn for Weights<f64> {
    fn weight(&self, e: usize) -> f64 {
        *self.get(e)
    }
}

impl WeightFn for Weights<i64> {
    fn weight(&self, e: usize) -> f64 {
        *self.get(e) as f64
    }
}

impl<F: Fn(usize) -> f64> WeightFn for F {
    fn weight(&self, e: usize) -> f64 {
        self(e)
    }
}

/// Integer edge weight function, the track Dial and the integer SSSP
/// specialisation run on.
pub trait WeightFnInt {
    fn weight_int(&self, e: usize) -> i64;
}

impl WeightFnInt for Weights<i64> {
    fn weight_int(&self, e: usize) -> i64 {
        *self.get(e)
    }
}

impl WeightFnInt for Weights<i32> {
    fn weight_int(&self, e: usize) -> i64 {
        *self.get(e) as i64
    }
}

/// Every edge weighs one.
pub struct UnitWeight;

impl WeightFn for UnitWeight {
    fn weight(&self, _e: usize) -> f64 {
        1.0
    }
}

impl WeightFnInt for UnitWeight {
    fn weight_int(&self, _e: usize) -> i64 {
        1
    }
}
