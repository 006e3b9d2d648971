use thiserror::Error;

/// Failures surfaced by graph operations and algorithms.
///
/// Algorithms validate their preconditions once on entry and fail fast;
/// there are no partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Malformed input, e.g. a negative weight handed to Dijkstra.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The algorithm rejects the shape of the given graph.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Vertex index out of range.
    #[error("no such vertex: {0}")]
    NoSuchVertex(usize),
    /// Edge index out of range.
    #[error("no such edge: {0}")]
    NoSuchEdge(usize),
    /// Operation not allowed in the current state, e.g. mutating a frozen
    /// graph or using a heap handle after its element was removed.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
