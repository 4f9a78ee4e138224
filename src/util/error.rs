use derive_more::{Display, Error};

/// The requested index was not within the initialized elements of a collection.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("index {index} out of bounds for collection with {len} elements")]
pub struct IndexOutOfBounds {
    /// The rejected index.
    pub index: usize,
    /// The length of the collection at the time.
    pub len: usize,
}

/// The capacity of a collection can't be represented by a valid memory layout.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("capacity overflow")]
pub struct CapacityOverflow;

/// An element was requested from a collection that holds none.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("collection is empty")]
pub struct EmptyCollection;

/// A raw element didn't have the byte length of the collection's stride.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("expected an element of {expected} bytes, found {found}")]
pub struct StrideMismatch {
    /// The stride of the collection.
    pub expected: usize,
    /// The length of the provided slice.
    pub found: usize,
}
