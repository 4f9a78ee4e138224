use derive_more::{Display, Error, From, IsVariant, TryInto};

pub use crate::alloc::OutOfMemory;
pub use crate::util::error::{CapacityOverflow, EmptyCollection, IndexOutOfBounds, StrideMismatch};

/// The ways in which an operation on a [`DArray`](super::DArray) or
/// [`RawDArray`](super::RawDArray) can fail. A failed operation never leaves the array in a
/// partially modified state.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, TryInto, IsVariant)]
pub enum DArrayError {
    OutOfMemory(OutOfMemory),
    CapacityOverflow(CapacityOverflow),
    IndexOutOfBounds(IndexOutOfBounds),
    Empty(EmptyCollection),
    StrideMismatch(StrideMismatch),
}
