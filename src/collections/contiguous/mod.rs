//! Contiguous collection types, currently just the growable [`DArray`] and its type-erased
//! counterpart, [`RawDArray`].

pub mod darray;

#[doc(inline)]
pub use darray::{DArray, DArrayError, Field, RawDArray};
