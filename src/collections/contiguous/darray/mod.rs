//! A module containing [`DArray`], its type-erased counterpart [`RawDArray`] and associated types.
//!
//! Both arrays share one memory representation: a single allocation holding a header of three
//! [`u64`] fields (see [`Field`]), immediately followed by the elements. [`RawDArray`] treats
//! elements as runs of `stride` bytes, while [`DArray`] fixes the stride to the size of its
//! element type.
//!
//! [`DArray`] is also re-exported under the parent module.

mod darray;
mod error;
mod header;
mod iter;
mod raw;

pub use darray::*;
pub use error::*;
pub use header::Field;
pub use iter::*;
pub use raw::*;
