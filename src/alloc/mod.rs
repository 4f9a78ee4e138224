//! Allocation capabilities consumed by the collections in this crate.
//!
//! Collections never decide where their memory comes from. Instead, they are generic over an
//! [`Allocator`], which hands out and takes back raw blocks described by a [`Layout`](std::alloc::Layout).
//! Each block a collection creates, grows into or releases maps to exactly one call on its
//! allocator, there is no pooling or caching in between.
//!
//! Two allocators are provided:
//! - [`Global`], which forwards to the allocator registered with [`std::alloc`].
//! - [`Malloc`], which talks to the C heap directly through `libc`. (Requires the `libc` feature.)

mod allocator;
mod error;
mod global;
#[cfg(all(feature = "libc", unix))]
mod malloc;

pub use allocator::*;
pub use error::*;
pub use global::*;
#[cfg(all(feature = "libc", unix))]
pub use malloc::*;
