//! This crate is the foundation I build my other projects on: a growable array, the allocators it
//! draws memory from and a small logging context.
//!
//! # Purpose
//! Most of my small projects end up needing the same handful of pieces, so rather than rewriting
//! them each time they live here. The centrepiece is [`DArray`](collections::contiguous::DArray),
//! which keeps its capacity, length and stride in the same allocation as its elements.
//!
//! # Method
//! [`RawDArray`](collections::contiguous::RawDArray) is the type-erased version, where every
//! element is just `stride` bytes. [`DArray`](collections::contiguous::DArray) sits on top of it,
//! fixing the stride to the size of its element type and moving values in and out properly. Both
//! draw their memory from an [`Allocator`](alloc::Allocator), one call per allocation, with no
//! pooling in between.
//!
//! # Error Handling
//! Unlike [`Vec`], none of the array operations panic on failure. Running out of memory, indexing
//! past the end or popping from an empty array are all reported as a
//! [`DArrayError`](collections::contiguous::DArrayError), and the array is left exactly as it was.
//! The exceptions are trait implementations like [`Extend`] and [`Clone`], which have no way to
//! return an error and panic with its message instead, and creating a
//! [`RawDArray`](collections::contiguous::RawDArray) with a stride of zero, which is a bug in the
//! caller rather than a failure.
//!
//! Errors are strongly typed, using small structs that implement [`Error`](std::error::Error),
//! composed into enums for static dispatch.
//!
//! # Logging
//! Internally, diagnostics are emitted through the [`log`] facade: growth at `trace` and rejected
//! operations at `warn`. The [`logger`] module provides an explicit context which can write them
//! out, if installed.
//!
//! # Features
//! - `collections`: [`DArray`](collections::contiguous::DArray) and friends.
//! - `logger`: The [`Logger`](logger::Logger) context.
//! - `libc`: The [`Malloc`](alloc::Malloc) allocator, on unix platforms.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
#[cfg(feature = "collections")]
pub mod collections;
#[cfg(feature = "logger")]
pub mod logger;

pub(crate) mod util;
