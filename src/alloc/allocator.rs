use std::alloc::Layout;
use std::ptr::{self, NonNull};

use super::OutOfMemory;

/// A source of raw memory blocks.
///
/// # Safety
/// Implementors must ensure that:
/// - A block returned from [`allocate`](Allocator::allocate) or
///   [`allocate_zeroed`](Allocator::allocate_zeroed) is valid for reads and writes of
///   `layout.size()` bytes, aligned to `layout.align()` and not aliased by any other live block.
/// - The block stays valid until it is passed to [`deallocate`](Allocator::deallocate) on the same
///   allocator (or a reference to it).
pub unsafe trait Allocator {
    /// Allocates a block that fits `layout`. The contents of the block are uninitialized.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the underlying allocator couldn't provide the block. No retry is
    /// attempted.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory>;

    /// Allocates a block that fits `layout`, with every byte set to zero.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the underlying allocator couldn't provide the block.
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        let block = self.allocate(layout)?;
        // SAFETY: The block is valid for writes of layout.size() bytes.
        unsafe { block.as_ptr().write_bytes(0, layout.size()); }
        Ok(block)
    }

    /// Returns a block to the allocator.
    ///
    /// # Safety
    /// `block` must have been allocated by this allocator with the exact same `layout`, and must
    /// not be used after this call.
    unsafe fn deallocate(&self, block: NonNull<u8>, layout: Layout);
}

// SAFETY: Forwards directly to A, which upholds the contract itself.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        (**self).allocate(layout)
    }

    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        (**self).allocate_zeroed(layout)
    }

    unsafe fn deallocate(&self, block: NonNull<u8>, layout: Layout) {
        // SAFETY: The caller upholds the contract for A.
        unsafe { (**self).deallocate(block, layout) }
    }
}

/// Produces a well aligned, non-null pointer for a zero-sized layout. It must never be
/// dereferenced or deallocated.
pub(crate) const fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: Alignment is always a non-zero power of two.
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) }
}
