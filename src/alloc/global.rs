use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::{dangling, Allocator, OutOfMemory};

/// The allocator registered with [`std::alloc`], usually the system allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

// SAFETY: std::alloc upholds the same contract for non-zero layouts, and zero-sized layouts are
// never passed through.
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // SAFETY: Zero-sized layouts have been guarded against.
        NonNull::new(unsafe { alloc::alloc(layout) }).ok_or_else(|| layout.into())
    }

    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // SAFETY: Zero-sized layouts have been guarded against.
        NonNull::new(unsafe { alloc::alloc_zeroed(layout) }).ok_or_else(|| layout.into())
    }

    unsafe fn deallocate(&self, block: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: The caller guarantees that block came from this allocator with layout.
            unsafe { alloc::dealloc(block.as_ptr(), layout) }
        }
    }
}
