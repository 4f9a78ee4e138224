use std::alloc::Layout;
use std::ptr::{self, NonNull};

use libc::c_void;

use super::{dangling, Allocator, OutOfMemory};

/// The smallest alignment that malloc guarantees on every supported platform.
const MIN_ALIGN: usize = 2 * size_of::<usize>();

/// An allocator over the C heap, using `malloc`, `calloc` and `free` from `libc`.
///
/// Over-aligned layouts are served by `posix_memalign`, which can also be released with `free`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Malloc;

impl Malloc {
    const fn fits_min_align(layout: Layout) -> bool {
        layout.align() <= MIN_ALIGN && layout.align() <= layout.size()
    }

    fn aligned(layout: Layout) -> *mut c_void {
        let mut out = ptr::null_mut();
        let align = layout.align().max(size_of::<usize>());
        // SAFETY: align is a power of two and a multiple of size_of::<*mut c_void>().
        match unsafe { libc::posix_memalign(&mut out, align, layout.size()) } {
            0 => out,
            _ => ptr::null_mut(),
        }
    }
}

// SAFETY: malloc, calloc and posix_memalign return unique blocks of at least the requested size,
// which remain valid until passed to free.
unsafe impl Allocator for Malloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        let block = if Self::fits_min_align(layout) {
            // SAFETY: Always safe to call, a null return is handled below.
            unsafe { libc::malloc(layout.size()) }
        } else {
            Self::aligned(layout)
        };

        NonNull::new(block.cast()).ok_or_else(|| layout.into())
    }

    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if !Self::fits_min_align(layout) || layout.size() == 0 {
            let block = self.allocate(layout)?;
            // SAFETY: The block is valid for writes of layout.size() bytes.
            unsafe { block.as_ptr().write_bytes(0, layout.size()); }
            return Ok(block);
        }

        // SAFETY: Always safe to call, a null return is handled below.
        NonNull::new(unsafe { libc::calloc(1, layout.size()) }.cast()).ok_or_else(|| layout.into())
    }

    unsafe fn deallocate(&self, block: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: The caller guarantees that block came from this allocator, so it came from
            // one of the malloc family.
            unsafe { libc::free(block.as_ptr().cast()) }
        }
    }
}
