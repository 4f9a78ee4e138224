use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::alloc::{Allocator, Global, OutOfMemory};

#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// Wraps [`Global`], recording every call and refusing to allocate once `limit` blocks have been
/// handed out.
#[derive(Debug, Default)]
pub struct CountingAlloc {
    pub allocs: Cell<usize>,
    pub deallocs: Cell<usize>,
    pub live_bytes: Cell<usize>,
    pub limit: Option<usize>,
}

impl CountingAlloc {
    pub fn new() -> CountingAlloc {
        CountingAlloc::default()
    }

    pub fn with_limit(limit: usize) -> CountingAlloc {
        CountingAlloc {
            limit: Some(limit),
            ..CountingAlloc::default()
        }
    }
}

// SAFETY: Every block comes straight from Global.
unsafe impl Allocator for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if self.limit.is_some_and(|limit| self.allocs.get() >= limit) {
            return Err(layout.into());
        }

        let block = Global.allocate(layout)?;
        self.allocs.set(self.allocs.get() + 1);
        self.live_bytes.set(self.live_bytes.get() + layout.size());
        Ok(block)
    }

    unsafe fn deallocate(&self, block: NonNull<u8>, layout: Layout) {
        self.deallocs.set(self.deallocs.get() + 1);
        self.live_bytes.set(self.live_bytes.get() - layout.size());
        // SAFETY: The block was allocated through Global with the same layout.
        unsafe { Global.deallocate(block, layout) }
    }
}
