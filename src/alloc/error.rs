use std::alloc::Layout;

use derive_more::{Display, Error};

/// An allocator was unable to provide a block for the requested layout.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("out of memory while allocating {size} bytes with alignment {align}")]
pub struct OutOfMemory {
    pub size: usize,
    pub align: usize,
}

impl From<Layout> for OutOfMemory {
    fn from(value: Layout) -> Self {
        OutOfMemory {
            size: value.size(),
            align: value.align(),
        }
    }
}
