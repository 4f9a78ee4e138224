use std::alloc::Layout;

use crate::util::error::CapacityOverflow;

/// Identifies one of the metadata fields stored in front of a [`DArray`](super::DArray)'s
/// elements.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The number of elements that fit in the current allocation.
    Capacity,
    /// The number of initialized elements.
    Length,
    /// The size in bytes of a single element.
    Stride,
}

impl Field {
    pub const COUNT: usize = 3;
}

/// The metadata block that occupies the start of every allocation, directly followed by the
/// payload.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header([u64; Field::COUNT]);

impl Header {
    pub(crate) const fn new(capacity: u64, stride: u64) -> Header {
        let mut fields = [0; Field::COUNT];
        fields[Field::Capacity as usize] = capacity;
        fields[Field::Stride as usize] = stride;
        Header(fields)
    }

    pub(crate) const fn get(&self, field: Field) -> u64 {
        self.0[field as usize]
    }

    pub(crate) const fn set(&mut self, field: Field, value: u64) {
        self.0[field as usize] = value;
    }
}

/// The layout of one header + payload allocation, along with the offset of the payload from the
/// start of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockLayout {
    pub(crate) layout: Layout,
    pub(crate) offset: usize,
    pub(crate) align: usize,
}

impl BlockLayout {
    /// Computes the layout for `capacity` elements of `stride` bytes each, with the payload aligned
    /// to `align`.
    ///
    /// # Errors
    /// Returns [`CapacityOverflow`] if the total size can't be represented by a [`Layout`].
    pub(crate) fn new(capacity: u64, stride: u64, align: usize) -> Result<BlockLayout, CapacityOverflow> {
        let bytes = capacity.checked_mul(stride)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or(CapacityOverflow)?;

        let payload = Layout::from_size_align(bytes, align).map_err(|_| CapacityOverflow)?;
        let (layout, offset) = Layout::new::<Header>()
            .extend(payload)
            .map_err(|_| CapacityOverflow)?;

        Ok(BlockLayout {
            layout: layout.pad_to_align(),
            offset,
            align,
        })
    }
}
