use std::alloc::Layout;
use std::fmt::{self, Debug, Formatter};
use std::ptr::{self, NonNull};
use std::slice;

use super::header::{BlockLayout, Field, Header};
use super::DArrayError;
use crate::alloc::{Allocator, Global, OutOfMemory};
use crate::util::error::{CapacityOverflow, EmptyCollection, IndexOutOfBounds, StrideMismatch};

/// The capacity used by [`DArray::new`](super::DArray::new), and the minimum for all arrays.
pub const DEFAULT_CAP: u64 = 1;

/// The factor applied to the capacity whenever an array runs out of room.
pub const GROWTH_FACTOR: u64 = 2;

/// A type-erased growable array. Elements are opaque runs of `stride` bytes, copied in and out of
/// the array as byte slices.
///
/// Each RawDArray owns a single allocation, which starts with a header holding the capacity,
/// length and stride of the array (see [`Field`]) and is followed by the elements themselves. The
/// header always travels with its elements, so growing the array moves both at once.
///
/// # Growth
/// Before an element is added, the array grows if `length + 1 >= capacity`, meaning that the
/// length always stays strictly below the capacity. Growing allocates a new block with
/// [`GROWTH_FACTOR`] times the capacity, copies over the initialized elements and releases the old
/// block. The address returned by [`as_ptr`](RawDArray::as_ptr) changes whenever this happens,
/// although element indices remain valid.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `field` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_at` | `O(n-i)` |
/// | `pop` | `O(1)` |
/// | `pop_at` | `O(n-i)` |
///
/// \* If the array has to grow, `push` will take `O(n)`.
pub struct RawDArray<A: Allocator = Global> {
    pub(crate) header: NonNull<Header>,
    pub(crate) block: BlockLayout,
    pub(crate) alloc: A,
}

impl RawDArray {
    /// Creates a new RawDArray in the [`Global`] allocator, with room for `capacity` elements of
    /// `stride` bytes each. Elements are only guaranteed to be byte-aligned.
    ///
    /// # Errors
    /// Returns an error if the allocation size overflows or the allocator is out of memory.
    ///
    /// # Panics
    /// Panics if `stride` is zero.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::RawDArray;
    /// let arr = RawDArray::with_capacity(4, 4).unwrap();
    /// assert_eq!(arr.cap(), 4);
    /// assert_eq!(arr.stride(), 4);
    /// assert!(arr.is_empty());
    /// ```
    pub fn with_capacity(capacity: u64, stride: usize) -> Result<RawDArray, DArrayError> {
        let element = Layout::from_size_align(stride, 1).map_err(|_| CapacityOverflow)?;
        RawDArray::with_layout_in(capacity, element, Global)
    }
}

impl<A: Allocator> RawDArray<A> {
    /// Creates a new RawDArray with room for `capacity` elements described by `element`, using the
    /// provided allocator. The stride of the array is the size of `element`, padded to its
    /// alignment, and the block is zeroed. A `capacity` of zero is raised to [`DEFAULT_CAP`].
    ///
    /// # Errors
    /// Returns an error if the allocation size overflows or the allocator is out of memory.
    ///
    /// # Panics
    /// Panics if `element` has a size of zero.
    pub fn with_layout_in(
        capacity: u64,
        element: Layout,
        alloc: A,
    ) -> Result<RawDArray<A>, DArrayError> {
        assert!(element.size() != 0, "RawDArray elements must have a non-zero stride");

        let element = element.pad_to_align();
        let capacity = capacity.max(DEFAULT_CAP);
        let stride = element.size() as u64;

        let block = BlockLayout::new(capacity, stride, element.align())?;
        let header = Self::alloc_block(&alloc, block, Header::new(capacity, stride))?;

        Ok(RawDArray {
            header,
            block,
            alloc,
        })
    }

    /// Reads one of the header fields.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::{Field, RawDArray};
    /// let mut arr = RawDArray::with_capacity(2, 8).unwrap();
    /// arr.push(&[0; 8]).unwrap();
    /// assert_eq!(arr.field(Field::Length), 1);
    /// assert_eq!(arr.field(Field::Capacity), 2);
    /// assert_eq!(arr.field(Field::Stride), 8);
    /// ```
    pub fn field(&self, field: Field) -> u64 {
        // SAFETY: The header is always initialized and lives as long as self.
        unsafe { self.header.as_ref() }.get(field)
    }

    /// Overwrites one of the header fields, returning the value now stored.
    ///
    /// # Safety
    /// No checks are performed. The caller must ensure that afterwards:
    /// - The capacity still matches the current allocation.
    /// - The length is less than the capacity and all elements below it are initialized.
    /// - The stride is unchanged.
    pub unsafe fn set_field(&mut self, field: Field, value: u64) -> u64 {
        // SAFETY: The header is always initialized and self is borrowed uniquely.
        let header = unsafe { self.header.as_mut() };
        header.set(field, value);
        header.get(field)
    }

    /// Returns the number of elements in the array.
    pub fn len(&self) -> usize {
        self.field(Field::Length) as usize
    }

    /// Returns true if the array contains no elements.
    pub fn is_empty(&self) -> bool {
        self.field(Field::Length) == 0
    }

    /// Returns the number of elements that fit in the current allocation.
    pub fn cap(&self) -> usize {
        self.field(Field::Capacity) as usize
    }

    /// Returns the size in bytes of each element.
    pub fn stride(&self) -> usize {
        self.field(Field::Stride) as usize
    }

    /// Returns a pointer to the first element. The pointer is invalidated whenever the array grows
    /// or is dropped.
    pub fn as_ptr(&self) -> *const u8 {
        self.payload().as_ptr().cast_const()
    }

    /// Returns a reference to the allocator backing this array.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the bytes of the element at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len() {
            return None;
        }
        let stride = self.stride();
        Some(&self.as_bytes()[index * stride..(index + 1) * stride])
    }

    /// Returns all initialized elements as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: The first len * stride bytes of the payload are within the allocation and
        // initialized, because the block was zeroed when allocated.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len() * self.stride()) }
    }

    /// Appends a copy of `value` to the end of the array, growing first if required.
    ///
    /// # Errors
    /// - [`StrideMismatch`] if `value` isn't exactly `stride` bytes long.
    /// - [`OutOfMemory`] or [`CapacityOverflow`] if growth was required but failed.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::RawDArray;
    /// let mut arr = RawDArray::with_capacity(1, 4).unwrap();
    /// for _ in 0..3 {
    ///     arr.push(&1_u32.to_ne_bytes()).unwrap();
    /// }
    /// assert_eq!(arr.len(), 3);
    /// assert_eq!(arr.cap(), 4);
    /// assert_eq!(arr.get(2), Some(&1_u32.to_ne_bytes()[..]));
    /// ```
    pub fn push(&mut self, value: &[u8]) -> Result<(), DArrayError> {
        self.check_stride(value.len())?;
        self.reserve_one()?;

        let len = self.len();
        // SAFETY: reserve_one guarantees that slot len is within the allocation, and value can't
        // overlap with self while self is borrowed mutably.
        unsafe {
            ptr::copy_nonoverlapping(value.as_ptr(), self.slot(len), value.len());
            self.set_len(len + 1);
        }
        Ok(())
    }

    /// Inserts a copy of `value` at `index`, moving every following element one slot to the right.
    ///
    /// # Errors
    /// - [`StrideMismatch`] if `value` isn't exactly `stride` bytes long.
    /// - [`IndexOutOfBounds`] if `index >= len`. Inserting one past the end is rejected as well,
    ///   use [`push`](RawDArray::push) for that.
    /// - [`OutOfMemory`] or [`CapacityOverflow`] if growth was required but failed.
    ///
    /// The array is left unchanged if an error is returned.
    pub fn push_at(&mut self, index: usize, value: &[u8]) -> Result<(), DArrayError> {
        self.check_stride(value.len())?;
        self.check_index(index)?;
        self.reserve_one()?;

        let len = self.len();
        // SAFETY: index < len and there is room for len + 1 elements.
        unsafe {
            self.open_gap(index);
            ptr::copy_nonoverlapping(value.as_ptr(), self.slot(index), value.len());
            self.set_len(len + 1);
        }
        Ok(())
    }

    /// Removes the last element of the array, copying its bytes into `out` if provided. The
    /// capacity is never reduced.
    ///
    /// # Errors
    /// - [`EmptyCollection`] if there is nothing to remove.
    /// - [`StrideMismatch`] if `out` isn't exactly `stride` bytes long.
    pub fn pop(&mut self, out: Option<&mut [u8]>) -> Result<(), DArrayError> {
        match self.len() {
            0 => {
                log::warn!("rejected pop from an empty darray");
                Err(EmptyCollection.into())
            },
            len => self.pop_at(len - 1, out),
        }
    }

    /// Removes the element at `index`, copying its bytes into `out` if provided and moving every
    /// following element one slot to the left.
    ///
    /// # Errors
    /// - [`StrideMismatch`] if `out` isn't exactly `stride` bytes long.
    /// - [`IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::RawDArray;
    /// let mut arr = RawDArray::with_capacity(4, 1).unwrap();
    /// for byte in [1, 2, 3] {
    ///     arr.push(&[byte]).unwrap();
    /// }
    /// let mut out = [0];
    /// arr.pop_at(0, Some(&mut out)).unwrap();
    /// assert_eq!(out, [1]);
    /// assert_eq!(arr.as_bytes(), &[2, 3]);
    /// ```
    pub fn pop_at(&mut self, index: usize, out: Option<&mut [u8]>) -> Result<(), DArrayError> {
        if let Some(out) = &out {
            self.check_stride(out.len())?;
        }
        self.check_index(index)?;

        let len = self.len();
        // SAFETY: index < len, so the element is initialized and within the allocation.
        unsafe {
            if let Some(out) = out {
                ptr::copy_nonoverlapping(self.slot(index), out.as_mut_ptr(), out.len());
            }
            self.close_gap(index);
            self.set_len(len - 1);
        }
        Ok(())
    }

    /// Forgets every element without releasing the allocation.
    pub fn clear(&mut self) {
        // SAFETY: A length of zero is always valid.
        unsafe { self.set_len(0) }
    }

    /// Makes sure there is room for one more element, growing if the length would reach the
    /// capacity.
    pub(crate) fn reserve_one(&mut self) -> Result<(), DArrayError> {
        if self.field(Field::Length) + 1 >= self.field(Field::Capacity) {
            self.grow()?;
        }
        Ok(())
    }

    /// Moves the array into a new block with [`GROWTH_FACTOR`] times the capacity. On failure, the
    /// array still refers to the old block.
    pub(crate) fn grow(&mut self) -> Result<(), DArrayError> {
        let old_cap = self.field(Field::Capacity);
        let stride = self.field(Field::Stride);
        let len = self.field(Field::Length);

        let new_cap = old_cap.checked_mul(GROWTH_FACTOR).ok_or(CapacityOverflow)?;
        let block = BlockLayout::new(new_cap, stride, self.block.align)?;

        let mut header = Header::new(new_cap, stride);
        header.set(Field::Length, len);
        let new_header = Self::alloc_block(&self.alloc, block, header)?;

        // SAFETY: Both payloads can hold at least len elements and belong to separate blocks. The
        // old block came from self.alloc with self.block.layout, and is never used again.
        unsafe {
            ptr::copy_nonoverlapping(
                self.as_ptr(),
                new_header.cast::<u8>().add(block.offset).as_ptr(),
                (len * stride) as usize,
            );
            self.alloc.deallocate(self.header.cast(), self.block.layout);
        }

        log::trace!("darray grew from {old_cap} to {new_cap} elements, moving {len}");

        self.header = new_header;
        self.block = block;
        Ok(())
    }

    /// Checks that the provided index refers to an initialized element.
    pub(crate) fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        let len = self.len();
        if index >= len {
            log::warn!("rejected access at index {index} of darray with {len} elements");
            return Err(IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    fn check_stride(&self, found: usize) -> Result<(), StrideMismatch> {
        let expected = self.stride();
        if found != expected {
            return Err(StrideMismatch { expected, found });
        }
        Ok(())
    }

    pub(crate) fn payload(&self) -> NonNull<u8> {
        // SAFETY: The offset is within the block, as computed by BlockLayout.
        unsafe { self.header.cast::<u8>().add(self.block.offset) }
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// # Safety
    /// `index` must be at most the capacity of the array.
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut u8 {
        // SAFETY: The caller guarantees that the offset stays within the allocation (or one byte
        // past it).
        unsafe { self.payload().as_ptr().add(index * self.stride()) }
    }

    /// # Safety
    /// `len` must be less than the capacity, and all elements below it must be initialized.
    pub(crate) unsafe fn set_len(&mut self, len: usize) {
        // SAFETY: Upheld by the caller.
        unsafe { self.set_field(Field::Length, len as u64); }
    }

    /// Moves the elements in `index..len` one slot to the right, leaving slot `index` free to be
    /// overwritten. The length isn't changed.
    ///
    /// # Safety
    /// `index` must be less than or equal to len and there must be room for `len + 1` elements.
    pub(crate) unsafe fn open_gap(&mut self, index: usize) {
        let count = (self.len() - index) * self.stride();
        // SAFETY: Both ranges are within the allocation, ptr::copy handles the overlap.
        unsafe { ptr::copy(self.slot(index), self.slot(index + 1), count) }
    }

    /// Moves the elements in `index + 1..len` one slot to the left, overwriting slot `index`. The
    /// length isn't changed.
    ///
    /// # Safety
    /// `index` must be less than len.
    pub(crate) unsafe fn close_gap(&mut self, index: usize) {
        let count = (self.len() - index - 1) * self.stride();
        // SAFETY: Both ranges are within the initialized elements, ptr::copy handles the overlap.
        unsafe { ptr::copy(self.slot(index + 1), self.slot(index), count) }
    }

    fn alloc_block(
        alloc: &A,
        block: BlockLayout,
        header: Header,
    ) -> Result<NonNull<Header>, OutOfMemory> {
        let ptr = alloc.allocate_zeroed(block.layout)?.cast::<Header>();
        // SAFETY: The block starts with room for a Header and is aligned for it, because the
        // layout was extended from Layout::new::<Header>().
        unsafe { ptr.write(header); }
        Ok(ptr)
    }
}

impl<A: Allocator> Drop for RawDArray<A> {
    fn drop(&mut self) {
        // SAFETY: The block was allocated by self.alloc with self.block.layout, and self is never
        // used again.
        unsafe { self.alloc.deallocate(self.header.cast(), self.block.layout) }
    }
}

impl<A: Allocator> Debug for RawDArray<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDArray")
            .field("capacity", &self.field(Field::Capacity))
            .field("length", &self.field(Field::Length))
            .field("stride", &self.field(Field::Stride))
            .finish()
    }
}

// SAFETY: A RawDArray uniquely owns its block and only contains plain bytes, so it may move between
// threads along with its allocator.
unsafe impl<A: Allocator + Send> Send for RawDArray<A> {}
// SAFETY: Shared references only permit reads of the block.
unsafe impl<A: Allocator + Sync> Sync for RawDArray<A> {}
