use std::alloc::Layout;
use std::borrow::{Borrow, BorrowMut};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use super::header::Field;
use super::raw::{RawDArray, DEFAULT_CAP};
use super::DArrayError;
use crate::alloc::{Allocator, Global};
use crate::util::error::EmptyCollection;
use crate::util::result::ResultExtension;

/// A generic growable array, storing its capacity, length and stride in the same allocation as its
/// elements.
///
/// DArray is the typed counterpart of [`RawDArray`], with the stride fixed to `size_of::<T>()`.
/// Values are moved in and out instead of being copied as bytes, and all initialized elements are
/// available as a slice through [`Deref`].
///
/// # Growth
/// An element can only be added while `len + 1 < cap`. When that no longer holds, the whole
/// allocation is moved into a new one with twice the capacity, invalidating any raw pointers
/// previously obtained from the array. Indices stay valid, and the borrow checker prevents
/// references into the array from surviving a push.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DArray.
/// - `i`: The index of the item in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_at` | `O(n-i)` |
/// | `pop` | `O(1)` |
/// | `pop_at` | `O(n-i)` |
/// | `clear` | `O(n)` |
///
/// \* If the DArray has to grow, `push` will take `O(n)`.
///
/// # Zero-Sized Types
/// Every element must occupy at least one byte, so using a zero-sized `T` is a compile time error.
pub struct DArray<T, A: Allocator = Global> {
    pub(crate) raw: RawDArray<A>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> DArray<T> {
    /// Creates a new DArray in the [`Global`] allocator with the default capacity of one.
    ///
    /// # Errors
    /// Returns an error if the allocator is out of memory.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let arr: DArray<u32> = DArray::new().unwrap();
    /// assert_eq!(arr.len(), 0);
    /// assert_eq!(arr.cap(), 1);
    /// assert_eq!(arr.stride(), 4);
    /// ```
    pub fn new() -> Result<DArray<T>, DArrayError> {
        DArray::new_in(Global)
    }

    /// Creates a new DArray in the [`Global`] allocator with room for `capacity` elements.
    ///
    /// # Errors
    /// Returns an error if the allocation size overflows or the allocator is out of memory.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let arr: DArray<u8> = DArray::with_capacity(5).unwrap();
    /// assert_eq!(arr.cap(), 5);
    /// ```
    pub fn with_capacity(capacity: u64) -> Result<DArray<T>, DArrayError> {
        DArray::with_capacity_in(capacity, Global)
    }
}

impl<T, A: Allocator> DArray<T, A> {
    /// Creates a new DArray in the provided allocator with the default capacity of one.
    ///
    /// # Errors
    /// Returns an error if the allocator is out of memory.
    pub fn new_in(alloc: A) -> Result<DArray<T, A>, DArrayError> {
        DArray::with_capacity_in(DEFAULT_CAP, alloc)
    }

    /// Creates a new DArray in the provided allocator with room for `capacity` elements. A
    /// `capacity` of zero is treated as one.
    ///
    /// # Errors
    /// Returns an error if the allocation size overflows or the allocator is out of memory.
    pub fn with_capacity_in(capacity: u64, alloc: A) -> Result<DArray<T, A>, DArrayError> {
        const { assert!(size_of::<T>() != 0, "DArray doesn't support zero-sized types") };

        Ok(DArray {
            raw: RawDArray::with_layout_in(capacity, Layout::new::<T>(), alloc)?,
            _phantom: PhantomData,
        })
    }

    /// Returns the number of elements in the DArray.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the DArray contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let mut arr = DArray::new().unwrap();
    /// assert!(arr.is_empty());
    /// arr.push(1_u8).unwrap();
    /// assert!(!arr.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of elements that fit in the current allocation.
    pub fn cap(&self) -> usize {
        self.raw.cap()
    }

    /// Returns the size in bytes of each element, which is always `size_of::<T>()`.
    pub fn stride(&self) -> usize {
        self.raw.stride()
    }

    /// Reads one of the header fields. See [`RawDArray::field`].
    pub fn field(&self, field: Field) -> u64 {
        self.raw.field(field)
    }

    /// Overwrites one of the header fields. See [`RawDArray::set_field`].
    ///
    /// # Safety
    /// In addition to the requirements of [`RawDArray::set_field`], elements that are no longer
    /// covered by the length are leaked rather than dropped, and every element covered by the
    /// length must be a valid `T`.
    pub unsafe fn set_field(&mut self, field: Field, value: u64) -> u64 {
        // SAFETY: Upheld by the caller.
        unsafe { self.raw.set_field(field, value) }
    }

    /// Returns a pointer to the first element. The pointer is invalidated whenever the DArray grows
    /// or is dropped.
    pub fn as_ptr(&self) -> *const T {
        self.raw.as_ptr().cast()
    }

    /// Returns a reference to the allocator backing this DArray.
    pub const fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// Returns the underlying type-erased array.
    pub const fn as_raw(&self) -> &RawDArray<A> {
        &self.raw
    }

    /// Pushes the provided value onto the end of the DArray, growing first if required.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`](crate::alloc::OutOfMemory) or
    /// [`CapacityOverflow`](super::CapacityOverflow) if growth was required but
    /// failed. In that case, `value` is dropped and the DArray is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let mut arr = DArray::with_capacity(1).unwrap();
    /// for _ in 0..3 {
    ///     arr.push(1_u32).unwrap();
    /// }
    /// assert_eq!(&*arr, &[1, 1, 1]);
    /// assert_eq!(arr.cap(), 4);
    /// ```
    pub fn push(&mut self, value: T) -> Result<(), DArrayError> {
        self.raw.reserve_one()?;

        let len = self.len();
        // SAFETY: reserve_one guarantees that slot len is within the allocation.
        unsafe {
            self.slot(len).write(value);
            self.raw.set_len(len + 1);
        }
        Ok(())
    }

    /// Inserts the provided value at `index`, moving all following elements one slot to the right.
    ///
    /// # Errors
    /// - [`IndexOutOfBounds`](super::IndexOutOfBounds) if `index >= len`. Inserting
    ///   at `len` is rejected as well, use [`push`](DArray::push) for that.
    /// - [`OutOfMemory`](crate::alloc::OutOfMemory) or
    ///   [`CapacityOverflow`](super::CapacityOverflow) if growth was required but
    ///   failed.
    ///
    /// In both cases, `value` is dropped and the DArray is unchanged.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let mut arr: DArray<u32> = [10, 20, 30].into_iter().collect();
    /// arr.push_at(1, 99).unwrap();
    /// assert_eq!(&*arr, &[10, 99, 20, 30]);
    /// assert!(arr.push_at(4, 0).unwrap_err().is_index_out_of_bounds());
    /// ```
    pub fn push_at(&mut self, index: usize, value: T) -> Result<(), DArrayError> {
        self.raw.check_index(index)?;
        self.raw.reserve_one()?;

        let len = self.len();
        // SAFETY: index < len and there is room for len + 1 elements. The value at index has been
        // moved to index + 1, so overwriting it doesn't leak or duplicate anything.
        unsafe {
            self.raw.open_gap(index);
            self.slot(index).write(value);
            self.raw.set_len(len + 1);
        }
        Ok(())
    }

    /// Removes the last element of the DArray and returns it. The capacity is never reduced.
    ///
    /// # Errors
    /// Returns [`EmptyCollection`] if the DArray has no elements.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let mut arr: DArray<u32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(arr.pop(), Ok(3));
    /// assert_eq!(arr.len(), 2);
    /// ```
    pub fn pop(&mut self) -> Result<T, DArrayError> {
        match self.len() {
            0 => {
                log::warn!("rejected pop from an empty darray");
                Err(EmptyCollection.into())
            },
            len => self.pop_at(len - 1),
        }
    }

    /// Removes the element at `index` and returns it, moving all following elements one slot to
    /// the left.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`](super::IndexOutOfBounds) if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use basis_lib::collections::contiguous::DArray;
    /// let mut arr: DArray<char> = "Hello".chars().collect();
    /// assert_eq!(arr.pop_at(1), Ok('e'));
    /// assert_eq!(&*arr, &['H', 'l', 'l', 'o']);
    /// ```
    pub fn pop_at(&mut self, index: usize) -> Result<T, DArrayError> {
        self.raw.check_index(index)?;

        let len = self.len();
        // SAFETY: index < len, so the value is initialized. It is read out before the gap is
        // closed over it, so it is moved rather than duplicated.
        unsafe {
            let value = self.slot(index).read();
            self.raw.close_gap(index);
            self.raw.set_len(len - 1);
            Ok(value)
        }
    }

    /// Drops every element, keeping the current allocation.
    pub fn clear(&mut self) {
        let elements: *mut [T] = &mut **self;
        // Zero the length first, so that a panicking destructor can only leak.
        self.raw.clear();
        // SAFETY: The elements were initialized and are no longer reachable through self.
        unsafe { ptr::drop_in_place(elements) }
    }

    /// # Safety
    /// `index` must be at most the capacity of the DArray.
    unsafe fn slot(&self, index: usize) -> *mut T {
        // SAFETY: Upheld by the caller.
        unsafe { self.raw.slot(index).cast() }
    }
}

impl<T, A: Allocator> Extend<T> for DArray<T, A> {
    /// # Panics
    /// Panics if the DArray fails to grow.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item).throw();
        }
    }
}

impl<T> FromIterator<T> for DArray<T> {
    /// # Panics
    /// Panics if the DArray can't be allocated or fails to grow.
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let iter = value.into_iter();
        // One extra slot, because the DArray grows as soon as len + 1 reaches the capacity. The
        // lower bound is only a hint, so an unsatisfiable one falls back to the default capacity.
        let hint = (iter.size_hint().0 as u64).saturating_add(1);
        let mut arr = DArray::with_capacity(hint).or_else(|_| DArray::new()).throw();
        arr.extend(iter);
        arr
    }
}

impl<T, A: Allocator> Drop for DArray<T, A> {
    fn drop(&mut self) {
        // SAFETY: All values less than len are initialized and safe to drop. The allocation itself
        // is released when self.raw is dropped.
        unsafe { ptr::drop_in_place::<[T]>(&mut **self) }
    }
}

impl<T, A: Allocator> Deref for DArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The payload is aligned for T and valid as a slice of len initialized values. The
        // borrow checker enforces that self isn't mutated (and can't grow) while it is borrowed.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }
}

impl<T, A: Allocator> DerefMut for DArray<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for Deref, with self borrowed uniquely.
        unsafe { slice::from_raw_parts_mut(self.raw.payload().as_ptr().cast(), self.len()) }
    }
}

impl<T, A: Allocator> AsRef<[T]> for DArray<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> AsMut<[T]> for DArray<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, A: Allocator> Borrow<[T]> for DArray<T, A> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for DArray<T, A> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

// SAFETY: DArrays uniquely own their elements, so they can be sent when T and the allocator can.
unsafe impl<T: Send, A: Allocator + Send> Send for DArray<T, A> {}
// SAFETY: DArray's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for DArray<T, A> {}

impl<T: Clone, A: Allocator + Clone> Clone for DArray<T, A> {
    /// # Panics
    /// Panics if the new DArray can't be allocated.
    fn clone(&self) -> Self {
        let mut arr = DArray::with_capacity_in(self.cap() as u64, self.allocator().clone()).throw();
        arr.extend(self.iter().cloned());
        arr
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for DArray<T, A> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq, A: Allocator> Eq for DArray<T, A> {}

impl<T: Hash, A: Allocator> Hash for DArray<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug, A: Allocator> Debug for DArray<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DArray")
            .field("contents", &&**self)
            .field("len", &self.len())
            .field("cap", &self.cap())
            .finish()
    }
}
