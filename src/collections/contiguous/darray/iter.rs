use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

use super::{DArray, RawDArray};
use crate::alloc::{Allocator, Global};

/// A type for owned iteration over a [`DArray`]. Produces values of type `T`.
///
/// See [`DArray::into_iter`].
pub struct IntoIter<T, A: Allocator = Global> {
    pub(crate) raw: RawDArray<A>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// Returns the remaining elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Every element in start..end is initialized and hasn't been yielded yet.
        unsafe {
            slice::from_raw_parts(
                self.raw.as_ptr().cast::<T>().add(self.start),
                self.end - self.start,
            )
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: start < end, so the value is initialized and is only read once because start is
        // incremented afterwards.
        let value = unsafe { self.raw.slot(self.start).cast::<T>().read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;
        // SAFETY: end has been decremented but is still >= start, so the value is initialized and
        // won't be read again.
        Some(unsafe { self.raw.slot(self.end).cast::<T>().read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: The remaining values haven't been yielded, so they still need to be dropped. The
        // block itself is released when self.raw is dropped.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.raw.slot(self.start).cast::<T>(),
                self.end - self.start,
            ));
        }
    }
}

impl<T: Debug, A: Allocator> Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> IntoIterator for DArray<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let end = self.len();
        // Take the raw array out without running DArray's drop, which would drop the elements.
        let arr = ManuallyDrop::new(self);
        // SAFETY: arr is never used or dropped again, so ownership of raw moves into the iterator.
        let raw = unsafe { ptr::read(&arr.raw) };

        IntoIter {
            raw,
            start: 0,
            end,
            _phantom: PhantomData,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DArray<T, A> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DArray<T, A> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
