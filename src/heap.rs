use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use core::{
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ptr::NonNull,
};

use crate::error::{Error, Result};
use crate::utils::{IsZST, capacity_overflow};

/// An owned heap allocation of `capacity` uninitialized slots.
///
/// The region owns memory only. It never reads, writes or drops elements;
/// the container moves its elements in and out and keeps track of which slots are live.
///
/// Dropping the region releases the allocation, so replacing one region with another
/// (or with [`HeapRegion::empty`]) is how the container gives memory back.
///
/// For zero sized types nothing is allocated, but the capacity is still recorded.
pub(crate) struct HeapRegion<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for HeapRegion<T> {}
unsafe impl<T: Sync> Sync for HeapRegion<T> {}

impl<T> HeapRegion<T> {
    /// A region that owns no memory.
    #[inline(always)]
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate a region of `capacity` slots, reporting failure as [`Error::AllocationFailure`].
    ///
    /// Fails without allocating if `capacity * size_of::<T>()` would exceed `isize::MAX`.
    pub(crate) fn try_allocate(capacity: usize) -> Result<Self> {
        if T::IS_ZST || capacity == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: capacity,
                _marker: PhantomData,
            });
        }

        let layout =
            Layout::array::<T>(capacity).map_err(|_| Error::AllocationFailure { capacity })?;

        // SAFETY: `T` is not ZST and `capacity > 0`, so the layout has a non-zero size.
        let raw = unsafe { alloc(layout) } as *mut T;

        match NonNull::new(raw) {
            Some(ptr) => Ok(Self {
                ptr,
                cap: capacity,
                _marker: PhantomData,
            }),
            None => Err(Error::AllocationFailure { capacity }),
        }
    }

    /// Allocate a region of `capacity` slots.
    ///
    /// # Panics
    /// Panics if the byte size overflows `isize::MAX`.
    /// Aborts through [`handle_alloc_error`] if the allocator fails.
    pub(crate) fn allocate(capacity: usize) -> Self {
        match Self::try_allocate(capacity) {
            Ok(region) => region,
            Err(_) => match Layout::array::<T>(capacity) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => capacity_overflow(),
            },
        }
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    /// Give up ownership of the allocation without releasing it.
    ///
    /// The caller becomes responsible for freeing `(ptr, capacity)` with
    /// the layout `Layout::array::<T>(capacity)`.
    #[inline]
    pub(crate) fn into_raw_parts(self) -> (*mut T, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr.as_ptr(), this.cap)
    }
}

impl<T> Drop for HeapRegion<T> {
    fn drop(&mut self) {
        if !T::IS_ZST && self.cap > 0 {
            // SAFETY: the same layout was accepted by `Layout::array` when allocating.
            unsafe {
                dealloc(
                    self.ptr.as_ptr() as *mut u8,
                    Layout::from_size_align_unchecked(
                        mem::size_of::<T>() * self.cap,
                        mem::align_of::<T>(),
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HeapRegion;
    use crate::Error;

    #[test]
    fn empty_owns_nothing() {
        let region = HeapRegion::<u64>::empty();
        assert_eq!(region.capacity(), 0);
    }

    #[test]
    fn allocate_and_write() {
        let region = HeapRegion::<u64>::allocate(6);
        assert_eq!(region.capacity(), 6);
        unsafe {
            for i in 0..6 {
                region.as_ptr().add(i).write(i as u64 * 10);
            }
            assert_eq!(*region.as_ptr().add(5), 50);
        }
    }

    #[test]
    fn zst_records_capacity() {
        let region = HeapRegion::<()>::allocate(1000);
        assert_eq!(region.capacity(), 1000);
    }

    #[test]
    fn oversized_request_fails() {
        let err = HeapRegion::<u64>::try_allocate(usize::MAX).err();
        assert_eq!(err, Some(Error::AllocationFailure { capacity: usize::MAX }));
    }
}
