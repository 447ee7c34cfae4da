use alloc::{boxed::Box, vec::Vec};
use core::{
    fmt,
    iter::FusedIterator,
    mem::{self, ManuallyDrop, MaybeUninit},
    ptr, slice,
};

use crate::DEFAULT_THRESHOLD;
use crate::error::{Error, Result};
use crate::heap::HeapRegion;
use crate::utils::{
    IsZST, capacity_overflow, cold_path, grown_capacity, split_range_bound, trace_transition,
};

/// A variable-length vector that stores up to `N` elements inline and spills to the heap beyond that.
///
/// `N` is the *threshold*. While the vector holds at most `N` elements they live in a
/// fixed-size buffer embedded in the vector itself, so no allocation happens at all.
/// The first operation that needs more room moves everything into a heap region of
/// `floor(1.5 * required)` slots. As soon as a removal brings the length back to `N`
/// or below, the elements move back inline and the heap region is released.
///
/// The storage mode is encoded in the capacity alone: `capacity() == N` means inline,
/// anything else means heap. A heap region is therefore never exactly `N` slots.
///
/// # Examples
///
/// ```
/// use vlvec::VlVec;
///
/// let mut vec: VlVec<i32, 4> = VlVec::new();
/// vec.push(1);
/// vec.push(2);
/// vec.push(3);
/// vec.push(4);
/// assert!(vec.is_inline());
/// assert_eq!(vec.capacity(), 4);
///
/// // The fifth element moves the data to the heap, with capacity floor(1.5 * 5).
/// vec.push(5);
/// assert!(!vec.is_inline());
/// assert_eq!(vec.capacity(), 7);
///
/// // Dropping back to the threshold moves it inline again.
/// vec.erase(0);
/// assert!(vec.is_inline());
/// assert_eq!(vec, [2, 3, 4, 5]);
/// ```
///
/// # Positions
///
/// Positions are plain indices. Methods that take a position panic when it is
/// out of bounds, and borrowed iterators keep the vector from being mutated,
/// so a stale position can never read moved memory.
pub struct VlVec<T, const N: usize = DEFAULT_THRESHOLD> {
    inline: [MaybeUninit<T>; N],
    heap: HeapRegion<T>,
    len: usize,
    cap: usize,
}

impl<T, const N: usize> Drop for VlVec<T, N> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` of the active region is initialized.
        // The heap region releases its memory in its own `Drop`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len));
        }
    }
}

/// Creates a [`VlVec`] containing the arguments.
///
/// The syntax is similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html).
/// More than `N` elements go straight to the heap.
///
/// # Examples
///
/// ```
/// # use vlvec::{vlvec, VlVec};
/// let vec: VlVec<String, 10> = vlvec![];
/// let vec: VlVec<i64, 10> = vlvec![1; 5]; // Need to support Clone.
/// let vec: VlVec<_, 10> = vlvec![1, 2, 3, 4];
/// ```
#[macro_export]
macro_rules! vlvec {
    [] => { $crate::VlVec::new() };
    [$elem:expr; $n:expr] => { $crate::VlVec::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::VlVec::from_buf([ $($item),+ ]) };
}

impl<T, const N: usize> VlVec<T, N> {
    /// The inline capacity of this vector type.
    pub const THRESHOLD: usize = N;

    /// Constructs a new, empty `VlVec` with inline storage active.
    ///
    /// Note that the inline buffer is part of the value itself.
    /// `N` should not be too large to avoid stack overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::VlVec;
    /// let vec: VlVec<i32, 8> = VlVec::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.capacity(), 8);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self {
            // SAFETY: Full buffer uninitialized to internal uninitialized is safe.
            inline: unsafe { MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init() },
            heap: HeapRegion::empty(),
            len: 0,
            cap: N,
        }
    }

    /// Creates a `VlVec` from an exactly sized sequence.
    ///
    /// The length is measured once, before any element is read. If it exceeds `N`,
    /// a heap region of `floor(1.5 * n)` slots is allocated up front, otherwise the
    /// elements are stored inline. The elements keep their order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::VlVec;
    /// let vec: VlVec<i32, 4> = VlVec::from_exact_iter(1..4);
    /// assert!(vec.is_inline());
    ///
    /// let vec: VlVec<i32, 4> = VlVec::from_exact_iter(1..7);
    /// assert!(!vec.is_inline());
    /// assert_eq!(vec.capacity(), 9);
    /// assert_eq!(vec, [1, 2, 3, 4, 5, 6]);
    /// ```
    pub fn from_exact_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut vec = Self::new();
        vec.insert_range(0, items);
        vec
    }

    /// Creates a `VlVec` from an array.
    ///
    /// If `P > N`, heap storage will be used.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::VlVec;
    /// let vec: VlVec<i32, 5> = VlVec::from_buf([1, 2, 3]);
    /// assert_eq!(vec.len(), 3);
    /// assert!(vec.is_inline());
    /// ```
    #[inline]
    pub fn from_buf<const P: usize>(arr: [T; P]) -> Self {
        Self::from_exact_iter(arr)
    }

    /// Returns a raw pointer to the active region.
    ///
    /// This is the only place that decides which region holds the elements:
    /// the inline buffer when `capacity == N`, the heap region otherwise.
    ///
    /// The pointer is invalidated by any operation that changes the storage mode
    /// or reallocates.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        if self.cap == N {
            &raw const self.inline as *const T
        } else {
            self.heap.as_ptr() as *const T
        }
    }

    /// Returns a raw mutable pointer to the active region.
    ///
    /// See [`as_ptr`](VlVec::as_ptr).
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        if self.cap == N {
            &raw mut self.inline as *mut T
        } else {
            self.heap.as_ptr()
        }
    }

    /// Returns the number of elements in the vector.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector contains no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the active region.
    ///
    /// This is exactly `N` while the data is inline, and some other value
    /// not smaller than [`len`](VlVec::len) while it is on the heap.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns the inline capacity `N`.
    #[inline(always)]
    pub const fn threshold(&self) -> usize {
        N
    }

    /// Return `true` if the data is stored in the inline buffer.
    ///
    /// # Example
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<i32, 2> = vlvec![1, 2];
    /// assert!(vec.is_inline());
    ///
    /// vec.push(3);
    /// assert!(!vec.is_inline());
    /// ```
    #[inline(always)]
    pub const fn is_inline(&self) -> bool {
        self.cap == N
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` of the active region is initialized.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` of the active region is initialized.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Unlike indexing with `[]`, an out of range index is reported as an error.
    /// For access without any bounds check, use `get_unchecked` through the slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec, Error};
    /// let vec: VlVec<_, 4> = vlvec![10, 20, 30];
    /// assert_eq!(vec.at(1), Ok(&20));
    /// assert_eq!(vec.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        if index < self.len {
            // SAFETY: index < len
            Ok(unsafe { &*self.as_ptr().add(index) })
        } else {
            Err(Error::OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// See [`at`](VlVec::at).
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index < self.len {
            // SAFETY: index < len
            Ok(unsafe { &mut *self.as_mut_ptr().add(index) })
        } else {
            Err(Error::OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Returns `true` if the vector contains an element equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let vec: VlVec<_, 4> = vlvec!["a", "b"];
    /// assert!(vec.contains(&"b"));
    /// assert!(!vec.contains(&"c"));
    /// ```
    #[inline]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().iter().any(|item| item == value)
    }

    /// Move the elements into `region` and make it the active region.
    ///
    /// Any previous heap region is released.
    ///
    /// # Safety
    /// `region.capacity() > self.cap` and `region.capacity() != N`.
    #[inline(never)]
    unsafe fn relocate_to_heap(&mut self, region: HeapRegion<T>) {
        debug_assert!(region.capacity() > self.cap);
        debug_assert!(region.capacity() != N);

        if !T::IS_ZST {
            // SAFETY: the new region has room for `len` elements and does not overlap.
            unsafe {
                ptr::copy_nonoverlapping(self.as_ptr(), region.as_ptr(), self.len);
            }
        }

        if self.cap == N {
            trace_transition!("inline" => "heap", self.len, region.capacity());
        } else {
            trace_transition!("heap" => "heap", self.len, region.capacity());
        }

        self.cap = region.capacity();
        self.heap = region;
    }

    /// Move the elements from the heap back into the inline buffer and release the heap region.
    ///
    /// # Safety
    /// Heap storage is active and `len <= N`.
    #[inline(never)]
    unsafe fn relocate_to_inline(&mut self) {
        debug_assert!(self.cap != N && self.len <= N);

        if !T::IS_ZST {
            // SAFETY: `len <= N` and the two regions are distinct.
            unsafe {
                ptr::copy_nonoverlapping(
                    self.heap.as_ptr(),
                    &raw mut self.inline as *mut T,
                    self.len,
                );
            }
        }

        trace_transition!("heap" => "inline", self.len, N);

        self.cap = N;
        self.heap = HeapRegion::empty();
    }

    /// Ensure room for `incoming` more elements, growing once if needed.
    #[inline]
    fn grow_for(&mut self, incoming: usize) {
        let Some(required) = self.len.checked_add(incoming) else {
            capacity_overflow();
        };
        if required > self.cap {
            let region = HeapRegion::allocate(grown_capacity(required));
            // SAFETY: grown_capacity(required) >= required > cap >= N
            unsafe { self.relocate_to_heap(region) };
        }
    }

    /// Fallible version of [`grow_for`](VlVec::grow_for).
    #[inline]
    fn try_grow_for(&mut self, incoming: usize) -> Result<()> {
        let Some(required) = self.len.checked_add(incoming) else {
            return Err(Error::AllocationFailure {
                capacity: usize::MAX,
            });
        };
        if required > self.cap {
            let region = HeapRegion::try_allocate(grown_capacity(required))?;
            // SAFETY: grown_capacity(required) >= required > cap >= N
            unsafe { self.relocate_to_heap(region) };
        }
        Ok(())
    }

    /// Return to inline storage if the heap is active and the length fits inline.
    #[inline]
    fn shrink_check(&mut self) {
        if self.cap != N && self.len <= N {
            // SAFETY: checked above.
            unsafe { self.relocate_to_inline() };
        }
    }

    /// Appends an element without checking capacity.
    ///
    /// # Safety
    /// `len < capacity`
    #[inline(always)]
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.cap);
        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// If `len + additional` exceeds the capacity, the data moves to a heap region
    /// of `floor(1.5 * (len + additional))` slots. Otherwise nothing happens.
    ///
    /// # Panics
    /// Panics if the new capacity overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<i32, 8> = vlvec![];
    /// vec.reserve(5);
    /// assert!(vec.is_inline());
    ///
    /// vec.reserve(10);
    /// assert!(!vec.is_inline());
    /// assert_eq!(vec.capacity(), 15);
    /// ```
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.grow_for(additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// Same growth rule as [`reserve`](VlVec::reserve), but allocation failure and
    /// capacity overflow are returned as [`Error::AllocationFailure`] and leave the
    /// vector unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec, Error};
    /// let mut vec: VlVec<u64, 4> = vlvec![1, 2];
    /// assert!(vec.try_reserve(10).is_ok());
    /// assert!(matches!(vec.try_reserve(usize::MAX), Err(Error::AllocationFailure { .. })));
    /// assert_eq!(vec, [1, 2]);
    /// ```
    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.try_grow_for(additional)
    }

    /// Appends an element to the back of the vector.
    ///
    /// If the active region is full, the data first moves to a heap region
    /// of `floor(1.5 * (len + 1))` slots.
    ///
    /// # Time complexity
    /// Takes amortized O(1) time.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 4> = vlvec![1, 2];
    /// vec.push(3);
    /// assert_eq!(vec, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        self.grow_for(1);
        // SAFETY: grow_for(1) ensures len < capacity.
        unsafe { self.push_unchecked(value) };
    }

    /// Appends an element, reporting allocation failure instead of aborting.
    ///
    /// On failure the vector is unchanged and `value` is dropped.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<()> {
        self.try_grow_for(1)?;
        // SAFETY: try_grow_for(1) ensures len < capacity.
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Removes the last element and returns it, or `None` if the vector is empty.
    ///
    /// If the data is on the heap and the remaining length is at most `N`,
    /// it moves back inline.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 2> = vlvec![1, 2, 3];
    /// assert!(!vec.is_inline());
    /// assert_eq!(vec.pop(), Some(3));
    /// assert!(vec.is_inline());
    /// assert_eq!(vec, [1, 2]);
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            cold_path();
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` is initialized and no longer live.
        let value = unsafe { ptr::read(self.as_ptr().add(self.len)) };
        self.shrink_check();
        Some(value)
    }

    /// Inserts an element at position `index`, shifting all elements after it to the right.
    ///
    /// Returns `index`, the position of the inserted element.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 4> = vlvec!['a', 'b', 'c'];
    ///
    /// vec.insert(1, 'd');
    /// assert_eq!(vec, ['a', 'd', 'b', 'c']);
    /// assert!(vec.is_inline());
    ///
    /// vec.insert(4, 'e');
    /// assert_eq!(vec, ['a', 'd', 'b', 'c', 'e']);
    /// assert!(!vec.is_inline());
    /// ```
    pub fn insert(&mut self, index: usize, element: T) -> usize {
        assert!(index <= self.len, "insertion index should be <= len");
        self.grow_for(1);

        // SAFETY: index <= len < capacity
        unsafe {
            let ptr = self.as_mut_ptr().add(index);
            if index < self.len {
                ptr::copy(ptr, ptr.add(1), self.len - index);
            }
            ptr::write(ptr, element);
        }
        self.len += 1;
        index
    }

    /// Inserts every element of `items` at position `index`, keeping their order.
    ///
    /// The number of incoming elements is taken from [`ExactSizeIterator::len`] once,
    /// so the vector grows at most once for the whole batch.
    ///
    /// Returns `index`, the position of the first inserted element.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// If the iterator yields fewer elements than it reported, the gap is closed;
    /// surplus elements are not consumed.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 4> = vlvec![1, 2];
    /// let at = vec.insert_range(1, [10, 11, 12]);
    ///
    /// assert_eq!(at, 1);
    /// assert_eq!(vec, [1, 10, 11, 12, 2]);
    /// assert_eq!(vec.capacity(), 7);
    /// ```
    pub fn insert_range<I>(&mut self, index: usize, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        assert!(index <= self.len, "insertion index should be <= len");

        let mut items = items.into_iter();
        let count = items.len();
        if count == 0 {
            return index;
        }
        self.grow_for(count);

        let old_len = self.len;
        let tail_len = old_len - index;
        let mut written = 0;

        // SAFETY: capacity >= old_len + count, so both the shifted tail and the gap fit.
        // The tail is outside the live range while the iterator runs; a panic leaks it.
        unsafe {
            let base = self.as_mut_ptr();
            ptr::copy(base.add(index), base.add(index + count), tail_len);
            self.len = index;

            while written < count {
                let Some(item) = items.next() else { break };
                ptr::write(base.add(index + written), item);
                written += 1;
            }

            self.len = old_len + written;
            if written < count {
                ptr::copy(base.add(index + count), base.add(index + written), tail_len);
                self.shrink_check();
            }
        }

        index
    }

    /// Removes and returns the element at position `index`, shifting all elements after it to the left.
    ///
    /// If the data is on the heap and the remaining length is at most `N`,
    /// it moves back inline.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut v: VlVec<_, 4> = vlvec!['a', 'b', 'c'];
    /// assert_eq!(v.remove(1), 'b');
    /// assert_eq!(v, ['a', 'c']);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "removal index should be < len");

        // SAFETY: index < len
        let value = unsafe {
            let ptr = self.as_mut_ptr().add(index);
            let value = ptr::read(ptr);
            ptr::copy(ptr.add(1), ptr, self.len - index - 1);
            value
        };
        self.len -= 1;
        self.shrink_check();
        value
    }

    /// Removes the element at position `index` and returns `index`,
    /// which is now the position of the element that followed it.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut v: VlVec<_, 4> = vlvec![1, 2, 3];
    /// let next = v.erase(0);
    /// assert_eq!(v[next], 2);
    /// ```
    #[inline]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Removes the elements in `range` and returns the start of the range,
    /// which is now the position of the first element after it.
    ///
    /// # Panics
    /// Panics if the range has `start > end` or `end > len`.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut v: VlVec<_, 3> = vlvec![1, 2, 3, 4, 5, 6];
    /// assert!(!v.is_inline());
    ///
    /// let next = v.erase_range(1..4);
    /// assert_eq!(next, 1);
    /// assert_eq!(v, [1, 5, 6]);
    /// assert!(v.is_inline());
    /// ```
    pub fn erase_range<R: core::ops::RangeBounds<usize>>(&mut self, range: R) -> usize {
        let (start, end) = split_range_bound(&range, self.len);
        assert!(start <= end, "erase range start should be <= end");
        assert!(end <= self.len, "erase range end should be <= len");

        let count = end - start;
        if count == 0 {
            self.shrink_check();
            return start;
        }

        let old_len = self.len;
        // SAFETY: start <= end <= len. The tail is outside the live range while
        // the erased elements drop; a panicking drop leaks it.
        unsafe {
            let base = self.as_mut_ptr();
            self.len = start;
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), count));
            ptr::copy(base.add(end), base.add(start), old_len - end);
        }
        self.len = old_len - count;

        self.shrink_check();
        start
    }

    /// Shortens the vector, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater or equal to the vector's current length, this has no effect.
    /// Otherwise the usual shrink rule applies.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail_len = self.len - len;
        self.len = len;
        // SAFETY: `[len, len + tail_len)` was live and is no longer reachable.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.as_mut_ptr().add(len),
                tail_len,
            ));
        }
        self.shrink_check();
    }

    /// Retains only the elements specified by the predicate, keeping their order.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut v: VlVec<_, 4> = vlvec![1, 2, 3, 4, 5, 6];
    /// v.retain(|x| x % 2 == 0);
    /// assert_eq!(v, [2, 4, 6]);
    /// assert!(v.is_inline());
    /// ```
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut f: F) {
        let old_len = self.len;
        // Nothing is live while the predicate runs; a panic leaks instead of double dropping.
        self.len = 0;

        let mut kept = 0;
        // SAFETY: every index below old_len is read exactly once, then either moved or dropped.
        unsafe {
            let base = self.as_mut_ptr();
            for i in 0..old_len {
                let cur = base.add(i);
                if f(&*cur) {
                    if kept != i {
                        ptr::copy_nonoverlapping(cur, base.add(kept), 1);
                    }
                    kept += 1;
                } else {
                    ptr::drop_in_place(cur);
                }
            }
        }

        self.len = kept;
        self.shrink_check();
    }

    /// Clears the vector, removing all values.
    ///
    /// Unlike [`Vec::clear`], this releases the heap region and makes inline storage active again.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 4> = vlvec![1, 2, 3, 4, 5];
    /// assert!(!vec.is_inline());
    /// vec.clear();
    /// assert!(vec.is_empty());
    /// assert!(vec.is_inline());
    /// assert_eq!(vec.capacity(), 4);
    /// ```
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        // SAFETY: `[0, len)` was live and is no longer reachable.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), len));
        }
        if self.cap != N {
            trace_transition!("heap" => "inline", 0usize, N);
            self.cap = N;
            self.heap = HeapRegion::empty();
        }
    }

    /// Convert [`VlVec`] to [`Vec`].
    ///
    /// If the data is inline, the exact memory will be allocated.
    /// If the data is on the heap, the allocation is handed over without copying.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let vec: VlVec<_, 2> = vlvec![1, 2, 3];
    /// let vec: Vec<i32> = vec.into_vec();
    /// assert_eq!(vec, [1, 2, 3]);
    /// assert_eq!(vec.capacity(), 4);
    /// ```
    pub fn into_vec(mut self) -> Vec<T> {
        let len = self.len;
        if self.cap == N || T::IS_ZST {
            let mut vec: Vec<T> = Vec::with_capacity(len);
            // SAFETY: the elements are moved out and `self.len` is reset before drop.
            unsafe {
                ptr::copy_nonoverlapping(self.as_ptr(), vec.as_mut_ptr(), len);
                vec.set_len(len);
            }
            self.len = 0;
            vec
        } else {
            let region = mem::replace(&mut self.heap, HeapRegion::empty());
            self.len = 0;
            self.cap = N;
            let (ptr, cap) = region.into_raw_parts();
            // SAFETY: the region was allocated by the global allocator with `Layout::array::<T>(cap)`.
            unsafe { Vec::from_raw_parts(ptr, len, cap) }
        }
    }

    /// Converts the [`VlVec`] into [`Box<[T]>`](Box).
    #[inline]
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.into_vec().into_boxed_slice()
    }
}

impl<T: Clone, const N: usize> VlVec<T, N> {
    /// Creates a `VlVec` with `num` copies of `elem`.
    ///
    /// If `num > N`, a heap region of `floor(1.5 * num)` slots is used.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::VlVec;
    /// let vec: VlVec<i32, 5> = VlVec::from_elem(1, 4);
    /// assert_eq!(vec, [1, 1, 1, 1]);
    /// assert!(vec.is_inline());
    ///
    /// let vec: VlVec<i32, 5> = VlVec::from_elem(1, 6);
    /// assert_eq!(vec.capacity(), 9);
    /// ```
    pub fn from_elem(elem: T, num: usize) -> Self {
        let mut vec = Self::new();
        vec.grow_for(num);
        if num > 0 {
            // SAFETY: capacity >= num
            unsafe {
                for _ in 1..num {
                    vec.push_unchecked(elem.clone());
                }
                // Reduce one copy.
                vec.push_unchecked(elem);
            }
        }
        vec
    }

    /// Clones every element of `other` into position `index`.
    ///
    /// See [`insert_range`](VlVec::insert_range).
    #[inline]
    pub fn insert_slice(&mut self, index: usize, other: &[T]) -> usize {
        self.insert_range(index, other.iter().cloned())
    }

    /// Clones and appends all elements in a slice to the `VlVec`.
    ///
    /// # Examples
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 5> = vlvec![1];
    /// vec.extend_from_slice(&[2, 3, 4]);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// ```
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.grow_for(other.len());
        for item in other {
            // SAFETY: capacity >= len + other.len()
            unsafe { self.push_unchecked(item.clone()) };
        }
    }

    /// Resizes the `VlVec` in-place so that `len` is equal to `new_len`.
    ///
    /// Growing fills the new slots with clones of `value` and follows the growth rule;
    /// shrinking truncates and follows the shrink rule.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let mut vec: VlVec<_, 5> = vlvec!["hello"];
    /// vec.resize(3, "world");
    /// assert_eq!(vec, ["hello", "world", "world"]);
    ///
    /// let mut vec: VlVec<_, 2> = vlvec!['a', 'b', 'c', 'd'];
    /// vec.resize(2, '_');
    /// assert_eq!(vec, ['a', 'b']);
    /// assert!(vec.is_inline());
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        let extra = new_len - self.len;
        self.grow_for(extra);
        // SAFETY: capacity >= new_len
        unsafe {
            for _ in 1..extra {
                self.push_unchecked(value.clone());
            }
            self.push_unchecked(value);
        }
    }
}

impl<T, const N: usize> Default for VlVec<T, N> {
    /// Constructs a new, empty [`VlVec`] with inline storage active.
    ///
    /// It's eq to [`VlVec::new`] .
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for VlVec<T, N> {
    /// Deep copy with independent storage.
    ///
    /// The copy has the same contents, capacity and storage mode as `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vlvec::{VlVec, vlvec};
    /// let vec: VlVec<i32, 2> = vlvec![1, 2, 3];
    /// let copy = vec.clone();
    /// assert_eq!(vec, copy);
    /// assert_eq!(vec.capacity(), copy.capacity());
    /// ```
    fn clone(&self) -> Self {
        let mut vec = Self::new();
        if self.cap != N {
            vec.cap = self.cap;
            vec.heap = HeapRegion::allocate(self.cap);
        }
        for item in self.as_slice() {
            // SAFETY: same capacity as `self`.
            unsafe { vec.push_unchecked(item.clone()) };
        }
        vec
    }

    /// Releases the current storage, then copies contents, capacity and storage mode from `source`.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if source.cap != N {
            self.heap = HeapRegion::allocate(source.cap);
            self.cap = source.cap;
        }
        for item in source.as_slice() {
            // SAFETY: same capacity as `source`.
            unsafe { self.push_unchecked(item.clone()) };
        }
    }
}

impl<'a, T: 'a + Clone, const N: usize> Extend<&'a T> for VlVec<T, N> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (hint, _) = iter.size_hint();
        self.reserve(hint);

        for item in iter {
            self.push(item.clone());
        }
    }
}

impl<T, const N: usize> Extend<T> for VlVec<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (hint, _) = iter.size_hint();
        self.reserve(hint);

        for item in iter {
            self.push(item);
        }
    }
}

impl<T, const N: usize> FromIterator<T> for VlVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T, const N: usize, const P: usize> From<[T; P]> for VlVec<T, N> {
    #[inline]
    fn from(value: [T; P]) -> Self {
        Self::from_exact_iter(value)
    }
}

impl<T: Clone, const N: usize> From<&[T]> for VlVec<T, N> {
    #[inline]
    fn from(value: &[T]) -> Self {
        Self::from_exact_iter(value.iter().cloned())
    }
}

impl<T: Clone, const N: usize, const P: usize> From<&[T; P]> for VlVec<T, N> {
    #[inline]
    fn from(value: &[T; P]) -> Self {
        Self::from_exact_iter(value.iter().cloned())
    }
}

impl<T, const N: usize> From<Vec<T>> for VlVec<T, N> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self::from_exact_iter(value)
    }
}

impl<T, const N: usize> From<Box<[T]>> for VlVec<T, N> {
    #[inline]
    fn from(value: Box<[T]>) -> Self {
        Self::from_exact_iter(Vec::from(value))
    }
}

impl<T, const N: usize> From<VlVec<T, N>> for Vec<T> {
    #[inline]
    fn from(value: VlVec<T, N>) -> Self {
        value.into_vec()
    }
}

impl<T, const N: usize> core::ops::Deref for VlVec<T, N> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> core::ops::DerefMut for VlVec<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for VlVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, const N: usize> AsRef<[T]> for VlVec<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> AsMut<[T]> for VlVec<T, N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> core::borrow::Borrow<[T]> for VlVec<T, N> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> core::borrow::BorrowMut<[T]> for VlVec<T, N> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: core::hash::Hash, const N: usize> core::hash::Hash for VlVec<T, N> {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(self.as_slice(), state);
    }
}

impl<T, I: slice::SliceIndex<[T]>, const N: usize> core::ops::Index<I> for VlVec<T, N> {
    type Output = I::Output;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        core::ops::Index::index(self.as_slice(), index)
    }
}

impl<T, I: slice::SliceIndex<[T]>, const N: usize> core::ops::IndexMut<I> for VlVec<T, N> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        core::ops::IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a VlVec<T, N> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut VlVec<T, N> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: Ord, const N: usize> Ord for VlVec<T, N> {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        Ord::cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: PartialOrd, const N: usize> PartialOrd for VlVec<T, N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        PartialOrd::partial_cmp(self.as_slice(), other.as_slice())
    }
}

/// Two vectors are equal when they have the same length and equal elements at every index.
///
/// Capacity and storage mode take no part in the comparison.
impl<T, U, const N: usize> PartialEq<VlVec<U, N>> for VlVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &VlVec<U, N>) -> bool {
        self.len == other.len
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| a == b)
    }
}

impl<T: Eq, const N: usize> Eq for VlVec<T, N> {}

impl<T, U, const N: usize> PartialEq<[U]> for VlVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        PartialEq::eq(self.as_slice(), other)
    }
}

impl<T, U, const N: usize> PartialEq<&[U]> for VlVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        PartialEq::eq(self.as_slice(), *other)
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<[U; P]> for VlVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; P]) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<&[U; P]> for VlVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; P]) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U, const N: usize> PartialEq<Vec<U>> for VlVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, const N: usize> IntoIterator for VlVec<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            vec: ManuallyDrop::new(self),
            index: 0,
        }
    }
}

/// An iterator that consumes a [`VlVec`] and yields its items by value.
///
/// # Examples
///
/// ```
/// # use vlvec::{VlVec, vlvec};
/// let vec: VlVec<&'static str, 3> = vlvec!["1", "2", "3"];
/// let mut iter = vec.into_iter();
///
/// assert_eq!(iter.next(), Some("1"));
/// assert_eq!(iter.next_back(), Some("3"));
///
/// let vec: Vec<&'static str> = iter.collect();
/// assert_eq!(vec, ["2"]);
/// ```
pub struct IntoIter<T, const N: usize> {
    vec: ManuallyDrop<VlVec<T, N>>,
    index: usize,
}

impl<T, const N: usize> IntoIter<T, N> {
    /// Returns the remaining items as a slice.
    pub fn as_slice(&self) -> &[T] {
        let len = self.vec.len - self.index;
        // SAFETY: `[index, len)` has not been yielded yet.
        unsafe { slice::from_raw_parts(self.vec.as_ptr().add(self.index), len) }
    }

    /// Returns the remaining items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.vec.len - self.index;
        // SAFETY: `[index, len)` has not been yielded yet.
        unsafe { slice::from_raw_parts_mut(self.vec.as_mut_ptr().add(self.index), len) }
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.vec.len {
            self.index += 1;
            // SAFETY: each slot is read once.
            unsafe { Some(ptr::read(self.vec.as_ptr().add(self.index - 1))) }
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let v = self.vec.len - self.index;
        (v, Some(v))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.index < self.vec.len {
            self.vec.len -= 1;
            // SAFETY: each slot is read once.
            unsafe { Some(ptr::read(self.vec.as_ptr().add(self.vec.len))) }
        } else {
            None
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {
    #[inline]
    fn len(&self) -> usize {
        self.vec.len - self.index
    }
}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        let remaining = self.vec.len - self.index;
        // SAFETY: drop the unyielded items, then let the vector release its heap region
        // with no live elements left.
        unsafe {
            let base = self.vec.as_mut_ptr().add(self.index);
            self.vec.len = 0;
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base, remaining));
            ManuallyDrop::drop(&mut self.vec);
        }
    }
}

impl<T: Clone, const N: usize> Clone for IntoIter<T, N> {
    fn clone(&self) -> Self {
        self.as_slice().iter().cloned().collect::<VlVec<T, N>>().into_iter()
    }
}

impl<T, const N: usize> Default for IntoIter<T, N> {
    fn default() -> Self {
        VlVec::new().into_iter()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
