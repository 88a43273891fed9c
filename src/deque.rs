//! A double-ended queue built from a directory of fixed-size blocks.
//!
//! This queue has amortized O(1) inserts and removals at both ends and O(1)
//! indexing like a vector. Unlike a ring buffer, growing it never moves an
//! element: only the directory of block handles is ever reallocated.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::FromIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Index, IndexMut};

use crate::cursor::{Cursor, CursorMut};
use crate::error::{AllocError, OutOfRange, PushError};
use crate::iter::{Drain, IntoIter, Iter, IterMut};
use crate::raw::{RawDirectory, Slot};
use crate::storage::{Allocator, Global};

/// Number of blocks in a freshly constructed or cleared deque; also the
/// floor below which the directory never shrinks.
const START_BLOCKS: usize = 3;

/// A double-ended queue storing its elements in blocks of `B` cells.
///
/// The live elements occupy a window of consecutive cells, starting at some
/// cell of one block and ending in some later (or the same) block. Blocks
/// before and after the window are allocated but empty; they are the spare
/// capacity [`push_front`](Deque::push_front) and [`push_back`](Deque::push_back)
/// consume before the directory has to grow by another block. Popping
/// elements shrinks the directory again once the window fits into half of it.
///
/// All memory is obtained from the allocator `A`, see [`Allocator`].
///
/// # Examples
/// ```
/// use blockdeque::Deque;
///
/// let mut deque = Deque::new();
/// for s in ["1", "2", "3", "4", "5"] {
///     deque.push_back(s);
/// }
/// deque.push_front("0");
/// deque.push_front("-1");
/// assert_eq!(deque, ["-1", "0", "1", "2", "3", "4", "5"]);
///
/// for _ in 0..4 {
///     deque.pop_front();
/// }
/// assert_eq!(deque, ["3", "4", "5"]);
/// assert_eq!(deque.end() - deque.begin(), 3);
/// ```
pub struct Deque<T, A: Allocator = Global, const B: usize = 4> {
    dir: RawDirectory<T, B>,
    first: Slot,
    last: Slot,
    len: usize,
    alloc: A,
    elem: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send, const B: usize> Send for Deque<T, A, B> {}
unsafe impl<T: Sync, A: Allocator + Sync, const B: usize> Sync for Deque<T, A, B> {}

impl<T> Deque<T> {
    /// Constructs an empty deque backed by the global allocator.
    ///
    /// # Examples
    /// ```
    /// let deque = blockdeque::Deque::<u32>::new();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), 12);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Constructs an empty deque backed by the global allocator, returning
    /// an error if the initial blocks cannot be allocated.
    #[inline]
    pub fn try_new() -> Result<Self, AllocError> {
        Self::try_new_in(Global)
    }
}

impl<T: Clone> Deque<T> {
    /// Constructs a deque holding `count` clones of `value`.
    ///
    /// # Examples
    /// ```
    /// let deque = blockdeque::Deque::from_elem("test", 5);
    /// assert_eq!(deque.len(), 5);
    /// assert_eq!(deque.front(), Some(&"test"));
    /// assert_eq!(deque.back(), Some(&"test"));
    /// ```
    #[inline]
    pub fn from_elem(value: T, count: usize) -> Self {
        Self::from_elem_in(value, count, Global)
    }

    /// Fallible version of [`from_elem`](Deque::from_elem).
    #[inline]
    pub fn try_from_elem(value: T, count: usize) -> Result<Self, AllocError> {
        Self::try_from_elem_in(value, count, Global)
    }
}

impl<T, A: Allocator, const B: usize> Deque<T, A, B> {
    const BLOCK_SIZE_IS_NONZERO: () = assert!(B > 0, "block size must be non-zero");

    fn with_directory(dir: RawDirectory<T, B>, alloc: A, start_block: usize) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::BLOCK_SIZE_IS_NONZERO;

        let first = Slot::new(start_block, 0);
        Deque {
            dir,
            first,
            last: first,
            len: 0,
            alloc,
            elem: PhantomData,
        }
    }

    fn detached(alloc: A) -> Self {
        Self::with_directory(RawDirectory::DETACHED, alloc, 0)
    }

    /// Constructs an empty deque using the given allocator, returning an
    /// error if the initial blocks cannot be allocated.
    ///
    /// Nothing allocated before the failure is leaked.
    pub fn try_new_in(alloc: A) -> Result<Self, AllocError> {
        let dir = RawDirectory::allocate(&alloc, START_BLOCKS)?;
        Ok(Self::with_directory(dir, alloc, START_BLOCKS / 2))
    }

    /// Constructs an empty deque using the given allocator.
    ///
    /// # Panics
    /// Diverges through [`handle_alloc_error`](alloc::alloc::handle_alloc_error)
    /// if the initial blocks cannot be allocated. See
    /// [`try_new_in`](Deque::try_new_in) for a checked version.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self::try_new_in(alloc).unwrap_or_else(|err| err.handle())
    }

    /// Constructs a deque holding `count` clones of `value`, using the given
    /// allocator. The directory is sized up front, so no block is added
    /// while the clones are pushed.
    pub fn try_from_elem_in(value: T, count: usize, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let blocks = usize::max(START_BLOCKS, (count / B).saturating_add(3));
        let dir = RawDirectory::allocate(&alloc, blocks)?;
        let mut deque = Self::with_directory(dir, alloc, 1);

        if count > 0 {
            for _ in 1..count {
                unsafe { deque.write_back(value.clone()) };
            }
            unsafe { deque.write_back(value) };
        }

        Ok(deque)
    }

    /// Constructs a deque holding `count` clones of `value`, using the given
    /// allocator.
    ///
    /// # Panics
    /// Diverges if the directory cannot be allocated. See
    /// [`try_from_elem_in`](Deque::try_from_elem_in) for a checked version.
    #[inline]
    pub fn from_elem_in(value: T, count: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        Self::try_from_elem_in(value, count, alloc).unwrap_or_else(|err| err.handle())
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of elements currently in the deque.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` exactly when the deque contains zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of cells in all allocated blocks.
    ///
    /// Not all of them can be filled from either end: cells in front of the
    /// first element are only reachable by [`push_front`](Deque::push_front),
    /// cells behind the last one only by [`push_back`](Deque::push_back).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.dir.len() * B
    }

    /// Returns the number of blocks in the directory.
    #[inline]
    pub fn blocks(&self) -> usize {
        self.dir.len()
    }

    /// Maps a logical index to its cell, relative to the first element.
    #[inline]
    fn slot_of(&self, index: usize) -> Slot {
        let head_room = B - self.first.offset;
        if index < head_room {
            Slot::new(self.first.block, self.first.offset + index)
        } else {
            let rest = index - head_room;
            Slot::new(self.first.block + 1 + rest / B, rest % B)
        }
    }

    #[inline]
    pub(crate) fn window(&self) -> (Slot, Slot) {
        (self.first, self.last)
    }

    #[inline]
    pub(crate) fn directory(&self) -> &RawDirectory<T, B> {
        &self.dir
    }

    /// Returns `true` if `slot` holds one of the deque's elements.
    #[inline]
    pub(crate) fn holds(&self, slot: Slot) -> bool {
        self.first <= slot && slot < self.last
    }

    /// Returns a reference to the element at the given index, or [`None`] if
    /// the index is out of bounds.
    ///
    /// The element at index 0 is the front of the queue.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(unsafe { self.get_unchecked(index) })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at the given index, or
    /// [`None`] if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(unsafe { self.get_unchecked_mut(index) })
        } else {
            None
        }
    }

    /// Returns a reference to the element at the given index without
    /// checking bounds.
    ///
    /// # Safety
    /// `index` must be less than [`len`](Deque::len).
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        &*self.dir.cell(self.slot_of(index)).as_ptr()
    }

    /// Returns a mutable reference to the element at the given index without
    /// checking bounds.
    ///
    /// # Safety
    /// `index` must be less than [`len`](Deque::len).
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        &mut *self.dir.cell(self.slot_of(index)).as_ptr()
    }

    /// Returns a reference to the element at the given index, or an
    /// [`OutOfRange`] error naming the index and the current length.
    ///
    /// # Examples
    /// ```
    /// let deque = blockdeque::Deque::from_elem(7, 3);
    /// assert_eq!(deque.at(2), Ok(&7));
    ///
    /// let err = deque.at(3).unwrap_err();
    /// assert_eq!((err.index(), err.len()), (3, 3));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len;
        self.get(index).ok_or_else(|| OutOfRange::new(index, len))
    }

    /// Mutable version of [`at`](Deque::at).
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len;
        self.get_mut(index).ok_or_else(|| OutOfRange::new(index, len))
    }

    /// Returns a reference to the front element, or [`None`] if the deque is empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the front element, or [`None`] if the
    /// deque is empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns a reference to the back element, or [`None`] if the deque is empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.len.wrapping_sub(1))
    }

    /// Returns a mutable reference to the back element, or [`None`] if the
    /// deque is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.len.wrapping_sub(1))
    }

    /// Returns `true` if the deque contains an element equal to the given value.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|e| e == x)
    }

    /// Allocates the starting directory for a detached deque.
    fn attach(&mut self) -> Result<(), AllocError> {
        debug_assert_eq!(self.len, 0);
        self.dir = RawDirectory::allocate(&self.alloc, START_BLOCKS)?;
        self.first = Slot::new(START_BLOCKS / 2, 0);
        self.last = self.first;
        Ok(())
    }

    /// Ensures the cell at `last` can be filled without `last` stepping off
    /// the end of the directory.
    fn reserve_back(&mut self) -> Result<(), AllocError> {
        if self.dir.is_detached() {
            self.attach()?;
        }

        if self.last.offset + 1 == B && self.last.block + 1 == self.dir.len() {
            self.dir.grow_back(&self.alloc)?;
        }

        Ok(())
    }

    /// Ensures there is a cell in front of `first`.
    fn reserve_front(&mut self) -> Result<(), AllocError> {
        if self.dir.is_detached() {
            self.attach()?;
        }

        if self.first.offset == 0 && self.first.block == 0 {
            self.dir.grow_front(&self.alloc)?;
            self.first.block += 1;
            self.last.block += 1;
        }

        Ok(())
    }

    /// # Safety
    /// Capacity must have been secured with `reserve_back`.
    #[inline]
    unsafe fn write_back(&mut self, value: T) {
        let next = self.last.next::<B>();
        debug_assert!(next.block < self.dir.len());
        self.alloc.construct(self.dir.cell(self.last), value);
        self.last = next;
        self.len += 1;
    }

    /// # Safety
    /// Capacity must have been secured with `reserve_front`.
    #[inline]
    unsafe fn write_front(&mut self, value: T) {
        let slot = self.first.prev::<B>();
        debug_assert!(slot.block < self.dir.len());
        self.alloc.construct(self.dir.cell(slot), value);
        self.first = slot;
        self.len += 1;
    }

    /// Appends an element to the back of the deque, returning it inside a
    /// [`PushError`] if a new block is needed but cannot be allocated.
    ///
    /// The deque is left unchanged on failure.
    pub fn try_push_back(&mut self, value: T) -> Result<(), PushError<T>> {
        match self.reserve_back() {
            Ok(()) => {
                unsafe { self.write_back(value) };
                Ok(())
            }
            Err(cause) => Err(PushError::new(value, cause)),
        }
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Panics
    /// Diverges if a new block is needed but cannot be allocated. See
    /// [`try_push_back`](Deque::try_push_back) for a checked version.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// for i in 0..100 {
    ///     deque.push_back(i);
    /// }
    /// assert_eq!(deque.len(), 100);
    /// assert_eq!(deque[0], 0);
    /// assert_eq!(deque[99], 99);
    /// ```
    #[inline]
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            err.into_cause().handle();
        }
    }

    /// Appends the value returned by `make` to the back of the deque,
    /// constructing it only after the cell for it has been secured.
    ///
    /// If `make` panics, the deque's contents are unchanged.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// deque.emplace_back(|| String::from("built in place"));
    /// assert_eq!(deque.back().map(String::as_str), Some("built in place"));
    /// ```
    pub fn emplace_back<F: FnOnce() -> T>(&mut self, make: F) {
        if let Err(err) = self.reserve_back() {
            err.handle();
        }
        let value = make();
        unsafe { self.write_back(value) };
    }

    /// Prepends an element to the front of the deque, returning it inside a
    /// [`PushError`] if a new block is needed but cannot be allocated.
    ///
    /// The deque is left unchanged on failure.
    pub fn try_push_front(&mut self, value: T) -> Result<(), PushError<T>> {
        match self.reserve_front() {
            Ok(()) => {
                unsafe { self.write_front(value) };
                Ok(())
            }
            Err(cause) => Err(PushError::new(value, cause)),
        }
    }

    /// Prepends an element to the front of the deque.
    ///
    /// # Panics
    /// Diverges if a new block is needed but cannot be allocated. See
    /// [`try_push_front`](Deque::try_push_front) for a checked version.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// deque.push_front(2);
    /// deque.push_front(1);
    /// deque.push_back(3);
    /// assert_eq!(deque, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            err.into_cause().handle();
        }
    }

    /// Prepends the value returned by `make` to the front of the deque,
    /// constructing it only after the cell for it has been secured.
    ///
    /// If `make` panics, the deque's contents are unchanged.
    pub fn emplace_front<F: FnOnce() -> T>(&mut self, make: F) {
        if let Err(err) = self.reserve_front() {
            err.handle();
        }
        let value = make();
        unsafe { self.write_front(value) };
    }

    /// Removes the last element and returns it, or [`None`] if the deque is empty.
    ///
    /// Once the remaining elements fit into the leading half of the
    /// directory, the directory is shrunk.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// deque.push_back(1);
    /// deque.push_back(3);
    /// assert_eq!(deque.pop_back(), Some(3));
    /// assert_eq!(deque.pop_back(), Some(1));
    /// assert_eq!(deque.pop_back(), None);
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.last = self.last.prev::<B>();
        self.len -= 1;
        let value = unsafe { self.dir.cell(self.last).as_ptr().read() };

        if self.last.block < self.dir.len() / 2 {
            self.shrink();
        }

        Some(value)
    }

    /// Removes the first element and returns it, or [`None`] if the deque is empty.
    ///
    /// Once the remaining elements fit into the trailing half of the
    /// directory, the directory is shrunk.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// deque.push_back(1);
    /// deque.push_back(2);
    /// assert_eq!(deque.pop_front(), Some(1));
    /// assert_eq!(deque.pop_front(), Some(2));
    /// assert_eq!(deque.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = unsafe { self.dir.cell(self.first).as_ptr().read() };
        self.first = self.first.next::<B>();
        self.len -= 1;

        if self.first.block > self.dir.len() / 2 {
            self.shrink();
        }

        Some(value)
    }

    /// Halves the directory around the current window. Skipped if the
    /// directory is already at its floor or the new handle array cannot be
    /// allocated.
    fn shrink(&mut self) {
        let target = usize::max(self.dir.len() / 2 + 1, START_BLOCKS);
        if target >= self.dir.len() {
            return;
        }

        let span = self.last.block - self.first.block;
        let window = self.first.block..self.last.block + 1;
        if let Some(lead) = self.dir.shrink(&self.alloc, target, window) {
            self.first.block = lead;
            self.last.block = lead + span;
        }
    }

    /// Shortens the deque, keeping the first `len` elements and dropping the
    /// rest. The directory is left as is.
    ///
    /// If `len` is greater than the deque's current length, this has no effect.
    ///
    /// # Examples
    /// ```
    /// let mut deque: blockdeque::Deque<i32> = (1..=10).collect();
    /// deque.truncate(3);
    /// assert_eq!(deque, [1, 2, 3]);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let end = self.last;
        let mut slot = self.slot_of(len);

        // forget the tail first so a panicking destructor cannot cause a double drop
        self.last = slot;
        self.len = len;

        while slot != end {
            unsafe { self.alloc.destroy(self.dir.cell(slot)) };
            slot = slot.next::<B>();
        }
    }

    /// Drops all elements and returns the directory to the shape of a newly
    /// constructed deque, releasing any blocks beyond the starting three.
    ///
    /// A deque whose storage was moved out with [`take`](Deque::take) stays
    /// without storage.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// deque.extend(0..1000);
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.capacity(), blockdeque::Deque::<i32>::new().capacity());
    /// ```
    pub fn clear(&mut self) {
        if self.dir.is_detached() {
            return;
        }

        self.truncate(0);
        self.dir.truncate(&self.alloc, START_BLOCKS);
        self.dir.fit_handles(&self.alloc);
        self.first = Slot::new(START_BLOCKS / 2, 0);
        self.last = self.first;
    }

    /// Drops all elements and releases all storage, leaving the deque
    /// detached.
    fn release(&mut self) {
        self.truncate(0);
        unsafe { self.dir.release(&self.alloc) };
        self.first = Slot::default();
        self.last = Slot::default();
    }

    /// Moves the contents out of the deque in O(1), leaving it empty and
    /// without any storage.
    ///
    /// The returned deque keeps the allocator that owns the storage; `self`
    /// continues with a [copy](Allocator::select_on_copy) of it. Pushing onto
    /// the emptied deque allocates a fresh starting directory.
    ///
    /// # Examples
    /// ```
    /// let mut a = blockdeque::Deque::from_elem(0, 5);
    /// let b = a.take();
    /// assert_eq!(b.len(), 5);
    /// assert_eq!((a.len(), a.capacity()), (0, 0));
    ///
    /// a.push_back(1);
    /// assert_eq!(a, [1]);
    /// ```
    pub fn take(&mut self) -> Self {
        let alloc = self.alloc.select_on_copy();
        let taken = Deque {
            dir: mem::replace(&mut self.dir, RawDirectory::DETACHED),
            first: self.first,
            last: self.last,
            len: self.len,
            alloc: mem::replace(&mut self.alloc, alloc),
            elem: PhantomData,
        };

        self.first = Slot::default();
        self.last = Slot::default();
        self.len = 0;
        taken
    }

    /// Replaces the contents of `self` with those of `other`, leaving `other`
    /// empty and without any storage.
    ///
    /// The previous elements of `self` are dropped and its storage released.
    /// If `A::PROPAGATE_ON_MOVE` holds, the allocators are exchanged along
    /// with the storage and the transfer is O(1); otherwise it is O(1) only
    /// if the two allocators [compare equal](Allocator::is_equal), and the
    /// elements are relocated into storage from `self`'s allocator if not.
    ///
    /// # Panics
    /// The relocating path diverges if it cannot allocate.
    pub fn move_from(&mut self, other: &mut Self) {
        self.release();

        if A::PROPAGATE_ON_MOVE || self.alloc.is_equal(&other.alloc) {
            if A::PROPAGATE_ON_MOVE {
                mem::swap(&mut self.alloc, &mut other.alloc);
            }

            self.dir = mem::replace(&mut other.dir, RawDirectory::DETACHED);
            self.first = mem::take(&mut other.first);
            self.last = mem::take(&mut other.last);
            self.len = mem::take(&mut other.len);
        } else {
            self.extend(other.drain());
            other.release();
        }
    }

    /// Clones the deque, returning an error if storage for the copy cannot
    /// be allocated.
    ///
    /// The copy uses the [allocator selected for copies](Allocator::select_on_copy)
    /// and has the same directory shape, and therefore the same capacity, as
    /// the original. If an element's `clone` panics, everything cloned so far
    /// is dropped and all storage of the copy is released.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let alloc = self.alloc.select_on_copy();
        if self.dir.is_detached() {
            return Ok(Self::detached(alloc));
        }

        let dir = RawDirectory::allocate(&alloc, self.dir.len())?;
        let mut copy = Self::with_directory(dir, alloc, 0);
        copy.first = self.first;
        copy.last = self.first;

        for value in self.iter() {
            unsafe { copy.write_back(value.clone()) };
        }

        Ok(copy)
    }

    /// Replaces the contents of `self` with a clone of `source`.
    ///
    /// The storage of `self` is released before the copy is made; if the
    /// copy fails, `self` is left empty and without storage.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.release();
        *self = source.try_clone()?;
        Ok(())
    }

    /// Returns a cursor positioned at the first element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T, A, B> {
        Cursor::new(self, self.first)
    }

    /// Returns a cursor positioned one past the last element.
    ///
    /// # Examples
    /// ```
    /// let deque = blockdeque::Deque::from_elem("test", 5);
    /// let (begin, end) = (deque.begin(), deque.end());
    /// assert_eq!(end - begin, 5);
    /// assert_eq!(end.get(), None);
    /// assert_eq!((end - 4).get(), Some(&"test"));
    /// ```
    #[inline]
    pub fn end(&self) -> Cursor<'_, T, A, B> {
        Cursor::new(self, self.last)
    }

    /// Returns a mutable cursor positioned at the first element.
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, A, B> {
        let slot = self.first;
        CursorMut::new(self, slot)
    }

    /// Returns a mutable cursor positioned one past the last element.
    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T, A, B> {
        let slot = self.last;
        CursorMut::new(self, slot)
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    /// ```
    /// let mut deque = blockdeque::Deque::new();
    /// deque.push_back(5);
    /// deque.push_back(3);
    /// deque.push_front(4);
    ///
    /// let mut it = deque.iter();
    /// assert_eq!(it.next(), Some(&4));
    /// assert_eq!(it.next_back(), Some(&3));
    /// assert_eq!(it.next(), Some(&5));
    /// assert!(it.next().is_none());
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, B> {
        Iter::new(&self.dir, self.first, self.last)
    }

    /// Returns a front-to-back iterator that returns mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, B> {
        let (first, last) = (self.first, self.last);
        IterMut::new(&mut self.dir, first, last)
    }

    /// Removes all elements, yielding them front to back.
    ///
    /// Elements not consumed are dropped together with the iterator. The
    /// directory is kept, so the emptied deque retains its capacity.
    ///
    /// # Examples
    /// ```
    /// let mut deque: blockdeque::Deque<i32> = (1..=5).collect();
    /// let mut drained = deque.drain();
    /// assert_eq!(drained.next(), Some(1));
    /// assert_eq!(drained.next_back(), Some(5));
    /// drop(drained);
    /// assert!(deque.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, A, B> {
        Drain::new(self)
    }

    /// Empties the window without dropping anything; the caller takes over
    /// the elements between the returned slots.
    pub(crate) fn forget_elements(&mut self) -> (Slot, Slot) {
        let window = (self.first, self.last);
        self.last = self.first;
        self.len = 0;
        window
    }

    /// Drops the element at `slot`, which must have been handed out by
    /// `forget_elements` and not been moved out since.
    #[inline]
    pub(crate) unsafe fn destroy_forgotten(&mut self, slot: Slot) {
        self.alloc.destroy(self.dir.cell(slot));
    }
}

#[inline(never)]
#[cold]
#[track_caller]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
    panic!(
        "index out of bounds: the len is {} but the index is {}",
        len, index
    )
}

impl<T, A: Allocator, const B: usize> Index<usize> for Deque<T, A, B> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => index_out_of_bounds(index, self.len),
        }
    }
}

impl<T, A: Allocator, const B: usize> IndexMut<usize> for Deque<T, A, B> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => index_out_of_bounds(index, len),
        }
    }
}

impl<T, A: Allocator, const B: usize> Drop for Deque<T, A, B> {
    fn drop(&mut self) {
        // releases the blocks even if an element's destructor panics
        struct Release<'a, T, A: Allocator, const B: usize>(&'a mut Deque<T, A, B>);

        impl<T, A: Allocator, const B: usize> Drop for Release<'_, T, A, B> {
            fn drop(&mut self) {
                let deque = &mut *self.0;
                unsafe { deque.dir.release(&deque.alloc) };
            }
        }

        let guard = Release(self);
        guard.0.truncate(0);
    }
}

impl<T, A: Allocator + Default, const B: usize> Default for Deque<T, A, B> {
    #[inline]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator, const B: usize> Clone for Deque<T, A, B> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.handle())
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_clone_from(source) {
            err.handle();
        }
    }
}

impl<T: Debug, A: Allocator, const B: usize> Debug for Deque<T, A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders the elements front to back, separated by single spaces.
///
/// # Examples
/// ```
/// let deque: blockdeque::Deque<i32> = (1..=4).collect();
/// assert_eq!(deque.to_string(), "1 2 3 4");
/// ```
impl<T: Display, A: Allocator, const B: usize> Display for Deque<T, A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut iter = self.iter();
        if let Some(first) = iter.next() {
            Display::fmt(first, f)?;
            for value in iter {
                f.write_str(" ")?;
                Display::fmt(value, f)?;
            }
        }
        Ok(())
    }
}

impl<T: Hash, A: Allocator, const B: usize> Hash for Deque<T, A, B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        self.iter().for_each(|value| value.hash(state));
    }
}

impl<AT, AA, const AB: usize, BT, BA, const BB: usize> PartialEq<Deque<BT, BA, BB>>
    for Deque<AT, AA, AB>
where
    AT: PartialEq<BT>,
    AA: Allocator,
    BA: Allocator,
{
    fn eq(&self, other: &Deque<BT, BA, BB>) -> bool {
        self.len == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, A: Allocator, const B: usize> Eq for Deque<T, A, B> {}

impl<T: PartialEq, A: Allocator, const B: usize, R: AsRef<[T]>> PartialEq<R> for Deque<T, A, B> {
    fn eq(&self, other: &R) -> bool {
        let other = other.as_ref();
        self.len == other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<T, AA, const AB: usize, BA, const BB: usize> PartialOrd<Deque<T, BA, BB>>
    for Deque<T, AA, AB>
where
    T: PartialOrd,
    AA: Allocator,
    BA: Allocator,
{
    fn partial_cmp(&self, other: &Deque<T, BA, BB>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, A: Allocator, const B: usize> Ord for Deque<T, A, B> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T, A: Allocator, const B: usize> Extend<T> for Deque<T, A, B> {
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        iter.into_iter().for_each(|item| self.push_back(item));
    }
}

impl<'a, T: 'a + Clone, A: Allocator, const B: usize> Extend<&'a T> for Deque<T, A, B> {
    fn extend<It: IntoIterator<Item = &'a T>>(&mut self, iter: It) {
        iter.into_iter().for_each(|item| self.push_back(item.clone()));
    }
}

impl<T, A: Allocator + Default, const B: usize> FromIterator<T> for Deque<T, A, B> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        let mut deque = Self::default();
        deque.extend(iter);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    /// Converts an array into a deque, front to back.
    ///
    /// # Examples
    /// ```
    /// let deque = blockdeque::Deque::from([1, 2, 3]);
    /// assert_eq!(deque, [1, 2, 3]);
    /// ```
    fn from(array: [T; N]) -> Self {
        IntoIterator::into_iter(array).collect()
    }
}

impl<T, A: Allocator, const B: usize> IntoIterator for Deque<T, A, B> {
    type Item = T;
    type IntoIter = IntoIter<T, A, B>;

    /// Converts the deque into a front-to-back iterator yielding elements by value.
    fn into_iter(self) -> IntoIter<T, A, B> {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator, const B: usize> IntoIterator for &'a Deque<T, A, B> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, B>;

    fn into_iter(self) -> Iter<'a, T, B> {
        self.iter()
    }
}

impl<'a, T, A: Allocator, const B: usize> IntoIterator for &'a mut Deque<T, A, B> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, B>;

    fn into_iter(self) -> IterMut<'a, T, B> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Droppable, FragileClone, Sticky, Tracking};

    use alloc::collections::VecDeque;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn contents<T: Clone, A: Allocator, const B: usize>(deque: &Deque<T, A, B>) -> Vec<T> {
        deque.iter().cloned().collect()
    }

    #[test]
    fn default_construction() {
        let deque = Deque::<i32>::new();
        assert!(deque.is_empty());
        assert_eq!(deque.len(), 0);
        assert_eq!(deque.blocks(), START_BLOCKS);
        assert_eq!(deque.capacity(), START_BLOCKS * 4);
        assert_eq!(deque.front(), None);
        assert_eq!(deque.back(), None);
        assert_eq!(deque.end() - deque.begin(), 0);

        let defaulted: Deque<i32> = Deque::default();
        assert_eq!(defaulted.capacity(), deque.capacity());
    }

    #[test]
    fn pushing_at_both_ends() {
        let mut deque = Deque::new();
        for s in &["1", "2", "3", "4", "5"] {
            deque.push_back(*s);
        }
        deque.push_front("0");
        deque.push_front("-1");

        assert_eq!(deque.len(), 7);
        assert_eq!(deque, ["-1", "0", "1", "2", "3", "4", "5"]);
        assert_eq!(deque.to_string(), "-1 0 1 2 3 4 5");

        for _ in 0..4 {
            deque.pop_front();
        }
        assert_eq!(deque, ["3", "4", "5"]);
        assert_eq!(deque.end() - deque.begin(), 3);
    }

    #[test]
    fn construction_from_value() {
        let deque = Deque::from_elem("test", 5);
        assert_eq!(deque.len(), 5);
        assert!(deque.iter().all(|s| *s == "test"));
        assert_eq!(deque.front(), Some(&"test"));
        assert_eq!(deque.back(), Some(&"test"));

        let empty = Deque::from_elem(0u8, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.capacity(), Deque::<u8>::new().capacity());

        // sized up front: filling it does not grow the directory
        let large = Deque::from_elem(1u64, 1000);
        assert_eq!(large.len(), 1000);
        assert!(large.capacity() >= 1000);
        assert_eq!(large.blocks(), 1000 / 4 + 3);
    }

    #[test]
    fn indexing_agrees_everywhere() {
        let mut deque = Deque::new();
        for i in 0..37 {
            if i % 3 == 0 {
                deque.push_front(i);
            } else {
                deque.push_back(i);
            }
        }

        let mut cursor = deque.begin();
        let mut iter = deque.iter();
        for pos in 0..deque.len() {
            let expected = deque[pos];
            assert_eq!(deque.at(pos), Ok(&expected));
            assert_eq!(deque.get(pos), Some(&expected));
            assert_eq!(unsafe { deque.get_unchecked(pos) }, &expected);
            assert_eq!(iter.next(), Some(&expected));
            assert_eq!(cursor.get(), Some(&expected));
            assert_eq!((deque.begin() + pos as isize).slot(), deque.slot_of(pos));
            cursor.move_next();
        }
        assert_eq!(iter.next(), None);
        assert_eq!(cursor, deque.end());
    }

    #[test]
    fn at_reports_out_of_range() {
        let mut deque = Deque::new();
        for len in 0..20 {
            let err = deque.at(len).unwrap_err();
            assert_eq!(err, OutOfRange::new(len, len));
            assert!(deque.at_mut(len + 5).is_err());
            for pos in 0..len {
                assert!(deque.at(pos).is_ok());
            }
            deque.push_back(len);
        }
    }

    #[test]
    #[should_panic(expected = "index out of bounds: the len is 3 but the index is 3")]
    fn index_past_the_end_panics() {
        let deque = Deque::from_elem(1, 3);
        let _ = deque[3];
    }

    #[test]
    fn mutation_through_references() {
        let mut deque: Deque<i32> = (0..10).collect();
        *deque.front_mut().unwrap() = -1;
        *deque.back_mut().unwrap() = -2;
        *deque.at_mut(5).unwrap() = 50;
        deque[6] = 60;
        for x in deque.iter_mut().skip(7).take(2) {
            *x *= 10;
        }
        assert_eq!(deque, [-1, 1, 2, 3, 4, 50, 60, 70, 80, -2]);
    }

    #[test]
    fn push_pop_round_trips() {
        let mut deque: Deque<i32> = (0..9).collect();
        let before = contents(&deque);

        deque.push_back(100);
        assert_eq!(deque.pop_back(), Some(100));
        assert_eq!(contents(&deque), before);

        deque.push_front(-100);
        assert_eq!(deque.pop_front(), Some(-100));
        assert_eq!(contents(&deque), before);
    }

    #[test]
    fn growth_at_either_end() {
        const N: usize = 10_000;

        let mut back = Deque::new();
        for i in 0..N {
            back.push_back(i);
        }
        assert_eq!(back.len(), N);
        assert_eq!(back[0], 0);
        assert_eq!(back[N / 2], N / 2);
        assert_eq!(back[N - 1], N - 1);

        let mut front = Deque::new();
        for i in 0..N {
            front.push_front(i);
        }
        assert_eq!(front.len(), N);
        assert_eq!(front[0], N - 1);
        assert_eq!(front[N / 2], N - 1 - N / 2);
        assert_eq!(front[N - 1], 0);
        assert!(front.capacity() >= N);
    }

    #[test]
    fn growth_adds_one_block_at_a_time() {
        let mut deque = Deque::new();
        for i in 0..7 {
            deque.push_back(i);
        }
        assert_eq!(deque.blocks(), 3);
        deque.push_back(7);
        assert_eq!(deque.blocks(), 4);

        for i in 0..4 {
            deque.push_front(i);
        }
        assert_eq!(deque.blocks(), 4);
        deque.push_front(4);
        assert_eq!(deque.blocks(), 5);
    }

    #[test]
    fn popping_shrinks_the_directory() {
        let mut deque = Deque::new();
        for i in 0..1000 {
            deque.push_back(i);
        }
        let peak = deque.capacity();

        while deque.len() > 10 {
            deque.pop_back();
            assert!(deque.capacity() >= deque.len());
        }
        assert!(deque.capacity() < peak / 4);
        assert_eq!(contents(&deque), (0..10).collect::<Vec<_>>());

        for i in 10..1000 {
            deque.push_back(i);
        }
        let peak = deque.capacity();
        while deque.len() > 10 {
            deque.pop_front();
            assert!(deque.capacity() >= deque.len());
        }
        assert!(deque.capacity() < peak / 4);
        assert_eq!(contents(&deque), (990..1000).collect::<Vec<_>>());

        while deque.pop_back().is_some() {}
        assert!(deque.blocks() >= START_BLOCKS);
    }

    #[test]
    fn alternating_at_the_boundary_does_not_thrash() {
        let tracking = Tracking::new();
        let mut deque: Deque<u32, &Tracking> = Deque::new_in(&tracking);
        for i in 0..64 {
            deque.push_back(i);
        }
        let blocks = deque.blocks();
        for i in 0..1000 {
            deque.push_back(i);
            deque.pop_back();
        }
        assert_eq!(deque.blocks(), blocks);
    }

    #[test]
    fn clear_restores_starting_shape() {
        let fresh = Deque::<String>::new();

        let mut deque = Deque::new();
        deque.clear();
        assert_eq!(deque.capacity(), fresh.capacity());

        for i in 0..100 {
            deque.push_front(i.to_string());
        }
        deque.clear();
        assert!(deque.is_empty());
        assert_eq!(deque.capacity(), fresh.capacity());
        assert_eq!(deque.window(), fresh.window());

        deque.push_back(String::from("again"));
        assert_eq!(deque, [String::from("again")]);
    }

    #[test]
    fn clear_releases_the_grown_handle_array() {
        let tracking = Tracking::new();
        let mut deque: Deque<u32, &Tracking> = Deque::new_in(&tracking);
        let fresh = tracking.live();
        for i in 0..100_000 {
            deque.push_back(i);
        }
        assert!(deque.dir.handle_capacity() > START_BLOCKS);

        deque.clear();
        assert_eq!(deque.dir.handle_capacity(), START_BLOCKS);
        assert_eq!(deque.blocks(), START_BLOCKS);
        assert_eq!(tracking.live(), fresh);

        deque.push_front(1);
        deque.push_back(2);
        assert_eq!(deque, [1, 2]);
    }

    #[test]
    fn copies_are_independent() {
        let mut original: Deque<String> = (0..20).map(|i| i.to_string()).collect();
        original.push_front(String::from("front"));

        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(copy.capacity(), original.capacity());
        assert_eq!(copy.window(), original.window());

        copy[3] = String::from("changed");
        assert_eq!(original[3], "2");
        copy.push_back(String::from("extra"));
        assert_eq!(original.len(), 21);

        let mut target = Deque::from_elem(String::from("old"), 50);
        target.clone_from(&original);
        assert_eq!(target, original);
    }

    #[test]
    fn take_leaves_source_detached() {
        let mut a = Deque::from_elem(7, 5);
        let b = a.take();
        assert_eq!(b.len(), 5);
        assert_eq!(b.front(), Some(&7));
        assert_eq!((a.len(), a.capacity(), a.blocks()), (0, 0, 0));
        assert!(a.is_empty());
        assert_eq!(a.iter().next(), None);
        assert_eq!(a.begin(), a.end());
        assert_eq!(a.pop_back(), None);

        let detached_copy = a.clone();
        assert_eq!(detached_copy.capacity(), 0);

        a.clear();
        assert_eq!(a.capacity(), 0);

        a.push_front(1);
        assert_eq!(a, [1]);
        assert_eq!(a.capacity(), START_BLOCKS * 4);
    }

    #[test]
    fn moving_into_itself_keeps_state() {
        let mut deque: Deque<i32> = (0..10).collect();
        let window = deque.window();
        deque = deque.take();
        assert_eq!(deque, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(deque.window(), window);
    }

    #[test]
    fn move_from_transfers_storage() {
        let tracking = Tracking::new();
        let mut a: Deque<u32, &Tracking> = Deque::from_elem_in(1, 30, &tracking);
        let mut b: Deque<u32, &Tracking> = Deque::from_elem_in(2, 5, &tracking);
        let b_allocations = 1 + b.blocks();

        a.move_from(&mut b);
        assert_eq!(a, [2, 2, 2, 2, 2]);
        assert_eq!((b.len(), b.capacity()), (0, 0));
        assert_eq!(tracking.live(), b_allocations);

        drop(a);
        drop(b);
        assert_eq!(tracking.live(), 0);
    }

    #[test]
    fn move_from_relocates_between_unequal_allocators() {
        let left = Tracking::new();
        let right = Tracking::new();
        let mut a: Deque<u32, Sticky<'_>> = Deque::new_in(Sticky(&left));
        let mut b: Deque<u32, Sticky<'_>> = (0..10).fold(Deque::new_in(Sticky(&right)), |mut d, i| {
            d.push_back(i);
            d
        });

        a.move_from(&mut b);
        assert_eq!(a, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(core::ptr::eq(a.allocator().0, &left));
        assert_eq!(right.live(), 0);
        assert!(left.live() > 0);
        assert_eq!(b.capacity(), 0);
    }

    #[test]
    fn every_element_is_dropped_once() {
        let drops = Cell::new(0);
        let mut deque = Deque::new();
        for i in 0..10 {
            if i % 2 == 0 {
                deque.push_back(Droppable::new(i, &drops));
            } else {
                deque.push_front(Droppable::new(i, &drops));
            }
        }

        let popped = deque.pop_back().unwrap();
        assert_eq!(popped.value, 8);
        drop(popped);
        deque.pop_front();
        assert_eq!(drops.get(), 2);

        deque.truncate(5);
        assert_eq!(drops.get(), 5);

        let copy = deque.clone();
        drop(copy);
        assert_eq!(drops.get(), 10);

        drop(deque);
        assert_eq!(drops.get(), 15);
    }

    #[test]
    fn failed_construction_leaks_nothing() {
        for budget in 0..4 {
            let tracking = Tracking::with_budget(budget);
            assert!(Deque::<u32, &Tracking>::try_new_in(&tracking).is_err());
            assert!(Deque::<u32, &Tracking>::try_from_elem_in(1, 8, &tracking).is_err());
            assert_eq!(tracking.live(), 0);
        }
    }

    #[test]
    fn failed_push_leaves_deque_unchanged() {
        let tracking = Tracking::new();
        let mut deque: Deque<u32, &Tracking> = Deque::new_in(&tracking);
        for i in 0..7 {
            deque.push_back(i);
        }
        let live = tracking.live();

        // no block available
        tracking.set_budget(Some(0));
        let err = deque.try_push_back(7).unwrap_err();
        assert_eq!(err.into_inner(), 7);

        // block granted, directory refused
        tracking.set_budget(Some(1));
        assert!(deque.try_push_back(7).is_err());
        assert_eq!(tracking.live(), live);
        assert_eq!(deque, [0, 1, 2, 3, 4, 5, 6]);

        // the front still has room in the leading block
        for i in 0..4 {
            deque.try_push_front(i + 10).unwrap();
        }
        tracking.set_budget(Some(0));
        let err = deque.try_push_front(99).unwrap_err();
        assert!(err.cause().layout().is_some());
        assert_eq!(deque.len(), 11);
        assert_eq!(deque.front(), Some(&13));

        tracking.set_budget(None);
        deque.push_back(7);
        deque.push_front(99);
        assert_eq!(deque.len(), 13);
    }

    #[test]
    fn failed_copy_leaks_nothing() {
        let source_alloc = Tracking::new();
        let source: Deque<u32, &Tracking> = (0..40).fold(Deque::new_in(&source_alloc), |mut d, i| {
            d.push_back(i);
            d
        });
        let live = source_alloc.live();

        for budget in 0..4 {
            source_alloc.set_budget(Some(budget));
            assert!(source.try_clone().is_err());
            assert_eq!(source_alloc.live(), live);
        }

        let target_alloc = Tracking::new();
        let mut target: Deque<u32, &Tracking> = Deque::from_elem_in(5, 10, &target_alloc);
        source_alloc.set_budget(Some(0));
        assert!(target.try_clone_from(&source).is_err());
        assert_eq!((target.len(), target.capacity()), (0, 0));
        assert_eq!(target_alloc.live(), 0);

        source_alloc.set_budget(None);
        target.try_clone_from(&source).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn panicking_clone_leaks_nothing() {
        let tracking = Tracking::new();
        let clones_left = Cell::new(3);
        let drops = Cell::new(0);
        let value = FragileClone {
            clones_left: &clones_left,
            drops: &drops,
        };

        let result = catch_unwind(AssertUnwindSafe(|| {
            Deque::<_, &Tracking>::try_from_elem_in(value, 6, &tracking)
        }));
        assert!(result.is_err());
        // three clones and the original
        assert_eq!(drops.get(), 4);
        assert_eq!(tracking.live(), 0);

        let mut source: Deque<_, &Tracking> = Deque::new_in(&tracking);
        for _ in 0..5 {
            source.push_back(FragileClone {
                clones_left: &clones_left,
                drops: &drops,
            });
        }
        let live = tracking.live();
        drops.set(0);
        clones_left.set(2);

        let result = catch_unwind(AssertUnwindSafe(|| source.try_clone()));
        assert!(result.is_err());
        assert_eq!(drops.get(), 2);
        assert_eq!(tracking.live(), live);
        assert_eq!(source.len(), 5);
    }

    #[test]
    fn panicking_emplace_leaves_contents_unchanged() {
        let mut deque: Deque<i32> = (0..3).collect();
        let result = catch_unwind(AssertUnwindSafe(|| {
            deque.emplace_back(|| panic!("constructor failed"));
        }));
        assert!(result.is_err());
        let result = catch_unwind(AssertUnwindSafe(|| {
            deque.emplace_front(|| panic!("constructor failed"));
        }));
        assert!(result.is_err());
        assert_eq!(deque, [0, 1, 2]);

        deque.emplace_front(|| -1);
        deque.emplace_back(|| 3);
        assert_eq!(deque, [-1, 0, 1, 2, 3]);
    }

    #[test]
    fn custom_block_sizes() {
        let mut single: Deque<u8, Global, 1> = Deque::new_in(Global);
        assert_eq!(single.capacity(), 3);
        for i in 0..50 {
            single.push_front(i);
            single.push_back(i);
        }
        assert_eq!(single.len(), 100);
        assert_eq!(single[0], 49);
        assert_eq!(single[99], 49);

        let wide: Deque<u8, Global, 64> = Deque::from_elem_in(9, 100, Global);
        assert_eq!(wide.capacity(), 64 * 4);
        assert_eq!(wide.end() - wide.begin(), 100);
    }

    #[test]
    fn zero_sized_elements() {
        let mut deque = Deque::new();
        for _ in 0..100 {
            deque.push_back(());
        }
        assert_eq!(deque.len(), 100);
        assert_eq!(deque.iter().count(), 100);
        while deque.pop_front().is_some() {}
        assert!(deque.is_empty());
    }

    #[test]
    fn comparisons_and_hashing_ignore_layout() {
        use rustc_hash::FxHasher;

        fn fx_hash<T: Hash>(value: &T) -> u64 {
            let mut hasher = FxHasher::default();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let mut pushed_back = Deque::new();
        let mut pushed_front: Deque<i32, Global, 3> = Deque::new_in(Global);
        for i in 0..25 {
            pushed_back.push_back(i);
            pushed_front.push_front(24 - i);
        }

        assert_eq!(pushed_back, pushed_front);
        assert_ne!(pushed_back.window(), Deque::<i32>::new().window());
        assert_eq!(pushed_back.partial_cmp(&pushed_front), Some(Ordering::Equal));

        let rebuilt: Deque<i32> = pushed_front.iter().copied().collect();
        assert_eq!(fx_hash(&pushed_back), fx_hash(&rebuilt));

        let mut bigger = rebuilt.clone();
        *bigger.back_mut().unwrap() += 1;
        assert!(bigger > rebuilt);
        assert_eq!(bigger.cmp(&rebuilt), Ordering::Greater);
    }

    #[test]
    fn formatting() {
        let deque: Deque<i32> = (1..=3).collect();
        assert_eq!(alloc::format!("{:?}", deque), "[1, 2, 3]");
        assert_eq!(deque.to_string(), "1 2 3");
        assert_eq!(Deque::<i32>::new().to_string(), "");
    }

    #[test]
    fn agrees_with_vec_deque() {
        use rand::{rngs::SmallRng, Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(0x5432_1012_3454_3210);
        let mut model = VecDeque::new();
        let mut deque: Deque<u32, Global, 3> = Deque::new_in(Global);

        for step in 0..20_000u32 {
            match rng.gen_range(0..10) {
                0..=2 => {
                    model.push_back(step);
                    deque.push_back(step);
                }
                3..=5 => {
                    model.push_front(step);
                    deque.push_front(step);
                }
                6 => assert_eq!(deque.pop_back(), model.pop_back()),
                7 => assert_eq!(deque.pop_front(), model.pop_front()),
                8 => {
                    if !model.is_empty() {
                        let i = rng.gen_range(0..model.len());
                        assert_eq!(deque.get(i), model.get(i));
                    }
                }
                _ => {
                    if rng.gen_ratio(1, 50) {
                        let keep = rng.gen_range(0..=model.len());
                        model.truncate(keep);
                        deque.truncate(keep);
                    }
                }
            }

            assert_eq!(deque.len(), model.len());
            assert!(deque.capacity() >= deque.len());
            assert_eq!(deque.front(), model.front());
            assert_eq!(deque.back(), model.back());
        }

        assert!(deque.iter().eq(model.iter()));
        assert!(deque.iter().rev().eq(model.iter().rev()));
    }
}
