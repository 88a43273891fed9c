//! Random-access positions into a [`Deque`].
//!
//! A cursor names a cell of its deque's directory. It can be moved freely,
//! including past either end of the deque, but only dereferences while it
//! points at a live element. Distances and offsets are measured in cells,
//! which for positions inside the deque is the same as counting elements.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;

use crate::deque::Deque;
use crate::raw::Slot;
use crate::storage::{Allocator, Global};

/// A read-only position in a [`Deque`].
///
/// Created by [`Deque::begin`] and [`Deque::end`].
///
/// # Examples
/// ```
/// let deque: blockdeque::Deque<i32> = (10..20).collect();
/// let mut cursor = deque.begin() + 3;
/// assert_eq!(cursor.get(), Some(&13));
///
/// cursor -= 5;
/// assert_eq!(cursor.get(), None);
/// assert_eq!(cursor.position(), -2);
///
/// assert_eq!(deque.end() - cursor, 12);
/// ```
pub struct Cursor<'a, T, A: Allocator = Global, const B: usize = 4> {
    deque: &'a Deque<T, A, B>,
    slot: Slot,
}

impl<T, A: Allocator, const B: usize> Clone for Cursor<'_, T, A, B> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Allocator, const B: usize> Copy for Cursor<'_, T, A, B> {}

impl<'a, T, A: Allocator, const B: usize> Cursor<'a, T, A, B> {
    #[inline]
    pub(crate) fn new(deque: &'a Deque<T, A, B>, slot: Slot) -> Self {
        Cursor { deque, slot }
    }

    /// Returns the directory position the cursor points at.
    #[inline]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns the cursor's signed distance from the front of the deque.
    ///
    /// For cursors pointing at an element, this is that element's index.
    #[inline]
    pub fn position(&self) -> isize {
        self.slot.distance::<B>(self.deque.window().0)
    }

    /// Returns the element under the cursor, or [`None`] if the cursor points
    /// outside the deque.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        if self.deque.holds(self.slot) {
            Some(unsafe { self.get_unchecked() })
        } else {
            None
        }
    }

    /// Returns the element under the cursor without checking that there is one.
    ///
    /// # Safety
    /// The cursor must point at an element, i.e. [`get`](Cursor::get) would
    /// return `Some`.
    #[inline]
    pub unsafe fn get_unchecked(&self) -> &'a T {
        debug_assert!(self.deque.holds(self.slot));
        &*self.deque.directory().cell(self.slot).as_ptr()
    }

    /// Moves the cursor one cell towards the back.
    #[inline]
    pub fn move_next(&mut self) {
        self.slot = self.slot.next::<B>();
    }

    /// Moves the cursor one cell towards the front.
    #[inline]
    pub fn move_prev(&mut self) {
        self.slot = self.slot.prev::<B>();
    }

    /// Returns a cursor `n` cells further back, or further front if `n` is negative.
    #[inline]
    pub fn offset(self, n: isize) -> Self {
        Cursor {
            deque: self.deque,
            slot: self.slot.offset_by::<B>(n),
        }
    }

    #[inline]
    fn same_deque(&self, other: &Self) -> bool {
        ptr::eq(self.deque, other.deque)
    }
}

impl<T, A: Allocator, const B: usize> Add<isize> for Cursor<'_, T, A, B> {
    type Output = Self;

    #[inline]
    fn add(self, n: isize) -> Self {
        self.offset(n)
    }
}

impl<T, A: Allocator, const B: usize> Sub<isize> for Cursor<'_, T, A, B> {
    type Output = Self;

    #[inline]
    fn sub(self, n: isize) -> Self {
        self.offset(n.wrapping_neg())
    }
}

impl<T, A: Allocator, const B: usize> AddAssign<isize> for Cursor<'_, T, A, B> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        *self = self.offset(n);
    }
}

impl<T, A: Allocator, const B: usize> SubAssign<isize> for Cursor<'_, T, A, B> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        *self = self.offset(n.wrapping_neg());
    }
}

/// The signed number of cells from `rhs` to `self`.
impl<T, A: Allocator, const B: usize> Sub for Cursor<'_, T, A, B> {
    type Output = isize;

    #[inline]
    fn sub(self, rhs: Self) -> isize {
        debug_assert!(self.same_deque(&rhs), "cursors into different deques");
        self.slot.distance::<B>(rhs.slot)
    }
}

impl<T, A: Allocator, const B: usize> PartialEq for Cursor<'_, T, A, B> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_deque(other) && self.slot == other.slot
    }
}

impl<T, A: Allocator, const B: usize> Eq for Cursor<'_, T, A, B> {}

/// Cursors into different deques are unordered.
impl<T, A: Allocator, const B: usize> PartialOrd for Cursor<'_, T, A, B> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_deque(other) {
            Some(self.slot.cmp(&other.slot))
        } else {
            None
        }
    }
}

impl<T, A: Allocator, const B: usize> Debug for Cursor<'_, T, A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("slot", &self.slot)
            .field("position", &self.position())
            .finish()
    }
}

/// A position in a [`Deque`] through which the element under it can be
/// modified.
///
/// Created by [`Deque::begin_mut`] and [`Deque::end_mut`].
///
/// # Examples
/// ```
/// let mut deque: blockdeque::Deque<i32> = (0..5).collect();
/// let mut cursor = deque.begin_mut();
/// while let Some(x) = cursor.get_mut() {
///     *x *= 10;
///     cursor.move_next();
/// }
/// assert_eq!(deque, [0, 10, 20, 30, 40]);
/// ```
pub struct CursorMut<'a, T, A: Allocator = Global, const B: usize = 4> {
    deque: &'a mut Deque<T, A, B>,
    slot: Slot,
}

impl<'a, T, A: Allocator, const B: usize> CursorMut<'a, T, A, B> {
    #[inline]
    pub(crate) fn new(deque: &'a mut Deque<T, A, B>, slot: Slot) -> Self {
        CursorMut { deque, slot }
    }

    /// Returns the directory position the cursor points at.
    #[inline]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns the cursor's signed distance from the front of the deque.
    #[inline]
    pub fn position(&self) -> isize {
        self.slot.distance::<B>(self.deque.window().0)
    }

    /// Returns a read-only cursor at the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T, A, B> {
        Cursor::new(self.deque, self.slot)
    }

    /// Returns the element under the cursor, or [`None`] if the cursor points
    /// outside the deque.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        if self.deque.holds(self.slot) {
            Some(unsafe { &*self.deque.directory().cell(self.slot).as_ptr() })
        } else {
            None
        }
    }

    /// Returns the element under the cursor mutably, or [`None`] if the cursor
    /// points outside the deque.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.deque.holds(self.slot) {
            Some(unsafe { &mut *self.deque.directory().cell(self.slot).as_ptr() })
        } else {
            None
        }
    }

    /// Consumes the cursor, returning the element under it for the rest of
    /// the deque's borrow.
    #[inline]
    pub fn into_mut(self) -> Option<&'a mut T> {
        if self.deque.holds(self.slot) {
            Some(unsafe { &mut *self.deque.directory().cell(self.slot).as_ptr() })
        } else {
            None
        }
    }

    /// Moves the cursor one cell towards the back.
    #[inline]
    pub fn move_next(&mut self) {
        self.slot = self.slot.next::<B>();
    }

    /// Moves the cursor one cell towards the front.
    #[inline]
    pub fn move_prev(&mut self) {
        self.slot = self.slot.prev::<B>();
    }

    /// Moves the cursor `n` cells towards the back, or towards the front if
    /// `n` is negative.
    #[inline]
    pub fn seek(&mut self, n: isize) {
        self.slot = self.slot.offset_by::<B>(n);
    }
}

impl<T, A: Allocator, const B: usize> Debug for CursorMut<'_, T, A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("slot", &self.slot)
            .field("position", &self.position())
            .finish()
    }
}
