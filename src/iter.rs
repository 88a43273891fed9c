//! Iterators over the elements of a [`Deque`].

use core::fmt::{self, Debug, Formatter};
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::deque::Deque;
use crate::raw::{RawDirectory, Slot};
use crate::storage::{Allocator, Global};

#[inline]
fn remaining<const B: usize>(front: Slot, back: Slot) -> usize {
    back.distance::<B>(front) as usize
}

/// An iterator over the elements of a deque.
///
/// This `struct` is created by the [`iter`](Deque::iter) method on [`Deque`].
/// See its documentation for more.
pub struct Iter<'a, T: 'a, const B: usize = 4> {
    dir: &'a RawDirectory<T, B>,
    front: Slot,
    back: Slot,
}

unsafe impl<T: Sync, const B: usize> Send for Iter<'_, T, B> {}
unsafe impl<T: Sync, const B: usize> Sync for Iter<'_, T, B> {}

impl<'a, T: 'a, const B: usize> Iter<'a, T, B> {
    #[inline]
    pub(crate) fn new(dir: &'a RawDirectory<T, B>, front: Slot, back: Slot) -> Self {
        Iter { dir, front, back }
    }
}

impl<T, const B: usize> Clone for Iter<'_, T, B> {
    fn clone(&self) -> Self {
        Iter {
            dir: self.dir,
            front: self.front,
            back: self.back,
        }
    }
}

struct Entries<'a, T, const B: usize>(Iter<'a, T, B>);

impl<T: Debug, const B: usize> Debug for Entries<'_, T, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

impl<'a, T: 'a + Debug, const B: usize> Debug for Iter<'a, T, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&Entries(self.clone())).finish()
    }
}

impl<'a, T: 'a, const B: usize> Iterator for Iter<'a, T, B> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }

        let cell = self.dir.cell(self.front);
        self.front = self.front.next::<B>();
        Some(unsafe { &*cell.as_ptr() })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = remaining::<B>(self.front, self.back);
        (len, Some(len))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<&'a T> {
        if n >= remaining::<B>(self.front, self.back) {
            self.front = self.back;
            return None;
        }

        self.front = self.front.advance::<B>(n);
        self.next()
    }
}

impl<'a, T: 'a, const B: usize> DoubleEndedIterator for Iter<'a, T, B> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }

        self.back = self.back.prev::<B>();
        Some(unsafe { &*self.dir.cell(self.back).as_ptr() })
    }
}

impl<T, const B: usize> ExactSizeIterator for Iter<'_, T, B> {}
impl<T, const B: usize> FusedIterator for Iter<'_, T, B> {}

/// A mutable iterator over the elements of a deque.
///
/// This `struct` is created by the [`iter_mut`](Deque::iter_mut) method on [`Deque`].
/// See its documentation for more.
pub struct IterMut<'a, T: 'a, const B: usize = 4> {
    dir: &'a RawDirectory<T, B>,
    front: Slot,
    back: Slot,
    _ref: PhantomData<&'a mut T>,
}

unsafe impl<T: Send, const B: usize> Send for IterMut<'_, T, B> {}
unsafe impl<T: Sync, const B: usize> Sync for IterMut<'_, T, B> {}

impl<'a, T: 'a, const B: usize> IterMut<'a, T, B> {
    #[inline]
    pub(crate) fn new(dir: &'a mut RawDirectory<T, B>, front: Slot, back: Slot) -> Self {
        IterMut {
            dir,
            front,
            back,
            _ref: PhantomData,
        }
    }
}

impl<'a, T: 'a + Debug, const B: usize> Debug for IterMut<'a, T, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let view = Iter::new(self.dir, self.front, self.back);
        f.debug_tuple("IterMut").field(&view).finish()
    }
}

impl<'a, T: 'a, const B: usize> Iterator for IterMut<'a, T, B> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            return None;
        }

        let cell = self.dir.cell(self.front);
        self.front = self.front.next::<B>();
        Some(unsafe { &mut *cell.as_ptr() })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = remaining::<B>(self.front, self.back);
        (len, Some(len))
    }
}

impl<'a, T: 'a, const B: usize> DoubleEndedIterator for IterMut<'a, T, B> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            return None;
        }

        self.back = self.back.prev::<B>();
        Some(unsafe { &mut *self.dir.cell(self.back).as_ptr() })
    }
}

impl<T, const B: usize> ExactSizeIterator for IterMut<'_, T, B> {}
impl<T, const B: usize> FusedIterator for IterMut<'_, T, B> {}

/// A consuming iterator over the elements of a deque.
///
/// This `struct` is created by the `into_iter` method on [`Deque`]
/// (provided by the [`IntoIterator`] trait). Elements are popped from
/// either end, so the directory shrinks as the iterator advances.
pub struct IntoIter<T, A: Allocator = Global, const B: usize = 4> {
    inner: Deque<T, A, B>,
}

impl<T, A: Allocator, const B: usize> IntoIter<T, A, B> {
    #[inline]
    pub(crate) fn new(inner: Deque<T, A, B>) -> Self {
        IntoIter { inner }
    }
}

impl<T: Debug, A: Allocator, const B: usize> Debug for IntoIter<T, A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T: Clone, A: Allocator, const B: usize> Clone for IntoIter<T, A, B> {
    fn clone(&self) -> Self {
        IntoIter {
            inner: self.inner.clone(),
        }
    }
}

impl<T, A: Allocator, const B: usize> Iterator for IntoIter<T, A, B> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T, A: Allocator, const B: usize> DoubleEndedIterator for IntoIter<T, A, B> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back()
    }
}

impl<T, A: Allocator, const B: usize> ExactSizeIterator for IntoIter<T, A, B> {}
impl<T, A: Allocator, const B: usize> FusedIterator for IntoIter<T, A, B> {}

/// A draining iterator over the elements of a deque.
///
/// This `struct` is created by the [`drain`](Deque::drain) method on [`Deque`].
/// See its documentation for more.
pub struct Drain<'p, T, A: Allocator = Global, const B: usize = 4> {
    parent: &'p mut Deque<T, A, B>,
    front: Slot,
    back: Slot,
}

impl<'p, T, A: Allocator, const B: usize> Drain<'p, T, A, B> {
    pub(crate) fn new(parent: &'p mut Deque<T, A, B>) -> Self {
        let (front, back) = parent.forget_elements();
        Drain {
            parent,
            front,
            back,
        }
    }
}

impl<T: Debug, A: Allocator, const B: usize> Debug for Drain<'_, T, A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let view = Iter::new(self.parent.directory(), self.front, self.back);
        f.debug_tuple("Drain").field(&view).finish()
    }
}

impl<T, A: Allocator, const B: usize> Iterator for Drain<'_, T, A, B> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }

        let cell = self.parent.directory().cell(self.front);
        self.front = self.front.next::<B>();
        unsafe { Some(cell.as_ptr().read()) }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = remaining::<B>(self.front, self.back);
        (len, Some(len))
    }
}

impl<T, A: Allocator, const B: usize> DoubleEndedIterator for Drain<'_, T, A, B> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }

        self.back = self.back.prev::<B>();
        unsafe { Some(self.parent.directory().cell(self.back).as_ptr().read()) }
    }
}

impl<T, A: Allocator, const B: usize> ExactSizeIterator for Drain<'_, T, A, B> {}
impl<T, A: Allocator, const B: usize> FusedIterator for Drain<'_, T, A, B> {}

impl<T, A: Allocator, const B: usize> Drop for Drain<'_, T, A, B> {
    fn drop(&mut self) {
        while self.front != self.back {
            let slot = self.front;
            self.front = slot.next::<B>();
            unsafe { self.parent.destroy_forgotten(slot) };
        }
    }
}
