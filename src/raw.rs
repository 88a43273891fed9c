//! Block directory management and the position arithmetic shared by
//! [`Deque`](crate::Deque) and its cursors.
//!
//! Elements live in blocks of `B` cells. A directory, itself an array of
//! block handles, strings the blocks together; position `(block, offset)`
//! names cell `offset` of the block whose handle sits at index `block`.
//! Flattening positions to `block * B + offset` gives a total order that
//! agrees with the logical order of the elements.

use core::marker::PhantomData;
use core::ops::Range;
use core::ptr::{self, NonNull};

use crate::error::AllocError;
use crate::storage::Allocator;

/// A `(block, offset)` position within a deque's directory.
///
/// Slots order lexicographically, block first, which matches the order of
/// their flattened indices as long as `offset` is less than the block size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    /// Index of the block within the directory.
    pub block: usize,
    /// Index of the cell within the block.
    pub offset: usize,
}

impl Slot {
    /// Creates a slot from its parts.
    #[inline]
    pub const fn new(block: usize, offset: usize) -> Self {
        Slot { block, offset }
    }

    /// Converts a flattened index back into a slot.
    #[inline]
    pub(crate) fn from_linear<const B: usize>(index: usize) -> Self {
        Slot {
            block: index / B,
            offset: index % B,
        }
    }

    /// Flattens the slot into a single index, `block * B + offset`.
    #[inline]
    pub(crate) fn linear<const B: usize>(self) -> usize {
        self.block.wrapping_mul(B).wrapping_add(self.offset)
    }

    /// The slot immediately after `self`.
    #[inline]
    pub(crate) fn next<const B: usize>(self) -> Self {
        if self.offset + 1 == B {
            self.advance::<B>(1)
        } else {
            Slot::new(self.block, self.offset + 1)
        }
    }

    /// The slot immediately before `self`.
    #[inline]
    pub(crate) fn prev<const B: usize>(self) -> Self {
        if self.offset == 0 {
            self.retreat::<B>(1)
        } else {
            Slot::new(self.block, self.offset - 1)
        }
    }

    #[inline]
    pub(crate) fn advance<const B: usize>(self, n: usize) -> Self {
        Slot::from_linear::<B>(self.linear::<B>().wrapping_add(n))
    }

    #[inline]
    pub(crate) fn retreat<const B: usize>(self, n: usize) -> Self {
        Slot::from_linear::<B>(self.linear::<B>().wrapping_sub(n))
    }

    /// Moves `n` cells forward, or backward if `n` is negative.
    #[inline]
    pub(crate) fn offset_by<const B: usize>(self, n: isize) -> Self {
        if n < 0 {
            self.retreat::<B>(n.unsigned_abs())
        } else {
            self.advance::<B>(n as usize)
        }
    }

    /// The signed number of cells from `origin` to `self`.
    #[inline]
    pub(crate) fn distance<const B: usize>(self, origin: Self) -> isize {
        self.linear::<B>().wrapping_sub(origin.linear::<B>()) as isize
    }
}

/// An owned directory of blocks, each holding `B` possibly uninitialized
/// cells of `T`.
///
/// The directory never tracks which cells are live and never drops elements;
/// that is the job of the owning deque. It does not store its allocator
/// either: every operation that touches memory borrows the one the deque
/// owns, and the caller guarantees it is the allocator (or an equal one) the
/// directory was built with.
pub(crate) struct RawDirectory<T, const B: usize> {
    handles: NonNull<NonNull<T>>,
    len: usize,
    cap: usize,
    blocks: PhantomData<T>,
}

impl<T, const B: usize> RawDirectory<T, B> {
    /// A directory without any storage.
    pub(crate) const DETACHED: Self = RawDirectory {
        handles: NonNull::dangling(),
        len: 0,
        cap: 0,
        blocks: PhantomData,
    };

    /// Allocates a directory of `blocks` blocks.
    ///
    /// If any allocation fails, everything allocated so far is released
    /// before the error is returned.
    pub(crate) fn allocate<A: Allocator>(alloc: &A, blocks: usize) -> Result<Self, AllocError> {
        debug_assert!(blocks > 0);
        let handles = alloc.allocate_handles::<T>(blocks)?;

        for i in 0..blocks {
            match alloc.allocate_cells::<T>(B) {
                Ok(block) => unsafe { handles.as_ptr().add(i).write(block) },
                Err(err) => {
                    unsafe {
                        for j in 0..i {
                            alloc.deallocate_cells(*handles.as_ptr().add(j), B);
                        }
                        alloc.deallocate_handles(handles, blocks);
                    }
                    return Err(err);
                }
            }
        }

        Ok(RawDirectory {
            handles,
            len: blocks,
            cap: blocks,
            blocks: PhantomData,
        })
    }

    /// Returns the number of blocks in the directory.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the directory owns no storage at all.
    #[inline]
    pub(crate) fn is_detached(&self) -> bool {
        self.cap == 0
    }

    #[inline]
    fn block(&self, index: usize) -> NonNull<T> {
        debug_assert!(index < self.len);
        unsafe { *self.handles.as_ptr().add(index) }
    }

    /// Returns a pointer to the cell at `slot`.
    ///
    /// The cell may or may not hold a live value.
    #[inline]
    pub(crate) fn cell(&self, slot: Slot) -> NonNull<T> {
        debug_assert!(slot.offset < B);
        let block = self.block(slot.block);
        unsafe { NonNull::new_unchecked(block.as_ptr().add(slot.offset)) }
    }

    /// Makes room for at least one more handle, leaving `gap` empty handle
    /// slots in front of the existing ones.
    fn reserve_handle<A: Allocator>(&mut self, alloc: &A, gap: usize) -> Result<(), AllocError> {
        let new_cap = usize::max(self.cap.saturating_mul(2), self.len + 1);
        let handles = alloc.allocate_handles::<T>(new_cap)?;

        unsafe {
            ptr::copy_nonoverlapping(self.handles.as_ptr(), handles.as_ptr().add(gap), self.len);
            if self.cap != 0 {
                alloc.deallocate_handles(self.handles, self.cap);
            }
        }

        self.handles = handles;
        self.cap = new_cap;
        Ok(())
    }

    /// Appends one freshly allocated block.
    ///
    /// On failure the directory is left untouched.
    pub(crate) fn grow_back<A: Allocator>(&mut self, alloc: &A) -> Result<(), AllocError> {
        let block = alloc.allocate_cells::<T>(B)?;

        if self.len == self.cap {
            if let Err(err) = self.reserve_handle(alloc, 0) {
                unsafe { alloc.deallocate_cells(block, B) };
                return Err(err);
            }
        }

        unsafe { self.handles.as_ptr().add(self.len).write(block) };
        self.len += 1;
        Ok(())
    }

    /// Prepends one freshly allocated block, shifting every existing block
    /// index up by one.
    ///
    /// On failure the directory is left untouched.
    pub(crate) fn grow_front<A: Allocator>(&mut self, alloc: &A) -> Result<(), AllocError> {
        let block = alloc.allocate_cells::<T>(B)?;

        if self.len == self.cap {
            if let Err(err) = self.reserve_handle(alloc, 1) {
                unsafe { alloc.deallocate_cells(block, B) };
                return Err(err);
            }
        } else {
            let base = self.handles.as_ptr();
            unsafe { ptr::copy(base, base.add(1), self.len) };
        }

        unsafe { self.handles.as_ptr().write(block) };
        self.len += 1;
        Ok(())
    }

    /// Rebuilds the directory with `new_len` blocks, keeping the blocks in
    /// `window` in order and centring them. Blocks outside `window` must hold
    /// no live values; as many of them as needed are reused as spare
    /// capacity, the rest are released.
    ///
    /// Returns the new index of `window.start`, or [`None`] if the smaller
    /// handle array could not be allocated, in which case nothing changes.
    pub(crate) fn shrink<A: Allocator>(
        &mut self,
        alloc: &A,
        new_len: usize,
        window: Range<usize>,
    ) -> Option<usize> {
        let span = window.end - window.start;
        debug_assert!(span < new_len && new_len < self.len && window.end <= self.len);

        let handles = alloc.allocate_handles::<T>(new_len).ok()?;
        let lead = (new_len - span) / 2;

        let old = self.handles.as_ptr();
        let new = handles.as_ptr();
        let mut spares = (0..window.start).chain(window.end..self.len);

        unsafe {
            ptr::copy_nonoverlapping(old.add(window.start), new.add(lead), span);

            for i in (0..lead).chain(lead + span..new_len) {
                if let Some(spare) = spares.next() {
                    new.add(i).write(*old.add(spare));
                }
            }

            for spare in spares {
                alloc.deallocate_cells(*old.add(spare), B);
            }

            alloc.deallocate_handles(self.handles, self.cap);
        }

        self.handles = handles;
        self.len = new_len;
        self.cap = new_len;
        Some(lead)
    }

    /// Releases every block from index `keep` onwards. The handle array keeps
    /// its allocation.
    pub(crate) fn truncate<A: Allocator>(&mut self, alloc: &A, keep: usize) {
        while self.len > keep {
            self.len -= 1;
            unsafe { alloc.deallocate_cells(self.block_at(self.len), B) };
        }
    }

    /// Moves the handles into an array with no spare slots. Skipped if that
    /// array cannot be allocated.
    pub(crate) fn fit_handles<A: Allocator>(&mut self, alloc: &A) {
        if self.cap == self.len || self.len == 0 {
            return;
        }

        if let Ok(handles) = alloc.allocate_handles::<T>(self.len) {
            unsafe {
                ptr::copy_nonoverlapping(self.handles.as_ptr(), handles.as_ptr(), self.len);
                alloc.deallocate_handles(self.handles, self.cap);
            }
            self.handles = handles;
            self.cap = self.len;
        }
    }

    /// Returns the number of handle slots allocated.
    #[cfg(test)]
    pub(crate) fn handle_capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    unsafe fn block_at(&self, index: usize) -> NonNull<T> {
        *self.handles.as_ptr().add(index)
    }

    /// Releases all blocks and the handle array, leaving the directory
    /// detached.
    ///
    /// # Safety
    /// No cell may hold a live value, and `alloc` must be the allocator the
    /// directory was built with (or an equal one).
    pub(crate) unsafe fn release<A: Allocator>(&mut self, alloc: &A) {
        self.truncate(alloc, 0);
        if self.cap != 0 {
            alloc.deallocate_handles(self.handles, self.cap);
        }
        *self = Self::DETACHED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Tracking;

    #[test]
    fn slot_arithmetic_agrees_with_flattening() {
        let s = Slot::new(2, 3);
        assert_eq!(s.linear::<4>(), 11);
        assert_eq!(s.next::<4>(), Slot::new(3, 0));
        assert_eq!(s.prev::<4>(), Slot::new(2, 2));
        assert_eq!(Slot::new(3, 0).prev::<4>(), Slot::new(2, 3));

        for n in -11..=20isize {
            let moved = s.offset_by::<4>(n);
            assert_eq!(moved.distance::<4>(s), n);
            assert_eq!(moved.linear::<4>() as isize, 11 + n);
        }

        // one step at a time and one jump land on the same slot
        let mut stepped = s;
        for _ in 0..9 {
            stepped = stepped.next::<4>();
        }
        assert_eq!(stepped, s.advance::<4>(9));
    }

    #[test]
    fn stepping_and_jumping_agree_across_zero() {
        let origin = Slot::new(0, 0);
        assert_eq!(origin.prev::<3>(), origin.retreat::<3>(1));
        assert_eq!(origin.prev::<3>().next::<3>(), origin);
        assert_eq!(origin.prev::<4>(), origin.offset_by::<4>(-1));

        let edge = Slot::new(5, 2);
        assert_eq!(edge.next::<3>(), Slot::new(6, 0));
        assert_eq!(Slot::new(6, 0).prev::<3>(), edge);
    }

    #[test]
    fn slot_order_is_block_major() {
        assert!(Slot::new(1, 3) < Slot::new(2, 0));
        assert!(Slot::new(2, 0) < Slot::new(2, 1));
        assert_eq!(Slot::new(2, 1).max(Slot::new(1, 3)), Slot::new(2, 1));
    }

    #[test]
    fn failed_allocation_releases_partial_directory() {
        for budget in 0..4 {
            let tracking = Tracking::with_budget(budget);
            assert!(RawDirectory::<u32, 4>::allocate(&&tracking, 3).is_err());
            assert_eq!(tracking.live(), 0);
        }

        let tracking = Tracking::with_budget(4);
        let mut dir = RawDirectory::<u32, 4>::allocate(&&tracking, 3).unwrap();
        assert_eq!(tracking.live(), 4);
        unsafe { dir.release(&&tracking) };
        assert_eq!(tracking.live(), 0);
        assert!(dir.is_detached());
    }

    #[test]
    fn growth_keeps_existing_blocks_in_order() {
        let tracking = Tracking::new();
        let alloc = &tracking;
        let mut dir = RawDirectory::<u32, 2>::allocate(&alloc, 1).unwrap();
        let original = dir.block(0);

        dir.grow_back(&alloc).unwrap();
        dir.grow_front(&alloc).unwrap();
        dir.grow_front(&alloc).unwrap();
        assert_eq!(dir.len(), 4);
        assert_eq!(dir.block(2), original);

        unsafe { dir.release(&alloc) };
        assert_eq!(tracking.live(), 0);
    }

    #[test]
    fn failed_growth_leaves_directory_untouched() {
        let tracking = Tracking::new();
        let alloc = &tracking;
        let mut dir = RawDirectory::<u32, 2>::allocate(&alloc, 2).unwrap();
        let before = [dir.block(0), dir.block(1)];

        // the front block is granted but the larger handle array is not;
        // the back block is refused outright
        tracking.set_budget(Some(1));
        assert!(dir.grow_front(&alloc).is_err());
        assert!(dir.grow_back(&alloc).is_err());
        assert_eq!(dir.len(), 2);
        assert_eq!([dir.block(0), dir.block(1)], before);

        tracking.set_budget(None);
        unsafe { dir.release(&alloc) };
        assert_eq!(tracking.live(), 0);
    }

    #[test]
    fn truncating_and_fitting_handles_releases_everything_spare() {
        let tracking = Tracking::new();
        let alloc = &tracking;
        let mut dir = RawDirectory::<u32, 4>::allocate(&alloc, 3).unwrap();
        for _ in 0..20 {
            dir.grow_back(&alloc).unwrap();
        }
        assert!(dir.handle_capacity() > 23);

        dir.truncate(&alloc, 3);
        dir.fit_handles(&alloc);
        assert_eq!((dir.len(), dir.handle_capacity()), (3, 3));
        assert_eq!(tracking.live(), 4);

        // a refused handle array leaves the directory as it was
        for _ in 0..2 {
            dir.grow_back(&alloc).unwrap();
        }
        let cap = dir.handle_capacity();
        dir.truncate(&alloc, 3);
        tracking.set_budget(Some(0));
        dir.fit_handles(&alloc);
        assert_eq!(dir.handle_capacity(), cap);
        assert_eq!(dir.len(), 3);

        tracking.set_budget(None);
        unsafe { dir.release(&alloc) };
        assert_eq!(tracking.live(), 0);
    }

    #[test]
    fn shrink_centres_window_and_frees_surplus() {
        let tracking = Tracking::new();
        let alloc = &tracking;
        let mut dir = RawDirectory::<u32, 4>::allocate(&alloc, 8).unwrap();
        let kept = [dir.block(1), dir.block(2)];
        assert_eq!(tracking.live(), 9);

        let lead = dir.shrink(&alloc, 5, 1..3).unwrap();
        assert_eq!(lead, 1);
        assert_eq!(dir.len(), 5);
        assert_eq!([dir.block(1), dir.block(2)], kept);
        // five blocks plus one handle array
        assert_eq!(tracking.live(), 6);

        unsafe { dir.release(&alloc) };
        assert_eq!(tracking.live(), 0);
    }
}
