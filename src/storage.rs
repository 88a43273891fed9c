//! Traits providing genericity over allocation strategies.
//!
//! A [`Deque`](crate::Deque) never talks to the global heap directly. Every
//! block of element cells, every directory of block handles, and every
//! element construction or destruction goes through an [`Allocator`], which
//! is a type parameter of the deque and defaults to [`Global`].

use core::alloc::Layout;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;

use crate::error::AllocError;

/// An allocation strategy for the blocks and the block directory of a deque.
///
/// Only [`allocate`](Allocator::allocate), [`deallocate`](Allocator::deallocate),
/// [`select_on_copy`](Allocator::select_on_copy) and [`is_equal`](Allocator::is_equal)
/// must be provided; the typed customization points have default
/// implementations in terms of those.
///
/// # Safety
/// Implementors must ensure that:
/// * a pointer returned from `allocate(layout)` is valid for reads and writes
///   of `layout.size()` bytes, aligned to `layout.align()`, and stays valid
///   until it is passed to `deallocate` with the same layout;
/// * memory obtained from one allocator may be released through any other
///   allocator for which `is_equal` returns `true`;
/// * moving an allocator does not invalidate the memory it handed out.
pub unsafe trait Allocator {
    /// Whether [`Deque::move_from`](crate::Deque::move_from) hands the source
    /// allocator over to the target along with the storage.
    ///
    /// When this is `false` and the two allocators are not
    /// [equal](Allocator::is_equal), elements are relocated one by one into
    /// storage owned by the target's allocator instead.
    const PROPAGATE_ON_MOVE: bool = true;

    /// Allocates a memory region fitting `layout`.
    ///
    /// Callers guarantee `layout.size()` is non-zero.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases a memory region previously returned from [`allocate`](Allocator::allocate).
    ///
    /// # Safety
    /// `ptr` must denote a live allocation made by this allocator (or one that
    /// compares equal to it) with exactly this `layout`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Returns the allocator a copy of a deque should use.
    fn select_on_copy(&self) -> Self
    where
        Self: Sized;

    /// Returns `true` if memory allocated by `self` can be released by `other`
    /// and vice versa.
    fn is_equal(&self, other: &Self) -> bool;

    /// Allocates uninitialized storage for `count` cells of type `T`.
    ///
    /// Zero-sized requests never reach [`allocate`](Allocator::allocate) and
    /// yield a dangling, well-aligned pointer.
    fn allocate_cells<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::array::<T>(count).map_err(|_| AllocError::capacity_overflow())?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        self.allocate(layout).map(NonNull::cast)
    }

    /// Releases storage obtained from [`allocate_cells`](Allocator::allocate_cells).
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate_cells::<T>(count)` on this
    /// allocator (or an equal one), and all cells must be uninitialized or
    /// already destroyed.
    unsafe fn deallocate_cells<T>(&self, ptr: NonNull<T>, count: usize) {
        let size = size_of::<T>() * count;
        if size == 0 {
            return;
        }

        let layout = Layout::from_size_align_unchecked(size, align_of::<T>());
        self.deallocate(ptr.cast(), layout);
    }

    /// Allocates a directory able to hold `count` block handles.
    fn allocate_handles<T>(&self, count: usize) -> Result<NonNull<NonNull<T>>, AllocError> {
        self.allocate_cells::<NonNull<T>>(count)
    }

    /// Releases a directory obtained from [`allocate_handles`](Allocator::allocate_handles).
    ///
    /// # Safety
    /// Same requirements as [`deallocate_cells`](Allocator::deallocate_cells).
    unsafe fn deallocate_handles<T>(&self, ptr: NonNull<NonNull<T>>, count: usize) {
        self.deallocate_cells::<NonNull<T>>(ptr, count);
    }

    /// Moves `value` into the uninitialized cell at `cell`.
    ///
    /// # Safety
    /// `cell` must be valid for writes and hold no live value.
    #[inline]
    unsafe fn construct<T>(&self, cell: NonNull<T>, value: T) {
        cell.as_ptr().write(value);
    }

    /// Drops the value in the cell at `cell`, leaving it uninitialized.
    ///
    /// # Safety
    /// `cell` must hold a live value, which must not be used afterwards.
    #[inline]
    unsafe fn destroy<T>(&self, cell: NonNull<T>) {
        cell.as_ptr().drop_in_place();
    }
}

/// The global memory allocator, as registered with `#[global_allocator]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| AllocError::exhausted(layout))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        alloc::alloc::dealloc(ptr.as_ptr(), layout);
    }

    #[inline]
    fn select_on_copy(&self) -> Self {
        Global
    }

    #[inline]
    fn is_equal(&self, _other: &Self) -> bool {
        true
    }
}

/// Shares one allocator between several deques; copies keep sharing it.
unsafe impl<A: Allocator> Allocator for &A {
    const PROPAGATE_ON_MOVE: bool = A::PROPAGATE_ON_MOVE;

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    #[inline]
    fn select_on_copy(&self) -> Self {
        *self
    }

    #[inline]
    fn is_equal(&self, other: &Self) -> bool {
        (**self).is_equal(*other)
    }

    #[inline]
    fn allocate_cells<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        (**self).allocate_cells(count)
    }

    #[inline]
    unsafe fn deallocate_cells<T>(&self, ptr: NonNull<T>, count: usize) {
        (**self).deallocate_cells(ptr, count)
    }

    #[inline]
    fn allocate_handles<T>(&self, count: usize) -> Result<NonNull<NonNull<T>>, AllocError> {
        (**self).allocate_handles(count)
    }

    #[inline]
    unsafe fn deallocate_handles<T>(&self, ptr: NonNull<NonNull<T>>, count: usize) {
        (**self).deallocate_handles(ptr, count)
    }

    #[inline]
    unsafe fn construct<T>(&self, cell: NonNull<T>, value: T) {
        (**self).construct(cell, value)
    }

    #[inline]
    unsafe fn destroy<T>(&self, cell: NonNull<T>) {
        (**self).destroy(cell)
    }
}
