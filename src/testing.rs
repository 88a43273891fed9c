//! Allocators and element types shared by the unit tests.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use crate::error::AllocError;
use crate::storage::{Allocator, Global};

/// Counts live allocations and refuses requests once its budget is spent.
#[derive(Debug, Default)]
pub(crate) struct Tracking {
    live: Cell<usize>,
    budget: Cell<Option<usize>>,
}

impl Tracking {
    pub(crate) fn new() -> Self {
        Tracking::default()
    }

    pub(crate) fn with_budget(budget: usize) -> Self {
        let tracking = Tracking::new();
        tracking.set_budget(Some(budget));
        tracking
    }

    /// Limits the number of further successful allocations; `None` lifts the limit.
    pub(crate) fn set_budget(&self, budget: Option<usize>) {
        self.budget.set(budget);
    }

    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }
}

unsafe impl Allocator for Tracking {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if let Some(budget) = self.budget.get() {
            if budget == 0 {
                return Err(AllocError::exhausted(layout));
            }
            self.budget.set(Some(budget - 1));
        }

        let ptr = Global.allocate(layout)?;
        self.live.set(self.live.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.set(self.live.get() - 1);
        Global.deallocate(ptr, layout);
    }

    fn select_on_copy(&self) -> Self {
        Tracking::new()
    }

    fn is_equal(&self, other: &Self) -> bool {
        core::ptr::eq(self, other)
    }
}

/// Shares a [`Tracking`] allocator but stays with its deque on moves, so two
/// deques built on different trackers must relocate their elements.
#[derive(Debug)]
pub(crate) struct Sticky<'a>(pub(crate) &'a Tracking);

unsafe impl Allocator for Sticky<'_> {
    const PROPAGATE_ON_MOVE: bool = false;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.0.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.0.deallocate(ptr, layout)
    }

    fn select_on_copy(&self) -> Self {
        Sticky(self.0)
    }

    fn is_equal(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

/// Increments a shared counter when dropped.
#[derive(Debug)]
pub(crate) struct Droppable<'a> {
    pub(crate) value: usize,
    pub(crate) counter: &'a Cell<usize>,
}

impl<'a> Droppable<'a> {
    pub(crate) fn new(value: usize, counter: &'a Cell<usize>) -> Self {
        Droppable { value, counter }
    }
}

impl Clone for Droppable<'_> {
    fn clone(&self) -> Self {
        Droppable::new(self.value, self.counter)
    }
}

impl Drop for Droppable<'_> {
    fn drop(&mut self) {
        self.counter.set(self.counter.get() + 1);
    }
}

/// Panics on the clone that exhausts its shared budget.
#[derive(Debug)]
pub(crate) struct FragileClone<'a> {
    pub(crate) clones_left: &'a Cell<usize>,
    pub(crate) drops: &'a Cell<usize>,
}

impl Clone for FragileClone<'_> {
    fn clone(&self) -> Self {
        let left = self.clones_left.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.clones_left.set(left - 1);
        FragileClone {
            clones_left: self.clones_left,
            drops: self.drops,
        }
    }
}

impl Drop for FragileClone<'_> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
