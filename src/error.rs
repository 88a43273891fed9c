//! Error types reported by fallible deque operations.

use core::alloc::Layout;
use core::fmt::{self, Debug, Display, Formatter};

/// The error type for operations that allocate blocks or block directories.
///
/// Either the allocator refused a request, in which case the offending
/// [`Layout`] is available, or the request was too large to describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    layout: Option<Layout>,
}

impl AllocError {
    #[inline]
    pub(crate) fn exhausted(layout: Layout) -> Self {
        AllocError {
            layout: Some(layout),
        }
    }

    #[inline]
    pub(crate) fn capacity_overflow() -> Self {
        AllocError { layout: None }
    }

    /// Returns the layout of the failed request, or [`None`] if the requested
    /// size overflowed.
    #[inline]
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Returns `true` if the requested size could not be represented at all.
    #[inline]
    pub fn is_capacity_overflow(&self) -> bool {
        self.layout.is_none()
    }

    /// Diverges the way the infallible API reports allocation failure.
    #[cold]
    #[track_caller]
    pub(crate) fn handle(self) -> ! {
        match self.layout {
            Some(layout) => alloc::alloc::handle_alloc_error(layout),
            None => capacity_overflow(),
        }
    }
}

#[inline(never)]
#[cold]
#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.layout {
            Some(layout) => write!(f, "memory allocation of {} bytes failed", layout.size()),
            None => f.write_str("capacity overflow"),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
impl std::error::Error for AllocError {}

/// The error type for [`Deque::at`](crate::Deque::at) and
/// [`Deque::at_mut`](crate::Deque::at_mut).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutOfRange {
    index: usize,
    len: usize,
}

impl OutOfRange {
    #[inline]
    pub(crate) fn new(index: usize, len: usize) -> Self {
        OutOfRange { index, len }
    }

    /// Returns the rejected index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the length of the deque at the time of the call.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl Display for OutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index out of range: the len is {} but the index is {}",
            self.len, self.index
        )
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
impl std::error::Error for OutOfRange {}

/// A possible error value when pushing onto a deque fails to allocate.
///
/// The rejected value is handed back to the caller.
///
/// # Examples
/// ```
/// use blockdeque::Deque;
///
/// let mut deque = Deque::new();
/// // The global allocator does not fail for requests this small.
/// assert!(deque.try_push_back(String::from("a")).is_ok());
/// ```
pub struct PushError<T> {
    value: T,
    cause: AllocError,
}

impl<T> PushError<T> {
    #[inline]
    pub(crate) fn new(value: T, cause: AllocError) -> Self {
        PushError { value, cause }
    }

    /// Returns the allocation failure that rejected the push.
    #[inline]
    pub fn cause(&self) -> AllocError {
        self.cause
    }

    /// Returns the value that could not be pushed.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Discards the value and returns the allocation failure.
    #[inline]
    pub fn into_cause(self) -> AllocError {
        self.cause
    }
}

impl<T> Debug for PushError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

impl<T> Display for PushError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "push failed: {}", self.cause)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
impl<T> std::error::Error for PushError<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        let layout = Layout::new::<[u64; 4]>();
        assert_eq!(
            AllocError::exhausted(layout).to_string(),
            "memory allocation of 32 bytes failed"
        );
        assert_eq!(AllocError::capacity_overflow().to_string(), "capacity overflow");
        assert_eq!(
            OutOfRange::new(5, 3).to_string(),
            "index out of range: the len is 3 but the index is 5"
        );

        let err = PushError::new("value", AllocError::capacity_overflow());
        assert_eq!(err.to_string(), "push failed: capacity overflow");
        assert_eq!(err.into_inner(), "value");
    }
}
