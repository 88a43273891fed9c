#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/blockdeque/0.1.0")]

//! A double-ended queue built from a directory of fixed-size blocks.
//!
//! [`Deque`] stores its elements in blocks of `B` cells (four by default),
//! strung together by a directory of block handles. Pushing at either end
//! fills the outermost block and adds a new one only when that block is
//! full, so elements never move once constructed; indexing is a constant
//! time computation on the directory. Popping releases blocks again once the
//! remaining elements fit into half of the directory.
//!
//! Every allocation goes through the deque's [`Allocator`]; by default that
//! is the [`Global`] heap. Operations that allocate come in two flavors:
//! `try_` methods report failure as an [`AllocError`] (or a [`PushError`]
//! carrying the rejected value) and leave the deque exactly as it was, while
//! their plain counterparts diverge through
//! [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
//!
//! ```
//! use blockdeque::Deque;
//!
//! let mut deque = Deque::new();
//! deque.push_back(2);
//! deque.push_back(3);
//! deque.push_front(1);
//!
//! assert_eq!(deque.len(), 3);
//! assert_eq!(deque[0], 1);
//! assert_eq!(deque.at(3).unwrap_err().index(), 3);
//!
//! let cursor = deque.begin() + 2;
//! assert_eq!(cursor.get(), Some(&3));
//! assert_eq!(deque.end() - deque.begin(), 3);
//!
//! assert_eq!(deque.pop_front(), Some(1));
//! assert_eq!(deque.to_string(), "2 3");
//! ```
//!
//! # Features
//!
//! * `std` (enabled by default) implements [`std::error::Error`] for the
//!   crate's error types. Without it the crate only depends on `core` and
//!   `alloc`.

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod cursor;
pub mod deque;
pub mod error;
pub mod iter;
mod raw;
pub mod storage;

#[cfg(test)]
mod testing;

pub use crate::cursor::{Cursor, CursorMut};
pub use crate::deque::Deque;
pub use crate::error::{AllocError, OutOfRange, PushError};
pub use crate::raw::Slot;
pub use crate::storage::{Allocator, Global};
