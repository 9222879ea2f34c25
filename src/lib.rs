//! This crate provides a queue of owned strings, implemented as an intrusive
//! cyclic doubly-linked list.
//!
//! The [`Queue`] allows inserting and removing elements at either end in
//! constant time, and rearranging the whole list in place: deleting the middle
//! element, deleting duplicated payloads, swapping adjacent pairs, reversing
//! and sorting. None of the rearrangements allocates or copies a payload; they
//! only rewrite links.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::{release_element, Queue};
//!
//! let mut queue = Queue::create()?;
//! queue.insert_tail("banana")?;
//! queue.insert_tail("cherry")?;
//! queue.insert_head("apple")?;
//! assert_eq!(queue.size(), 3);
//!
//! queue.reverse();
//! assert_eq!(queue.front(), Some("cherry"));
//!
//! queue.sort();
//! let mut buf = [0_u8; 16];
//! let element = queue.remove_head(Some(&mut buf[..])).unwrap();
//! assert_eq!(element.value(), "apple");
//! assert_eq!(&buf[..6], b"apple\0");
//! release_element(element);
//! # Ok::<(), cyclic_queue::QueueError>(())
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node    │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢    Element 2, 3, ...   ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║  String   ║           ║  String   ║                           ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                           │   │
//! │    Element 0               Element 1                             │   │
//! └──────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                          │
//! ║   ghost   ║ ─────────────────────────────────────────────────────────┘
//! ╚═══════════╝
//!     Queue
//! ```
//!
//! Each element starts with its `next` and `prev` links, followed by the
//! owned `String` payload. The ghost node has the links only, and is never
//! read as an element. There is no length field: [`Queue::size`] counts the
//! elements by walking the ring.
//!
//! # Ownership
//!
//! *Remove* and *delete* are different things:
//! - [`Queue::remove_head`] and [`Queue::remove_tail`] unlink an element and
//!   return it as a `Box<Element>`. The caller owns it and frees it by dropping
//!   it or with [`release_element`];
//! - [`Queue::delete_middle`] and [`Queue::delete_adjacent_duplicates`] unlink
//!   elements and free them.
//!
//! Dropping (or [`destroy`]ing) a queue frees every element still in it.
//!
//! # Allocation Failure
//!
//! Creating a queue and inserting into it report allocation failure as a
//! [`QueueError`] instead of aborting. A failed insert leaves the queue as it
//! was.
//!
//! # Features
//!
//! - `verify`: after every mutating operation, walk the whole ring and assert
//!   that each node's neighbours link back to it.
//!
//! [`destroy`]: Queue::destroy

#[doc(inline)]
pub use queue::{
    destroy, release_element, Element, IntoIter, Iter, Queue, QueueError, QueueRef,
};

pub mod queue;
