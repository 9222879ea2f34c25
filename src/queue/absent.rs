//! Operations on a queue that may not exist.
//!
//! Drivers that keep an `Option<Queue>` around can call the queue operations
//! through [`QueueRef`] without matching first. A missing queue behaves as
//! follows:
//!
//! | operation                       | result                    |
//! |---------------------------------|---------------------------|
//! | `insert_head`, `insert_tail`    | `Err(QueueError::Absent)` |
//! | `remove_head`, `remove_tail`    | `None`, buffer untouched  |
//! | `size`                          | `0`                       |
//! | `delete_middle`                 | `false`                   |
//! | `delete_adjacent_duplicates`    | `false`                   |
//! | `swap_pairs`, `reverse`, `sort` | no-op                     |
//!
//! # Examples
//!
//! ```
//! use cyclic_queue::{Queue, QueueError, QueueRef};
//!
//! let mut slot: Option<Queue> = None;
//! assert_eq!(slot.as_mut().insert_tail("a"), Err(QueueError::Absent));
//! assert_eq!(slot.as_mut().size(), 0);
//!
//! slot = Some(Queue::create()?);
//! slot.as_mut().insert_tail("a")?;
//! assert_eq!(slot.as_mut().size(), 1);
//! cyclic_queue::destroy(slot);
//! # Ok::<(), QueueError>(())
//! ```

use crate::queue::{Element, Queue, QueueError};

/// The queue operations, callable on an optional queue.
pub trait QueueRef {
    /// See [`Queue::insert_head`]. Fails with [`QueueError::Absent`] without a queue.
    fn insert_head(&mut self, value: &str) -> Result<(), QueueError>;
    /// See [`Queue::insert_tail`]. Fails with [`QueueError::Absent`] without a queue.
    fn insert_tail(&mut self, value: &str) -> Result<(), QueueError>;
    /// See [`Queue::remove_head`]. `None` without a queue, and `out` is left as is.
    fn remove_head(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>>;
    /// See [`Queue::remove_tail`]. `None` without a queue, and `out` is left as is.
    fn remove_tail(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>>;
    /// See [`Queue::size`]. `0` without a queue.
    fn size(&self) -> usize;
    /// See [`Queue::delete_middle`]. `false` without a queue.
    fn delete_middle(&mut self) -> bool;
    /// See [`Queue::delete_adjacent_duplicates`].
    ///
    /// Returns `false` only when there is no queue; an empty queue succeeds.
    fn delete_adjacent_duplicates(&mut self) -> bool;
    /// See [`Queue::swap_pairs`]. Does nothing without a queue.
    fn swap_pairs(&mut self);
    /// See [`Queue::reverse`]. Does nothing without a queue.
    fn reverse(&mut self);
    /// See [`Queue::sort`]. Does nothing without a queue.
    fn sort(&mut self);
}

impl QueueRef for Option<&mut Queue> {
    fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        self.as_deref_mut()
            .ok_or(QueueError::Absent)?
            .insert_head(value)
    }

    fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        self.as_deref_mut()
            .ok_or(QueueError::Absent)?
            .insert_tail(value)
    }

    fn remove_head(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>> {
        self.as_deref_mut()?.remove_head(out)
    }

    fn remove_tail(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>> {
        self.as_deref_mut()?.remove_tail(out)
    }

    fn size(&self) -> usize {
        self.as_deref().map_or(0, Queue::size)
    }

    fn delete_middle(&mut self) -> bool {
        self.as_deref_mut().is_some_and(Queue::delete_middle)
    }

    fn delete_adjacent_duplicates(&mut self) -> bool {
        match self.as_deref_mut() {
            Some(queue) => {
                queue.delete_adjacent_duplicates();
                true
            }
            None => false,
        }
    }

    fn swap_pairs(&mut self) {
        if let Some(queue) = self.as_deref_mut() {
            queue.swap_pairs();
        }
    }

    fn reverse(&mut self) {
        if let Some(queue) = self.as_deref_mut() {
            queue.reverse();
        }
    }

    fn sort(&mut self) {
        if let Some(queue) = self.as_deref_mut() {
            queue.sort();
        }
    }
}

/// Destroys the queue if there is one.
pub fn destroy(queue: Option<Queue>) {
    if let Some(queue) = queue {
        queue.destroy();
    }
}
