use crate::queue::{release_element, value_of, Queue};
use std::hash::{Hash, Hasher};
use std::mem;
use tracing::{debug, trace};

mod sort;

pub(crate) use sort::move_node;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for elt in self {
            elt.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl Queue {
    /// Returns `true` if the `Queue` contains an element equal to the given value.
    pub fn contains(&self, x: &str) -> bool {
        self.iter().any(|e| e == x)
    }

    /// Deletes the middle element, the one at index ⌊*n* / 2⌋ counting from
    /// zero. Of six elements, the fourth one (index 3) goes.
    ///
    /// Returns `false` if the queue is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["a", "b", "c", "d", "e"])?;
    /// assert!(queue.delete_middle());
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["a", "b", "d", "e"]);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn delete_middle(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let index = self.size() / 2;
        let mut node = self.front_node();
        for _ in 0..index {
            // SAFETY: `index < size`, so the walk never reaches the ghost node.
            node = unsafe { node.as_ref().next };
        }
        trace!(index, "delete middle");
        // SAFETY: `node` is the element at `index`.
        release_element(unsafe { self.detach_element(node) });
        self.verify();
        true
    }

    /// Deletes every element whose payload occurs more than once, keeping
    /// only the payloads that were unique. Returns the number of elements
    /// deleted.
    ///
    /// The queue must already be sorted, so that equal payloads are adjacent.
    /// Nothing checks this; on unsorted input only adjacent runs of equal
    /// payloads are deleted.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["a", "a", "b", "c", "c", "c"])?;
    /// assert_eq!(queue.delete_adjacent_duplicates(), 5);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["b"]);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn delete_adjacent_duplicates(&mut self) -> usize {
        let ghost = self.ghost_node();
        let mut node = self.front_node();
        let mut in_run = false;
        let mut deleted = 0;
        while node != ghost {
            // SAFETY: `node` is an element; `next` is read before it is freed,
            // and is either the ghost node or an element.
            unsafe {
                let next = node.as_ref().next;
                let duplicated = next != ghost && value_of(node) == value_of(next);
                if duplicated || in_run {
                    release_element(self.detach_element(node));
                    deleted += 1;
                }
                in_run = duplicated;
                node = next;
            }
        }
        debug!(deleted, "deleted adjacent duplicates");
        self.verify();
        deleted
    }

    /// Swaps every two adjacent elements: the first with the second, the
    /// third with the fourth, and so on. An odd last element stays in place.
    ///
    /// Only links are rewritten; payloads are not moved.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["a", "b", "c", "d", "e"])?;
    /// queue.swap_pairs();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["b", "a", "d", "c", "e"]);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn swap_pairs(&mut self) {
        trace!("swap pairs");
        let ghost = self.ghost_node();
        let mut first = self.front_node();
        // SAFETY: `first` is an element whenever it is not the ghost node, and
        // so is `second`.
        unsafe {
            while first != ghost {
                let second = first.as_ref().next;
                if second == ghost {
                    break;
                }
                move_node(second, first);
                first = first.as_ref().next;
            }
        }
        self.verify();
    }

    /// Reverses the order of the elements, by swapping the `next` and `prev`
    /// links of every node including the ghost node.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["a", "b", "c"])?;
    /// queue.reverse();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn reverse(&mut self) {
        trace!("reverse");
        let ghost = self.ghost_node();
        let mut node = ghost;
        loop {
            // SAFETY: every node of the ring is live; after the swap `prev`
            // holds what was the next node.
            unsafe {
                let links = node.as_mut();
                mem::swap(&mut links.next, &mut links.prev);
                node = links.prev;
            }
            if node == ghost {
                break;
            }
        }
        self.verify();
    }
}
