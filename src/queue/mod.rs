use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::NonNull;
use tracing::trace;

pub use crate::queue::absent::{destroy, QueueRef};
pub use crate::queue::error::QueueError;
pub use crate::queue::iterator::{IntoIter, Iter};

pub mod absent;
pub mod error;
pub mod iterator;

mod algorithms;
mod alloc;

/// A queue of owned strings, implemented as an intrusive cyclic doubly-linked
/// list with a ghost node.
///
/// Inserting and removing at either end take constant time. The length is not
/// cached: [`Queue::size`] walks the ring.
///
/// The `Queue` contains a single pointer `ghost` to a payload-free node. An
/// empty queue is a ghost node whose `next` and `prev` point to itself.
///
/// # Naming Conventions
///
/// - *remove*: unlink an element and hand it to the caller, who now owns it;
/// - *delete*: unlink an element and free it.
pub struct Queue {
    ghost: NonNull<Node>,
    _marker: PhantomData<Box<Element>>,
}

/// The linkage record, embedded at the start of every [`Element`] and used on
/// its own as the ghost node.
#[repr(C)]
pub(crate) struct Node {
    pub(crate) next: NonNull<Node>,
    pub(crate) prev: NonNull<Node>,
}

/// A string payload together with its position in a queue.
///
/// Elements obtained from [`Queue::remove_head`] or [`Queue::remove_tail`] are
/// detached and owned by the caller. Dropping the box, or passing it to
/// [`release_element`], frees the payload and then the node.
#[repr(C)]
pub struct Element {
    // must stay the first field: nodes are cast to elements
    node: Node,
    value: String,
}

impl Node {
    /// Links of a node that is not in any ring. They are never read.
    pub(crate) fn detached() -> Self {
        Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

impl Element {
    /// The payload of the element.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element, keeping only its payload.
    pub fn into_value(self: Box<Self>) -> String {
        let Element { value, .. } = *self;
        value
    }
}

/// Frees an element previously obtained from a remove operation: its payload,
/// then its node.
pub fn release_element(element: Box<Element>) {
    drop(element);
}

/// Links `prev` and `next` to each other.
///
/// It is unsafe because both must be live nodes. Whatever they were linked to
/// before is not updated.
pub(crate) unsafe fn connect(mut prev: NonNull<Node>, mut next: NonNull<Node>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

/// Attach the unlinked `node` immediately before `target`.
///
/// It is unsafe because it does not check that `target` is in a well-formed
/// ring, or that `node` is not already part of one.
pub(crate) unsafe fn attach_before(target: NonNull<Node>, node: NonNull<Node>) {
    let prev = target.as_ref().prev;
    #[cfg(debug_assertions)]
    assert_adjacent(prev, target);
    connect(prev, node);
    connect(node, target);
    #[cfg(debug_assertions)]
    {
        assert_adjacent(prev, node);
        assert_adjacent(node, target);
    }
}

/// Detach `node` from its ring by linking its neighbours to each other.
///
/// The links of `node` itself are left as they were, pointing at its former
/// neighbours. They must not be followed afterwards unless they are reassigned
/// first, as moving a node does.
///
/// It is unsafe because `node` must be a non-ghost node of a well-formed ring.
pub(crate) unsafe fn detach(node: NonNull<Node>) {
    connect(node.as_ref().prev, node.as_ref().next);
}

/// The payload of the element embedding `node`.
///
/// It is unsafe because `node` must not be a ghost node, and the returned
/// reference must not outlive the element.
pub(crate) unsafe fn value_of<'a>(node: NonNull<Node>) -> &'a str {
    &node.cast::<Element>().as_ref().value
}

// private methods
impl Queue {
    pub(crate) fn ghost_node(&self) -> NonNull<Node> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Node> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the queue).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the queue).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Copy `value` into a new element and attach it before `target`.
    ///
    /// Nothing is linked unless every allocation succeeded.
    fn insert_before(&mut self, target: NonNull<Node>, value: &str) -> Result<(), QueueError> {
        let element = alloc::new_element(value)?;
        // SAFETY: `target` is a node of this queue, and `element` is freshly
        // allocated and unlinked.
        unsafe { attach_before(target, element.cast()) };
        self.verify();
        Ok(())
    }

    /// Detach the element embedding `node`, and return it as a box.
    ///
    /// It is unsafe because it does not check whether `node` is a non-ghost
    /// node of this queue.
    pub(crate) unsafe fn detach_element(&mut self, node: NonNull<Node>) -> Box<Element> {
        detach(node);
        Box::from_raw(node.cast::<Element>().as_ptr())
    }

    fn remove_node(&mut self, node: NonNull<Node>, out: Option<&mut [u8]>) -> Box<Element> {
        // SAFETY: callers only pass the front or back node of a non-empty queue.
        let element = unsafe { self.detach_element(node) };
        if let Some(buf) = out {
            copy_into(element.value(), buf);
        }
        self.verify();
        element
    }

    #[inline]
    pub(crate) fn verify(&self) {
        #[cfg(any(test, feature = "verify"))]
        self.assert_ring();
    }

    /// Walk the whole ring and check that every node is linked both ways.
    #[cfg(any(test, feature = "verify"))]
    fn assert_ring(&self) {
        let ghost = self.ghost_node();
        let mut node = ghost;
        loop {
            // SAFETY: every node reachable from the ghost node is live.
            unsafe {
                let next = node.as_ref().next;
                assert_eq!(next.as_ref().prev, node, "broken ring: next.prev != node");
                assert_eq!(
                    node.as_ref().prev.as_ref().next,
                    node,
                    "broken ring: prev.next != node"
                );
                node = next;
            }
            if node == ghost {
                break;
            }
        }
    }
}

impl Queue {
    /// Create an empty `Queue`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Alloc`] if the ghost node cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let queue = Queue::create()?;
    /// assert!(queue.is_empty());
    /// assert_eq!(queue.size(), 0);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn create() -> Result<Self, QueueError> {
        let ghost = alloc::new_ghost()?;
        trace!("queue created");
        Ok(Self {
            ghost,
            _marker: PhantomData,
        })
    }

    /// Destroy the queue, freeing every element still in it and then the
    /// ghost node. Equivalent to dropping it.
    pub fn destroy(self) {
        drop(self);
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the number of elements, counted by walking the ring.
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
    /// let mut queue = Queue::create()?;
    /// queue.insert_tail("a")?;
    /// queue.insert_head("b")?;
    /// assert_eq!(queue.size(), 2);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Provides the payload of the first element, or `None` if the queue is
    /// empty.
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides the payload of the last element, or `None` if the queue is
    /// empty.
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Copies `value` into a new element placed first in the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or the payload copy cannot be allocated.
    /// The queue is left untouched in that case.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time, plus the copy of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::create()?;
    /// queue.insert_head("b")?;
    /// queue.insert_head("a")?;
    /// assert_eq!(queue.front(), Some("a"));
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        trace!(len = value.len(), "insert at head");
        self.insert_before(self.front_node(), value)
    }

    /// Copies `value` into a new element placed last in the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or the payload copy cannot be allocated.
    /// The queue is left untouched in that case.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time, plus the copy of `value`.
    pub fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        trace!(len = value.len(), "insert at tail");
        self.insert_before(self.ghost_node(), value)
    }

    /// Removes the first element and hands it over, or returns `None` if the
    /// queue is empty.
    ///
    /// If `out` is given, the payload is also copied into it: the buffer is
    /// zeroed, then at most `out.len() - 1` bytes are copied, so the content
    /// is always followed by a zero byte. An empty buffer is not written.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::create()?;
    /// queue.insert_tail("hello")?;
    ///
    /// let mut buf = [0xff_u8; 4];
    /// let element = queue.remove_head(Some(&mut buf[..])).unwrap();
    /// assert_eq!(element.value(), "hello");
    /// assert_eq!(&buf, b"hel\0");
    /// assert!(queue.is_empty());
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn remove_head(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        trace!("remove at head");
        Some(self.remove_node(self.front_node(), out))
    }

    /// Removes the last element and hands it over, or returns `None` if the
    /// queue is empty.
    ///
    /// `out` is filled as in [`Queue::remove_head`].
    pub fn remove_tail(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        trace!("remove at tail");
        Some(self.remove_node(self.back_node(), out))
    }

    /// Deletes all elements from the `Queue`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self) {
        while let Some(element) = self.remove_head(None) {
            release_element(element);
        }
    }

    /// Provides a forward iterator over the payloads.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }
}

/// Zero `buf`, then copy as much of `value` as fits while keeping the last
/// byte zero.
fn copy_into(value: &str, buf: &mut [u8]) {
    let Some(capacity) = buf.len().checked_sub(1) else {
        return;
    };
    buf.fill(0);
    let len = value.len().min(capacity);
    buf[..len].copy_from_slice(&value.as_bytes()[..len]);
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.value).finish()
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Node>, next: NonNull<Node>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        trace!("queue destroyed");
        // SAFETY: the ghost node was allocated with the layout of `Node` and
        // nothing links to it anymore.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

unsafe impl Send for Queue {}

unsafe impl Sync for Queue {}

// A detached element's links are never followed.
unsafe impl Send for Element {}

unsafe impl Sync for Element {}

#[cfg(test)]
pub(crate) mod tests {
    use crate::queue::alloc::fault::fail_allocations_after;
    use crate::queue::{release_element, Queue, QueueError};

    pub(crate) fn queue_of(values: &[&str]) -> Queue {
        let mut queue = Queue::create().unwrap();
        for value in values {
            queue.insert_tail(value).unwrap();
        }
        queue
    }

    pub(crate) fn contents(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn queue_create() {
        let mut queue = Queue::create().unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.size(), 0);
        queue.insert_tail("a").unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.remove_tail(None).unwrap().value(), "a");
        assert!(queue.is_empty());
        queue.destroy();
    }

    #[test]
    fn queue_insert_and_remove_at_ends() {
        let mut queue = Queue::create().unwrap();
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);
        assert!(queue.remove_head(None).is_none());
        assert!(queue.remove_tail(None).is_none());

        queue.insert_head("b").unwrap();
        queue.insert_head("a").unwrap();
        queue.insert_tail("c").unwrap();
        assert_eq!(contents(&queue), vec!["a", "b", "c"]);
        assert_eq!(queue.front(), Some("a"));
        assert_eq!(queue.back(), Some("c"));
        assert_eq!(queue.size(), 3);

        assert_eq!(queue.remove_tail(None).unwrap().into_value(), "c");
        assert_eq!(queue.remove_head(None).unwrap().into_value(), "a");
        assert_eq!(contents(&queue), vec!["b"]);
        assert_eq!(queue.front(), queue.back());
    }

    #[test]
    fn queue_insert_copies_payload() {
        let mut source = String::from("payload");
        let mut queue = Queue::create().unwrap();
        queue.insert_tail(&source).unwrap();
        queue.insert_tail("").unwrap();
        source.clear();
        assert_eq!(contents(&queue), vec!["payload", ""]);
    }

    #[test]
    fn queue_remove_copies_into_buffer() {
        let mut queue = queue_of(&["abcdef", "xy", "tail"]);

        let mut buf = [b'#'; 4];
        let element = queue.remove_head(Some(&mut buf[..])).unwrap();
        assert_eq!(element.value(), "abcdef");
        assert_eq!(&buf, b"abc\0");
        release_element(element);

        // short payloads leave the rest of the buffer zeroed
        let mut buf = [b'#'; 6];
        queue.remove_head(Some(&mut buf[..])).unwrap();
        assert_eq!(&buf, b"xy\0\0\0\0");

        // an empty buffer is never written
        let mut buf = [0_u8; 0];
        assert_eq!(
            queue.remove_tail(Some(&mut buf[..])).unwrap().value(),
            "tail"
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_remove_from_empty_leaves_buffer_alone() {
        let mut queue = Queue::create().unwrap();
        let mut buf = [b'#'; 4];
        assert!(queue.remove_head(Some(&mut buf[..])).is_none());
        assert!(queue.remove_tail(Some(&mut buf[..])).is_none());
        assert_eq!(&buf, b"####");
    }

    #[test]
    fn queue_remove_then_insert_restores() {
        let mut queue = queue_of(&["a", "b", "c"]);
        let element = queue.remove_head(None).unwrap();
        queue.insert_head(element.value()).unwrap();
        release_element(element);
        assert_eq!(contents(&queue), vec!["a", "b", "c"]);
        assert_eq!(queue.size(), 3);
    }

    #[test]
    fn queue_element_outlives_queue() {
        let mut queue = queue_of(&["kept", "freed"]);
        let element = queue.remove_head(None).unwrap();
        drop(queue);
        assert_eq!(element.into_value(), "kept");
    }

    #[test]
    fn queue_create_fails_without_memory() {
        let _guard = fail_allocations_after(0);
        assert!(matches!(
            Queue::create(),
            Err(QueueError::Alloc { .. })
        ));
    }

    #[test]
    fn queue_insert_payload_failure_leaves_queue_unchanged() {
        let mut queue = queue_of(&["a", "b"]);
        let _guard = fail_allocations_after(0);
        let err = queue.insert_head("c").unwrap_err();
        assert!(matches!(err, QueueError::Payload { len: 1, .. }));
        assert_eq!(contents(&queue), vec!["a", "b"]);
    }

    #[test]
    fn queue_insert_node_failure_leaves_queue_unchanged() {
        let mut queue = queue_of(&["a", "b"]);
        // the payload copy succeeds, the node allocation does not
        let _guard = fail_allocations_after(1);
        let err = queue.insert_tail("c").unwrap_err();
        assert!(matches!(err, QueueError::Alloc { .. }));
        assert_eq!(contents(&queue), vec!["a", "b"]);
        assert_eq!(queue.size(), 2);
    }

    #[test]
    fn queue_clear() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.clear();
        assert!(queue.is_empty());
        queue.insert_tail("d").unwrap();
        assert_eq!(contents(&queue), vec!["d"]);
    }

    #[test]
    fn queue_debug() {
        let queue = queue_of(&["a", "b"]);
        assert_eq!(format!("{:?}", queue), r#"["a", "b"]"#);
        let mut queue = queue;
        let element = queue.remove_tail(None).unwrap();
        assert_eq!(format!("{:?}", element), r#"Element("b")"#);
    }
}
