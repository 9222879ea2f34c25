//! Fallible allocation of ghost nodes, element nodes and payload copies.
//!
//! Every block handed out here comes from the global allocator with the
//! layout of its type, so it is released with `Box::from_raw`.

use crate::queue::error::QueueError;
use crate::queue::{Element, Node};
use std::alloc::{alloc, Layout};
use std::ptr::NonNull;
use tracing::debug;

/// Allocate a ghost node linked to itself, i.e. an empty ring.
pub(crate) fn new_ghost() -> Result<NonNull<Node>, QueueError> {
    let ghost = alloc_uninit::<Node>()?;
    // SAFETY: `ghost` is freshly allocated with the layout of `Node`.
    unsafe {
        ghost.as_ptr().write(Node {
            next: ghost,
            prev: ghost,
        })
    };
    Ok(ghost)
}

/// Allocate a detached element holding a copy of `value`.
///
/// The payload is copied first, so a failed node allocation only has to drop
/// the copy to leave nothing behind.
pub(crate) fn new_element(value: &str) -> Result<NonNull<Element>, QueueError> {
    let value = copy_payload(value)?;
    let element = alloc_uninit::<Element>()?;
    // SAFETY: `element` is freshly allocated with the layout of `Element`.
    // The links are dangling until the element is attached.
    unsafe {
        element.as_ptr().write(Element {
            node: Node::detached(),
            value,
        })
    };
    Ok(element)
}

fn copy_payload(value: &str) -> Result<String, QueueError> {
    let mut copy = String::new();
    let reserved = if fault::should_fail() {
        // Always overflows; yields a genuine `TryReserveError`.
        copy.try_reserve_exact(usize::MAX)
    } else {
        copy.try_reserve_exact(value.len())
    };
    if let Err(source) = reserved {
        debug!(len = value.len(), "payload allocation failed");
        return Err(QueueError::Payload {
            len: value.len(),
            source,
        });
    }
    copy.push_str(value);
    Ok(copy)
}

fn alloc_uninit<T>() -> Result<NonNull<T>, QueueError> {
    let layout = Layout::new::<T>();
    let ptr = if fault::should_fail() {
        std::ptr::null_mut()
    } else {
        // SAFETY: `Node` and `Element` are never zero-sized.
        unsafe { alloc(layout) }.cast::<T>()
    };
    NonNull::new(ptr).ok_or_else(|| {
        debug!(size = layout.size(), "node allocation failed");
        QueueError::Alloc { layout }
    })
}

#[cfg(not(test))]
mod fault {
    #[inline(always)]
    pub(super) fn should_fail() -> bool {
        false
    }
}
