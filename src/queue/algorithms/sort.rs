use crate::queue::{attach_before, detach, value_of, Node, Queue};
use std::cmp::Ordering;
use std::ptr::NonNull;
use tracing::trace;

impl Queue {
    /// Sort the queue in ascending lexicographic order of the payloads.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is an iterative bottom-up merge sort. Runs of
    /// length 1, 2, 4, ... are merged pairwise by moving nodes of the right
    /// run in front of nodes of the left run. No node is allocated and no
    /// payload is copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["pear", "apple", "fig", "apple"])?;
    /// queue.sort();
    /// assert_eq!(
    ///     queue.iter().collect::<Vec<_>>(),
    ///     vec!["apple", "apple", "fig", "pear"]
    /// );
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn sort(&mut self) {
        merge_sort(self, |a, b| a > b);
    }

    /// Sort the queue with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// payloads. If the ordering is not total, the order of the elements
    /// is unspecified.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["bb", "a", "ccc"])?;
    /// queue.sort_by(|a, b| b.len().cmp(&a.len()));
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["ccc", "bb", "a"]);
    /// # Ok::<(), cyclic_queue::QueueError>(())
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        merge_sort(self, |a, b| compare(a, b) == Ordering::Greater)
    }
}

fn merge_sort<F>(queue: &mut Queue, mut greater: F)
where
    F: FnMut(&str, &str) -> bool,
{
    let size = queue.size();
    if size < 2 {
        return;
    }
    let ghost = queue.ghost_node();
    let mut run = 1;
    while run < size {
        trace!(run, size, "merge pass");
        // SAFETY: the walk only visits nodes of the ring, and each merge only
        // moves nodes that were already passed.
        unsafe { merge_pass(queue.front_node(), ghost, run, &mut greater) };
        run *= 2;
    }
    queue.verify();
}

/// Merge every pair of adjacent runs of length `run`, walking from `front`
/// to the ghost node.
///
/// The pair `left..right..node` is merged once the walk reaches `node`, the
/// start of the next pair. Merging only moves nodes in front of `node`, so
/// the walk goes on from `node.next` unaffected.
unsafe fn merge_pass<F>(front: NonNull<Node>, ghost: NonNull<Node>, run: usize, greater: &mut F)
where
    F: FnMut(&str, &str) -> bool,
{
    let (mut left_at, mut right_at) = (2 * run, run);
    let mut left = front;
    let mut right = None;
    let mut node = front;
    let mut index = 0;
    while node != ghost {
        if index == right_at {
            right = Some(node);
        }
        if index == left_at {
            if let Some(right) = right {
                merge_runs(left, right, run, ghost, greater);
            }
            left_at += 2 * run;
            right_at += 2 * run;
            left = node;
            right = None;
        }
        node = node.as_ref().next;
        index += 1;
    }
    // the last pair, with a right run of up to `run` nodes
    if let Some(right) = right {
        merge_runs(left, right, run, ghost, greater);
    }
}

/// Merge two adjacent sorted runs starting at `left` and `right`.
///
/// Whenever the head of the left run is greater than the head of the right
/// run, the right head is moved in front of the left head. Ties keep the
/// left node first. Merging stops when either run is used up, or when the
/// right run reaches the ghost node.
unsafe fn merge_runs<F>(
    mut left: NonNull<Node>,
    mut right: NonNull<Node>,
    run: usize,
    ghost: NonNull<Node>,
    greater: &mut F,
) where
    F: FnMut(&str, &str) -> bool,
{
    let (mut left_merged, mut right_merged) = (0, 0);
    while left_merged < run && right_merged < run && right != ghost {
        if greater(value_of(left), value_of(right)) {
            let next = right.as_ref().next;
            move_node(right, left);
            right = next;
            right_merged += 1;
        } else {
            left = left.as_ref().next;
            left_merged += 1;
        }
    }
}

/// Move the node `from` to the position before `to`.
pub(crate) unsafe fn move_node(from: NonNull<Node>, to: NonNull<Node>) {
    detach(from);
    attach_before(to, from);
}

#[cfg(test)]
mod tests {
    use crate::queue::tests::{contents, queue_of};

    fn test_sort(input: &[&str]) {
        let mut queue = queue_of(input);
        queue.sort();
        let mut expected = input.to_vec();
        expected.sort();
        assert_eq!(contents(&queue), expected);
        assert_eq!(queue.size(), input.len());
    }

    #[test]
    fn queue_sort() {
        test_sort(&[]);
        test_sort(&["a"]);
        test_sort(&["b", "a"]);
        test_sort(&["a", "b"]);
        test_sort(&["c", "b", "a"]);
        test_sort(&["e", "d", "c", "b", "a"]);
        test_sort(&["a", "b", "c", "d", "e", "f", "g"]);
        test_sort(&["d", "a", "c", "b", "g", "e", "f", "h"]);
        test_sort(&["b", "a", "b", "a", "b", "a", "b", "a", "b"]);
        test_sort(&["", "z", "", "a", "za", "zz", "aa", "a"]);
    }

    #[test]
    fn queue_sort_sizes() {
        let words: Vec<String> = (0..100_u32)
            .map(|i| format!("{:03}", (i * 37 + 11) % 101))
            .collect();
        for len in 0..words.len() {
            let input: Vec<&str> = words[..len].iter().map(String::as_str).collect();
            test_sort(&input);
        }
    }

    #[test]
    fn queue_sort_is_stable() {
        let mut queue = queue_of(&["b1", "a1", "b2", "a2", "c1", "a3"]);
        queue.sort_by(|a, b| a[..1].cmp(&b[..1]));
        assert_eq!(
            contents(&queue),
            vec!["a1", "a2", "a3", "b1", "b2", "c1"]
        );
    }

    #[test]
    fn queue_sort_by_reverse() {
        let mut queue = queue_of(&["b", "d", "a", "c"]);
        queue.sort_by(|a, b| b.cmp(a));
        assert_eq!(contents(&queue), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn queue_sort_then_delete_duplicates() {
        let mut queue = queue_of(&["c", "a", "c", "b", "a", "c"]);
        queue.sort();
        assert_eq!(queue.delete_adjacent_duplicates(), 5);
        assert_eq!(contents(&queue), vec!["b"]);
    }

    #[test]
    fn queue_sort_keeps_elements() {
        let mut queue = queue_of(&["x", "y"]);
        let front = queue.front_node();
        let back = queue.back_node();
        queue.sort_by(|a, b| b.cmp(a));
        // the same nodes, relinked
        assert_eq!(queue.front_node(), back);
        assert_eq!(queue.back_node(), front);
    }
}
