// The A* open list: an indexed binary min-heap with decrease-key.
//
// Entries are ordered by `(f_score, sequence)`, where `sequence` is a
// monotonic insertion counter, so exact f-ties pop in FIFO order and the
// search is deterministic. `f_score` is compared with `total_cmp`.
//
// Unlike a plain `BinaryHeap`, each node appears at most once: `positions`
// maps `NodeId` -> heap slot, so a score change moves the existing entry in
// O(log n) instead of leaving a stale duplicate behind.
//
// See also: `search.rs`, the only user.

use crate::types::NodeId;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug)]
struct HeapEntry {
    f_score: f64,
    sequence: u64,
    node: NodeId,
}

impl HeapEntry {
    fn cmp_priority(&self, other: &Self) -> Ordering {
        self.f_score
            .total_cmp(&other.f_score)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Priority queue over discovered, unexpanded nodes.
#[derive(Clone, Debug, Default)]
pub struct OpenList {
    heap: Vec<HeapEntry>,
    /// `positions[node] = Some(slot)` while `node` is in the heap.
    positions: Vec<Option<usize>>,
    next_sequence: u64,
}

impl OpenList {
    /// Create an empty list able to hold any node id below `node_count`.
    pub fn new(node_count: usize) -> Self {
        Self {
            heap: Vec::new(),
            positions: vec![None; node_count],
            next_sequence: 0,
        }
    }

    /// Remove every entry. Cost is proportional to the current length.
    pub fn clear(&mut self) {
        for entry in self.heap.drain(..) {
            self.positions[entry.node.0] = None;
        }
        self.next_sequence = 0;
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.positions[node.0].is_some()
    }

    /// Current key of `node`, if queued.
    pub fn priority(&self, node: NodeId) -> Option<f64> {
        self.positions[node.0].map(|slot| self.heap[slot].f_score)
    }

    /// Insert `node`, or re-key it if already queued. A re-keyed entry counts
    /// as a fresh insertion for tie-breaking.
    pub fn push(&mut self, node: NodeId, f_score: f64) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let entry = HeapEntry {
            f_score,
            sequence,
            node,
        };

        match self.positions[node.0] {
            Some(slot) => {
                let old = self.heap[slot];
                self.heap[slot] = entry;
                if entry.cmp_priority(&old) == Ordering::Less {
                    self.sift_up(slot);
                } else {
                    self.sift_down(slot);
                }
            }
            None => {
                let slot = self.heap.len();
                self.heap.push(entry);
                self.positions[node.0] = Some(slot);
                self.sift_up(slot);
            }
        }
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop(&mut self) -> Option<(NodeId, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.remove_slot(0);
        Some((top.node, top.f_score))
    }

    /// Peek at the smallest entry without removing it.
    pub fn peek(&self) -> Option<(NodeId, f64)> {
        self.heap.first().map(|e| (e.node, e.f_score))
    }

    /// Drop `node` from the list. Returns `false` if it was not queued.
    pub fn remove(&mut self, node: NodeId) -> bool {
        match self.positions[node.0] {
            Some(slot) => {
                self.remove_slot(slot);
                true
            }
            None => false,
        }
    }

    fn remove_slot(&mut self, slot: usize) -> HeapEntry {
        let removed = self.heap.swap_remove(slot);
        self.positions[removed.node.0] = None;
        if slot < self.heap.len() {
            // The former last entry now sits in `slot` and may need to go
            // either way.
            self.positions[self.heap[slot].node.0] = Some(slot);
            self.sift_down(slot);
            self.sift_up(slot);
        }
        removed
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].node.0] = Some(a);
        self.positions[self.heap[b].node.0] = Some(b);
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].cmp_priority(&self.heap[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(list: &mut OpenList) -> Vec<(usize, f64)> {
        std::iter::from_fn(|| list.pop())
            .map(|(n, f)| (n.0, f))
            .collect()
    }

    #[test]
    fn pops_in_ascending_f_order() {
        let mut list = OpenList::new(10);
        for (node, f) in [(0, 5.0), (1, 1.0), (2, 3.0), (3, 4.0), (4, 2.0)] {
            list.push(NodeId(node), f);
        }
        assert_eq!(list.len(), 5);
        assert_eq!(list.peek(), Some((NodeId(1), 1.0)));
        let order: Vec<usize> = drain(&mut list).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![1, 4, 2, 3, 0]);
        assert!(list.is_empty());
    }

    #[test]
    fn exact_ties_pop_in_insertion_order() {
        let mut list = OpenList::new(8);
        for node in [5, 2, 7, 0] {
            list.push(NodeId(node), 1.0);
        }
        let order: Vec<usize> = drain(&mut list).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![5, 2, 7, 0]);
    }

    #[test]
    fn decrease_key_moves_existing_entry() {
        let mut list = OpenList::new(4);
        list.push(NodeId(0), 3.0);
        list.push(NodeId(1), 2.0);
        list.push(NodeId(2), 9.0);
        list.push(NodeId(2), 1.0);
        assert_eq!(list.len(), 3, "re-keying must not duplicate");
        assert_eq!(list.priority(NodeId(2)), Some(1.0));
        assert_eq!(
            drain(&mut list),
            vec![(2, 1.0), (1, 2.0), (0, 3.0)]
        );
    }

    #[test]
    fn increase_key_sifts_down() {
        let mut list = OpenList::new(4);
        list.push(NodeId(0), 1.0);
        list.push(NodeId(1), 2.0);
        list.push(NodeId(2), 3.0);
        list.push(NodeId(0), 10.0);
        let order: Vec<usize> = drain(&mut list).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn remove_arbitrary_entry() {
        let mut list = OpenList::new(6);
        for node in 0..6 {
            list.push(NodeId(node), node as f64);
        }
        assert!(list.remove(NodeId(3)));
        assert!(!list.remove(NodeId(3)));
        assert!(!list.contains(NodeId(3)));
        let order: Vec<usize> = drain(&mut list).into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn clear_forgets_positions() {
        let mut list = OpenList::new(3);
        list.push(NodeId(0), 1.0);
        list.push(NodeId(2), 2.0);
        list.clear();
        assert!(list.is_empty());
        assert!(!list.contains(NodeId(0)));
        assert!(!list.contains(NodeId(2)));
        assert_eq!(list.pop(), None);
    }

    #[test]
    fn heap_order_survives_mixed_operations() {
        // Deterministic pseudo-random key sequence.
        let mut list = OpenList::new(64);
        let mut key = 17u64;
        for round in 0..200 {
            key = key.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let node = NodeId((key >> 33) as usize % 64);
            let f = ((key >> 40) % 1000) as f64;
            if round % 7 == 0 {
                list.remove(node);
            } else {
                list.push(node, f);
            }
        }
        let popped = drain(&mut list);
        assert!(popped.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
