//! # Binary Heap
//!
//! Array-backed priority queue for pathfinding open sets.
//!
//! Items live in an external arena (the grid's node storage); the heap holds
//! arena indices and keeps each item's stored heap index in sync with its
//! true position, so membership checks and priority updates are O(1) lookups
//! plus an O(log n) sift instead of linear scans.

use std::cmp::Ordering;
use std::marker::PhantomData;

/// Stored heap index of an item that is not currently queued.
pub const NOT_IN_HEAP: usize = usize::MAX;

/// An item that can be queued in a [`SlabHeap`].
///
/// Implementors must store the index handed to `set_heap_index` and return
/// it unchanged from `heap_index`; the heap relies on it for O(1) membership
/// and for locating items whose priority changed externally.
pub trait HeapItem {
    /// Priority comparison. `Less` means closer to the top of the heap.
    fn heap_cmp(&self, other: &Self) -> Ordering;

    /// The item's last stored heap position.
    fn heap_index(&self) -> usize;

    /// Records the item's current heap position.
    fn set_heap_index(&mut self, index: usize);
}

/// Binary heap over items stored in an external slice.
///
/// All operations take the arena explicitly; the heap itself only owns the
/// queue of arena indices. Invariant: after every operation, each queued
/// item's stored index equals its position in the queue.
#[derive(Debug)]
pub struct SlabHeap<T: HeapItem> {
    slots: Vec<usize>,
    _items: PhantomData<fn() -> T>,
}

impl<T: HeapItem> SlabHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            _items: PhantomData,
        }
    }

    /// Creates an empty heap with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            _items: PhantomData,
        }
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Queues `id`, restoring heap order by sifting up.
    pub fn push(&mut self, arena: &mut [T], id: usize) {
        arena[id].set_heap_index(self.slots.len());
        self.slots.push(id);
        self.sift_up(arena, self.slots.len() - 1);
    }

    /// Removes and returns the top item, or `None` if the heap is empty.
    pub fn pop(&mut self, arena: &mut [T]) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let root = self.slots[0];
        let last = self.slots.pop().filter(|_| !self.slots.is_empty());
        if let Some(last) = last {
            self.slots[0] = last;
            arena[last].set_heap_index(0);
            self.sift_down(arena, 0);
        }
        arena[root].set_heap_index(NOT_IN_HEAP);
        Some(root)
    }

    /// Re-sifts `id` after its priority improved outside the heap.
    pub fn update(&mut self, arena: &mut [T], id: usize) {
        let pos = arena[id].heap_index();
        if pos < self.slots.len() && self.slots[pos] == id {
            self.sift_up(arena, pos);
        }
    }

    /// Whether `id` is currently queued, via its stored index.
    pub fn contains(&self, arena: &[T], id: usize) -> bool {
        let pos = arena[id].heap_index();
        pos < self.slots.len() && self.slots[pos] == id
    }

    fn sift_up(&mut self, arena: &mut [T], mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if arena[self.slots[pos]].heap_cmp(&arena[self.slots[parent]]) == Ordering::Less {
                self.swap_slots(arena, pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, arena: &mut [T], mut pos: usize) {
        loop {
            let left = pos * 2 + 1;
            let right = pos * 2 + 2;
            if left >= self.slots.len() {
                return;
            }
            let mut swap = left;
            if right < self.slots.len()
                && arena[self.slots[right]].heap_cmp(&arena[self.slots[left]]) == Ordering::Less
            {
                swap = right;
            }
            if arena[self.slots[swap]].heap_cmp(&arena[self.slots[pos]]) == Ordering::Less {
                self.swap_slots(arena, pos, swap);
                pos = swap;
            } else {
                return;
            }
        }
    }

    fn swap_slots(&mut self, arena: &mut [T], a: usize, b: usize) {
        self.slots.swap(a, b);
        let id_a = self.slots[a];
        let id_b = self.slots[b];
        arena[id_a].set_heap_index(a);
        arena[id_b].set_heap_index(b);
    }
}

impl<T: HeapItem> Default for SlabHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
