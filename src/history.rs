use std::collections::VecDeque;

use image::RgbaImage;

/// Default number of undo steps kept in memory.
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded stack of full-buffer snapshots for undo.
///
/// Snapshots are deep copies with no aliasing to the live buffer, so popping
/// one restores the image pixel-for-pixel regardless of later in-place edits.
/// Once the capacity is reached, pushing evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<RgbaImage>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a history bounded to `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Push a snapshot, evicting the oldest entry once the stack is full.
    pub fn push(&mut self, snapshot: RgbaImage) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Remove and return the most recently pushed snapshot.
    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.snapshots.pop_back()
    }

    /// Drop the most recently pushed snapshot without returning it.
    pub fn discard_last(&mut self) {
        self.snapshots.pop_back();
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
