//! Fixed-Size Circular Buffer for Sample History
//!
//! ## Overview
//!
//! Both history windows the engine keeps are ring buffers with a capacity
//! fixed at compile time:
//!
//! - **Distance history**: the last `DEBOUNCE_DEPTH` raw range samples, used
//!   for median stabilization.
//! - **KinematicHistory**: the last `CONSECUTIVE_READINGS` speeds and
//!   accelerations, used for sustained-evidence checks.
//!
//! The buffer never allocates and never grows. When full, `push()`
//! overwrites the oldest slot.
//!
//! ### Memory Layout
//!
//! ```text
//! CircularBuffer<f32, 3> after 4 pushes (a, b, c, d):
//! ┌─────┬─────┬─────┐
//! │  d  │  b  │  c  │  ← Array indices 0..3
//! └─────┴─────┴─────┘
//!          ↑
//!          └── write_pos = 1 (oldest, next to be overwritten)
//!
//! Logical view (iter): [b, c, d]
//! ```
//!
//! ### Pre-filled Buffers
//!
//! Kinematic history must read as zeros before any motion has been seen and
//! again after a resume. [`CircularBuffer::filled`] and
//! [`CircularBuffer::fill`] create that state: every slot is occupied, so
//! `last()` is the zero that the next acceleration is differenced against.
//!
//! ## Usage Example
//!
//! ```rust
//! use stairguard_core::buffer::CircularBuffer;
//!
//! let mut speeds: CircularBuffer<f32, 3> = CircularBuffer::filled(0.0);
//! speeds.push(0.8);
//! speeds.push(0.9);
//!
//! assert_eq!(speeds.last(), Some(&0.9));
//! let values: Vec<f32> = speeds.iter().copied().collect();
//! assert_eq!(values, vec![0.0, 0.8, 0.9]);
//! ```

/// Fixed-size circular buffer
///
/// ## Type Parameters
///
/// - `T`: stored item, must be `Copy` so slots can be initialized inline.
/// - `N`: capacity, a compile-time constant.
///
/// ## Internal Invariants
///
/// - `write_pos < N`
/// - `len <= N`
/// - Iteration is chronological (oldest first)
///
/// ## Thread Safety
///
/// Not synchronized. The lifecycle state machine is its sole mutator.
#[derive(Debug, Clone)]
pub struct CircularBuffer<T: Copy, const N: usize> {
    /// Storage; `None` marks slots that were never written
    data: [Option<T>; N],

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of occupied slots
    len: usize,
}

impl<T: Copy, const N: usize> CircularBuffer<T, N> {
    /// Creates a new empty buffer
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Creates a full buffer with every slot set to `value`
    pub const fn filled(value: T) -> Self {
        Self {
            data: [Some(value); N],
            write_pos: 0,
            len: N,
        }
    }

    /// Adds an item, overwriting the oldest when full
    pub fn push(&mut self, item: T) {
        self.data[self.write_pos] = Some(item);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Get number of stored items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Fixed capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Get the most recent item
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        // Most recent is one before write position
        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };

        self.data[idx].as_ref()
    }

    /// Iterate over items from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T, N> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Drop all items
    pub fn clear(&mut self) {
        self.data = [None; N];
        self.write_pos = 0;
        self.len = 0;
    }

    /// Overwrite every slot with `value` and mark the buffer full
    pub fn fill(&mut self, value: T) {
        *self = Self::filled(value);
    }

    /// Gets an item by logical index (0 = oldest, len-1 = newest)
    ///
    /// When full, the oldest item sits at `write_pos`:
    ///
    /// ```text
    /// Physical array:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical view:    [A, B, C, D, E]
    /// logical[0] = physical[(2+0)%5] = A
    /// ```
    fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual_index].as_ref()
    }
}

/// Iterator over circular buffer contents
pub struct CircularBufferIter<'a, T: Copy, const N: usize> {
    buffer: &'a CircularBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for CircularBufferIter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

impl<T: Copy, const N: usize> Default for CircularBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: CircularBuffer<f32, 5> = CircularBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.last().is_none());
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = CircularBuffer::<f32, 5>::new();

        buffer.push(120.0);
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.last(), Some(&120.0));
    }

    #[test]
    fn circular_overwrite() {
        let mut buffer = CircularBuffer::<u32, 3>::new();

        for i in 0..5 {
            buffer.push(i);
        }

        // Oldest 0, 1 were overwritten
        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
        let values: Vec<u32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(buffer.last(), Some(&4));
    }

    #[test]
    fn filled_buffer_reads_as_full() {
        let buffer = CircularBuffer::<f32, 3>::filled(0.0);
        assert!(buffer.is_full());
        assert_eq!(buffer.last(), Some(&0.0));
        assert_eq!(buffer.iter().filter(|v| **v == 0.0).count(), 3);
    }

    #[test]
    fn fill_resets_history() {
        let mut buffer = CircularBuffer::<f32, 3>::filled(0.0);
        buffer.push(0.9);
        buffer.push(1.1);

        buffer.fill(0.0);

        assert_eq!(buffer.len(), 3);
        assert!(buffer.iter().all(|v| *v == 0.0));
        buffer.push(0.4);
        let values: Vec<f32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![0.0, 0.0, 0.4]);
    }

    #[test]
    fn clear_empties() {
        let mut buffer = CircularBuffer::<u8, 4>::new();
        buffer.push(1);
        buffer.push(2);
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.last().is_none());

        buffer.push(7);
        let values: Vec<u8> = buffer.iter().copied().collect();
        assert_eq!(values, vec![7]);
    }
}
