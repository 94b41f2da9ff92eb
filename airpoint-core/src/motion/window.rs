//! Fixed-capacity sample ring
//!
//! Once full, each push overwrites the oldest element. The average only
//! covers elements currently held, so a partially filled window averages
//! over fewer values.

use core::ops::{Add, Mul};

/// Values that can be averaged in a [`SampleWindow`]
pub trait WindowValue: Copy + Default + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> WindowValue for T where T: Copy + Default + Add<Output = T> + Mul<f32, Output = T> {}

/// Circular buffer of the last `N` values
#[derive(Debug, Clone)]
pub struct SampleWindow<T, const N: usize> {
    values: [T; N],
    write_index: usize,
    len: usize,
}

impl<T: WindowValue, const N: usize> Default for SampleWindow<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WindowValue, const N: usize> SampleWindow<T, N> {
    /// Create an empty window
    pub fn new() -> Self {
        Self {
            values: [T::default(); N],
            write_index: 0,
            len: 0,
        }
    }

    /// Append a value, overwriting the oldest when full
    pub fn push(&mut self, value: T) {
        if N == 0 {
            return;
        }
        self.values[self.write_index] = value;
        self.write_index = (self.write_index + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Most recently pushed value
    pub fn latest(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.values[(self.write_index + N - 1) % N])
    }

    /// Mean over held values, `None` when empty
    pub fn average(&self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let sum = self.iter().fold(T::default(), |acc, v| acc + v);
        Some(sum * (1.0 / self.len as f32))
    }

    /// Slot the next push will write
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Held values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let start = (self.write_index + N - self.len) % N.max(1);
        (0..self.len).map(move |i| self.values[(start + i) % N])
    }

    /// Drop all values
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.len = 0;
    }
}
