//! RNG module - bag-based supply queue
//!
//! The queue is refilled in batches holding exactly one of each of the seven
//! shapes. A batch is shuffled by repeatedly taking a uniformly random remaining
//! shape out of the fresh bag and appending it to the tail, so already queued
//! entries are never reordered.
//!
//! Also provides a simple LCG so a whole game is reproducible from its seed.

use std::collections::VecDeque;

use crate::types::{Shape, MAX_PREVIEW_LEN};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Ordered queue of upcoming shapes ("bag" randomizer).
#[derive(Debug, Clone)]
pub struct SupplyQueue {
    queue: VecDeque<Shape>,
    rng: SimpleRng,
}

impl SupplyQueue {
    /// Minimum number of entries left after any pop.
    pub const MIN_LEN: usize = 7;

    /// Create a queue holding one freshly shuffled bag.
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            queue: VecDeque::with_capacity(2 * Self::MIN_LEN),
            rng: SimpleRng::new(seed),
        };
        queue.replenish();
        queue
    }

    /// Append one of each shape, in random order, to the tail.
    pub fn replenish(&mut self) {
        let mut bag: Vec<Shape> = Shape::BAG.to_vec();
        while !bag.is_empty() {
            let idx = self.rng.next_range(bag.len() as u32) as usize;
            self.queue.push_back(bag.remove(idx));
        }
    }

    /// Remove and return the head, topping the queue up to at least seven entries.
    pub fn pop_next(&mut self) -> Shape {
        if self.queue.is_empty() {
            self.replenish();
        }
        let shape = match self.queue.pop_front() {
            Some(shape) => shape,
            None => unreachable!("replenish always appends a full bag"),
        };
        if self.queue.len() < Self::MIN_LEN {
            self.replenish();
        }
        shape
    }

    /// Head of the queue without removing it.
    pub fn peek(&self) -> Option<Shape> {
        self.queue.front().copied()
    }

    /// Up to `n` upcoming shapes, head first. `n` is capped at seven.
    pub fn preview(&self, n: usize) -> impl Iterator<Item = Shape> + '_ {
        self.queue.iter().copied().take(n.min(MAX_PREVIEW_LEN))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Current RNG state (for restarting a game with a fresh but reproducible sequence).
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for SupplyQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
