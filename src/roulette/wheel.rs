//! Winning number source for the single-zero wheel.
//!
//! Fairness, not secrecy: the draw must have negligible bias over the pocket
//! range but carries no cryptographic requirement.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Highest pocket on the wheel. Pockets run 0..=36 (European layout; the
/// double-zero variant is not supported).
pub const MAX_POCKET: u8 = 36;

/// Produces one uniformly distributed winning number per spin.
pub trait WinningNumberSource: Send + Sync {
    fn next_winning_number(&self) -> u8;
}

/// Default wheel backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomWheel;

impl RandomWheel {
    pub fn new() -> Self {
        Self
    }
}

impl WinningNumberSource for RandomWheel {
    fn next_winning_number(&self) -> u8 {
        rand::thread_rng().gen_range(0..=MAX_POCKET)
    }
}

/// Always lands on the same pocket. For deterministic tests.
#[derive(Debug)]
pub struct FixedWheel(pub u8);

impl WinningNumberSource for FixedWheel {
    fn next_winning_number(&self) -> u8 {
        self.0
    }
}

/// Wraps another source and counts draws, so tests can assert that a rejected
/// spin consumes no randomness.
pub struct CountingWheel<S> {
    inner: S,
    draws: Arc<AtomicU64>,
}

impl<S: WinningNumberSource> CountingWheel<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            draws: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle to the draw counter, usable after the wheel is moved into an engine.
    pub fn draw_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.draws)
    }

    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }
}

impl<S: WinningNumberSource> WinningNumberSource for CountingWheel<S> {
    fn next_winning_number(&self) -> u8 {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.inner.next_winning_number()
    }
}
