//! Atomic flag for tracking in-progress operations.
//!
//! # Usage
//!
//! ```ignore
//! static TEARDOWN: StateFlag = StateFlag::new();
//!
//! pub fn teardown() {
//!     if !TEARDOWN.enter() {
//!         return; // someone is already tearing down
//!     }
//!     // ... run destructors ...
//! }
//! ```
//!
//! # Memory Ordering
//!
//! - `enter()` uses a `SeqCst` swap
//! - `is_active()` uses `Acquire`, `leave()` uses `Release`

use core::sync::atomic::{AtomicBool, Ordering};

/// "Is X currently happening (or has it happened)?" flag that can be
/// cleared again, unlike a one-way init flag.
#[repr(transparent)]
pub struct StateFlag {
    flag: AtomicBool,
}

impl StateFlag {
    /// Create a new inactive flag.
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Atomically try to enter this state.
    ///
    /// Returns `true` if this call entered the state (was previously inactive).
    /// Returns `false` if already in this state.
    #[inline]
    pub fn enter(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    /// Check if currently in this state.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Leave this state (mark inactive).
    #[inline]
    pub fn leave(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Default for StateFlag {
    fn default() -> Self {
        Self::new()
    }
}
