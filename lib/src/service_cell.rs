//! Late-bound service registration cell.
//!
//! Eliminates duplicated `AtomicPtr` boilerplate for services the
//! application plugs into the runtime after startup.

use core::sync::atomic::{AtomicPtr, Ordering};

/// A cell holding a `'static` service table, or nothing.
pub struct ServiceCell<T> {
    ptr: AtomicPtr<T>,
}

// SAFETY: Only stores pointer to 'static T; AtomicPtr provides synchronization.
unsafe impl<T: Sync> Sync for ServiceCell<T> {}

impl<T> ServiceCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Install `service`, returning the previously registered table.
    #[inline]
    pub fn replace(&self, service: &'static T) -> Option<&'static T> {
        let prev = self
            .ptr
            .swap(service as *const T as *mut T, Ordering::AcqRel);
        // SAFETY: Only valid &'static T pointers are ever stored.
        unsafe { prev.as_ref() }
    }

    /// The registered service table, or `None` before the first `replace`.
    #[inline]
    pub fn try_get(&self) -> Option<&'static T> {
        let ptr = self.ptr.load(Ordering::Acquire);
        // SAFETY: Only valid &'static T pointers are ever stored.
        unsafe { ptr.as_ref() }
    }
}

impl<T> Default for ServiceCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
