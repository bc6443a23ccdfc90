//! Process-wide mutable state.
//!
//! The runtime's globals (destructor chain head, fragment table, stage
//! record) are only ever touched from the single thread of control that
//! runs startup and teardown, with nothing preemptible running. The
//! `spin::Mutex` inside `GlobalCell` is what lets these live in a `static`;
//! it is not a concurrency story. Calling into a global from an interrupt
//! handler or a second hardware thread while startup or teardown is in
//! progress breaks that invariant and needs real interrupt masking first.

pub struct GlobalCell<T> {
    inner: spin::Mutex<T>,
}

impl<T> GlobalCell<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            inner: spin::Mutex::new(value),
        }
    }

    /// Run `f` with exclusive access to the value.
    ///
    /// `f` must not call back into code that touches the same cell; the
    /// lock is not re-entrant and would spin forever.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Overwrite the value, dropping the old one.
    #[inline]
    pub fn set(&self, value: T) {
        *self.inner.lock() = value;
    }
}

impl<T: Copy> GlobalCell<T> {
    #[inline]
    pub fn get(&self) -> T {
        *self.inner.lock()
    }
}
