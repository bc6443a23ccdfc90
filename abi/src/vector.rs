//! Constructor/destructor vector entries and the program entry point.

use core::ffi::{c_char, c_int};

use crate::Terminated;

/// Static constructor or destructor, as stored in `.ctors`/`.dtors`.
pub type InitFunc = unsafe extern "C" fn();

/// Program entry point (`main`).
pub type EntryFunc = unsafe extern "C" fn(argc: c_int, argv: *const *const c_char) -> c_int;

/// Vector slots are nullable; a null slot terminates the vector.
impl Terminated for Option<InitFunc> {
    #[inline]
    fn is_terminator(&self) -> bool {
        self.is_none()
    }
}
