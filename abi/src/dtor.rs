//! Global destructor chain link, as laid out by the C++ compiler.

use core::ffi::c_void;

/// Destructor entry: `(object, method)`.
///
/// `method` distinguishes an ordinary scoped destruction from the global
/// teardown performed when the chain is drained.
pub type DtorFunc = unsafe extern "C" fn(obj: *mut c_void, method: i16);

/// Discriminator passed to every destructor run by the chain drain.
pub const DTOR_GLOBAL_TEARDOWN: i16 = -1;

/// Intrusive chain node. Storage belongs to the registering object; the
/// chain only links through `next`.
#[repr(C)]
#[derive(Debug)]
pub struct DtorLink {
    pub next: *mut DtorLink,
    pub dtor: Option<DtorFunc>,
    pub obj: *mut c_void,
}

impl DtorLink {
    pub const fn new() -> Self {
        Self {
            next: core::ptr::null_mut(),
            dtor: None,
            obj: core::ptr::null_mut(),
        }
    }
}

impl Default for DtorLink {
    fn default() -> Self {
        Self::new()
    }
}
