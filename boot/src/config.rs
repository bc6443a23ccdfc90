//! Build-time runtime configuration.

use core::ffi::c_int;

pub use gekko_abi::DTOR_GLOBAL_TEARDOWN;

/// Exception fragment slots. One statically linked image needs one.
pub const NUM_FRAGMENTS: usize = 1;

/// Stored fragment id while the image's exception tables are not registered.
pub const FRAGMENT_ID_UNREGISTERED: c_int = -2;

/// There is no host command line; `main` gets `(0, NULL)`.
pub const ENTRY_ARGC: c_int = 0;
