//! Architecture layer.
//!
//! On PowerPC this is the real entry trampoline, register bootstrap, TOC
//! access and halt loop. Elsewhere the same functions are stubs so the rest
//! of the runtime builds and tests on a host; register bootstrap has no
//! host equivalent at all.

#[cfg(target_arch = "powerpc")]
mod powerpc;
#[cfg(target_arch = "powerpc")]
pub use powerpc::*;

#[cfg(not(target_arch = "powerpc"))]
mod host;
#[cfg(not(target_arch = "powerpc"))]
pub use host::*;
