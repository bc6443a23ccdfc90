//! Gekko runtime ABI types
//!
//! This crate holds the canonical definitions for every record the runtime
//! shares with the link/image-build step and with compiler-emitted code:
//! - ROM copy and BSS zero-fill tables
//! - Constructor/destructor vectors and the program entry point
//! - Global destructor chain links
//! - Exception-table index records used for fragment registration
//!
//! All shared types are `#[repr(C)]`; their layout must not change without
//! a matching change in the linker script.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod dtor;
pub mod error;
pub mod extab;
pub mod section;
pub mod stage;
pub mod vector;

pub use dtor::*;
pub use error::*;
pub use extab::*;
pub use section::*;
pub use stage::*;
pub use vector::*;

/// Records in a sentinel-terminated table.
///
/// The link step emits tables without a length field; the first record for
/// which `is_terminator` returns true ends the table and is not part of it.
pub trait Terminated {
    fn is_terminator(&self) -> bool;
}

/// Returns the prefix of `table` that precedes its first terminator.
///
/// A table without a terminator is returned whole.
pub fn until_terminator<T: Terminated>(table: &[T]) -> &[T] {
    let len = table
        .iter()
        .position(Terminated::is_terminator)
        .unwrap_or(table.len());
    &table[..len]
}
