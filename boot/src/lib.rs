//! Bare-metal bring-up runtime for Gekko (PowerPC 750CL) images.
//!
//! Takes the CPU from reset to the program's `main` and back down:
//! register bootstrap, ROM copy and BSS zeroing, static constructors,
//! exception-table registration, global destructor chain, halt.

#![no_std]
#![cfg_attr(target_arch = "powerpc", feature(asm_experimental_arch))]

#[cfg(test)]
extern crate std;

pub mod arch;
pub mod config;
pub mod dtor_chain;
pub mod fragment;
pub mod lifecycle;
#[cfg(all(target_os = "none", feature = "panic-handler"))]
mod panic;
pub mod sections;
pub mod startup;
#[cfg(target_os = "none")]
pub mod symbols;
mod table;
pub mod vectors;

pub use gekko_abi as abi;
#[doc(hidden)]
pub use paste;

pub use dtor_chain::{DestructorChain, __destroy_global_chain, __register_global_object};
pub use fragment::{
    Fragment, FragmentId, FragmentRegistry, __register_fragment, __unregister_fragment,
    fini_cpp_exceptions, init_cpp_exceptions,
};
pub use lifecycle::{RuntimeGlobals, current_stage, globals, stage_reached};
pub use sections::{SectionSummary, SectionTables, initialize_sections};
pub use startup::{BootImage, exit_with, halt, run_image, teardown};
pub use vectors::InitVector;

/// Serializes tests that touch the process-wide runtime state.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
