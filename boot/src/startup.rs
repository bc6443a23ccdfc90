//! Startup and teardown orchestration.
//!
//! ```text
//! RESET -> REGISTERS_INITIALIZED -> DATA_INITIALIZED -> CONSTRUCTED
//!       -> RUNNING -> DESTRUCTED -> HALTED
//! ```
//!
//! One forward pass per power-on, no re-entry. The first transition is the
//! `__start` trampoline in [`crate::arch`]; the rest happens here. Until
//! the section initializer returns, nothing on this path may touch a
//! static, log included.

use core::ffi::c_int;
use core::ptr;

use gekko_abi::{EntryFunc, RuntimeStage};
use gekko_lib::{klog_debug, klog_info};

use crate::arch;
use crate::config::ENTRY_ARGC;
use crate::lifecycle::globals;
use crate::sections::{SectionTables, initialize_sections};
use crate::vectors::InitVector;

/// Everything the orchestrator needs from the linked image.
#[derive(Clone, Copy)]
pub struct BootImage<'a> {
    pub sections: SectionTables<'a>,
    pub constructors: InitVector<'a>,
    pub destructors: InitVector<'a>,
    pub entry: EntryFunc,
}

/// Run the image from `REGISTERS_INITIALIZED` to `DESTRUCTED` and return
/// the entry point's status. The caller halts afterwards.
///
/// # Safety
///
/// - Registers must already be bootstrapped.
/// - Must run once, before any other code touches `.data`/`.bss`.
/// - The image's tables and vectors must be well formed.
pub unsafe fn run_image(image: &BootImage<'_>) -> c_int {
    // SAFETY: forwarded from the caller.
    let summary = unsafe { initialize_sections(&image.sections) };

    let globals = globals();
    globals.init();
    if cfg!(feature = "startup-trace") {
        gekko_lib::klog_set_level(gekko_lib::KlogLevel::Debug);
    }
    klog_debug!(
        "runtime: {} sections copied ({} bytes, {} in place), {} zeroed ({} bytes)",
        summary.copied,
        summary.bytes_copied,
        summary.in_place,
        summary.zeroed,
        summary.bytes_zeroed
    );

    // SAFETY: data sections are live; constructors may now run.
    let constructed = unsafe { image.constructors.run() };
    globals.mark(RuntimeStage::Constructed);
    klog_debug!("runtime: {} static constructors run", constructed);

    globals.mark(RuntimeStage::Running);
    // SAFETY: the entry point is called exactly once, with no arguments.
    let status = unsafe { (image.entry)(ENTRY_ARGC, ptr::null()) };
    klog_debug!("runtime: entry point returned {}", status);

    // SAFETY: forwarded from the caller.
    unsafe { teardown(&image.destructors) };
    status
}

/// Run the destructor vector in table order, at most once per program.
///
/// Returns `false` without running anything if teardown already started,
/// e.g. `exit` called from a destructor.
///
/// # Safety
///
/// Every entry of `destructors` must be sound to call now.
pub unsafe fn teardown(destructors: &InitVector<'_>) -> bool {
    let globals = globals();
    if !globals.begin_teardown() {
        klog_debug!("runtime: teardown already in progress");
        return false;
    }
    // SAFETY: forwarded from the caller.
    let destroyed = unsafe { destructors.run() };
    globals.mark(RuntimeStage::Destructed);
    klog_debug!("runtime: {} static destructors run", destroyed);
    true
}

/// Terminal state. Nothing runs after this.
pub fn halt() -> ! {
    globals().mark(RuntimeStage::Halted);
    klog_info!("runtime: halted");
    arch::halt()
}

/// Explicit exit request: full teardown, then halt.
///
/// # Safety
///
/// See [`teardown`].
pub unsafe fn exit_with(destructors: &InitVector<'_>, status: c_int) -> ! {
    klog_info!("runtime: exit({}) requested", status);
    // SAFETY: forwarded from the caller.
    unsafe { teardown(destructors) };
    halt()
}

#[cfg(target_os = "none")]
mod entry {
    use core::ffi::{c_char, c_int};

    use gekko_lib::klog_debug;

    use super::{BootImage, exit_with, halt, run_image};
    use crate::symbols;

    unsafe extern "C" {
        fn main(argc: c_int, argv: *const *const c_char) -> c_int;
    }

    /// Called by `__start` once registers are bootstrapped.
    #[unsafe(no_mangle)]
    #[unsafe(link_section = ".init")]
    pub unsafe extern "C" fn gekko_start_rust() -> ! {
        // SAFETY: tables come from the link step; this is the only entry.
        unsafe {
            let image = BootImage {
                sections: symbols::section_tables(),
                constructors: symbols::constructors(),
                destructors: symbols::destructors(),
                entry: main,
            };
            let (sda, sda2) = symbols::small_data_bases();
            let status = run_image(&image);
            klog_debug!(
                "runtime: stack {:p}, sda {:p}, sda2 {:p}, status {}",
                symbols::stack_top(),
                sda,
                sda2,
                status
            );
        }
        halt()
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn exit(status: c_int) -> ! {
        // SAFETY: `_dtors` is produced by the link step.
        unsafe { exit_with(&symbols::destructors(), status) }
    }
}
