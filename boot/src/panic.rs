//! Panic handler for the bare-metal target.
//!
//! There is nothing to unwind into and nobody to report to beyond the log
//! sink, so a panic logs and halts the processor.

use core::panic::PanicInfo;

use gekko_lib::klog_error;

use crate::arch;
use crate::lifecycle::globals;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    klog_error!("runtime panic during {}: {}", globals().current_stage().name(), info);
    arch::halt()
}
