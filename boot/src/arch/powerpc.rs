//! PowerPC (Gekko/Broadway) entry, register bootstrap and halt.

use core::arch::{asm, global_asm};
use core::ffi::c_void;

// Reset lands in `__start` with every register undefined. `__init_registers`
// zeroes the working GPRs and loads r1 (stack), r2 (_SDA2_BASE_) and r13
// (_SDA_BASE_); small-data addressing is invalid until then. A terminating
// back-chain frame is pushed before entering Rust, which then runs the rest
// of the lifecycle and never returns.
global_asm!(
    r#"
    .section .init, "ax"

    .globl __start
    .type __start, @function
__start:
    bl __init_registers
    li 0, 0
    stwu 1, -16(1)
    stw 0, 0(1)
    bl gekko_start_rust
1:
    b 1b

    .globl __init_registers
    .type __init_registers, @function
__init_registers:
    li 0, 0
    li 3, 0
    li 4, 0
    li 5, 0
    li 6, 0
    li 7, 0
    li 8, 0
    li 9, 0
    li 10, 0
    li 11, 0
    li 12, 0
    li 14, 0
    li 15, 0
    li 16, 0
    li 17, 0
    li 18, 0
    li 19, 0
    li 20, 0
    li 21, 0
    li 22, 0
    li 23, 0
    li 24, 0
    li 25, 0
    li 26, 0
    li 27, 0
    li 28, 0
    li 29, 0
    li 30, 0
    li 31, 0

    lis 1, _stack_addr@h
    ori 1, 1, _stack_addr@l
    lis 2, _SDA2_BASE_@h
    ori 2, 2, _SDA2_BASE_@l
    lis 13, _SDA_BASE_@h
    ori 13, 13, _SDA_BASE_@l

    blr
"#
);

/// Current table-of-contents pointer (r2).
#[inline(always)]
pub fn read_toc() -> *mut c_void {
    let toc: usize;
    unsafe {
        asm!("mr {0}, 2", out(reg) toc, options(nomem, nostack, preserves_flags));
    }
    toc as *mut c_void
}

/// `sync`, then spin forever with r3 cleared.
#[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
pub fn halt() -> ! {
    unsafe {
        asm!(
            "sync",
            "2:",
            "nop",
            "li 3, 0",
            "nop",
            "b 2b",
            options(noreturn, nostack)
        );
    }
}
