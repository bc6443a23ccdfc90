//! Access to linker-provided symbols, isolated here so other modules
//! avoid raw `extern "C"` declarations.
//!
//! The linker script must define:
//! - `_stack_addr`, `_SDA_BASE_`, `_SDA2_BASE_` (used by `__init_registers`)
//! - `_rom_copy_info`: `RomSection` records ending in a zero-size record
//! - `_bss_init_info`: `BssSection` records ending in a zero-size record
//! - `_eti_init_info`: the image's exception-table index
//! - `_ctors` / `_dtors`: null-terminated function pointer vectors built
//!   from the sorted `.ctors$*` / `.dtors$*` input sections

use gekko_abi::{BssSection, ExtabIndexInfo, InitFunc, RomSection};

use crate::sections::SectionTables;
use crate::vectors::InitVector;

#[allow(non_upper_case_globals)]
mod externs {
    use gekko_abi::{BssSection, ExtabIndexInfo, InitFunc, RomSection};

    unsafe extern "C" {
        pub(crate) static _stack_addr: u8;
        pub(crate) static _SDA_BASE_: u8;
        pub(crate) static _SDA2_BASE_: u8;

        pub(crate) static _rom_copy_info: RomSection;
        pub(crate) static _bss_init_info: BssSection;
        pub(crate) static _eti_init_info: ExtabIndexInfo;

        pub(crate) static _ctors: Option<InitFunc>;
        pub(crate) static _dtors: Option<InitFunc>;
    }
}

#[inline]
pub fn stack_top() -> *const u8 {
    &raw const externs::_stack_addr
}

#[inline]
pub fn small_data_bases() -> (*const u8, *const u8) {
    (&raw const externs::_SDA_BASE_, &raw const externs::_SDA2_BASE_)
}

#[inline]
pub fn eti_init_info() -> *const ExtabIndexInfo {
    &raw const externs::_eti_init_info
}

/// # Safety
///
/// The link step must have emitted well-formed, terminated tables.
#[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
pub unsafe fn section_tables() -> SectionTables<'static> {
    let rom: *const RomSection = &raw const externs::_rom_copy_info;
    let bss: *const BssSection = &raw const externs::_bss_init_info;
    // SAFETY: forwarded from the caller.
    unsafe { SectionTables::from_raw(rom, bss) }
}

/// # Safety
///
/// `_ctors` must be a null-terminated vector.
pub unsafe fn constructors() -> InitVector<'static> {
    let start: *const Option<InitFunc> = &raw const externs::_ctors;
    // SAFETY: forwarded from the caller.
    unsafe { InitVector::from_raw(start) }
}

/// # Safety
///
/// `_dtors` must be a null-terminated vector.
pub unsafe fn destructors() -> InitVector<'static> {
    let start: *const Option<InitFunc> = &raw const externs::_dtors;
    // SAFETY: forwarded from the caller.
    unsafe { InitVector::from_raw(start) }
}
