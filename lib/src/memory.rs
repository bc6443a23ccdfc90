//! Byte fill/copy primitives usable before any library code.
//!
//! Both loops go through volatile accesses so the optimizer cannot lower
//! them back into calls to `memset`/`memcpy`, which on the target are these
//! very functions.

/// Write `value` to `count` bytes starting at `dest`. Returns `dest`.
///
/// # Safety
///
/// - `dest..dest + count` must be valid for writes.
#[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
pub unsafe fn fill_bytes(dest: *mut u8, value: u8, count: usize) -> *mut u8 {
    let mut i = 0usize;
    while i < count {
        core::ptr::write_volatile(dest.add(i), value);
        i += 1;
    }
    dest
}

/// Copy `count` bytes from `src` to `dest`. Returns `dest`.
///
/// `dest == src` degenerates to rewriting every byte with itself.
///
/// # Safety
///
/// - `src..src + count` must be valid for reads, `dest..dest + count` for writes.
/// - The ranges must not partially overlap.
#[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
pub unsafe fn copy_bytes(dest: *mut u8, src: *const u8, count: usize) -> *mut u8 {
    let mut i = 0usize;
    while i < count {
        core::ptr::write_volatile(dest.add(i), core::ptr::read_volatile(src.add(i)));
        i += 1;
    }
    dest
}

#[cfg(target_os = "none")]
mod exports {
    use core::ffi::c_int;

    #[unsafe(no_mangle)]
    #[unsafe(link_section = ".init")]
    pub unsafe extern "C" fn memset(dest: *mut u8, value: c_int, n: usize) -> *mut u8 {
        unsafe { super::fill_bytes(dest, value as u8, n) }
    }

    #[unsafe(no_mangle)]
    #[unsafe(link_section = ".init")]
    pub unsafe extern "C" fn memcpy(dest: *mut u8, src: *const u8, n: usize) -> *mut u8 {
        unsafe { super::copy_bytes(dest, src, n) }
    }
}
