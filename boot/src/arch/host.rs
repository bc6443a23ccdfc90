use core::ffi::c_void;

/// No TOC register on the host.
#[inline(always)]
pub fn read_toc() -> *mut c_void {
    core::ptr::null_mut()
}

/// Spins forever. Unit tests get a panic instead so the terminal path can
/// be observed with `catch_unwind`.
pub fn halt() -> ! {
    #[cfg(test)]
    panic!("processor halted");
    #[cfg(not(test))]
    loop {
        core::hint::spin_loop();
    }
}
