//! Reading sentinel-terminated tables emitted by the link step.

use gekko_abi::Terminated;

/// Scan forward from `start` to the first terminator and return the
/// records before it.
///
/// # Safety
///
/// - `start` must point at a table of `T` that contains a terminator.
/// - Every record up to and including the terminator must be readable and
///   stay unchanged for `'a`.
#[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
pub(crate) unsafe fn from_raw_terminated<'a, T: Terminated>(start: *const T) -> &'a [T] {
    let mut len = 0usize;
    // SAFETY: caller guarantees a terminator is reachable from `start`.
    unsafe {
        while !(*start.add(len)).is_terminator() {
            len += 1;
        }
        core::slice::from_raw_parts(start, len)
    }
}
