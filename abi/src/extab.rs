//! Exception-table index records.

use core::ffi::c_void;

/// One exception-table index record (`_eti_init_info`), pointing the
/// unwinder at the frame descriptors for a code range.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtabIndexInfo {
    pub section: *const c_void,
    pub extab: *const ExtabIndexInfo,
    pub code_start: *const c_void,
    pub code_size: usize,
}

impl ExtabIndexInfo {
    /// Whether `pc` falls inside the code range this record describes.
    #[inline]
    pub fn covers(&self, pc: usize) -> bool {
        let start = self.code_start as usize;
        pc >= start && pc - start < self.code_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_is_half_open() {
        let info = ExtabIndexInfo {
            section: core::ptr::null(),
            extab: core::ptr::null(),
            code_start: 0x8000_4000usize as *const c_void,
            code_size: 0x100,
        };
        assert!(info.covers(0x8000_4000));
        assert!(info.covers(0x8000_40FF));
        assert!(!info.covers(0x8000_4100));
        assert!(!info.covers(0x8000_3FFF));
    }
}
