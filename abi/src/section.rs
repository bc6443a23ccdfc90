//! ROM copy and BSS zero-fill table records.

use crate::Terminated;

/// One entry of the ROM-to-RAM copy table (`_rom_copy_info`).
///
/// Layout is fixed by the link step: source image address, destination
/// address, byte count. A zero `size` terminates the table.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RomSection {
    pub source: *const u8,
    pub dest: *mut u8,
    pub size: usize,
}

impl RomSection {
    pub const TERMINATOR: Self = Self {
        source: core::ptr::null(),
        dest: core::ptr::null_mut(),
        size: 0,
    };

    #[inline]
    pub const fn new(source: *const u8, dest: *mut u8, size: usize) -> Self {
        Self { source, dest, size }
    }

    /// The image already sits at its run address, nothing to copy.
    #[inline]
    pub fn is_in_place(&self) -> bool {
        self.source == self.dest as *const u8
    }
}

impl Terminated for RomSection {
    #[inline]
    fn is_terminator(&self) -> bool {
        self.size == 0
    }
}

/// One entry of the BSS zero-fill table (`_bss_init_info`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BssSection {
    pub dest: *mut u8,
    pub size: usize,
}

impl BssSection {
    pub const TERMINATOR: Self = Self {
        dest: core::ptr::null_mut(),
        size: 0,
    };

    #[inline]
    pub const fn new(dest: *mut u8, size: usize) -> Self {
        Self { dest, size }
    }
}

impl Terminated for BssSection {
    #[inline]
    fn is_terminator(&self) -> bool {
        self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::until_terminator;

    #[test]
    fn rom_table_stops_at_zero_size() {
        let a = 0x1000 as *const u8;
        let b = 0x2000 as *mut u8;
        let table = [
            RomSection::new(a, b, 16),
            RomSection::new(a, b, 4),
            RomSection::TERMINATOR,
            RomSection::new(a, b, 99),
        ];
        let live = until_terminator(&table);
        assert_eq!(live.len(), 2);
        assert_eq!(live[1].size, 4);
    }

    #[test]
    fn in_place_entry_detected() {
        let p = 0x8000_3000usize as *mut u8;
        assert!(RomSection::new(p, p, 32).is_in_place());
        assert!(!RomSection::new(p, p.wrapping_add(1), 32).is_in_place());
    }

    #[test]
    fn unterminated_table_is_kept_whole() {
        let table = [BssSection::new(0x3000 as *mut u8, 8)];
        assert_eq!(until_terminator(&table).len(), 1);
        let empty = [BssSection::TERMINATOR];
        assert!(until_terminator(&empty).is_empty());
    }

    #[test]
    fn record_layout_matches_link_step() {
        assert_eq!(size_of::<RomSection>(), 3 * size_of::<usize>());
        assert_eq!(size_of::<BssSection>(), 2 * size_of::<usize>());
    }
}
