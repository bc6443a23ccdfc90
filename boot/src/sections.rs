//! ROM-to-RAM copy and BSS zero-fill.
//!
//! Runs before anything may touch `.data`, `.sdata`, `.bss` or `.sbss`, so
//! this module keeps to locals and the read-only tables it is given. No
//! logging in here; the orchestrator reports the summary afterwards.

use gekko_abi::{BssSection, RomSection, until_terminator};
use gekko_lib::memory::{copy_bytes, fill_bytes};

use crate::table::from_raw_terminated;

/// The two section tables, already cut at their terminators.
#[derive(Clone, Copy, Debug)]
pub struct SectionTables<'a> {
    pub rom: &'a [RomSection],
    pub bss: &'a [BssSection],
}

impl<'a> SectionTables<'a> {
    pub const EMPTY: SectionTables<'static> = SectionTables { rom: &[], bss: &[] };

    /// Build from in-memory tables in link-step format. Anything after the
    /// first terminator is ignored.
    pub fn from_terminated(rom: &'a [RomSection], bss: &'a [BssSection]) -> Self {
        Self {
            rom: until_terminator(rom),
            bss: until_terminator(bss),
        }
    }

    /// Build from the start addresses of the two tables.
    ///
    /// # Safety
    ///
    /// Both pointers must reference well-formed tables ending in a
    /// zero-size record, readable for `'a`.
    #[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
    pub unsafe fn from_raw(rom: *const RomSection, bss: *const BssSection) -> Self {
        // SAFETY: forwarded from the caller.
        unsafe {
            Self {
                rom: from_raw_terminated(rom),
                bss: from_raw_terminated(bss),
            }
        }
    }
}

/// What `initialize_sections` did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionSummary {
    pub copied: usize,
    pub in_place: usize,
    pub zeroed: usize,
    pub bytes_copied: usize,
    pub bytes_zeroed: usize,
}

#[inline(always)]
unsafe fn copy_rom_section(section: &RomSection) -> bool {
    if section.size == 0 || section.is_in_place() {
        return false;
    }
    // SAFETY: the table entry describes valid, non-overlapping ranges.
    unsafe { copy_bytes(section.dest, section.source, section.size) };
    true
}

#[inline(always)]
unsafe fn zero_bss_section(section: &BssSection) -> bool {
    if section.size == 0 {
        return false;
    }
    // SAFETY: the table entry describes a valid writable range.
    unsafe { fill_bytes(section.dest, 0, section.size) };
    true
}

/// Copy every ROM image to its run address, then zero every BSS region.
///
/// Entries are processed strictly in table order, copies first. Running it
/// a second time leaves memory unchanged.
///
/// # Safety
///
/// - Every entry must describe valid memory: readable source, writable
///   destination, non-overlapping unless identical.
/// - Nothing else may be using the destination ranges.
#[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
pub unsafe fn initialize_sections(tables: &SectionTables<'_>) -> SectionSummary {
    let mut summary = SectionSummary::default();

    for section in until_terminator(tables.rom) {
        // SAFETY: forwarded from the caller.
        if unsafe { copy_rom_section(section) } {
            summary.copied += 1;
            summary.bytes_copied += section.size;
        } else {
            summary.in_place += 1;
        }
    }

    for section in until_terminator(tables.bss) {
        // SAFETY: forwarded from the caller.
        if unsafe { zero_bss_section(section) } {
            summary.zeroed += 1;
            summary.bytes_zeroed += section.size;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    /// Flat stand-in for the address space; offsets play the role of addresses.
    struct Arena {
        mem: Vec<u8>,
    }

    impl Arena {
        fn new(size: usize) -> Self {
            Self {
                mem: vec![0xEEu8; size],
            }
        }

        fn at(&mut self, offset: usize) -> *mut u8 {
            unsafe { self.mem.as_mut_ptr().add(offset) }
        }

        fn bytes(&self, offset: usize, len: usize) -> &[u8] {
            &self.mem[offset..offset + len]
        }

        fn write(&mut self, offset: usize, data: &[u8]) {
            self.mem[offset..offset + data.len()].copy_from_slice(data);
        }
    }

    #[test]
    fn copies_rom_and_zeroes_bss() {
        let mut arena = Arena::new(0x4000);
        let pattern: Vec<u8> = (0u8..16).map(|b| b.wrapping_mul(17)).collect();
        arena.write(0x1000, &pattern);

        let rom = [
            RomSection::new(arena.at(0x1000), arena.at(0x2000), 16),
            RomSection::TERMINATOR,
        ];
        let bss = [BssSection::new(arena.at(0x3000), 8), BssSection::TERMINATOR];
        let tables = SectionTables::from_terminated(&rom, &bss);

        let summary = unsafe { initialize_sections(&tables) };

        assert_eq!(arena.bytes(0x2000, 16), arena.bytes(0x1000, 16));
        assert!(arena.bytes(0x3000, 8).iter().all(|&b| b == 0));
        assert_eq!(arena.bytes(0x2010, 1), [0xEE]);
        assert_eq!(arena.bytes(0x3008, 1), [0xEE]);
        assert_eq!(
            summary,
            SectionSummary {
                copied: 1,
                in_place: 0,
                zeroed: 1,
                bytes_copied: 16,
                bytes_zeroed: 8,
            }
        );
    }

    #[test]
    fn second_run_changes_nothing() {
        let mut arena = Arena::new(0x400);
        arena.write(0x000, b"sdata image 1234");
        arena.write(0x100, b"rodata2 xyz");
        let rom = [
            RomSection::new(arena.at(0x000), arena.at(0x200), 16),
            RomSection::new(arena.at(0x100), arena.at(0x280), 11),
            RomSection::TERMINATOR,
        ];
        let bss = [
            BssSection::new(arena.at(0x300), 32),
            BssSection::new(arena.at(0x340), 4),
            BssSection::TERMINATOR,
        ];
        let tables = SectionTables::from_terminated(&rom, &bss);

        unsafe { initialize_sections(&tables) };
        let once = arena.mem.clone();
        unsafe { initialize_sections(&tables) };
        assert_eq!(arena.mem, once);
    }

    #[test]
    fn in_place_and_empty_entries_are_skipped() {
        let mut arena = Arena::new(0x100);
        arena.write(0x10, &[1, 2, 3, 4]);
        let rom = [
            RomSection::new(arena.at(0x10), arena.at(0x10), 4),
            RomSection::TERMINATOR,
        ];
        let tables = SectionTables::from_terminated(&rom, &[BssSection::TERMINATOR]);

        let summary = unsafe { initialize_sections(&tables) };

        assert_eq!(arena.bytes(0x10, 4), [1, 2, 3, 4]);
        assert_eq!(summary.copied, 0);
        assert_eq!(summary.in_place, 1);
        assert_eq!(summary.zeroed, 0);
    }

    #[test]
    fn records_after_terminator_are_ignored() {
        let mut arena = Arena::new(0x100);
        let bss = [
            BssSection::new(arena.at(0x00), 4),
            BssSection::TERMINATOR,
            BssSection::new(arena.at(0x40), 4),
        ];
        let tables = SectionTables::from_terminated(&[], &bss);

        unsafe { initialize_sections(&tables) };

        assert_eq!(arena.bytes(0x00, 4), [0, 0, 0, 0]);
        assert_eq!(arena.bytes(0x40, 4), [0xEE; 4]);
    }

    #[test]
    fn copies_run_before_zero_fill() {
        // BSS overlapping a copy destination must win.
        let mut arena = Arena::new(0x100);
        arena.write(0x00, &[9; 8]);
        let rom = [
            RomSection::new(arena.at(0x00), arena.at(0x80), 8),
            RomSection::TERMINATOR,
        ];
        let bss = [BssSection::new(arena.at(0x84), 4), BssSection::TERMINATOR];
        let tables = SectionTables::from_terminated(&rom, &bss);

        unsafe { initialize_sections(&tables) };

        assert_eq!(arena.bytes(0x80, 8), [9, 9, 9, 9, 0, 0, 0, 0]);
    }

    #[test]
    fn raw_tables_match_terminated_tables() {
        let mut arena = Arena::new(0x40);
        let rom = [
            RomSection::new(arena.at(0x00), arena.at(0x20), 4),
            RomSection::TERMINATOR,
        ];
        let bss = [BssSection::TERMINATOR];
        let tables = unsafe { SectionTables::from_raw(rom.as_ptr(), bss.as_ptr()) };
        assert_eq!(tables.rom.len(), 1);
        assert!(tables.bss.is_empty());
    }
}
