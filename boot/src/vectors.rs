//! Static constructor and destructor vectors (`.ctors` / `.dtors`).
//!
//! Both vectors are walked front to back. The destructor vector is *not*
//! reversed; reverse-construction teardown of dynamically registered
//! objects is the global destructor chain's job.

use gekko_abi::{InitFunc, until_terminator};

use crate::table::from_raw_terminated;

/// A constructor or destructor vector with its length known.
#[derive(Clone, Copy, Debug)]
pub struct InitVector<'a> {
    entries: &'a [Option<InitFunc>],
}

impl<'a> InitVector<'a> {
    pub const EMPTY: InitVector<'static> = InitVector { entries: &[] };

    /// Wrap an in-memory vector in link-step format (null-terminated).
    pub fn from_terminated(table: &'a [Option<InitFunc>]) -> Self {
        Self {
            entries: until_terminator(table),
        }
    }

    /// Read a null-terminated vector starting at `start`.
    ///
    /// # Safety
    ///
    /// `start` must point at a readable vector ending in a null entry.
    #[cfg_attr(target_os = "none", unsafe(link_section = ".init"))]
    pub unsafe fn from_raw(start: *const Option<InitFunc>) -> Self {
        // SAFETY: forwarded from the caller.
        Self {
            entries: unsafe { from_raw_terminated(start) },
        }
    }

    /// Read the vector between explicit start/end markers. A null entry
    /// before `end` still ends the vector early.
    ///
    /// # Safety
    ///
    /// `start..end` must be a readable, aligned range of entries with
    /// `end >= start`.
    pub unsafe fn from_bounds(start: *const Option<InitFunc>, end: *const Option<InitFunc>) -> Self {
        // SAFETY: forwarded from the caller.
        let entries = unsafe {
            let len = end.offset_from(start) as usize;
            core::slice::from_raw_parts(start, len)
        };
        Self::from_terminated(entries)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every entry in table order. Returns how many ran.
    ///
    /// # Safety
    ///
    /// Every entry must be a function that is sound to call at this point
    /// of the program's lifecycle.
    pub unsafe fn run(&self) -> usize {
        let mut ran = 0usize;
        for func in self.entries.iter().flatten() {
            // SAFETY: forwarded from the caller.
            unsafe { func() };
            ran += 1;
        }
        ran
    }
}

/// Place `$func` in the constructor vector at `$priority` (`.ctors$NN`).
///
/// Lower priorities run first; the linker script sorts the input sections
/// by name and appends the null terminator.
///
/// ```ignore
/// extern "C" fn init_audio_heap() { /* ... */ }
/// gekko_boot::static_constructor!(50, init_audio_heap);
/// ```
#[macro_export]
macro_rules! static_constructor {
    ($priority:literal, $func:ident) => {
        $crate::paste::paste! {
            #[used]
            #[allow(non_upper_case_globals)]
            #[cfg_attr(
                target_os = "none",
                unsafe(link_section = concat!(".ctors$", stringify!($priority)))
            )]
            static [<$func _reference>]: $crate::abi::InitFunc = $func;
        }
    };
}

/// Place `$func` in the destructor vector at `$priority` (`.dtors$NN`).
#[macro_export]
macro_rules! static_destructor {
    ($priority:literal, $func:ident) => {
        $crate::paste::paste! {
            #[used]
            #[allow(non_upper_case_globals)]
            #[cfg_attr(
                target_os = "none",
                unsafe(link_section = concat!(".dtors$", stringify!($priority)))
            )]
            static [<$func _reference>]: $crate::abi::InitFunc = $func;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::vec::Vec;

    static CALLS: Mutex<Vec<u32>> = Mutex::new(Vec::new());

    fn calls() -> Vec<u32> {
        CALLS.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(id: u32) {
        CALLS.lock().unwrap_or_else(|e| e.into_inner()).push(id);
    }

    extern "C" fn first() {
        record(1);
    }

    extern "C" fn second() {
        record(2);
    }

    extern "C" fn third() {
        record(3);
    }

    extern "C" fn never() {
        record(99);
    }

    #[test]
    fn runs_in_table_order_until_null() {
        let _guard = crate::test_lock();
        CALLS.lock().unwrap_or_else(|e| e.into_inner()).clear();

        let table: [Option<InitFunc>; 5] = [Some(third), Some(first), Some(second), None, Some(never)];
        let vector = InitVector::from_terminated(&table);
        assert_eq!(vector.len(), 3);

        let ran = unsafe { vector.run() };
        assert_eq!(ran, 3);
        assert_eq!(calls(), [3, 1, 2]);
    }

    #[test]
    fn empty_vector_runs_nothing() {
        let table: [Option<InitFunc>; 1] = [None];
        let vector = InitVector::from_terminated(&table);
        assert!(vector.is_empty());
        assert_eq!(unsafe { vector.run() }, 0);
        assert_eq!(unsafe { InitVector::EMPTY.run() }, 0);
    }

    #[test]
    fn raw_and_bounded_reads_agree() {
        let table: [Option<InitFunc>; 3] = [Some(first), Some(second), None];
        let raw = unsafe { InitVector::from_raw(table.as_ptr()) };
        let bounded = unsafe {
            InitVector::from_bounds(table.as_ptr(), table.as_ptr().add(table.len()))
        };
        let without_null = unsafe { InitVector::from_bounds(table.as_ptr(), table.as_ptr().add(2)) };
        assert_eq!(raw.len(), 2);
        assert_eq!(bounded.len(), 2);
        assert_eq!(without_null.len(), 2);
    }
}
