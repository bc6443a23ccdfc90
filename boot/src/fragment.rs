//! Exception fragment registry.
//!
//! The unwinder maps an instruction address back to the exception-table
//! index and TOC of the code fragment it belongs to. A statically linked
//! image has one fragment, so the process-wide registry holds
//! [`NUM_FRAGMENTS`](crate::config::NUM_FRAGMENTS) slots, but nothing
//! here assumes a capacity of one.

use core::ffi::{c_int, c_void};
use core::ptr;
use core::sync::atomic::Ordering;

use gekko_abi::{ExtabIndexInfo, FragmentError, FragmentResult};
use gekko_lib::{GlobalCell, klog_debug, klog_warn};

use crate::config::FRAGMENT_ID_UNREGISTERED;
use crate::lifecycle::globals;
use crate::static_destructor;

/// Handle returned by a successful registration: the slot index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentId(i32);

impl FragmentId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_c_int(self) -> c_int {
        self.0
    }
}

/// A registered fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub eti: *const ExtabIndexInfo,
    pub toc: *mut c_void,
}

#[derive(Clone, Copy)]
struct FragmentSlot {
    eti: *const ExtabIndexInfo,
    toc: *mut c_void,
    registered: bool,
}

impl FragmentSlot {
    const EMPTY: Self = Self {
        eti: ptr::null(),
        toc: ptr::null_mut(),
        registered: false,
    };

    fn fragment(&self) -> Option<Fragment> {
        self.registered.then_some(Fragment {
            eti: self.eti,
            toc: self.toc,
        })
    }
}

struct Slots<const N: usize>([FragmentSlot; N]);

// SAFETY: slots are only touched from the single startup/teardown thread
// of control; see `gekko_lib::global_cell`.
unsafe impl<const N: usize> Send for Slots<N> {}

pub struct FragmentRegistry<const N: usize> {
    slots: GlobalCell<Slots<N>>,
}

impl<const N: usize> FragmentRegistry<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self {
            slots: GlobalCell::new(Slots([FragmentSlot::EMPTY; N])),
        }
    }

    /// Claim the first free slot. A full registry is left untouched.
    pub fn register(
        &self,
        eti: *const ExtabIndexInfo,
        toc: *mut c_void,
    ) -> FragmentResult<FragmentId> {
        self.slots.with(|slots| {
            let (index, slot) = slots
                .0
                .iter_mut()
                .enumerate()
                .find(|(_, slot)| !slot.registered)
                .ok_or(FragmentError::RegistryFull)?;
            *slot = FragmentSlot {
                eti,
                toc,
                registered: true,
            };
            Ok(FragmentId(index as i32))
        })
    }

    /// Clear slot `index`. Out-of-range or already-free slots are ignored;
    /// teardown has no way to act on a failure here.
    pub fn unregister(&self, index: c_int) {
        let Ok(index) = usize::try_from(index) else {
            return;
        };
        self.slots.with(|slots| {
            if let Some(slot) = slots.0.get_mut(index) {
                *slot = FragmentSlot::EMPTY;
            }
        });
    }

    pub fn get(&self, id: FragmentId) -> FragmentResult<Fragment> {
        self.slots.with(|slots| {
            slots
                .0
                .get(id.index())
                .and_then(FragmentSlot::fragment)
                .ok_or(FragmentError::InvalidHandle)
        })
    }

    /// Number of occupied slots.
    pub fn registered(&self) -> usize {
        self.slots
            .with(|slots| slots.0.iter().filter(|slot| slot.registered).count())
    }

    /// Find the registered fragment whose index record covers `pc`.
    ///
    /// # Safety
    ///
    /// Every registered, non-null `eti` must point at a readable record.
    pub unsafe fn find_by_address(&self, pc: usize) -> Option<(FragmentId, Fragment)> {
        self.slots.with(|slots| {
            slots.0.iter().enumerate().find_map(|(index, slot)| {
                let fragment = slot.fragment()?;
                // SAFETY: forwarded from the caller.
                let info = unsafe { fragment.eti.as_ref() }?;
                info.covers(pc)
                    .then_some((FragmentId(index as i32), fragment))
            })
        })
    }

    pub fn clear(&self) {
        self.slots.set(Slots([FragmentSlot::EMPTY; N]));
    }
}

impl<const N: usize> Default for FragmentRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_os = "none", unsafe(no_mangle))]
pub extern "C" fn __register_fragment(eti: *const ExtabIndexInfo, toc: *mut c_void) -> c_int {
    match globals().fragments.register(eti, toc) {
        Ok(id) => id.as_c_int(),
        Err(err) => err.as_c_int(),
    }
}

#[cfg_attr(target_os = "none", unsafe(no_mangle))]
pub extern "C" fn __unregister_fragment(index: c_int) {
    globals().fragments.unregister(index);
}

/// Register the image's exception tables, once.
///
/// The resulting id, `-1` on exhaustion included, is kept until
/// [`fini_cpp_exceptions`] releases it.
pub fn init_cpp_exceptions(eti: *const ExtabIndexInfo, toc: *mut c_void) {
    let id = &globals().cpp_fragment_id;
    if id.load(Ordering::Acquire) != FRAGMENT_ID_UNREGISTERED {
        return;
    }
    let registered = __register_fragment(eti, toc);
    if registered < 0 {
        klog_warn!("runtime: exception fragment registry full, unwinding disabled");
    } else {
        klog_debug!("runtime: exception fragment {} registered", registered);
    }
    id.store(registered, Ordering::Release);
}

/// Release the fragment claimed by [`init_cpp_exceptions`], if any.
pub fn fini_cpp_exceptions() {
    let id = globals()
        .cpp_fragment_id
        .swap(FRAGMENT_ID_UNREGISTERED, Ordering::AcqRel);
    if id != FRAGMENT_ID_UNREGISTERED {
        __unregister_fragment(id);
    }
}

#[cfg(target_os = "none")]
#[unsafe(no_mangle)]
pub extern "C" fn __init_cpp_exceptions() {
    init_cpp_exceptions(crate::symbols::eti_init_info(), crate::arch::read_toc());
}

#[cfg_attr(target_os = "none", unsafe(no_mangle))]
pub extern "C" fn __fini_cpp_exceptions() {
    fini_cpp_exceptions();
}

#[cfg(target_os = "none")]
crate::static_constructor!(10, __init_cpp_exceptions);
static_destructor!(15, __fini_cpp_exceptions);

#[cfg(test)]
mod tests {
    use super::*;

    fn eti(addr: usize) -> *const ExtabIndexInfo {
        addr as *const ExtabIndexInfo
    }

    fn toc(addr: usize) -> *mut c_void {
        addr as *mut c_void
    }

    #[test]
    fn full_registry_rejects_without_mutating() {
        let registry: FragmentRegistry<2> = FragmentRegistry::new();
        let a = registry.register(eti(0x100), toc(0x900)).unwrap();
        let b = registry.register(eti(0x200), toc(0xA00)).unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));

        assert_eq!(
            registry.register(eti(0x300), toc(0xB00)),
            Err(FragmentError::RegistryFull)
        );
        assert_eq!(
            registry.get(a),
            Ok(Fragment {
                eti: eti(0x100),
                toc: toc(0x900)
            })
        );
        assert_eq!(registry.get(b).map(|f| f.eti), Ok(eti(0x200)));
        assert_eq!(registry.registered(), 2);
    }

    #[test]
    fn out_of_range_unregister_is_ignored() {
        let registry: FragmentRegistry<1> = FragmentRegistry::new();
        let id = registry.register(eti(0x100), toc(0x900)).unwrap();
        for bad in [-2, -1, 1, 7, c_int::MAX, c_int::MIN] {
            registry.unregister(bad);
        }
        assert_eq!(registry.get(id).map(|f| f.toc), Ok(toc(0x900)));
        assert_eq!(registry.registered(), 1);
    }

    #[test]
    fn freed_slot_is_reused() {
        let registry: FragmentRegistry<3> = FragmentRegistry::new();
        for base in [0x100, 0x200, 0x300] {
            registry.register(eti(base), toc(base)).unwrap();
        }
        registry.unregister(1);
        registry.unregister(1);
        assert_eq!(registry.get(FragmentId(1)), Err(FragmentError::InvalidHandle));

        let reused = registry.register(eti(0x400), toc(0x400)).unwrap();
        assert_eq!(reused.index(), 1);
        assert_eq!(registry.get(reused).map(|f| f.eti), Ok(eti(0x400)));
    }

    #[test]
    fn lookup_by_address_uses_index_record() {
        let registry: FragmentRegistry<2> = FragmentRegistry::new();
        let text = ExtabIndexInfo {
            section: ptr::null(),
            extab: ptr::null(),
            code_start: 0x8000_0000usize as *const c_void,
            code_size: 0x1000,
        };
        registry.register(ptr::null(), toc(0x1)).unwrap();
        let id = registry.register(&text, toc(0x2)).unwrap();

        let hit = unsafe { registry.find_by_address(0x8000_0800) };
        assert_eq!(hit.map(|(found, f)| (found, f.toc)), Some((id, toc(0x2))));
        assert!(unsafe { registry.find_by_address(0x8000_1000) }.is_none());

        registry.clear();
        assert_eq!(registry.registered(), 0);
        assert!(unsafe { registry.find_by_address(0x8000_0800) }.is_none());
    }

    #[test]
    fn cpp_exception_fragment_lifecycle() {
        let _guard = crate::test_lock();
        globals().init();

        init_cpp_exceptions(eti(0x8000_6000), toc(0x8040_0000));
        init_cpp_exceptions(eti(0x8000_7000), toc(0x8050_0000));
        assert_eq!(globals().fragments.registered(), 1);
        assert_eq!(globals().cpp_fragment_id.load(Ordering::Acquire), 0);

        // The only slot is taken, so a direct registration fails with -1.
        assert_eq!(__register_fragment(eti(0x1), toc(0x1)), -1);

        fini_cpp_exceptions();
        assert_eq!(globals().fragments.registered(), 0);
        assert_eq!(
            globals().cpp_fragment_id.load(Ordering::Acquire),
            FRAGMENT_ID_UNREGISTERED
        );

        fini_cpp_exceptions();
        assert_eq!(__register_fragment(eti(0x1), toc(0x1)), 0);
        __unregister_fragment(0);
        __unregister_fragment(5);
    }
}
