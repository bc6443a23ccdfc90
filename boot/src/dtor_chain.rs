//! Global destructor chain.
//!
//! Objects constructed at runtime that must be destroyed at program
//! teardown register an intrusive [`DtorLink`] (usually embedded in the
//! object itself). The chain is a LIFO stack: the last object registered is
//! the first destroyed, which mirrors nested construction.
//!
//! The node layout and the `__register_global_object` entry point are fixed
//! by the compiler, so the list stays intrusive; the chain owns no memory.

use core::ffi::c_void;
use core::ptr::{self, NonNull};

use gekko_abi::{DTOR_GLOBAL_TEARDOWN, DtorFunc, DtorLink};
use gekko_lib::GlobalCell;

use crate::lifecycle::globals;
use crate::static_destructor;

struct ChainHead(Option<NonNull<DtorLink>>);

// SAFETY: the chain is only touched from the single startup/teardown
// thread of control; see `gekko_lib::global_cell`.
unsafe impl Send for ChainHead {}

pub struct DestructorChain {
    head: GlobalCell<ChainHead>,
}

impl DestructorChain {
    pub const fn new() -> Self {
        Self {
            head: GlobalCell::new(ChainHead(None)),
        }
    }

    /// Push `link` on the chain so that `dtor(obj, -1)` runs at teardown.
    ///
    /// # Safety
    ///
    /// - `link` must stay valid and must not move until it is drained or
    ///   unregistered.
    /// - `link` must not already be on the chain.
    /// - `dtor(obj, ..)` must be sound to call during teardown.
    pub unsafe fn register(&self, obj: *mut c_void, dtor: DtorFunc, link: NonNull<DtorLink>) {
        self.head.with(|head| {
            let node = link.as_ptr();
            // SAFETY: caller hands us exclusive use of the node.
            unsafe {
                (*node).next = head.0.map_or(ptr::null_mut(), NonNull::as_ptr);
                (*node).dtor = Some(dtor);
                (*node).obj = obj;
            }
            head.0 = Some(link);
        });
    }

    /// Unlink `link` without running its destructor. Returns whether it was
    /// on the chain.
    pub fn unregister(&self, link: NonNull<DtorLink>) -> bool {
        self.head.with(|head| {
            let mut cursor: *mut Option<NonNull<DtorLink>> = &mut head.0;
            // SAFETY: every node on the chain is valid per `register`.
            unsafe {
                while let Some(node) = *cursor {
                    if node == link {
                        *cursor = NonNull::new((*node.as_ptr()).next);
                        (*node.as_ptr()).next = ptr::null_mut();
                        return true;
                    }
                    cursor = ptr::addr_of_mut!((*node.as_ptr()).next).cast();
                }
            }
            false
        })
    }

    fn pop(&self) -> Option<NonNull<DtorLink>> {
        self.head.with(|head| {
            let link = head.0?;
            // SAFETY: every node on the chain is valid per `register`.
            unsafe {
                let node = link.as_ptr();
                head.0 = NonNull::new((*node).next);
                (*node).next = ptr::null_mut();
            }
            Some(link)
        })
    }

    /// Pop and run every destructor, newest first, with the global teardown
    /// discriminator. Returns how many nodes were drained.
    ///
    /// The chain lock is released around each call, so a destructor may
    /// register other objects; registering itself again never terminates.
    pub fn drain_all(&self) -> usize {
        let mut drained = 0usize;
        while let Some(link) = self.pop() {
            // SAFETY: the node and its object stay valid until drained.
            unsafe {
                let node = link.as_ptr();
                if let Some(dtor) = (*node).dtor {
                    dtor((*node).obj, DTOR_GLOBAL_TEARDOWN);
                }
            }
            drained += 1;
        }
        drained
    }

    /// Drop every node without running anything.
    pub fn reset(&self) {
        self.head.set(ChainHead(None));
    }

    pub fn is_empty(&self) -> bool {
        self.head.with(|head| head.0.is_none())
    }

    pub fn len(&self) -> usize {
        self.head.with(|head| {
            let mut count = 0usize;
            let mut cursor = head.0;
            while let Some(node) = cursor {
                count += 1;
                // SAFETY: every node on the chain is valid per `register`.
                cursor = NonNull::new(unsafe { (*node.as_ptr()).next });
            }
            count
        })
    }
}

impl Default for DestructorChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiler-emitted registration of a dynamically constructed global.
///
/// A null `dtor` or a null `link` registers nothing and the call returns
/// quietly; there is no error path back to compiled code. No other check is
/// made on `obj` or `dtor`.
///
/// # Safety
///
/// See [`DestructorChain::register`].
#[cfg_attr(target_os = "none", unsafe(no_mangle))]
pub unsafe extern "C" fn __register_global_object(
    obj: *mut c_void,
    dtor: Option<DtorFunc>,
    link: *mut DtorLink,
) {
    let (Some(dtor), Some(link)) = (dtor, NonNull::new(link)) else {
        return;
    };
    // SAFETY: forwarded from the caller.
    unsafe { globals().destructors.register(obj, dtor, link) };
}

#[cfg_attr(target_os = "none", unsafe(no_mangle))]
pub extern "C" fn __destroy_global_chain() {
    globals().destructors.drain_all();
}

static_destructor!(10, __destroy_global_chain);
