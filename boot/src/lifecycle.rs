//! Process-wide runtime state and its lifecycle.
//!
//! Everything mutable the runtime owns lives in one [`RuntimeGlobals`]:
//! the destructor chain, the fragment table, the C++ exception fragment
//! id, the record of reached stages and the teardown guard.
//!
//! The static sits in `.bss`/`.sbss`, so it is only meaningful once the
//! section initializer has run. [`RuntimeGlobals::init`] is called right
//! after that and puts every member in its start-of-program state.
//!
//! Single-writer invariant: only the thread of control running startup and
//! teardown touches this state; see `gekko_lib::global_cell`.

use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use gekko_abi::{RuntimeStage, StageSet};
use gekko_lib::{StateFlag, klog_debug, klog_init};

use crate::config::{FRAGMENT_ID_UNREGISTERED, NUM_FRAGMENTS};
use crate::dtor_chain::DestructorChain;
use crate::fragment::FragmentRegistry;

pub struct RuntimeGlobals {
    pub destructors: DestructorChain,
    pub fragments: FragmentRegistry<NUM_FRAGMENTS>,
    pub(crate) cpp_fragment_id: AtomicI32,
    stages: AtomicU32,
    teardown: StateFlag,
}

static GLOBALS: RuntimeGlobals = RuntimeGlobals::new();

#[inline]
pub fn globals() -> &'static RuntimeGlobals {
    &GLOBALS
}

impl RuntimeGlobals {
    const fn new() -> Self {
        Self {
            destructors: DestructorChain::new(),
            fragments: FragmentRegistry::new(),
            cpp_fragment_id: AtomicI32::new(FRAGMENT_ID_UNREGISTERED),
            stages: AtomicU32::new(0),
            teardown: StateFlag::new(),
        }
    }

    /// Start-of-program state. The registers and data sections are live by
    /// the time this runs, so those stages are recorded as reached.
    pub fn init(&self) {
        klog_init();
        self.destructors.reset();
        self.fragments.clear();
        self.cpp_fragment_id
            .store(FRAGMENT_ID_UNREGISTERED, Ordering::Release);
        self.teardown.leave();
        let live = StageSet::RESET | StageSet::REGISTERS_INITIALIZED | StageSet::DATA_INITIALIZED;
        self.stages.store(live.bits(), Ordering::Release);
    }

    pub fn mark(&self, stage: RuntimeStage) {
        self.stages.fetch_or(stage.flag().bits(), Ordering::AcqRel);
        klog_debug!("runtime: stage -> {}", stage.name());
    }

    pub fn reached(&self) -> StageSet {
        StageSet::from_bits_truncate(self.stages.load(Ordering::Acquire))
    }

    pub fn current_stage(&self) -> RuntimeStage {
        self.reached().latest()
    }

    /// Claim the one-and-only teardown. `false` if it already started.
    pub(crate) fn begin_teardown(&self) -> bool {
        self.teardown.enter()
    }

    pub fn teardown_started(&self) -> bool {
        self.teardown.is_active()
    }
}

/// Stage the runtime has most recently reached.
pub fn current_stage() -> RuntimeStage {
    globals().current_stage()
}

/// Whether every stage in `stages` has been reached.
pub fn stage_reached(stages: StageSet) -> bool {
    globals().reached().contains(stages)
}
