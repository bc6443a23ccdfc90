//! Startup/teardown lifecycle stages.

use bitflags::bitflags;

/// Lifecycle stage of the runtime. Transitions only move forward.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuntimeStage {
    Reset = 0,
    RegistersInitialized = 1,
    DataInitialized = 2,
    Constructed = 3,
    Running = 4,
    Destructed = 5,
    Halted = 6,
}

impl RuntimeStage {
    pub const ALL: [RuntimeStage; 7] = [
        RuntimeStage::Reset,
        RuntimeStage::RegistersInitialized,
        RuntimeStage::DataInitialized,
        RuntimeStage::Constructed,
        RuntimeStage::Running,
        RuntimeStage::Destructed,
        RuntimeStage::Halted,
    ];

    #[inline]
    pub const fn flag(self) -> StageSet {
        StageSet::from_bits_retain(1 << self as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RuntimeStage::Reset => "reset",
            RuntimeStage::RegistersInitialized => "registers initialized",
            RuntimeStage::DataInitialized => "data initialized",
            RuntimeStage::Constructed => "constructed",
            RuntimeStage::Running => "running",
            RuntimeStage::Destructed => "destructed",
            RuntimeStage::Halted => "halted",
        }
    }
}

bitflags! {
    /// Set of lifecycle stages reached so far.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StageSet: u32 {
        const RESET = 1 << 0;
        const REGISTERS_INITIALIZED = 1 << 1;
        const DATA_INITIALIZED = 1 << 2;
        const CONSTRUCTED = 1 << 3;
        const RUNNING = 1 << 4;
        const DESTRUCTED = 1 << 5;
        const HALTED = 1 << 6;
    }
}

impl StageSet {
    /// Most advanced stage in the set, `Reset` for an empty set.
    pub fn latest(self) -> RuntimeStage {
        RuntimeStage::ALL
            .iter()
            .rev()
            .copied()
            .find(|stage| self.contains(stage.flag()))
            .unwrap_or(RuntimeStage::Reset)
    }
}
