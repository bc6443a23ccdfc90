#![no_std]
#![allow(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod global_cell;
pub mod klog;
pub mod memory;
pub mod service_cell;
pub mod state_flag;

pub use global_cell::GlobalCell;
pub use klog::{KlogLevel, KlogSink, klog_attach_sink, klog_get_level, klog_init, klog_set_level};
pub use memory::{copy_bytes, fill_bytes};
pub use service_cell::ServiceCell;
pub use state_flag::StateFlag;
