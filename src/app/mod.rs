//! Application core: startup resolution and temperature reads, no I/O.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod ports;
pub mod service;
