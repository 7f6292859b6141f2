//! FiveD firmware hardware layer.
//!
//! Resolves the selected motherboard into a validated logical pin map and
//! converts raw thermistor readings into temperatures.  Everything here is
//! pure logic behind port traits, so it runs and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod thermistor;

pub use error::{Error, Result};
