//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the startup path end to
//! end against the simulated ADC and in-memory config store.  All tests run
//! on the host with no real hardware required.

mod board_resolution_tests;
mod mock_adc;
mod service_tests;
