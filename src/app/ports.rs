//! Port traits: the boundary between the hardware layer's pure logic and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HardwareService (domain)
//! ```
//!
//! Driven adapters (ADC, configuration storage) implement these traits.
//! The [`HardwareService`](super::service::HardwareService) consumes them
//! via generics, so the conversion core never touches hardware directly.

use crate::config::FirmwareConfig;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// Raw analog sampling.  One call is one conversion (~100 µs on the
/// reference hardware); averaging is done by the caller.
pub trait AnalogPort {
    /// Read one raw sample from an analog input channel.
    fn read_raw(&mut self, channel: u8) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists firmware configuration.
///
/// Implementations MUST validate before persisting; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never silently clamped.
pub trait ConfigPort {
    /// Returns [`FirmwareConfig::default()`] if nothing is stored.
    fn load(&self) -> Result<FirmwareConfig, ConfigError>;

    fn save(&self, config: &FirmwareConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
