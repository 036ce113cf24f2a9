//! Settings document model for stepper-settings.
//!
//! Provides the strongly typed settings document and, with the `std` feature, a
//! TOML reader and writer for it.

mod document;
#[cfg(feature = "std")]
mod loader;
mod pin;
mod types;
pub mod units;

pub use document::{InputScaling, OutputScaling, SettingsDocument};
pub use pin::{Pin, PinConfig, PinFlag, PinFlags, PinFunction};
pub use types::{
    ControlMode, CurrentLimitDuringError, DecayMode, ScalingDegree, SoftErrorResponse, StepMode,
};

#[cfg(feature = "std")]
pub use loader::{fix_settings_str, load_settings, parse_settings, settings_to_string};
