//! # stepper-settings
//!
//! Validation and normalization of stepper motor controller settings, with the
//! current-limit tables of each controller's driver hardware.
//!
//! ## Features
//!
//! - **Total fixer**: any parsed settings document becomes a valid one, with one
//!   warning line per change
//! - **Idempotent**: fixing a fixed document changes nothing and warns about nothing
//! - **Data-driven variants**: product differences live in static descriptors
//! - **Hardware current tables**: linear code tables, measured tables, and a
//!   resistor-ladder DAC model
//! - **no_std compatible**: the fixer and tables work without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_settings::{fix_settings_str, Registry};
//!
//! // Build every product's current table once
//! let registry = Registry::new()?;
//!
//! // Parse, repair and re-serialize a settings file
//! let (fixed, warnings) = fix_settings_str("product = \"T825\"\ncurrent_limit = 3969\n", &registry)?;
//! eprint!("{}", warnings);
//! // Warning: The current limit was too high so it will be lowered to 3968 mA.
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables TOML settings files and `std::error::Error`
//! - `defmt`: Enables defmt logging of fixes for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod current;
pub mod error;
pub mod fix;
pub mod settings;
pub mod variant;

// Re-exports for ergonomic API
pub use current::{CurrentLimitTable, CurrentTableSource, CurrentTableSpec};
pub use error::{Error, ParseError, Result, TableError};
pub use fix::{fix, Fixed, Warnings};
pub use settings::{
    ControlMode, CurrentLimitDuringError, DecayMode, Pin, PinConfig, PinFlag, PinFunction,
    SettingsDocument, StepMode,
};
pub use variant::{Product, Registry, Variant, VariantDescriptor};

// Settings files (std only)
#[cfg(feature = "std")]
pub use settings::{fix_settings_str, load_settings, parse_settings, settings_to_string};
