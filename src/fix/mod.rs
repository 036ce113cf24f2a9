//! Settings fixer.
//!
//! [`fix`] turns any [`SettingsDocument`] into one that satisfies every rule of the
//! given [`Variant`], and explains each change with one warning line. It is pure:
//! no I/O, no shared state, and the same input always gives the same output.
//!
//! Fixing is idempotent. Fixing an already fixed document with the same variant
//! returns it unchanged with no warnings.

pub mod pins;
mod rules;
mod warnings;

pub use warnings::{Warning, Warnings, MAX_WARNINGS, MAX_WARNING_LEN};

use crate::settings::SettingsDocument;
use crate::variant::Variant;

/// Field rules in evaluation order. Warning order follows this list.
const RULES: &[rules::Rule] = &[
    rules::product,
    rules::soft_error_response,
    rules::serial,
    rules::vin_voltages,
    rules::vin_calibration,
    rules::input_scaling,
    rules::output_scaling,
    rules::encoder,
    rules::current_limits,
    rules::motion,
    rules::driver_modes,
];

/// Result of a fix pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
    /// Repaired document.
    pub settings: SettingsDocument,
    /// One line per change, in rule order.
    pub warnings: Warnings,
}

/// Repair `settings` for `variant`.
pub fn fix(settings: SettingsDocument, variant: &Variant) -> Fixed {
    let mut settings = settings;
    let mut warnings = Warnings::new();

    for rule in RULES {
        rule(&mut settings, variant, &mut warnings);
    }
    // Pins last: they depend on the fixed control mode.
    pins::resolve(&mut settings, &mut warnings);

    Fixed { settings, warnings }
}

impl SettingsDocument {
    /// Repair this document for `variant`. See [`fix`].
    pub fn fix(self, variant: &Variant) -> Fixed {
        fix(self, variant)
    }
}
