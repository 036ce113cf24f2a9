//! Product variants.
//!
//! Every supported controller model is described by one static
//! [`VariantDescriptor`]: valid ranges, defaults, optional fields and the recipe for
//! its current-limit table. Adding a model means adding a descriptor; the fixer has
//! no per-product branches.

mod descriptors;
mod registry;

pub use descriptors::{T249, T500, T825, T834};
pub use registry::{Registry, Variant, MAX_VARIANTS};

use core::fmt;
use core::ops::RangeInclusive;

use crate::current::CurrentTableSpec;
use crate::settings::{DecayMode, StepMode};

/// Controller model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Product {
    /// Reference model.
    T825,
    /// High-voltage model.
    T834,
    /// Low-voltage model without decay modes.
    T500,
    /// Model whose current is set by a DAC-driven resistor ladder.
    T249,
}

impl Product {
    /// Every known product.
    pub const ALL: [Product; 4] = [Product::T825, Product::T834, Product::T500, Product::T249];

    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            Product::T825 => "T825",
            Product::T834 => "T834",
            Product::T500 => "T500",
            Product::T249 => "T249",
        }
    }

    /// Product with the given name. Matching ignores ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Legal decay modes of a product that has them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayRule {
    /// Modes the driver supports.
    pub modes: &'static [DecayMode],
    /// Mode used when the stored one is not supported.
    pub default: DecayMode,
}

impl DecayRule {
    /// Whether `mode` is supported.
    pub fn allows(&self, mode: DecayMode) -> bool {
        self.modes.contains(&mode)
    }
}

/// Static per-product rules.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDescriptor {
    /// Model this descriptor belongs to.
    pub product: Product,
    /// Recipe for the current-limit table.
    pub current_table: CurrentTableSpec,
    /// Default current limit (mA). Must be an entry of the table.
    pub default_current_limit: u32,
    /// Allowed serial baud rates, before generator rounding.
    pub baud_rate: RangeInclusive<u32>,
    /// Highest serial device number.
    pub device_number_max: u8,
    /// Highest I2C address, or `None` if the product has no I2C address setting.
    pub i2c_address_max: Option<u8>,
    /// Longest command timeout (ms).
    pub command_timeout_max: u16,
    /// Symmetric bound on the VIN calibration offset.
    pub vin_calibration_limit: i16,
    /// Highest raw input reading.
    pub input_max: u16,
    /// Highest encoder prescaler and postscaler.
    pub encoder_scaler_max: u32,
    /// Highest maximum speed (steps per 10000 s).
    pub speed_max: u32,
    /// Allowed acceleration and non-zero deceleration.
    pub accel: RangeInclusive<u32>,
    /// Supported step modes.
    pub step_modes: &'static [StepMode],
    /// Decay modes, or `None` if the product has no decay mode setting.
    pub decay: Option<DecayRule>,
    /// Whether the product has a separate deceleration for error states.
    pub decel_during_error: bool,
}

impl VariantDescriptor {
    /// Whether `mode` is a supported step mode.
    pub fn allows_step_mode(&self, mode: StepMode) -> bool {
        self.step_modes.contains(&mode)
    }

    /// Whether the product has an I2C address setting.
    pub fn has_i2c_address(&self) -> bool {
        self.i2c_address_max.is_some()
    }

    /// Whether the product has a decay mode setting.
    pub fn has_decay_mode(&self) -> bool {
        self.decay.is_some()
    }
}
