//! Typed settings document.

use super::pin::{Pin, PinConfig};
use super::types::{
    ControlMode, CurrentLimitDuringError, DecayMode, ScalingDegree, SoftErrorResponse, StepMode,
};
use crate::variant::{Product, VariantDescriptor};

/// Raw input readings that bound the scaling curve.
///
/// A valid tuple is ordered `error_min <= min <= neutral_min <= neutral_max <= max <=
/// error_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputScaling {
    /// Readings below this are an error.
    pub error_min: u16,
    /// Reading that maps to the output minimum.
    pub min: u16,
    /// Low edge of the neutral band.
    pub neutral_min: u16,
    /// High edge of the neutral band.
    pub neutral_max: u16,
    /// Reading that maps to the output maximum.
    pub max: u16,
    /// Readings above this are an error.
    pub error_max: u16,
}

impl InputScaling {
    /// Factory defaults.
    pub const DEFAULT: Self = Self {
        error_min: 0,
        min: 0,
        neutral_min: 2015,
        neutral_max: 2080,
        max: 4095,
        error_max: 4095,
    };

    /// Whether the six values are in non-decreasing order.
    pub fn is_ordered(&self) -> bool {
        self.error_min <= self.min
            && self.min <= self.neutral_min
            && self.neutral_min <= self.neutral_max
            && self.neutral_max <= self.max
            && self.max <= self.error_max
    }
}

impl Default for InputScaling {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Target values the scaled input maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputScaling {
    /// Target at the input minimum.
    pub min: i32,
    /// Target inside the neutral band.
    pub neutral: i32,
    /// Target at the input maximum.
    pub max: i32,
}

impl OutputScaling {
    /// Factory defaults.
    pub const DEFAULT: Self = Self {
        min: -200,
        neutral: 0,
        max: 200,
    };

    /// Whether `min <= neutral <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.neutral && self.neutral <= self.max
    }
}

impl Default for OutputScaling {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete persistent settings of one controller.
///
/// Optional fields are `None` on products that do not have them; after fixing,
/// presence always matches the product's descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsDocument {
    /// Product the settings were written for.
    pub product: Product,
    /// Source of the motor target.
    pub control_mode: ControlMode,
    /// Keep the driver awake when VIN is low.
    pub never_sleep: bool,
    /// Skip the safe-start check.
    pub disable_safe_start: bool,
    /// Ignore a high ERR line.
    pub ignore_err_line_high: bool,
    /// Clear driver errors without a command.
    pub auto_clear_driver_error: bool,
    /// Reaction to a soft error.
    pub soft_error_response: SoftErrorResponse,
    /// Target used by [`SoftErrorResponse::GoToPosition`].
    pub soft_error_position: i32,
    /// Serial baud rate.
    pub serial_baud_rate: u32,
    /// Serial device number.
    pub serial_device_number: u8,
    /// I2C address.
    pub i2c_address: Option<u8>,
    /// Command timeout (ms), 0 disables it.
    pub command_timeout: u16,
    /// Require CRC bytes on serial commands.
    pub serial_crc_enabled: bool,
    /// Time VIN must stay below the shutoff voltage before the driver stops (ms).
    pub low_vin_timeout: u16,
    /// VIN below which the driver stops (mV).
    pub low_vin_shutoff_voltage: u16,
    /// VIN above which the driver may start again (mV).
    pub low_vin_startup_voltage: u16,
    /// VIN above which the driver stops (mV).
    pub high_vin_shutoff_voltage: u16,
    /// VIN measurement offset.
    pub vin_calibration: i16,
    /// Longest accepted RC pulse period (ms).
    pub rc_max_pulse_period: u16,
    /// Time without good RC pulses before an error (ms).
    pub rc_bad_signal_timeout: u16,
    /// Good RC pulses needed to clear the error.
    pub rc_consecutive_good_pulses: u8,
    /// Average input readings.
    pub input_averaging_enabled: bool,
    /// Input change needed to move the target.
    pub input_hysteresis: u16,
    /// Shape of the scaling curve.
    pub input_scaling_degree: ScalingDegree,
    /// Invert the input.
    pub input_invert: bool,
    /// Input side of the scaling curve.
    pub input: InputScaling,
    /// Output side of the scaling curve.
    pub output: OutputScaling,
    /// Encoder counts per output unit.
    pub encoder_prescaler: u32,
    /// Output units per prescaled count.
    pub encoder_postscaler: u32,
    /// Let the encoder target wrap instead of saturating.
    pub encoder_unlimited: bool,
    /// Pin configs, indexed by [`Pin::index`].
    pub pins: [PinConfig; 5],
    /// Coil current limit (mA).
    pub current_limit: u32,
    /// Current limit in error states.
    pub current_limit_during_error: CurrentLimitDuringError,
    /// Microstepping mode.
    pub step_mode: StepMode,
    /// Driver decay mode.
    pub decay_mode: Option<DecayMode>,
    /// Starting speed (steps per 10000 s).
    pub speed_min: u32,
    /// Maximum speed (steps per 10000 s).
    pub speed_max: u32,
    /// Maximum acceleration.
    pub accel_max: u32,
    /// Maximum deceleration, 0 means the same as `accel_max`.
    pub decel_max: u32,
    /// Deceleration in error states, 0 means the same as `decel_max`.
    pub decel_max_during_error: Option<u32>,
    /// Reverse the motor.
    pub invert_motor_direction: bool,
}

impl SettingsDocument {
    /// Factory defaults for the product described by `variant`.
    pub fn defaults(variant: &VariantDescriptor) -> Self {
        Self {
            product: variant.product,
            control_mode: ControlMode::Serial,
            never_sleep: false,
            disable_safe_start: false,
            ignore_err_line_high: false,
            auto_clear_driver_error: true,
            soft_error_response: SoftErrorResponse::DecelToHold,
            soft_error_position: 0,
            serial_baud_rate: 9600,
            serial_device_number: 14,
            i2c_address: variant.i2c_address_max.map(|_| 14),
            command_timeout: 1000,
            serial_crc_enabled: false,
            low_vin_timeout: 250,
            low_vin_shutoff_voltage: 6000,
            low_vin_startup_voltage: 6500,
            high_vin_shutoff_voltage: 35000,
            vin_calibration: 0,
            rc_max_pulse_period: 100,
            rc_bad_signal_timeout: 500,
            rc_consecutive_good_pulses: 2,
            input_averaging_enabled: true,
            input_hysteresis: 0,
            input_scaling_degree: ScalingDegree::Linear,
            input_invert: false,
            input: InputScaling::DEFAULT,
            output: OutputScaling::DEFAULT,
            encoder_prescaler: 1,
            encoder_postscaler: 1,
            encoder_unlimited: false,
            pins: [PinConfig::default(); 5],
            current_limit: variant.default_current_limit,
            current_limit_during_error: CurrentLimitDuringError::SameAsCurrentLimit,
            step_mode: StepMode::Full,
            decay_mode: variant.decay.as_ref().map(|d| d.default),
            speed_min: 0,
            speed_max: 2_000_000,
            accel_max: 40_000,
            decel_max: 0,
            decel_max_during_error: variant.decel_during_error.then_some(0),
            invert_motor_direction: false,
        }
    }

    /// Config of `pin`.
    pub fn pin(&self, pin: Pin) -> &PinConfig {
        &self.pins[pin.index()]
    }

    /// Mutable config of `pin`.
    pub fn pin_mut(&mut self, pin: Pin) -> &mut PinConfig {
        &mut self.pins[pin.index()]
    }
}
