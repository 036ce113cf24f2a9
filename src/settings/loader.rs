//! Settings file reading and writing (std only).
//!
//! Settings files are flat TOML tables. `product` selects the variant; every other
//! key is optional and starts from that variant's default.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use super::{CurrentLimitDuringError, Pin, PinConfig, SettingsDocument, StepMode};
use crate::error::{message, name, Error, ParseError, Result};
use crate::fix::Warnings;
use crate::variant::{Registry, VariantDescriptor};

/// Load a settings document from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_settings::{load_settings, Registry};
///
/// let registry = Registry::new()?;
/// let settings = load_settings("t825.toml", &registry)?;
/// ```
pub fn load_settings<P: AsRef<Path>>(path: P, registry: &Registry) -> Result<SettingsDocument> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Parse(ParseError::Io(message(&e.to_string()))))?;

    parse_settings(&content, registry)
}

/// Parse a settings document from a TOML string.
///
/// Stops at the first structural problem, in document order. Values that parse
/// but break a product rule are left for the fixer.
///
/// # Errors
///
/// Returns `Error::Parse` for invalid TOML, a missing or unknown product, a key the
/// product does not have, a wrongly typed value, or an integer that does not fit
/// the field.
pub fn parse_settings(content: &str, registry: &Registry) -> Result<SettingsDocument> {
    let table: Table = content
        .parse()
        .map_err(|e: toml::de::Error| ParseError::Syntax(message(e.message())))?;

    let variant = match table.get("product") {
        None => return Err(ParseError::MissingProduct.into()),
        Some(Value::String(product)) => registry
            .by_name(product)
            .ok_or_else(|| ParseError::UnknownProduct(name(product)))?,
        Some(_) => return Err(ParseError::invalid_value("product").into()),
    };
    let descriptor = variant.descriptor();

    let mut settings = SettingsDocument::defaults(descriptor);
    for (key, value) in &table {
        if key != "product" {
            apply(&mut settings, descriptor, key, value)?;
        }
    }
    Ok(settings)
}

fn apply(
    settings: &mut SettingsDocument,
    descriptor: &VariantDescriptor,
    key: &str,
    value: &Value,
) -> core::result::Result<(), ParseError> {
    match key {
        "control_mode" => settings.control_mode = enum_value(key, value)?,
        "never_sleep" => settings.never_sleep = bool_value(key, value)?,
        "disable_safe_start" => settings.disable_safe_start = bool_value(key, value)?,
        "ignore_err_line_high" => settings.ignore_err_line_high = bool_value(key, value)?,
        "auto_clear_driver_error" => settings.auto_clear_driver_error = bool_value(key, value)?,
        "soft_error_response" => settings.soft_error_response = enum_value(key, value)?,
        "soft_error_position" => settings.soft_error_position = int_value(key, value)?,
        "serial_baud_rate" => settings.serial_baud_rate = int_value(key, value)?,
        "serial_device_number" => settings.serial_device_number = int_value(key, value)?,
        "i2c_address" if descriptor.has_i2c_address() => {
            settings.i2c_address = Some(int_value(key, value)?)
        }
        "command_timeout" => settings.command_timeout = int_value(key, value)?,
        "serial_crc_enabled" => settings.serial_crc_enabled = bool_value(key, value)?,
        "low_vin_timeout" => settings.low_vin_timeout = int_value(key, value)?,
        "low_vin_shutoff_voltage" => settings.low_vin_shutoff_voltage = int_value(key, value)?,
        "low_vin_startup_voltage" => settings.low_vin_startup_voltage = int_value(key, value)?,
        "high_vin_shutoff_voltage" => {
            settings.high_vin_shutoff_voltage = int_value(key, value)?
        }
        "vin_calibration" => settings.vin_calibration = int_value(key, value)?,
        "rc_max_pulse_period" => settings.rc_max_pulse_period = int_value(key, value)?,
        "rc_bad_signal_timeout" => settings.rc_bad_signal_timeout = int_value(key, value)?,
        "rc_consecutive_good_pulses" => {
            settings.rc_consecutive_good_pulses = int_value(key, value)?
        }
        "input_averaging_enabled" => settings.input_averaging_enabled = bool_value(key, value)?,
        "input_hysteresis" => settings.input_hysteresis = int_value(key, value)?,
        "input_scaling_degree" => settings.input_scaling_degree = enum_value(key, value)?,
        "input_invert" => settings.input_invert = bool_value(key, value)?,
        "input_error_min" => settings.input.error_min = int_value(key, value)?,
        "input_min" => settings.input.min = int_value(key, value)?,
        "input_neutral_min" => settings.input.neutral_min = int_value(key, value)?,
        "input_neutral_max" => settings.input.neutral_max = int_value(key, value)?,
        "input_max" => settings.input.max = int_value(key, value)?,
        "input_error_max" => settings.input.error_max = int_value(key, value)?,
        "output_min" => settings.output.min = int_value(key, value)?,
        "output_neutral" => settings.output.neutral = int_value(key, value)?,
        "output_max" => settings.output.max = int_value(key, value)?,
        "encoder_prescaler" => settings.encoder_prescaler = int_value(key, value)?,
        "encoder_postscaler" => settings.encoder_postscaler = int_value(key, value)?,
        "encoder_unlimited" => settings.encoder_unlimited = bool_value(key, value)?,
        "current_limit" => settings.current_limit = int_value(key, value)?,
        "current_limit_during_error" => {
            settings.current_limit_during_error =
                CurrentLimitDuringError::from_raw(int_value(key, value)?)
        }
        "step_mode" => {
            let divisor: u32 = int_value(key, value)?;
            settings.step_mode =
                StepMode::from_divisor(divisor).ok_or_else(|| ParseError::invalid_value(key))?;
        }
        "decay_mode" if descriptor.has_decay_mode() => {
            settings.decay_mode = Some(enum_value(key, value)?)
        }
        "speed_min" => settings.speed_min = int_value(key, value)?,
        "speed_max" => settings.speed_max = int_value(key, value)?,
        "accel_max" => settings.accel_max = int_value(key, value)?,
        "decel_max" => settings.decel_max = int_value(key, value)?,
        "decel_max_during_error" if descriptor.decel_during_error => {
            settings.decel_max_during_error = Some(int_value(key, value)?)
        }
        "invert_motor_direction" => settings.invert_motor_direction = bool_value(key, value)?,
        _ => match Pin::from_key(key) {
            Some(pin) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| ParseError::invalid_value(key))?;
                *settings.pin_mut(pin) =
                    PinConfig::parse(text).ok_or_else(|| ParseError::invalid_value(key))?;
            }
            None => return Err(ParseError::unknown_field(key)),
        },
    }
    Ok(())
}

fn int_value<T: TryFrom<i64>>(key: &str, value: &Value) -> core::result::Result<T, ParseError> {
    let raw = value
        .as_integer()
        .ok_or_else(|| ParseError::invalid_value(key))?;
    T::try_from(raw).map_err(|_| ParseError::out_of_range(key))
}

fn bool_value(key: &str, value: &Value) -> core::result::Result<bool, ParseError> {
    value.as_bool().ok_or_else(|| ParseError::invalid_value(key))
}

fn enum_value<T: DeserializeOwned>(key: &str, value: &Value) -> core::result::Result<T, ParseError> {
    if !value.is_str() {
        return Err(ParseError::invalid_value(key));
    }
    value
        .clone()
        .try_into()
        .map_err(|_| ParseError::invalid_value(key))
}

/// Serialize a settings document to TOML, one key per line in canonical order.
///
/// Optional fields that are `None` are left out.
pub fn settings_to_string(settings: &SettingsDocument) -> String {
    let mut table = Table::new();
    let mut put = |key: &str, value: Value| {
        table.insert(key.to_string(), value);
    };
    let int = |v: i64| Value::Integer(v);
    let text = |s: &str| Value::String(s.to_string());

    put("product", text(settings.product.name()));
    put("control_mode", text(settings.control_mode.name()));
    put("never_sleep", Value::Boolean(settings.never_sleep));
    put("disable_safe_start", Value::Boolean(settings.disable_safe_start));
    put("ignore_err_line_high", Value::Boolean(settings.ignore_err_line_high));
    put("auto_clear_driver_error", Value::Boolean(settings.auto_clear_driver_error));
    put("soft_error_response", text(settings.soft_error_response.name()));
    put("soft_error_position", int(settings.soft_error_position.into()));
    put("serial_baud_rate", int(settings.serial_baud_rate.into()));
    put("serial_device_number", int(settings.serial_device_number.into()));
    if let Some(address) = settings.i2c_address {
        put("i2c_address", int(address.into()));
    }
    put("command_timeout", int(settings.command_timeout.into()));
    put("serial_crc_enabled", Value::Boolean(settings.serial_crc_enabled));
    put("low_vin_timeout", int(settings.low_vin_timeout.into()));
    put("low_vin_shutoff_voltage", int(settings.low_vin_shutoff_voltage.into()));
    put("low_vin_startup_voltage", int(settings.low_vin_startup_voltage.into()));
    put("high_vin_shutoff_voltage", int(settings.high_vin_shutoff_voltage.into()));
    put("vin_calibration", int(settings.vin_calibration.into()));
    put("rc_max_pulse_period", int(settings.rc_max_pulse_period.into()));
    put("rc_bad_signal_timeout", int(settings.rc_bad_signal_timeout.into()));
    put("rc_consecutive_good_pulses", int(settings.rc_consecutive_good_pulses.into()));
    put("input_averaging_enabled", Value::Boolean(settings.input_averaging_enabled));
    put("input_hysteresis", int(settings.input_hysteresis.into()));
    put("input_scaling_degree", text(settings.input_scaling_degree.name()));
    put("input_invert", Value::Boolean(settings.input_invert));
    put("input_error_min", int(settings.input.error_min.into()));
    put("input_min", int(settings.input.min.into()));
    put("input_neutral_min", int(settings.input.neutral_min.into()));
    put("input_neutral_max", int(settings.input.neutral_max.into()));
    put("input_max", int(settings.input.max.into()));
    put("input_error_max", int(settings.input.error_max.into()));
    put("output_min", int(settings.output.min.into()));
    put("output_neutral", int(settings.output.neutral.into()));
    put("output_max", int(settings.output.max.into()));
    put("encoder_prescaler", int(settings.encoder_prescaler.into()));
    put("encoder_postscaler", int(settings.encoder_postscaler.into()));
    put("encoder_unlimited", Value::Boolean(settings.encoder_unlimited));
    for pin in Pin::ALL {
        put(pin.key(), text(&settings.pin(pin).to_string()));
    }
    put("current_limit", int(settings.current_limit.into()));
    put(
        "current_limit_during_error",
        int(settings.current_limit_during_error.to_raw()),
    );
    put("step_mode", int(settings.step_mode.divisor().into()));
    if let Some(mode) = settings.decay_mode {
        put("decay_mode", text(mode.name()));
    }
    put("speed_min", int(settings.speed_min.into()));
    put("speed_max", int(settings.speed_max.into()));
    put("accel_max", int(settings.accel_max.into()));
    put("decel_max", int(settings.decel_max.into()));
    if let Some(decel) = settings.decel_max_during_error {
        put("decel_max_during_error", int(decel.into()));
    }
    put("invert_motor_direction", Value::Boolean(settings.invert_motor_direction));

    table.to_string()
}

/// Parse, fix and re-serialize a settings file.
///
/// The product named in the file selects the variant.
///
/// # Errors
///
/// Returns the parse error, if any. Rule violations are fixed and reported in the
/// returned warnings instead.
pub fn fix_settings_str(content: &str, registry: &Registry) -> Result<(String, Warnings)> {
    let settings = parse_settings(content, registry)?;
    let variant = registry
        .get(settings.product)
        .ok_or_else(|| ParseError::UnknownProduct(name(settings.product.name())))?;
    let fixed = settings.fix(variant);
    Ok((settings_to_string(&fixed.settings), fixed.warnings))
}
