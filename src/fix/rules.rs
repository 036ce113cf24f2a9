//! Field rules, in the order the fixer applies them.
//!
//! Every rule takes the document being repaired, the variant it must satisfy and the
//! warning collector. A rule only reads fields that earlier rules have already fixed.

use core::ops::RangeInclusive;

use super::warnings::{warn_fix, Warnings};
use crate::settings::units::{achievable_baud_rate, speed_to_khz};
use crate::settings::{
    CurrentLimitDuringError, InputScaling, OutputScaling, SettingsDocument, SoftErrorResponse,
    StepMode,
};
use crate::variant::Variant;

/// Highest low VIN shutoff voltage (mV), leaving room for the thresholds above it.
const LOW_VIN_SHUTOFF_MAX: u16 = 64_000;

/// Gap between consecutive VIN thresholds when one is raised (mV).
const VIN_HYSTERESIS: u16 = 500;

/// Signature shared by every rule.
pub(crate) type Rule = fn(&mut SettingsDocument, &Variant, &mut Warnings);

/// Product name and field presence.
///
/// Optional fields are added with their defaults or removed to match the variant.
/// Presence changes are not warned about.
pub(crate) fn product(settings: &mut SettingsDocument, variant: &Variant, warnings: &mut Warnings) {
    let descriptor = variant.descriptor();
    if settings.product != descriptor.product {
        warn_fix!(
            warnings,
            "The product was {} so it will be changed to {}",
            settings.product,
            descriptor.product
        );
        settings.product = descriptor.product;
    }

    let defaults = SettingsDocument::defaults(descriptor);
    if settings.i2c_address.is_some() != defaults.i2c_address.is_some() {
        settings.i2c_address = defaults.i2c_address;
    }
    if settings.decay_mode.is_some() != defaults.decay_mode.is_some() {
        settings.decay_mode = defaults.decay_mode;
    }
    if settings.decel_max_during_error.is_some() != defaults.decel_max_during_error.is_some() {
        settings.decel_max_during_error = defaults.decel_max_during_error;
    }
}

/// Soft error responses that the control mode cannot honour.
pub(crate) fn soft_error_response(
    settings: &mut SettingsDocument,
    _variant: &Variant,
    warnings: &mut Warnings,
) {
    if settings.control_mode.is_speed()
        && settings.soft_error_response == SoftErrorResponse::GoToPosition
    {
        let fallback = SoftErrorResponse::DecelToHold;
        warn_fix!(
            warnings,
            "The soft error response cannot be \"{}\" in a speed control mode, so it will be changed to \"{}\"",
            settings.soft_error_response.label(),
            fallback.label()
        );
        settings.soft_error_response = fallback;
    }
}

/// Baud rate, device number, I2C address and command timeout.
pub(crate) fn serial(settings: &mut SettingsDocument, variant: &Variant, warnings: &mut Warnings) {
    let descriptor = variant.descriptor();

    let mut baud = settings.serial_baud_rate;
    if baud < *descriptor.baud_rate.start() {
        baud = *descriptor.baud_rate.start();
        warn_fix!(warnings, "The serial baud rate was too low so it will be changed to {}", baud);
    } else if baud > *descriptor.baud_rate.end() {
        baud = *descriptor.baud_rate.end();
        warn_fix!(warnings, "The serial baud rate was too high so it will be changed to {}", baud);
    }
    // Snapping to the generator is silent: 115200 quietly becomes 115385.
    settings.serial_baud_rate = achievable_baud_rate(baud);

    if settings.serial_device_number > descriptor.device_number_max {
        settings.serial_device_number = descriptor.device_number_max;
        warn_fix!(
            warnings,
            "The serial device number was too high so it will be changed to {}",
            descriptor.device_number_max
        );
    }

    if let (Some(address), Some(max)) = (settings.i2c_address.as_mut(), descriptor.i2c_address_max) {
        if *address > max {
            *address = max;
            warn_fix!(warnings, "The I2C address was too high so it will be changed to {}", max);
        }
    }

    if settings.command_timeout > descriptor.command_timeout_max {
        settings.command_timeout = descriptor.command_timeout_max;
        warn_fix!(
            warnings,
            "The command timeout was too high so it will be changed to {} ms",
            descriptor.command_timeout_max
        );
    }
}

/// Low and high VIN thresholds.
///
/// The shutoff voltage is capped first, then each threshold is pushed 500 mV above
/// the one below it when it is lower.
pub(crate) fn vin_voltages(
    settings: &mut SettingsDocument,
    _variant: &Variant,
    warnings: &mut Warnings,
) {
    if settings.low_vin_shutoff_voltage > LOW_VIN_SHUTOFF_MAX {
        settings.low_vin_shutoff_voltage = LOW_VIN_SHUTOFF_MAX;
        warn_fix!(
            warnings,
            "The low VIN shutoff voltage will be changed to {} mV",
            LOW_VIN_SHUTOFF_MAX
        );
    }

    if settings.low_vin_startup_voltage < settings.low_vin_shutoff_voltage {
        settings.low_vin_startup_voltage = settings.low_vin_shutoff_voltage + VIN_HYSTERESIS;
        warn_fix!(
            warnings,
            "The low VIN startup voltage will be changed to {} mV",
            settings.low_vin_startup_voltage
        );
    }

    if settings.high_vin_shutoff_voltage < settings.low_vin_startup_voltage {
        settings.high_vin_shutoff_voltage =
            settings.low_vin_startup_voltage.saturating_add(VIN_HYSTERESIS);
        warn_fix!(
            warnings,
            "The high VIN shutoff voltage will be changed to {} mV",
            settings.high_vin_shutoff_voltage
        );
    }
}

/// Symmetric VIN calibration bound.
pub(crate) fn vin_calibration(
    settings: &mut SettingsDocument,
    variant: &Variant,
    warnings: &mut Warnings,
) {
    let limit = variant.descriptor().vin_calibration_limit;
    if settings.vin_calibration < -limit {
        settings.vin_calibration = -limit;
        warn_fix!(warnings, "The VIN calibration was too low so it will be raised to {}", -limit);
    } else if settings.vin_calibration > limit {
        settings.vin_calibration = limit;
        warn_fix!(warnings, "The VIN calibration was too high so it will be lowered to {}", limit);
    }
}

/// Input scaling: clamp each value first, then reset the whole tuple if it is out
/// of order.
///
/// A tuple that is ordered but entirely above the input range is therefore clamped
/// value by value, while an in-range tuple that is out of order is reset.
pub(crate) fn input_scaling(
    settings: &mut SettingsDocument,
    variant: &Variant,
    warnings: &mut Warnings,
) {
    let max = variant.descriptor().input_max;
    let input = &mut settings.input;
    let fields = [
        ("input error minimum", &mut input.error_min),
        ("input minimum", &mut input.min),
        ("input neutral min", &mut input.neutral_min),
        ("input neutral max", &mut input.neutral_max),
        ("input maximum", &mut input.max),
        ("input error maximum", &mut input.error_max),
    ];
    for (description, value) in fields {
        if *value > max {
            *value = max;
            warn_fix!(warnings, "The {} was too high so it will be lowered to {}", description, max);
        }
    }

    if !settings.input.is_ordered() {
        settings.input = InputScaling::DEFAULT;
        warn_fix!(
            warnings,
            "The input scaling values were out of order so they will be reset to their default values"
        );
    }
}

/// Output scaling: neutral is zero in speed modes, and the triple is ordered.
pub(crate) fn output_scaling(
    settings: &mut SettingsDocument,
    _variant: &Variant,
    warnings: &mut Warnings,
) {
    if settings.control_mode.is_speed() && settings.output.neutral != 0 {
        settings.output.neutral = 0;
        warn_fix!(
            warnings,
            "The scaling output neutral must be 0 in a speed control mode so it will be changed to 0"
        );
    }

    if !settings.output.is_ordered() {
        settings.output = OutputScaling::DEFAULT;
        warn_fix!(
            warnings,
            "The scaling output values were out of order so they will be reset to their default values"
        );
    }
}

/// Encoder prescaler and postscaler.
pub(crate) fn encoder(settings: &mut SettingsDocument, variant: &Variant, warnings: &mut Warnings) {
    let max = variant.descriptor().encoder_scaler_max;
    let fields = [
        ("encoder prescaler", &mut settings.encoder_prescaler),
        ("encoder postscaler", &mut settings.encoder_postscaler),
    ];
    for (description, value) in fields {
        if *value > max {
            *value = max;
            warn_fix!(warnings, "The {} was too high so it will be lowered to {}", description, max);
        } else if *value == 0 {
            *value = 1;
            warn_fix!(warnings, "The {} was zero so it will be changed to 1", description);
        }
    }
}

/// Current limit and current limit during error, quantized onto the variant's table.
pub(crate) fn current_limits(
    settings: &mut SettingsDocument,
    variant: &Variant,
    warnings: &mut Warnings,
) {
    let table = variant.current_table();

    let requested = settings.current_limit;
    let achievable = table.nearest_at_or_below(requested);
    if achievable != requested {
        let reason = if requested > table.max_value() {
            "was too high so it will be lowered"
        } else if requested < table.min_value() {
            "was too low so it will be raised"
        } else {
            "was not achievable so it will be lowered"
        };
        warn_fix!(warnings, "The current limit {} to {} mA", reason, achievable);
    }
    settings.current_limit = achievable;

    match settings.current_limit_during_error {
        CurrentLimitDuringError::SameAsCurrentLimit => {}
        CurrentLimitDuringError::Reserved(_) => {
            settings.current_limit_during_error = CurrentLimitDuringError::SameAsCurrentLimit;
            warn_fix!(
                warnings,
                "The current limit during error was an invalid negative number so it will be changed to be the same as the default current limit"
            );
        }
        CurrentLimitDuringError::Milliamps(requested) => {
            let achievable = table.nearest_at_or_below(requested);
            if achievable > settings.current_limit {
                settings.current_limit_during_error = CurrentLimitDuringError::SameAsCurrentLimit;
                warn_fix!(
                    warnings,
                    "The current limit during error was higher than the default current limit so it will be changed to be the same"
                );
            } else {
                if achievable != requested {
                    let reason = if requested < table.min_value() {
                        "was too low so it will be raised"
                    } else {
                        "was not achievable so it will be lowered"
                    };
                    warn_fix!(warnings, "The current limit during error {} to {} mA", reason, achievable);
                }
                settings.current_limit_during_error = CurrentLimitDuringError::Milliamps(achievable);
            }
        }
    }
}

/// Speeds, acceleration and decelerations.
pub(crate) fn motion(settings: &mut SettingsDocument, variant: &Variant, warnings: &mut Warnings) {
    let descriptor = variant.descriptor();

    if settings.speed_max > descriptor.speed_max {
        settings.speed_max = descriptor.speed_max;
        warn_fix!(
            warnings,
            "The maximum speed was too high so it will be lowered to {} ({} kHz)",
            settings.speed_max,
            speed_to_khz(settings.speed_max)
        );
    }

    if settings.speed_min > settings.speed_max {
        settings.speed_min = settings.speed_max;
        warn_fix!(
            warnings,
            "The minimum speed was greater than the maximum speed so it will be lowered to {}",
            settings.speed_min
        );
    }

    let range = &descriptor.accel;
    clamp_rate(warnings, "maximum acceleration", &mut settings.accel_max, range, false);
    clamp_rate(warnings, "maximum deceleration", &mut settings.decel_max, range, true);
    if let Some(decel) = settings.decel_max_during_error.as_mut() {
        clamp_rate(warnings, "maximum deceleration during error", decel, range, true);
    }
}

/// Clamp a rate into `range`. With `zero_is_sentinel`, 0 is left alone.
fn clamp_rate(
    warnings: &mut Warnings,
    description: &str,
    value: &mut u32,
    range: &RangeInclusive<u32>,
    zero_is_sentinel: bool,
) {
    if zero_is_sentinel && *value == 0 {
        return;
    }
    if *value > *range.end() {
        *value = *range.end();
        warn_fix!(warnings, "The {} was too high so it will be lowered to {}", description, value);
    } else if *value < *range.start() {
        *value = *range.start();
        warn_fix!(warnings, "The {} was too low so it will be raised to {}", description, value);
    }
}

/// Step mode and decay mode.
pub(crate) fn driver_modes(
    settings: &mut SettingsDocument,
    variant: &Variant,
    warnings: &mut Warnings,
) {
    let descriptor = variant.descriptor();

    if !descriptor.allows_step_mode(settings.step_mode) {
        let fallback = StepMode::Full;
        warn_fix!(
            warnings,
            "The step mode was invalid so it will be changed to {}",
            fallback.label()
        );
        settings.step_mode = fallback;
    }

    // Another product's decay mode silently becomes this product's default.
    if let (Some(rule), Some(mode)) = (&descriptor.decay, settings.decay_mode) {
        if !rule.allows(mode) {
            settings.decay_mode = Some(rule.default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DecayMode;
    use crate::variant::{Product, Registry};

    fn run(rule: Rule, product: Product, edit: impl FnOnce(&mut SettingsDocument)) -> (SettingsDocument, Warnings) {
        let registry = Registry::new().unwrap();
        let variant = registry.get(product).unwrap();
        let mut settings = SettingsDocument::defaults(variant.descriptor());
        edit(&mut settings);
        let mut warnings = Warnings::new();
        rule(&mut settings, variant, &mut warnings);
        (settings, warnings)
    }

    #[test]
    fn test_baud_rate_too_low() {
        let (settings, warnings) = run(serial, Product::T825, |s| s.serial_baud_rate = 101);
        assert_eq!(settings.serial_baud_rate, 200);
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The serial baud rate was too low so it will be changed to 200.\n")
        );
    }

    #[test]
    fn test_vin_thresholds_raised_in_order() {
        let (settings, warnings) = run(vin_voltages, Product::T825, |s| {
            s.low_vin_shutoff_voltage = 65_000;
            s.low_vin_startup_voltage = 65_535;
            s.high_vin_shutoff_voltage = 0;
        });
        assert_eq!(settings.low_vin_shutoff_voltage, 64_000);
        assert_eq!(settings.low_vin_startup_voltage, 65_535);
        assert_eq!(settings.high_vin_shutoff_voltage, 65_535);
        let lines: heapless::Vec<&str, 4> = warnings.iter().collect();
        assert_eq!(
            lines.as_slice(),
            &[
                "Warning: The low VIN shutoff voltage will be changed to 64000 mV.\n",
                "Warning: The high VIN shutoff voltage will be changed to 65535 mV.\n",
            ]
        );
    }

    #[test]
    fn test_vin_calibration_clamped() {
        let (settings, warnings) = run(vin_calibration, Product::T825, |s| s.vin_calibration = -501);
        assert_eq!(settings.vin_calibration, -500);
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The VIN calibration was too low so it will be raised to -500.\n")
        );
    }

    #[test]
    fn test_ladder_current_raised_to_minimum() {
        let (settings, warnings) = run(current_limits, Product::T249, |s| s.current_limit = 0);
        assert_eq!(settings.current_limit, 19);
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The current limit was too low so it will be raised to 19 mA.\n")
        );
    }

    #[test]
    fn test_current_rounded_down_between_codes() {
        let (settings, warnings) = run(current_limits, Product::T825, |s| s.current_limit = 209);
        assert_eq!(settings.current_limit, 192);
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The current limit was not achievable so it will be lowered to 192 mA.\n")
        );
    }

    #[test]
    fn test_reserved_error_current() {
        let (settings, warnings) = run(current_limits, Product::T825, |s| {
            s.current_limit_during_error = CurrentLimitDuringError::Reserved(-2)
        });
        assert_eq!(
            settings.current_limit_during_error,
            CurrentLimitDuringError::SameAsCurrentLimit
        );
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_decel_during_error_sentinel_kept() {
        let (settings, warnings) = run(motion, Product::T500, |s| s.decel_max_during_error = Some(0));
        assert_eq!(settings.decel_max_during_error, Some(0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_decel_during_error_raised() {
        let (settings, warnings) = run(motion, Product::T249, |s| s.decel_max_during_error = Some(5));
        assert_eq!(settings.decel_max_during_error, Some(100));
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The maximum deceleration during error was too low so it will be raised to 100.\n")
        );
    }

    #[test]
    fn test_foreign_decay_mode_silently_replaced() {
        let (settings, warnings) = run(driver_modes, Product::T834, |s| {
            s.decay_mode = Some(DecayMode::Fast)
        });
        assert_eq!(settings.decay_mode, Some(DecayMode::Mixed50));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_product_mismatch_reshapes_document() {
        let (settings, warnings) = run(product, Product::T500, |s| {
            s.product = Product::T825;
            s.decay_mode = Some(DecayMode::Slow);
            s.i2c_address = Some(20);
            s.decel_max_during_error = None;
        });
        assert_eq!(settings.product, Product::T500);
        assert_eq!(settings.decay_mode, None);
        assert_eq!(settings.i2c_address, None);
        assert_eq!(settings.decel_max_during_error, Some(0));
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The product was T825 so it will be changed to T500.\n")
        );
        assert_eq!(warnings.len(), 1);
    }
}
