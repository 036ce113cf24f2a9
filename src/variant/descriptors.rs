//! Static descriptors of the supported products.

use super::{DecayRule, Product, VariantDescriptor};
use crate::current::{CurrentTableSource, CurrentTableSpec, LinearCodes, ResistorLadder};
use crate::settings::{DecayMode, StepMode};

const BAUD_RATE_MIN: u32 = 200;
const BAUD_RATE_MAX: u32 = 115_385;
const DEVICE_NUMBER_MAX: u8 = 127;
const I2C_ADDRESS_MAX: u8 = 127;
const COMMAND_TIMEOUT_MAX: u16 = 60_000;
const VIN_CALIBRATION_LIMIT: i16 = 500;
const INPUT_MAX: u16 = 4095;
const ENCODER_SCALER_MAX: u32 = 0x7FFF_FFFF;
const SPEED_MAX: u32 = 500_000_000;
const ACCEL_MIN: u32 = 100;
const ACCEL_MAX: u32 = 0x7FFF_FFFF;

const ALL_STEP_MODES: &[StepMode] = &StepMode::ALL;

const COARSE_STEP_MODES: &[StepMode] = &[
    StepMode::Full,
    StepMode::Half,
    StepMode::Quarter,
    StepMode::Eighth,
];

const DRV8825_CODES: LinearCodes = LinearCodes {
    units_ma: 32,
    max_code: 124,
};

/// Measured T500 current limits, one per code.
const T500_CURRENTS: &[u32] = &[
    0, 1, 174, 343, 495, 634, 762, 880, 990, 1092, 1189, 1281, 1368, 1452, 1532, 1611, 1687,
    1762, 1835, 1909, 1982, 2056, 2131, 2207, 2285, 2366, 2451, 2540, 2634, 2734, 2843, 2962,
    3093,
];

const T249_LADDER: ResistorLadder = ResistorLadder {
    codes: 32,
    unit_resistance: 5000.0,
    v_ref: 0.9,
    v_dac_top: 4.096,
    r_top_fixed: 137_000.0,
    r_bottom_fixed: 41_200.0,
    calibration: 86_666.0,
};

/// Reference product.
pub static T825: VariantDescriptor = VariantDescriptor {
    product: Product::T825,
    current_table: CurrentTableSpec {
        source: CurrentTableSource::Linear(DRV8825_CODES),
        selectable: 0..=124,
    },
    default_current_limit: 192,
    baud_rate: BAUD_RATE_MIN..=BAUD_RATE_MAX,
    device_number_max: DEVICE_NUMBER_MAX,
    i2c_address_max: Some(I2C_ADDRESS_MAX),
    command_timeout_max: COMMAND_TIMEOUT_MAX,
    vin_calibration_limit: VIN_CALIBRATION_LIMIT,
    input_max: INPUT_MAX,
    encoder_scaler_max: ENCODER_SCALER_MAX,
    speed_max: SPEED_MAX,
    accel: ACCEL_MIN..=ACCEL_MAX,
    step_modes: ALL_STEP_MODES,
    decay: Some(DecayRule {
        modes: &[DecayMode::Mixed, DecayMode::Slow, DecayMode::Fast],
        default: DecayMode::Mixed,
    }),
    decel_during_error: false,
};

/// High-voltage product. Same code generator as the T825, capped at code 108.
pub static T834: VariantDescriptor = VariantDescriptor {
    product: Product::T834,
    current_table: CurrentTableSpec {
        source: CurrentTableSource::Linear(DRV8825_CODES),
        selectable: 0..=108,
    },
    default_current_limit: 192,
    baud_rate: BAUD_RATE_MIN..=BAUD_RATE_MAX,
    device_number_max: DEVICE_NUMBER_MAX,
    i2c_address_max: Some(I2C_ADDRESS_MAX),
    command_timeout_max: COMMAND_TIMEOUT_MAX,
    vin_calibration_limit: VIN_CALIBRATION_LIMIT,
    input_max: INPUT_MAX,
    encoder_scaler_max: ENCODER_SCALER_MAX,
    speed_max: SPEED_MAX,
    accel: ACCEL_MIN..=ACCEL_MAX,
    step_modes: ALL_STEP_MODES,
    decay: Some(DecayRule {
        modes: &[
            DecayMode::Slow,
            DecayMode::Mixed25,
            DecayMode::Mixed50,
            DecayMode::Mixed75,
        ],
        default: DecayMode::Mixed50,
    }),
    decel_during_error: false,
};

/// Low-voltage product with a measured current table.
pub static T500: VariantDescriptor = VariantDescriptor {
    product: Product::T500,
    current_table: CurrentTableSpec {
        source: CurrentTableSource::Measured(T500_CURRENTS),
        selectable: 0..=32,
    },
    default_current_limit: 174,
    baud_rate: BAUD_RATE_MIN..=BAUD_RATE_MAX,
    device_number_max: DEVICE_NUMBER_MAX,
    i2c_address_max: None,
    command_timeout_max: COMMAND_TIMEOUT_MAX,
    vin_calibration_limit: VIN_CALIBRATION_LIMIT,
    input_max: INPUT_MAX,
    encoder_scaler_max: 65_535,
    speed_max: SPEED_MAX,
    accel: ACCEL_MIN..=ACCEL_MAX,
    step_modes: COARSE_STEP_MODES,
    decay: None,
    decel_during_error: true,
};

/// Product with a resistor-ladder current DAC.
pub static T249: VariantDescriptor = VariantDescriptor {
    product: Product::T249,
    current_table: CurrentTableSpec {
        source: CurrentTableSource::Ladder(T249_LADDER),
        selectable: 0..=31,
    },
    default_current_limit: 152,
    baud_rate: BAUD_RATE_MIN..=BAUD_RATE_MAX,
    device_number_max: DEVICE_NUMBER_MAX,
    i2c_address_max: None,
    command_timeout_max: COMMAND_TIMEOUT_MAX,
    vin_calibration_limit: VIN_CALIBRATION_LIMIT,
    input_max: INPUT_MAX,
    encoder_scaler_max: ENCODER_SCALER_MAX,
    speed_max: SPEED_MAX,
    accel: ACCEL_MIN..=ACCEL_MAX,
    step_modes: ALL_STEP_MODES,
    decay: None,
    decel_during_error: true,
};

/// Every built-in descriptor, in registry order.
pub(crate) static ALL: [&VariantDescriptor; 4] = [&T825, &T834, &T500, &T249];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_current_limits_are_table_entries() {
        for descriptor in ALL {
            let table = descriptor.current_table.build().unwrap();
            assert!(
                table.contains(descriptor.default_current_limit),
                "{} default {} mA",
                descriptor.product,
                descriptor.default_current_limit
            );
        }
    }

    #[test]
    fn test_table_maxima() {
        let max = |d: &VariantDescriptor| d.current_table.build().unwrap().max_value();
        assert_eq!(max(&T825), 3968);
        assert_eq!(max(&T834), 3456);
        assert_eq!(max(&T500), 3093);
        assert_eq!(max(&T249), 2463);
    }

    #[test]
    fn test_decay_defaults_are_allowed() {
        for descriptor in ALL {
            if let Some(decay) = &descriptor.decay {
                assert!(decay.allows(decay.default));
            }
        }
    }
}
