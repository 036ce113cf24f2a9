//! Enumerated settings values.

use serde::{Deserialize, Serialize};

/// How the controller decides where the motor should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// Commands over serial, I2C or USB.
    #[default]
    Serial,
    /// STEP/DIR inputs.
    StepDir,
    /// RC pulse sets the target position.
    RcPosition,
    /// RC pulse sets the target velocity.
    RcSpeed,
    /// Analog voltage sets the target position.
    AnalogPosition,
    /// Analog voltage sets the target velocity.
    AnalogSpeed,
    /// Quadrature encoder sets the target position.
    EncoderPosition,
    /// Quadrature encoder sets the target velocity.
    EncoderSpeed,
}

impl ControlMode {
    /// Every control mode.
    pub const ALL: [ControlMode; 8] = [
        ControlMode::Serial,
        ControlMode::StepDir,
        ControlMode::RcPosition,
        ControlMode::RcSpeed,
        ControlMode::AnalogPosition,
        ControlMode::AnalogSpeed,
        ControlMode::EncoderPosition,
        ControlMode::EncoderSpeed,
    ];

    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            ControlMode::Serial => "serial",
            ControlMode::StepDir => "step_dir",
            ControlMode::RcPosition => "rc_position",
            ControlMode::RcSpeed => "rc_speed",
            ControlMode::AnalogPosition => "analog_position",
            ControlMode::AnalogSpeed => "analog_speed",
            ControlMode::EncoderPosition => "encoder_position",
            ControlMode::EncoderSpeed => "encoder_speed",
        }
    }

    /// Input sets a velocity rather than a position.
    pub const fn is_speed(self) -> bool {
        matches!(
            self,
            ControlMode::RcSpeed | ControlMode::AnalogSpeed | ControlMode::EncoderSpeed
        )
    }

    /// Input comes from the analog reading on SDA.
    pub const fn is_analog(self) -> bool {
        matches!(self, ControlMode::AnalogPosition | ControlMode::AnalogSpeed)
    }
}

/// What the controller does when a soft error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoftErrorResponse {
    /// Turn the driver off.
    Deenergize,
    /// Stop abruptly and hold position.
    HaltAndHold,
    /// Decelerate to a stop and hold position.
    #[default]
    DecelToHold,
    /// Move to the soft error position.
    GoToPosition,
}

impl SoftErrorResponse {
    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            SoftErrorResponse::Deenergize => "deenergize",
            SoftErrorResponse::HaltAndHold => "halt_and_hold",
            SoftErrorResponse::DecelToHold => "decel_to_hold",
            SoftErrorResponse::GoToPosition => "go_to_position",
        }
    }

    /// Name shown to people.
    pub const fn label(self) -> &'static str {
        match self {
            SoftErrorResponse::Deenergize => "De-energize",
            SoftErrorResponse::HaltAndHold => "Halt and hold",
            SoftErrorResponse::DecelToHold => "Decelerate to hold",
            SoftErrorResponse::GoToPosition => "Go to position",
        }
    }
}

/// Shape of the input-to-output scaling curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScalingDegree {
    /// Straight line.
    #[default]
    Linear,
    /// Second-order curve.
    Quadratic,
    /// Third-order curve.
    Cubic,
}

impl ScalingDegree {
    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            ScalingDegree::Linear => "linear",
            ScalingDegree::Quadratic => "quadratic",
            ScalingDegree::Cubic => "cubic",
        }
    }
}

/// Microstepping divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepMode {
    /// Full step.
    #[default]
    Full,
    /// 1/2 step.
    Half,
    /// 1/4 step.
    Quarter,
    /// 1/8 step.
    Eighth,
    /// 1/16 step.
    Sixteenth,
    /// 1/32 step.
    ThirtySecond,
}

impl StepMode {
    /// Every step mode, finest last.
    pub const ALL: [StepMode; 6] = [
        StepMode::Full,
        StepMode::Half,
        StepMode::Quarter,
        StepMode::Eighth,
        StepMode::Sixteenth,
        StepMode::ThirtySecond,
    ];

    /// Microsteps per full step.
    pub const fn divisor(self) -> u32 {
        match self {
            StepMode::Full => 1,
            StepMode::Half => 2,
            StepMode::Quarter => 4,
            StepMode::Eighth => 8,
            StepMode::Sixteenth => 16,
            StepMode::ThirtySecond => 32,
        }
    }

    /// Step mode with the given divisor, if there is one.
    pub fn from_divisor(divisor: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.divisor() == divisor)
    }

    /// Name shown to people.
    pub const fn label(self) -> &'static str {
        match self {
            StepMode::Full => "1 (full step)",
            StepMode::Half => "2 (half step)",
            StepMode::Quarter => "4 (1/4 step)",
            StepMode::Eighth => "8 (1/8 step)",
            StepMode::Sixteenth => "16 (1/16 step)",
            StepMode::ThirtySecond => "32 (1/32 step)",
        }
    }
}

/// Driver decay mode. Which ones exist depends on the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecayMode {
    /// Mixed decay.
    Mixed,
    /// Slow decay.
    Slow,
    /// Fast decay.
    Fast,
    /// Mixed decay, 25% fast.
    Mixed25,
    /// Mixed decay, 50% fast.
    Mixed50,
    /// Mixed decay, 75% fast.
    Mixed75,
}

impl DecayMode {
    /// Every decay mode of every product.
    pub const ALL: [DecayMode; 6] = [
        DecayMode::Mixed,
        DecayMode::Slow,
        DecayMode::Fast,
        DecayMode::Mixed25,
        DecayMode::Mixed50,
        DecayMode::Mixed75,
    ];

    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            DecayMode::Mixed => "mixed",
            DecayMode::Slow => "slow",
            DecayMode::Fast => "fast",
            DecayMode::Mixed25 => "mixed25",
            DecayMode::Mixed50 => "mixed50",
            DecayMode::Mixed75 => "mixed75",
        }
    }
}

/// Current limit used while the controller is in an error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentLimitDuringError {
    /// Keep using the normal current limit. Stored as -1.
    #[default]
    SameAsCurrentLimit,
    /// Use this many milliamps.
    Milliamps(u32),
    /// A negative value other than -1. Never valid after fixing.
    Reserved(i32),
}

impl CurrentLimitDuringError {
    /// Stored value meaning "same as the current limit".
    pub const SAME_AS_CURRENT_LIMIT: i32 = -1;

    /// Interpret a stored value.
    pub const fn from_raw(raw: i32) -> Self {
        if raw == Self::SAME_AS_CURRENT_LIMIT {
            CurrentLimitDuringError::SameAsCurrentLimit
        } else if raw < 0 {
            CurrentLimitDuringError::Reserved(raw)
        } else {
            CurrentLimitDuringError::Milliamps(raw as u32)
        }
    }

    /// Value to store.
    pub const fn to_raw(self) -> i64 {
        match self {
            CurrentLimitDuringError::SameAsCurrentLimit => Self::SAME_AS_CURRENT_LIMIT as i64,
            CurrentLimitDuringError::Milliamps(ma) => ma as i64,
            CurrentLimitDuringError::Reserved(raw) => raw as i64,
        }
    }
}
