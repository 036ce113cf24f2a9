//! Pin function resolver.
//!
//! Legality is table driven. [`requirements`] lists what each control mode needs from
//! its input pins, [`PROHIBITED`] lists functions a pin can never have, and
//! [`PROHIBITED_FLAGS`] lists flags a pin can never have. The SCL/SDA I2C pairing is
//! checked last because the earlier rules can change either pin.

use super::warnings::{warn_fix, Warnings};
use crate::settings::{ControlMode, Pin, PinConfig, PinFlag, PinFunction, SettingsDocument};

/// Functions a control mode accepts on one of its input pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Pin the control mode reads.
    pub pin: Pin,
    /// Role named in the warning.
    pub role: &'static str,
    /// Functions that keep the pin usable in that role.
    pub allowed: &'static [PinFunction],
}

const ANALOG_REQUIREMENTS: &[Requirement] = &[Requirement {
    pin: Pin::Sda,
    role: "an analog input",
    allowed: &[PinFunction::Default, PinFunction::UserInput],
}];

const RC_REQUIREMENTS: &[Requirement] = &[Requirement {
    pin: Pin::Rc,
    role: "an RC input",
    allowed: &[PinFunction::Default, PinFunction::Rc],
}];

const ENCODER_REQUIREMENTS: &[Requirement] = &[
    Requirement {
        pin: Pin::Tx,
        role: "an encoder input",
        allowed: &[PinFunction::Default, PinFunction::Encoder],
    },
    Requirement {
        pin: Pin::Rx,
        role: "an encoder input",
        allowed: &[PinFunction::Default, PinFunction::Encoder],
    },
];

/// Pin requirements of `mode`, in evaluation order.
pub fn requirements(mode: ControlMode) -> &'static [Requirement] {
    match mode {
        ControlMode::AnalogPosition | ControlMode::AnalogSpeed => ANALOG_REQUIREMENTS,
        ControlMode::RcPosition | ControlMode::RcSpeed => RC_REQUIREMENTS,
        ControlMode::EncoderPosition | ControlMode::EncoderSpeed => ENCODER_REQUIREMENTS,
        ControlMode::Serial | ControlMode::StepDir => &[],
    }
}

/// A function or flag that one pin never supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prohibition<T> {
    /// Affected pin.
    pub pin: Pin,
    /// Unsupported function or flag.
    pub what: T,
    /// Completes "The <pin> pin cannot ...".
    pub reason: &'static str,
}

const fn deny<T>(pin: Pin, what: T, reason: &'static str) -> Prohibition<T> {
    Prohibition { pin, what, reason }
}

const POT_POWER: &str = "be used as a potentiometer power pin";
const RC_INPUT: &str = "be used as an RC input";
const ENCODER_INPUT: &str = "be used as an encoder input";

/// Functions that are illegal on a pin in every control mode, in evaluation order.
pub const PROHIBITED: &[Prohibition<PinFunction>] = &[
    deny(Pin::Rc, PinFunction::UserIo, "be a user I/O pin"),
    deny(Pin::Sda, PinFunction::PotPower, POT_POWER),
    deny(Pin::Tx, PinFunction::PotPower, POT_POWER),
    deny(Pin::Rx, PinFunction::PotPower, POT_POWER),
    deny(Pin::Rc, PinFunction::PotPower, POT_POWER),
    deny(Pin::Rc, PinFunction::Serial, "be a serial pin"),
    deny(Pin::Sda, PinFunction::Rc, RC_INPUT),
    deny(Pin::Scl, PinFunction::Rc, RC_INPUT),
    deny(Pin::Tx, PinFunction::Rc, RC_INPUT),
    deny(Pin::Rx, PinFunction::Rc, RC_INPUT),
    deny(Pin::Scl, PinFunction::Encoder, ENCODER_INPUT),
    deny(Pin::Sda, PinFunction::Encoder, ENCODER_INPUT),
    deny(Pin::Rc, PinFunction::Encoder, ENCODER_INPUT),
];

/// Flags that are illegal on a pin whatever its function.
pub const PROHIBITED_FLAGS: &[Prohibition<PinFlag>] =
    &[deny(Pin::Rc, PinFlag::Analog, "be an analog input")];

/// Whether `config` puts its pin on the I2C bus in `mode`.
///
/// SCL and SDA default to I2C except in the analog modes, where SDA reads the
/// analog input.
pub fn is_i2c(config: &PinConfig, mode: ControlMode) -> bool {
    match config.function {
        PinFunction::Serial => true,
        PinFunction::Default => !mode.is_analog(),
        _ => false,
    }
}

/// Whether `function` is legal on `pin` in `mode`, ignoring the I2C pairing.
pub fn function_allowed(pin: Pin, function: PinFunction, mode: ControlMode) -> bool {
    let required_ok = requirements(mode)
        .iter()
        .filter(|r| r.pin == pin)
        .all(|r| r.allowed.contains(&function));
    let prohibited = PROHIBITED
        .iter()
        .any(|p| p.pin == pin && p.what == function);
    required_ok && !prohibited
}

/// Whether `flag` is legal on `pin`.
pub fn flag_allowed(pin: Pin, flag: PinFlag) -> bool {
    !PROHIBITED_FLAGS
        .iter()
        .any(|p| p.pin == pin && p.what == flag)
}

/// Repair pin functions and flags for the already-fixed control mode.
///
/// Reset functions keep their flags.
pub(crate) fn resolve(settings: &mut SettingsDocument, warnings: &mut Warnings) {
    let mode = settings.control_mode;

    for requirement in requirements(mode) {
        let config = settings.pin_mut(requirement.pin);
        if !requirement.allowed.contains(&config.function) {
            config.function = PinFunction::Default;
            warn_fix!(
                warnings,
                "The {} pin must be used as {} so its function will be changed to the default",
                requirement.pin.label(),
                requirement.role
            );
        }
    }

    for prohibition in PROHIBITED {
        let config = settings.pin_mut(prohibition.pin);
        if config.function == prohibition.what {
            config.function = PinFunction::Default;
            warn_fix!(
                warnings,
                "The {} pin cannot {} so its function will be changed to the default",
                prohibition.pin.label(),
                prohibition.reason
            );
        }
    }

    for prohibition in PROHIBITED_FLAGS {
        let config = settings.pin_mut(prohibition.pin);
        if config.flags.get(prohibition.what) {
            config.flags.set(prohibition.what, false);
            warn_fix!(
                warnings,
                "The {} pin cannot {} so that feature will be disabled",
                prohibition.pin.label(),
                prohibition.reason
            );
        }
    }

    let scl_is_i2c = is_i2c(settings.pin(Pin::Scl), mode);
    let sda_is_i2c = is_i2c(settings.pin(Pin::Sda), mode);
    if scl_is_i2c != sda_is_i2c {
        settings.pin_mut(Pin::Scl).function = PinFunction::Default;
        settings.pin_mut(Pin::Sda).function = PinFunction::Default;
        let (follower, leader) = if sda_is_i2c {
            (Pin::Scl, Pin::Sda)
        } else {
            (Pin::Sda, Pin::Scl)
        };
        warn_fix!(
            warnings,
            "The {} pin must be used for I2C if the {} pin is, so the SCL and SDA pin functions will be changed to the default",
            follower.label(),
            leader.label()
        );
    }
}
