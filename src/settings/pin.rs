//! Control pin configuration.

use core::fmt;

/// One of the controller's five configurable control pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    /// I2C clock / potentiometer power.
    Scl,
    /// I2C data / analog input.
    Sda,
    /// Serial transmit / encoder A.
    Tx,
    /// Serial receive / encoder B.
    Rx,
    /// RC pulse input.
    Rc,
}

impl Pin {
    /// All pins, in evaluation and file order.
    pub const ALL: [Pin; 5] = [Pin::Scl, Pin::Sda, Pin::Tx, Pin::Rx, Pin::Rc];

    /// Position in [`Pin::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Pin::Scl => 0,
            Pin::Sda => 1,
            Pin::Tx => 2,
            Pin::Rx => 3,
            Pin::Rc => 4,
        }
    }

    /// Name shown to people.
    pub const fn label(self) -> &'static str {
        match self {
            Pin::Scl => "SCL",
            Pin::Sda => "SDA",
            Pin::Tx => "TX",
            Pin::Rx => "RX",
            Pin::Rc => "RC",
        }
    }

    /// Settings file key.
    pub const fn key(self) -> &'static str {
        match self {
            Pin::Scl => "scl_config",
            Pin::Sda => "sda_config",
            Pin::Tx => "tx_config",
            Pin::Rx => "rx_config",
            Pin::Rc => "rc_config",
        }
    }

    /// Pin whose settings file key is `key`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Role assigned to a control pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// Whatever the pin does in the active control mode.
    #[default]
    Default,
    /// General purpose output driven over the command interface.
    UserIo,
    /// General purpose input.
    UserInput,
    /// Power for an analog potentiometer.
    PotPower,
    /// Serial or I2C signal.
    Serial,
    /// RC pulse input.
    Rc,
    /// Quadrature encoder input.
    Encoder,
    /// Kill switch.
    KillSwitch,
    /// Forward limit switch.
    LimitForward,
    /// Reverse limit switch.
    LimitReverse,
    /// Homing switch.
    Home,
}

impl PinFunction {
    /// Every function, in file-name order.
    pub const ALL: [PinFunction; 11] = [
        PinFunction::Default,
        PinFunction::UserIo,
        PinFunction::UserInput,
        PinFunction::PotPower,
        PinFunction::Serial,
        PinFunction::Rc,
        PinFunction::Encoder,
        PinFunction::KillSwitch,
        PinFunction::LimitForward,
        PinFunction::LimitReverse,
        PinFunction::Home,
    ];

    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            PinFunction::Default => "default",
            PinFunction::UserIo => "user_io",
            PinFunction::UserInput => "user_input",
            PinFunction::PotPower => "pot_power",
            PinFunction::Serial => "serial",
            PinFunction::Rc => "rc",
            PinFunction::Encoder => "encoder",
            PinFunction::KillSwitch => "kill_switch",
            PinFunction::LimitForward => "limit_forward",
            PinFunction::LimitReverse => "limit_reverse",
            PinFunction::Home => "home",
        }
    }

    /// Function named `name`, if there is one.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Modifier flag on a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFlag {
    /// Enable the internal pull-up.
    Pullup,
    /// Take analog readings.
    Analog,
    /// Treat a high level as active.
    ActiveHigh,
}

impl PinFlag {
    /// All flags, in file order.
    pub const ALL: [PinFlag; 3] = [PinFlag::Pullup, PinFlag::Analog, PinFlag::ActiveHigh];

    /// Name used in settings files.
    pub const fn name(self) -> &'static str {
        match self {
            PinFlag::Pullup => "pullup",
            PinFlag::Analog => "analog",
            PinFlag::ActiveHigh => "active_high",
        }
    }

    /// Flag named `name`, if there is one.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Set of [`PinFlag`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinFlags {
    /// Internal pull-up enabled.
    pub pullup: bool,
    /// Analog readings enabled.
    pub analog: bool,
    /// High level is active.
    pub active_high: bool,
}

impl PinFlags {
    /// Whether `flag` is set.
    pub const fn get(&self, flag: PinFlag) -> bool {
        match flag {
            PinFlag::Pullup => self.pullup,
            PinFlag::Analog => self.analog,
            PinFlag::ActiveHigh => self.active_high,
        }
    }

    /// Set or clear `flag`.
    pub fn set(&mut self, flag: PinFlag, value: bool) {
        match flag {
            PinFlag::Pullup => self.pullup = value,
            PinFlag::Analog => self.analog = value,
            PinFlag::ActiveHigh => self.active_high = value,
        }
    }

    /// Flags that are set, in file order.
    pub fn iter(&self) -> impl Iterator<Item = PinFlag> + '_ {
        PinFlag::ALL.into_iter().filter(|&f| self.get(f))
    }
}

/// Function and flags of one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Assigned role.
    pub function: PinFunction,
    /// Modifier flags.
    pub flags: PinFlags,
}

impl PinConfig {
    /// Config with the given function and no flags.
    pub const fn new(function: PinFunction) -> Self {
        Self {
            function,
            flags: PinFlags {
                pullup: false,
                analog: false,
                active_high: false,
            },
        }
    }

    /// Builder-style flag setter.
    pub fn with(mut self, flag: PinFlag) -> Self {
        self.flags.set(flag, true);
        self
    }

    /// Parse a space-separated pin config such as `"user_input pullup active_high"`.
    ///
    /// At most one word may name a function; the function defaults to
    /// [`PinFunction::Default`]. Returns `None` for unknown or repeated words.
    pub fn parse(text: &str) -> Option<Self> {
        let mut function = None;
        let mut flags = PinFlags::default();
        for word in text.split_whitespace() {
            if let Some(f) = PinFunction::from_name(word) {
                if function.replace(f).is_some() {
                    return None;
                }
            } else if let Some(flag) = PinFlag::from_name(word) {
                if flags.get(flag) {
                    return None;
                }
                flags.set(flag, true);
            } else {
                return None;
            }
        }
        Some(Self {
            function: function.unwrap_or_default(),
            flags,
        })
    }
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function.name())?;
        for flag in self.flags.iter() {
            write!(f, " {}", flag.name())?;
        }
        Ok(())
    }
}
