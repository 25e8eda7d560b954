//! Closed set of device kinds and their sysfs classes.

use core::fmt;

/// The instance-name prefix family a device belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Linear,
    Motor,
    Port,
    Sensor,
    PowerSupply,
    Led,
}

impl DeviceClass {
    /// Prefix of instance directory names, e.g. `motor` in `motor3`.  The
    /// named classes have no numbered instances; their prefix only labels
    /// errors.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Motor => "motor",
            Self::Port => "port",
            Self::Sensor => "sensor",
            Self::PowerSupply => "power_supply",
            Self::Led => "led",
        }
    }

    /// Whether instances are addressed by their full directory name rather
    /// than `<prefix><id>`.
    pub const fn is_named(self) -> bool {
        matches!(self, Self::PowerSupply | Self::Led)
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Concrete device handle kinds.  Discovery across handles requires equal
/// kinds, not merely equal classes: a tacho motor cursor cannot continue a
/// servo motor search even though both are `motor` instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    TachoMotor,
    LinearActuator,
    ServoMotor,
    DcMotor,
    Sensor,
    LegoPort,
    PowerSupply,
    Led,
}

impl DeviceKind {
    pub const ALL: [Self; 8] = [
        Self::TachoMotor,
        Self::LinearActuator,
        Self::ServoMotor,
        Self::DcMotor,
        Self::Sensor,
        Self::LegoPort,
        Self::PowerSupply,
        Self::Led,
    ];

    pub const fn class(self) -> DeviceClass {
        match self {
            Self::LinearActuator => DeviceClass::Linear,
            Self::TachoMotor | Self::ServoMotor | Self::DcMotor => DeviceClass::Motor,
            Self::Sensor => DeviceClass::Sensor,
            Self::LegoPort => DeviceClass::Port,
            Self::PowerSupply => DeviceClass::PowerSupply,
            Self::Led => DeviceClass::Led,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TachoMotor => "tacho motor",
            Self::LinearActuator => "linear actuator",
            Self::ServoMotor => "servo motor",
            Self::DcMotor => "dc motor",
            Self::Sensor => "sensor",
            Self::LegoPort => "lego port",
            Self::PowerSupply => "power supply",
            Self::Led => "led",
        };
        f.write_str(name)
    }
}
