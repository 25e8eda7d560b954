//! Hobby servo motors.

use std::time::Duration;

use crate::attr;
use crate::device::{DeviceKind, StateDevice};
use crate::devices::{device_type, get, set, set_duration};
use crate::error::{Error, Result};
use crate::state::Polarity;

/// Commands accepted by servo drivers, which do not publish a `commands`
/// attribute.
pub const SERVO_COMMANDS: [&str; 2] = ["float", "run"];

device_type!(
    /// A handle to a servo motor.
    ServoMotor,
    DeviceKind::ServoMotor
);

impl StateDevice for ServoMotor {}

impl ServoMotor {
    /// Issue `command`, one of [`SERVO_COMMANDS`].
    pub fn command(&self, command: &str) -> &Self {
        self.handle.act(|h| {
            if !SERVO_COMMANDS.contains(&command) {
                return Err(Error::InvalidValue {
                    device: h.instance_name(),
                    attribute: attr::COMMAND.to_owned(),
                    message: "invalid command".to_owned(),
                    value: command.to_owned(),
                    valid: SERVO_COMMANDS.iter().map(|c| (*c).to_owned()).collect(),
                });
            }
            attr::write_attribute(h, attr::COMMAND, command)
        });
        self
    }

    /// Pulse width, in microseconds, commanding full travel one way.
    pub fn max_pulse_sp(&self) -> Result<i32> {
        get(&self.handle, attr::MAX_PULSE_SETPOINT)?.int()
    }

    pub fn set_max_pulse_sp(&self, us: i32) -> &Self {
        set(&self.handle, attr::MAX_PULSE_SETPOINT, us);
        self
    }

    /// Pulse width, in microseconds, commanding the centre position.
    pub fn mid_pulse_sp(&self) -> Result<i32> {
        get(&self.handle, attr::MID_PULSE_SETPOINT)?.int()
    }

    pub fn set_mid_pulse_sp(&self, us: i32) -> &Self {
        set(&self.handle, attr::MID_PULSE_SETPOINT, us);
        self
    }

    /// Pulse width, in microseconds, commanding full travel the other way.
    pub fn min_pulse_sp(&self) -> Result<i32> {
        get(&self.handle, attr::MIN_PULSE_SETPOINT)?.int()
    }

    pub fn set_min_pulse_sp(&self, us: i32) -> &Self {
        set(&self.handle, attr::MIN_PULSE_SETPOINT, us);
        self
    }

    pub fn polarity(&self) -> Result<Polarity> {
        get(&self.handle, attr::POLARITY)?.polarity()
    }

    pub fn set_polarity(&self, p: Polarity) -> &Self {
        set(&self.handle, attr::POLARITY, p);
        self
    }

    /// Target position as a percentage of travel, -100 to 100.
    pub fn position_sp(&self) -> Result<i32> {
        get(&self.handle, attr::POSITION_SETPOINT)?.int()
    }

    pub fn set_position_sp(&self, sp: i32) -> &Self {
        set(&self.handle, attr::POSITION_SETPOINT, sp);
        self
    }

    /// Time to travel from the centre to either end.
    pub fn rate_sp(&self) -> Result<Duration> {
        get(&self.handle, attr::RATE_SETPOINT)?.duration()
    }

    pub fn set_rate_sp(&self, d: Duration) -> &Self {
        set_duration(&self.handle, attr::RATE_SETPOINT, d);
        self
    }
}
