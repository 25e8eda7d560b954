//! Tacho motors, linear actuators and DC motors.
//!
//! The attributes shared by all three live on [`MotorControl`]; the
//! encoder-backed ones shared by tacho motors and linear actuators live on
//! [`TachoControl`].

use std::collections::HashMap;
use std::time::Duration;

use crate::attr;
use crate::device::{DeviceKind, Handle, StateDevice};
use crate::devices::{device_type, get, set, set_duration, set_listed};
use crate::error::Result;
use crate::state::Polarity;

/// Proportional, integral and derivative gains of a motor controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pid {
    pub kp: i32,
    pub ki: i32,
    pub kd: i32,
}

/// `Kp`, `Ki` and `Kd` attribute paths of one controller.
type PidAttrs = [&'static str; 3];

const HOLD_PID: PidAttrs = [attr::HOLD_PID_KP, attr::HOLD_PID_KI, attr::HOLD_PID_KD];
const SPEED_PID: PidAttrs = [attr::SPEED_PID_KP, attr::SPEED_PID_KI, attr::SPEED_PID_KD];

fn read_pid(h: &Handle, [kp, ki, kd]: PidAttrs) -> Result<Pid> {
    Ok(Pid {
        kp: attr::read_attribute(h, kp)?.int()?,
        ki: attr::read_attribute(h, ki)?.int()?,
        kd: attr::read_attribute(h, kd)?.int()?,
    })
}

fn write_pid(h: &Handle, [kp, ki, kd]: PidAttrs, pid: Pid) -> Result<()> {
    attr::write_attribute(h, kp, &pid.kp.to_string())?;
    attr::write_attribute(h, ki, &pid.ki.to_string())?;
    attr::write_attribute(h, kd, &pid.kd.to_string())
}

/// Attributes common to every run-commanded motor.
pub trait MotorControl: StateDevice {
    /// Commands the driver accepts.
    fn commands(&self) -> Result<Vec<String>> {
        get(self.handle(), attr::COMMANDS).map(|v| v.list())
    }

    /// Issue `command`; it must be one of [`commands`](Self::commands).
    fn command(&self, command: &str) -> &Self {
        set_listed(self.handle(), attr::COMMAND, attr::COMMANDS, command);
        self
    }

    fn duty_cycle(&self) -> Result<i32> {
        get(self.handle(), attr::DUTY_CYCLE)?.int()
    }

    fn duty_cycle_sp(&self) -> Result<i32> {
        get(self.handle(), attr::DUTY_CYCLE_SETPOINT)?.int()
    }

    fn set_duty_cycle_sp(&self, sp: i32) -> &Self {
        set(self.handle(), attr::DUTY_CYCLE_SETPOINT, sp);
        self
    }

    fn polarity(&self) -> Result<Polarity> {
        get(self.handle(), attr::POLARITY)?.polarity()
    }

    fn set_polarity(&self, p: Polarity) -> &Self {
        set(self.handle(), attr::POLARITY, p);
        self
    }

    fn ramp_up_sp(&self) -> Result<Duration> {
        get(self.handle(), attr::RAMP_UP_SETPOINT)?.duration()
    }

    fn set_ramp_up_sp(&self, d: Duration) -> &Self {
        set_duration(self.handle(), attr::RAMP_UP_SETPOINT, d);
        self
    }

    fn ramp_down_sp(&self) -> Result<Duration> {
        get(self.handle(), attr::RAMP_DOWN_SETPOINT)?.duration()
    }

    fn set_ramp_down_sp(&self, d: Duration) -> &Self {
        set_duration(self.handle(), attr::RAMP_DOWN_SETPOINT, d);
        self
    }

    fn time_sp(&self) -> Result<Duration> {
        get(self.handle(), attr::TIME_SETPOINT)?.duration()
    }

    fn set_time_sp(&self, d: Duration) -> &Self {
        set_duration(self.handle(), attr::TIME_SETPOINT, d);
        self
    }

    fn stop_action(&self) -> Result<String> {
        get(self.handle(), attr::STOP_ACTION).map(attr::Value::into_string)
    }

    /// Select `action`; it must be one of [`stop_actions`](Self::stop_actions).
    fn set_stop_action(&self, action: &str) -> &Self {
        set_listed(self.handle(), attr::STOP_ACTION, attr::STOP_ACTIONS, action);
        self
    }

    fn stop_actions(&self) -> Result<Vec<String>> {
        get(self.handle(), attr::STOP_ACTIONS).map(|v| v.list())
    }
}

/// Encoder-backed motor attributes.
pub trait TachoControl: MotorControl {
    fn position(&self) -> Result<i32> {
        get(self.handle(), attr::POSITION)?.int()
    }

    fn set_position(&self, pos: i32) -> &Self {
        set(self.handle(), attr::POSITION, pos);
        self
    }

    fn position_sp(&self) -> Result<i32> {
        get(self.handle(), attr::POSITION_SETPOINT)?.int()
    }

    fn set_position_sp(&self, sp: i32) -> &Self {
        set(self.handle(), attr::POSITION_SETPOINT, sp);
        self
    }

    fn speed(&self) -> Result<i32> {
        get(self.handle(), attr::SPEED)?.int()
    }

    fn max_speed(&self) -> Result<i32> {
        get(self.handle(), attr::MAX_SPEED)?.int()
    }

    fn speed_sp(&self) -> Result<i32> {
        get(self.handle(), attr::SPEED_SETPOINT)?.int()
    }

    fn set_speed_sp(&self, sp: i32) -> &Self {
        set(self.handle(), attr::SPEED_SETPOINT, sp);
        self
    }

    /// Gains of the controller holding position after a stop.
    fn hold_pid(&self) -> Result<Pid> {
        self.handle().result(|h| read_pid(h, HOLD_PID))
    }

    fn set_hold_pid(&self, pid: Pid) -> &Self {
        self.handle().act(|h| write_pid(h, HOLD_PID, pid));
        self
    }

    /// Gains of the speed regulation controller.
    fn speed_pid(&self) -> Result<Pid> {
        self.handle().result(|h| read_pid(h, SPEED_PID))
    }

    fn set_speed_pid(&self, pid: Pid) -> &Self {
        self.handle().act(|h| write_pid(h, SPEED_PID, pid));
        self
    }

    fn uevent(&self) -> Result<HashMap<String, String>> {
        get(self.handle(), attr::UEVENT)?.uevent()
    }
}

device_type!(
    /// A handle to a tacho motor.
    TachoMotor,
    DeviceKind::TachoMotor
);

impl StateDevice for TachoMotor {}
impl MotorControl for TachoMotor {}
impl TachoControl for TachoMotor {}

impl TachoMotor {
    /// Encoder counts per rotation.
    pub fn count_per_rot(&self) -> Result<i32> {
        get(&self.handle, attr::COUNT_PER_ROT)?.int()
    }
}

device_type!(
    /// A handle to a linear actuator, a tacho motor reporting in metres.
    LinearActuator,
    DeviceKind::LinearActuator
);

impl StateDevice for LinearActuator {}
impl MotorControl for LinearActuator {}
impl TachoControl for LinearActuator {}

impl LinearActuator {
    /// Encoder counts per metre of travel.
    pub fn count_per_m(&self) -> Result<i32> {
        get(&self.handle, attr::COUNT_PER_METER)?.int()
    }

    /// Encoder counts across the full travel.
    pub fn full_travel_count(&self) -> Result<i32> {
        get(&self.handle, attr::FULL_TRAVEL_COUNT)?.int()
    }
}

device_type!(
    /// A handle to an unregulated DC motor.
    DcMotor,
    DeviceKind::DcMotor
);

impl StateDevice for DcMotor {}
impl MotorControl for DcMotor {}
