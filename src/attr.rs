//! Attribute file access and typed decoding.
//!
//! An attribute is one file inside an instance directory.  Reads strip
//! exactly one trailing newline; writes send the text verbatim.  Nothing is
//! cached: every call opens, uses and closes the file.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use crate::device::Handle;
use crate::error::{Error, Op, Result};
use crate::state::{MotorState, Polarity, UnknownToken};

// ---------------------------------------------------------------------------
// Attribute names
// ---------------------------------------------------------------------------

pub const ADDRESS: &str = "address";
pub const BIN_DATA: &str = "bin_data";
pub const BIN_DATA_FORMAT: &str = "bin_data_format";
pub const BRIGHTNESS: &str = "brightness";
pub const COMMAND: &str = "command";
pub const COMMANDS: &str = "commands";
pub const COUNT_PER_METER: &str = "count_per_m";
pub const COUNT_PER_ROT: &str = "count_per_rot";
pub const CURRENT_NOW: &str = "current_now";
pub const DECIMALS: &str = "decimals";
pub const DELAY_OFF: &str = "delay_off";
pub const DELAY_ON: &str = "delay_on";
pub const DIRECT: &str = "direct";
pub const DRIVER_NAME: &str = "driver_name";
pub const DUTY_CYCLE: &str = "duty_cycle";
pub const DUTY_CYCLE_SETPOINT: &str = "duty_cycle_sp";
pub const FULL_TRAVEL_COUNT: &str = "full_travel_count";
pub const HOLD_PID_KD: &str = "hold_pid/Kd";
pub const HOLD_PID_KI: &str = "hold_pid/Ki";
pub const HOLD_PID_KP: &str = "hold_pid/Kp";
pub const MAX_BRIGHTNESS: &str = "max_brightness";
pub const MAX_PULSE_SETPOINT: &str = "max_pulse_sp";
pub const MAX_SPEED: &str = "max_speed";
pub const MID_PULSE_SETPOINT: &str = "mid_pulse_sp";
pub const MIN_PULSE_SETPOINT: &str = "min_pulse_sp";
pub const MODE: &str = "mode";
pub const MODES: &str = "modes";
pub const NUM_VALUES: &str = "num_values";
pub const POLARITY: &str = "polarity";
pub const POLL_RATE: &str = "poll_ms";
pub const POSITION: &str = "position";
pub const POSITION_SETPOINT: &str = "position_sp";
pub const RAMP_DOWN_SETPOINT: &str = "ramp_down_sp";
pub const RAMP_UP_SETPOINT: &str = "ramp_up_sp";
pub const RATE_SETPOINT: &str = "rate_sp";
pub const SET_DEVICE: &str = "set_device";
pub const SPEED: &str = "speed";
pub const SPEED_PID_KD: &str = "speed_pid/Kd";
pub const SPEED_PID_KI: &str = "speed_pid/Ki";
pub const SPEED_PID_KP: &str = "speed_pid/Kp";
pub const SPEED_SETPOINT: &str = "speed_sp";
pub const STATE: &str = "state";
pub const STATUS: &str = "status";
pub const STOP_ACTION: &str = "stop_action";
pub const STOP_ACTIONS: &str = "stop_actions";
pub const SUPPLY_TYPE: &str = "type";
pub const TECHNOLOGY: &str = "technology";
pub const TEXT_VALUES: &str = "text_values";
pub const TIME_SETPOINT: &str = "time_sp";
pub const TRIGGER: &str = "trigger";
pub const UEVENT: &str = "uevent";
pub const UNITS: &str = "units";
pub const VALUE: &str = "value";
pub const VOLTAGE_MAX_DESIGN: &str = "voltage_max_design";
pub const VOLTAGE_MIN_DESIGN: &str = "voltage_min_design";
pub const VOLTAGE_NOW: &str = "voltage_now";

// ---------------------------------------------------------------------------
// Raw access
// ---------------------------------------------------------------------------

/// Read `name` from the device behind `handle`.
///
/// A latched error is returned as a copy and left in place: draining the
/// latch is the job of the enclosing result call.
pub fn read_attribute(handle: &Handle, name: &str) -> Result<Value> {
    if let Some(err) = handle.latched() {
        return Err(err);
    }
    read_unlatched(handle, name)
}

/// Write `text` to `name` without appending a newline.
pub fn write_attribute(handle: &Handle, name: &str, text: &str) -> Result<()> {
    write_raw(handle, name, text.as_bytes())
}

/// Read the unmodified bytes of a binary attribute such as `bin_data`.
pub fn read_raw(handle: &Handle, name: &str) -> Result<Vec<u8>> {
    if let Some(err) = handle.latched() {
        return Err(err);
    }
    let device = handle.instance_name();
    let path = handle.path().join(&device).join(name);
    fs::read(&path).map_err(|err| Error::io(&device, name, Op::Read, err))
}

/// Write `bytes` to `name` as given.
pub fn write_raw(handle: &Handle, name: &str, bytes: &[u8]) -> Result<()> {
    if let Some(err) = handle.latched() {
        return Err(err);
    }
    let device = handle.instance_name();
    let path = handle.path().join(&device).join(name);
    let written = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&path)
        .and_then(|mut file| file.write_all(bytes));
    written.map_err(|err| Error::io(&device, name, Op::Write, err))
}

pub(crate) fn read_unlatched(handle: &Handle, name: &str) -> Result<Value> {
    let device = handle.instance_name();
    let path = handle.path().join(&device).join(name);
    let bytes = fs::read(&path).map_err(|err| Error::io(&device, name, Op::Read, err))?;
    Value::from_bytes(device, name, &bytes)
}

/// Strip exactly one trailing newline.
pub fn chomp(b: &[u8]) -> &[u8] {
    b.strip_suffix(b"\n").unwrap_or(b)
}

// ---------------------------------------------------------------------------
// Typed decoding
// ---------------------------------------------------------------------------

/// The chomped content of one attribute, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    device: String,
    attribute: String,
    data: String,
}

impl Value {
    pub fn new(device: impl Into<String>, attribute: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            attribute: attribute.into(),
            data: data.into(),
        }
    }

    pub(crate) fn from_bytes(device: String, attribute: &str, bytes: &[u8]) -> Result<Self> {
        let data = std::str::from_utf8(chomp(bytes)).map_err(|err| {
            Error::parse(&device, attribute, &String::from_utf8_lossy(bytes), err)
        })?;
        Ok(Self::new(device, attribute, data))
    }

    /// Instance the value was read from.
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn into_string(self) -> String {
        self.data
    }

    /// Strict numeric parse (integers and floats).
    pub fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.data.parse().map_err(|err| self.parse_error(err))
    }

    pub fn int(&self) -> Result<i32> {
        self.parse()
    }

    pub fn float(&self) -> Result<f64> {
        self.parse()
    }

    /// Milliseconds as a [`Duration`].
    pub fn duration(&self) -> Result<Duration> {
        let ms: i64 = self.parse()?;
        u64::try_from(ms)
            .map(Duration::from_millis)
            .map_err(|_| self.parse_error("negative duration"))
    }

    /// Space-separated tokens; empty content is an empty list.
    pub fn list(&self) -> Vec<String> {
        if self.data.is_empty() {
            return Vec::new();
        }
        self.data.split(' ').map(str::to_owned).collect()
    }

    pub fn state(&self) -> Result<MotorState> {
        MotorState::from_attribute(&self.data).map_err(|err| self.invalid(err))
    }

    pub fn polarity(&self) -> Result<Polarity> {
        self.data.parse().map_err(|err| self.invalid(err))
    }

    /// `KEY=VALUE` lines.
    pub fn uevent(&self) -> Result<HashMap<String, String>> {
        let mut record = HashMap::new();
        if self.data.is_empty() {
            return Ok(record);
        }
        for line in self.data.split('\n') {
            let mut parts = line.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => {
                    record.insert(key.to_owned(), value.to_owned());
                }
                _ => {
                    return Err(Error::parse(
                        &self.device,
                        &self.attribute,
                        line,
                        "expected exactly one '='",
                    ));
                }
            }
        }
        Ok(record)
    }

    fn parse_error(&self, reason: impl Display) -> Error {
        Error::parse(&self.device, &self.attribute, &self.data, reason)
    }

    fn invalid(&self, err: UnknownToken) -> Error {
        Error::InvalidValue {
            device: self.device.clone(),
            attribute: self.attribute.clone(),
            message: format!("unrecognized {}", err.what),
            value: err.token,
            valid: err.valid,
        }
    }
}
