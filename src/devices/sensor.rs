//! LEGO sensors.

use std::collections::HashMap;
use std::time::Duration;

use crate::attr::{self, Value};
use crate::device::{DeviceKind, Handle};
use crate::devices::{device_type, get, set, set_duration, set_listed};
use crate::error::{Error, Result};

device_type!(
    /// A handle to a LEGO sensor.
    Sensor,
    DeviceKind::Sensor
);

impl Sensor {
    pub fn commands(&self) -> Result<Vec<String>> {
        get(&self.handle, attr::COMMANDS).map(|v| v.list())
    }

    /// Issue `command`; it must be one of [`commands`](Self::commands).
    pub fn command(&self, command: &str) -> &Self {
        set_listed(&self.handle, attr::COMMAND, attr::COMMANDS, command);
        self
    }

    /// Number of decimal places in the `valueN` attributes.
    pub fn decimals(&self) -> Result<i32> {
        get(&self.handle, attr::DECIMALS)?.int()
    }

    pub fn mode(&self) -> Result<String> {
        get(&self.handle, attr::MODE).map(Value::into_string)
    }

    pub fn set_mode(&self, mode: &str) -> &Self {
        set(&self.handle, attr::MODE, mode);
        self
    }

    pub fn modes(&self) -> Result<Vec<String>> {
        get(&self.handle, attr::MODES).map(|v| v.list())
    }

    /// Number of `valueN` attributes in the current mode.
    pub fn num_values(&self) -> Result<usize> {
        get(&self.handle, attr::NUM_VALUES)?.parse()
    }

    pub fn poll_rate(&self) -> Result<Duration> {
        get(&self.handle, attr::POLL_RATE)?.duration()
    }

    pub fn set_poll_rate(&self, d: Duration) -> &Self {
        set_duration(&self.handle, attr::POLL_RATE, d);
        self
    }

    pub fn units(&self) -> Result<String> {
        get(&self.handle, attr::UNITS).map(Value::into_string)
    }

    /// Raw text of `value{n}`.  `n` must be below [`num_values`](Self::num_values).
    pub fn value(&self, n: usize) -> Result<String> {
        self.handle
            .result(|h| read_value(h, n))
            .map(Value::into_string)
    }

    /// `value{n}` scaled by [`decimals`](Self::decimals).
    pub fn float_value(&self, n: usize) -> Result<f64> {
        self.handle.result(|h| {
            let raw = read_value(h, n)?.float()?;
            let decimals = attr::read_attribute(h, attr::DECIMALS)?.int()?;
            Ok(raw / 10f64.powi(decimals))
        })
    }

    pub fn text_values(&self) -> Result<Vec<String>> {
        get(&self.handle, attr::TEXT_VALUES).map(|v| v.list())
    }

    pub fn bin_data_format(&self) -> Result<String> {
        get(&self.handle, attr::BIN_DATA_FORMAT).map(Value::into_string)
    }

    /// Raw value bytes laid out as [`bin_data_format`](Self::bin_data_format)
    /// describes.  Not newline-trimmed.
    pub fn bin_data(&self) -> Result<Vec<u8>> {
        self.handle.result(|h| attr::read_raw(h, attr::BIN_DATA))
    }

    /// Bytes read straight from the sensor, for drivers that expose
    /// `direct`.
    pub fn direct(&self) -> Result<Vec<u8>> {
        self.handle.result(|h| attr::read_raw(h, attr::DIRECT))
    }

    /// Send `bytes` straight to the sensor.
    pub fn set_direct(&self, bytes: &[u8]) -> &Self {
        self.handle.act(|h| attr::write_raw(h, attr::DIRECT, bytes));
        self
    }

    pub fn uevent(&self) -> Result<HashMap<String, String>> {
        get(&self.handle, attr::UEVENT)?.uevent()
    }
}

fn read_value(h: &Handle, n: usize) -> Result<Value> {
    let count: usize = attr::read_attribute(h, attr::NUM_VALUES)?.parse()?;
    if n >= count {
        return Err(Error::InvalidValue {
            device: h.instance_name(),
            attribute: attr::VALUE.to_owned(),
            message: "invalid value index".to_owned(),
            value: n.to_string(),
            valid: (0..count).map(|i| i.to_string()).collect(),
        });
    }
    attr::read_attribute(h, &format!("{}{n}", attr::VALUE))
}
