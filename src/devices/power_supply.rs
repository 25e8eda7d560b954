//! Power supplies, such as the EV3 battery.
//!
//! The kernel reports voltages in microvolts and currents in microamps;
//! the accessors here convert to volts and amps.

use std::collections::HashMap;

use crate::attr::{self, Value};
use crate::config::Sysfs;
use crate::device::{DeviceKind, Handle};
use crate::devices::{get, named_device_type};
use crate::error::Result;

/// Directory name of the EV3 brick battery.
pub const EV3_BATTERY: &str = "legoev3-battery";

named_device_type!(
    /// A handle to a power supply.  Every attribute is read-only.
    PowerSupply,
    DeviceKind::PowerSupply
);

impl PowerSupply {
    /// The EV3 brick battery.
    pub fn battery(sysfs: &Sysfs) -> Self {
        Self::new(sysfs, EV3_BATTERY)
    }

    /// Present voltage in volts.
    pub fn voltage(&self) -> Result<f64> {
        self.handle.result(|h| micro(h, attr::VOLTAGE_NOW))
    }

    /// Present current draw in amps.
    pub fn current(&self) -> Result<f64> {
        self.handle.result(|h| micro(h, attr::CURRENT_NOW))
    }

    pub fn voltage_max_design(&self) -> Result<f64> {
        self.handle.result(|h| micro(h, attr::VOLTAGE_MAX_DESIGN))
    }

    pub fn voltage_min_design(&self) -> Result<f64> {
        self.handle.result(|h| micro(h, attr::VOLTAGE_MIN_DESIGN))
    }

    /// Battery chemistry, e.g. `Li-ion`.
    pub fn technology(&self) -> Result<String> {
        get(&self.handle, attr::TECHNOLOGY).map(Value::into_string)
    }

    /// Supply type, e.g. `Battery`.
    pub fn supply_type(&self) -> Result<String> {
        get(&self.handle, attr::SUPPLY_TYPE).map(Value::into_string)
    }

    pub fn uevent(&self) -> Result<HashMap<String, String>> {
        get(&self.handle, attr::UEVENT)?.uevent()
    }
}

fn micro(h: &Handle, name: &str) -> Result<f64> {
    let raw: i64 = attr::read_attribute(h, name)?.parse()?;
    Ok(raw as f64 / 1e6)
}
