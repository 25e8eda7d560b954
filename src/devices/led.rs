//! LEDs under the kernel `leds` class.

use std::time::Duration;

use crate::attr::{self, Value};
use crate::device::DeviceKind;
use crate::devices::{get, named_device_type, set, set_duration};
use crate::error::{Error, Result};

named_device_type!(
    /// A handle to an LED, e.g. `led0:green:brick-status`.
    Led,
    DeviceKind::Led
);

impl Led {
    pub fn brightness(&self) -> Result<i32> {
        get(&self.handle, attr::BRIGHTNESS)?.int()
    }

    /// Set the brightness, 0 to [`max_brightness`](Self::max_brightness).
    pub fn set_brightness(&self, level: i32) -> &Self {
        set(&self.handle, attr::BRIGHTNESS, level);
        self
    }

    pub fn max_brightness(&self) -> Result<i32> {
        get(&self.handle, attr::MAX_BRIGHTNESS)?.int()
    }

    /// Every trigger the LED accepts.
    pub fn triggers(&self) -> Result<Vec<String>> {
        let value = get(&self.handle, attr::TRIGGER)?;
        Ok(Triggers::parse(&value)?.all)
    }

    /// The active trigger, shown in brackets by the kernel.
    pub fn trigger(&self) -> Result<String> {
        let value = get(&self.handle, attr::TRIGGER)?;
        Ok(Triggers::parse(&value)?.active)
    }

    /// Select `trigger`; it must be one of [`triggers`](Self::triggers).
    pub fn set_trigger(&self, trigger: &str) -> &Self {
        self.handle.act(|h| {
            let value = attr::read_attribute(h, attr::TRIGGER)?;
            let mut valid = Triggers::parse(&value)?.all;
            if !valid.iter().any(|t| t == trigger) {
                valid.sort();
                return Err(Error::InvalidValue {
                    device: h.instance_name(),
                    attribute: attr::TRIGGER.to_owned(),
                    message: "invalid trigger".to_owned(),
                    value: trigger.to_owned(),
                    valid,
                });
            }
            attr::write_attribute(h, attr::TRIGGER, trigger)
        });
        self
    }

    /// On time of the `timer` trigger.
    pub fn delay_on(&self) -> Result<Duration> {
        get(&self.handle, attr::DELAY_ON)?.duration()
    }

    pub fn set_delay_on(&self, d: Duration) -> &Self {
        set_duration(&self.handle, attr::DELAY_ON, d);
        self
    }

    /// Off time of the `timer` trigger.
    pub fn delay_off(&self) -> Result<Duration> {
        get(&self.handle, attr::DELAY_OFF)?.duration()
    }

    pub fn set_delay_off(&self, d: Duration) -> &Self {
        set_duration(&self.handle, attr::DELAY_OFF, d);
        self
    }

    /// Switch the LED off and detach any trigger.
    pub fn off(&self) -> &Self {
        set(&self.handle, attr::BRIGHTNESS, 0);
        self
    }
}

/// Decoded `trigger` attribute: `none [timer] heartbeat`.
#[derive(Debug, PartialEq, Eq)]
struct Triggers {
    all: Vec<String>,
    active: String,
}

impl Triggers {
    fn parse(value: &Value) -> Result<Self> {
        let mut all = Vec::new();
        let mut active = None;
        for token in value.as_str().split_whitespace() {
            match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                Some(selected) => {
                    active = Some(selected.to_owned());
                    all.push(selected.to_owned());
                }
                None => all.push(token.to_owned()),
            }
        }
        match active {
            Some(active) => Ok(Self { all, active }),
            None => Err(Error::parse(
                value.device(),
                attr::TRIGGER,
                value.as_str(),
                "no trigger selected",
            )),
        }
    }
}
