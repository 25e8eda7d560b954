//! Typed device wrappers built on the attribute primitives.
//!
//! | Type             | Class dir      | Prefix   | `wait`-able |
//! |------------------|----------------|----------|-------------|
//! | `TachoMotor`     | tacho-motor    | `motor`  | yes         |
//! | `LinearActuator` | tacho-motor    | `linear` | yes         |
//! | `DcMotor`        | dc-motor       | `motor`  | yes         |
//! | `ServoMotor`     | servo-motor    | `motor`  | yes         |
//! | `Sensor`         | lego-sensor    | `sensor` | no          |
//! | `LegoPort`       | lego-port      | `port`   | no          |
//! | `PowerSupply`    | power_supply   | by name  | no          |
//! | `Led`            | leds           | by name  | no          |
//!
//! Setters are actions (`&self -> &Self`) and getters are results.  Power
//! supplies and LEDs have no numbered instances and are not discoverable;
//! they are opened by directory name.

pub mod led;
pub mod motor;
pub mod port;
pub mod power_supply;
pub mod sensor;
pub mod servo;

use std::fmt::Display;
use std::time::Duration;

use crate::attr::{self, Value};
use crate::device::Handle;
use crate::error::{Error, Result};

/// Declares a device type wrapping a [`Handle`] together with its
/// constructors and [`Device`](crate::device::Device) impl.
macro_rules! device_type {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            handle: $crate::device::Handle,
        }

        impl $name {
            /// An unbound handle; bind it with discovery.
            pub fn new(sysfs: &$crate::config::Sysfs) -> Self {
                Self {
                    handle: $crate::device::Handle::new(sysfs, $kind, None),
                }
            }

            /// A handle for a known instance id.
            pub fn with_id(sysfs: &$crate::config::Sysfs, id: u32) -> Self {
                Self {
                    handle: $crate::device::Handle::new(sysfs, $kind, Some(id)),
                }
            }

            /// The first device driven by `driver`.
            pub fn first(sysfs: &$crate::config::Sysfs, driver: &str) -> $crate::error::Result<Self> {
                let dev = Self::new(sysfs);
                $crate::discovery::find_after(None, &dev, driver)?;
                Ok(dev)
            }

            /// The next device after this one driven by `driver`.
            pub fn next(&self, driver: &str) -> $crate::error::Result<Self> {
                let dev = Self::new(self.handle.sysfs());
                $crate::discovery::find_after(
                    Some(self as &dyn $crate::device::Device),
                    &dev,
                    driver,
                )?;
                Ok(dev)
            }

            /// The device on `port`.  A driver other than `driver` still
            /// yields a bound handle, with the mismatch reported.
            pub fn for_port(
                sysfs: &$crate::config::Sysfs,
                port: &str,
                driver: &str,
            ) -> $crate::error::Result<(Self, Option<$crate::error::DriverMismatch>)> {
                let dev = Self::new(sysfs);
                let binding = $crate::discovery::bind_to_port(&dev, port, driver)?;
                Ok((dev, binding.mismatch))
            }

            pub fn address(&self) -> $crate::error::Result<String> {
                $crate::devices::get(&self.handle, $crate::attr::ADDRESS).map($crate::attr::Value::into_string)
            }

            pub fn driver(&self) -> $crate::error::Result<String> {
                $crate::devices::get(&self.handle, $crate::attr::DRIVER_NAME).map($crate::attr::Value::into_string)
            }
        }

        impl $crate::device::Device for $name {
            fn handle(&self) -> &$crate::device::Handle {
                &self.handle
            }
        }
    };
}

pub(crate) use device_type;

/// Declares a device type addressed by its instance directory name.
macro_rules! named_device_type {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            handle: $crate::device::Handle,
        }

        impl $name {
            /// The instance in directory `name` of the class.
            pub fn new(sysfs: &$crate::config::Sysfs, name: &str) -> Self {
                Self {
                    handle: $crate::device::Handle::named(sysfs, $kind, name),
                }
            }
        }

        impl $crate::device::Device for $name {
            fn handle(&self) -> &$crate::device::Handle {
                &self.handle
            }
        }
    };
}

pub(crate) use named_device_type;

/// Result read of one attribute.
pub(crate) fn get(handle: &Handle, name: &str) -> Result<Value> {
    handle.result(|h| attr::read_attribute(h, name))
}

/// Action write of one attribute.
pub(crate) fn set(handle: &Handle, name: &str, value: impl Display) {
    handle.act(|h| attr::write_attribute(h, name, &value.to_string()));
}

/// Action write of a millisecond attribute.
pub(crate) fn set_duration(handle: &Handle, name: &str, d: Duration) {
    set(handle, name, d.as_millis());
}

/// Action write of `value` after checking it against the list attribute
/// `allowed`.  An unlisted value is latched as an invalid-value error.
pub(crate) fn set_listed(handle: &Handle, name: &str, allowed: &str, value: &str) {
    handle.act(|h| {
        let valid = attr::read_attribute(h, allowed)?.list();
        if !valid.iter().any(|v| v == value) {
            let mut valid = valid;
            valid.sort();
            return Err(Error::InvalidValue {
                device: h.instance_name(),
                attribute: name.to_owned(),
                message: format!("invalid {name}"),
                value: value.to_owned(),
                valid,
            });
        }
        attr::write_attribute(h, name, value)
    });
}
