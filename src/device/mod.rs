//! The device abstraction every handle type implements.

pub mod handle;
pub mod kind;

use std::io;
use std::path::Path;

pub use handle::{Handle, Latch};
pub use kind::{DeviceClass, DeviceKind};

use crate::attr;
use crate::error::{Error, Op, Result};
use crate::state::MotorState;

/// An ev3dev sysfs device.
pub trait Device {
    /// The shared identity and latch of the device.
    fn handle(&self) -> &Handle;

    /// Class directory for the device kind.
    fn path(&self) -> &Path {
        self.handle().path()
    }

    fn kind(&self) -> DeviceKind {
        self.handle().kind()
    }

    fn class(&self) -> DeviceClass {
        self.handle().class()
    }

    /// Instance directory name, e.g. `sensor1`.
    fn instance_name(&self) -> String {
        self.handle().instance_name()
    }

    /// Return and clear the error state of the device.
    fn take_error(&self) -> Option<Error> {
        self.handle().take_error()
    }
}

/// A device that reports a [`MotorState`] through its `state` attribute.
pub trait StateDevice: Device {
    fn state(&self) -> Result<MotorState> {
        self.handle()
            .result(|h| attr::read_attribute(h, attr::STATE)?.state())
    }
}

/// Whether the instance directory of `dev` exists.
pub fn is_connected(dev: &(impl Device + ?Sized)) -> Result<bool> {
    let path = dev.handle().instance_path();
    match std::fs::metadata(&path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(Error::io(
            &dev.instance_name(),
            &path.display().to_string(),
            Op::Read,
            err,
        )),
    }
}

/// The port address of `dev`, bypassing the latch.
pub fn address_of(dev: &(impl Device + ?Sized)) -> Result<String> {
    attr::read_unlatched(dev.handle(), attr::ADDRESS).map(attr::Value::into_string)
}

/// The driver name of `dev`, bypassing the latch.
pub fn driver_of(dev: &(impl Device + ?Sized)) -> Result<String> {
    attr::read_unlatched(dev.handle(), attr::DRIVER_NAME).map(attr::Value::into_string)
}
