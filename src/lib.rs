//! Low level access to ev3dev motor, sensor, port, LED and power supply
//! drivers through sysfs.
//!
//! Each device type splits its methods into *actions*, which change robot
//! state and return the device so calls can be chained, and *results*,
//! which read state and return a [`Result`].  Errors are sticky for
//! actions: the first failing action suppresses every later one and is
//! returned, once, by the next result call.
//!
//! ```no_run
//! use std::time::Duration;
//! use ev3sys::prelude::*;
//!
//! # fn main() -> ev3sys::Result<()> {
//! let sysfs = Sysfs::system();
//! let (motor, _) = TachoMotor::for_port(&sysfs, "ev3-ports:outA", "lego-ev3-l-motor")?;
//! motor
//!     .set_speed_sp(300)
//!     .set_time_sp(Duration::from_secs(2))
//!     .command("run-timed");
//! let pos = motor.position()?; // surfaces any error from the chain
//! let done = wait(&motor, Condition::all(MotorState::RUNNING, MotorState::empty()), None)?;
//! # let _ = (pos, done);
//! # Ok(())
//! # }
//! ```

#![deny(unused_must_use)]

pub mod attr;
pub mod config;
pub mod device;
pub mod devices;
pub mod discovery;
pub mod state;
pub mod wait;

mod error;

pub use config::{ReadinessPolicy, Sysfs, SysfsConfig};
pub use error::{DriverMismatch, Error, Op, Result, Search};
pub use state::{MotorState, Polarity};

/// Everything needed to drive devices, including the method traits.
pub mod prelude {
    pub use crate::config::{Sysfs, SysfsConfig};
    pub use crate::device::{Device, StateDevice, address_of, driver_of, is_connected};
    pub use crate::devices::led::Led;
    pub use crate::devices::motor::{
        DcMotor, LinearActuator, MotorControl, Pid, TachoControl, TachoMotor,
    };
    pub use crate::devices::port::LegoPort;
    pub use crate::devices::power_supply::PowerSupply;
    pub use crate::devices::sensor::Sensor;
    pub use crate::devices::servo::ServoMotor;
    pub use crate::discovery::{bind_to_port, find_after};
    pub use crate::error::{DriverMismatch, Error, Result};
    pub use crate::state::{MotorState, Polarity};
    pub use crate::wait::{Condition, WaitOutcome, wait};
}
