//! Unified error types for sysfs device access.
//!
//! Every fallible operation in the crate funnels into [`Error`].  Variants
//! carry the device instance name (`motor3`, `sensor0`) and the attribute
//! involved so a failure stored part-way through a fluent chain can still be
//! traced to the call that caused it.
//!
//! `Error` is `Clone`: the attribute primitives hand out a copy of a latched
//! error while leaving the original in place for the next result call.

use core::fmt;
use std::io;
use std::sync::Arc;

use crate::device::DeviceKind;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate returns this type.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The backing file is missing, unreadable or the device vanished.
    #[error("{device}: failed to {op} {attribute}: {source}")]
    Io {
        device: String,
        attribute: String,
        op: Op,
        #[source]
        source: Arc<io::Error>,
    },

    /// Attribute content does not match its expected encoding.
    #[error("{device}: failed to parse {attribute} from {value:?}: {reason}")]
    Parse {
        device: String,
        attribute: String,
        value: String,
        reason: String,
    },

    /// Content parsed but holds a token outside the known vocabulary.
    #[error("{device}: {message} {value:?} for {attribute}, valid values are {valid:?}")]
    InvalidValue {
        device: String,
        attribute: String,
        message: String,
        value: String,
        valid: Vec<String>,
    },

    /// The addressed device exists but is bound to a different driver.
    #[error(transparent)]
    DriverMismatch(#[from] DriverMismatch),

    /// Discovery exhausted every candidate.
    #[error("could not find {0}")]
    NotFound(Search),

    /// Discovery was asked to continue from a handle of another kind.
    #[error("device kinds do not match: {have:?} != {want:?}")]
    TypeMismatch { want: DeviceKind, have: DeviceKind },

    /// Discovery was asked for a kind addressed only by name.
    #[error("{0} devices are addressed by name and cannot be discovered")]
    NotDiscoverable(DeviceKind),
}

impl Error {
    pub(crate) fn io(device: &str, attribute: &str, op: Op, source: io::Error) -> Self {
        Self::Io {
            device: device.to_owned(),
            attribute: attribute.to_owned(),
            op,
            source: Arc::new(source),
        }
    }

    pub(crate) fn parse(
        device: &str,
        attribute: &str,
        value: &str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::Parse {
            device: device.to_owned(),
            attribute: attribute.to_owned(),
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// Returns the I/O error kind when this is an [`Error::Io`].
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// The filesystem operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read,
    Write,
    List,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::List => write!(f, "list"),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Returned when a device is found that does not carry the requested driver.
///
/// Binding by port treats this as non-fatal: the handle is still bound and
/// the mismatch is reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mismatched driver names: want {want:?} but have {have:?}")]
pub struct DriverMismatch {
    /// The requested driver name.
    pub want: String,
    /// The driver present on the device.
    pub have: String,
}

/// The criteria of a discovery that found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Search {
    /// First device with a driver.
    Driver { driver: String },
    /// Next device with a driver after a cursor instance.
    DriverAfter { driver: String, after: String },
    /// Device at a port address.
    Port { port: String, driver: Option<String> },
}

impl fmt::Display for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver { driver } => write!(f, "device for driver {driver:?}"),
            Self::DriverAfter { driver, after } => {
                write!(f, "device for driver {driver:?} after {after}")
            }
            Self::Port { port, driver: None } => write!(f, "device on port {port}"),
            Self::Port {
                port,
                driver: Some(driver),
            } => write!(f, "device for driver {driver:?} on port {port}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
