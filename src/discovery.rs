//! Resolving a driver or port request to a concrete instance id.
//!
//! Instance directories are listed, filtered by class prefix and ordered by
//! their numeric id (`motor10` sorts after `motor2`).  Discovery returns its
//! errors directly; it is not part of the action/result chain.

use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::attr;
use crate::device::{Device, DeviceClass, Handle};
use crate::error::{DriverMismatch, Error, Op, Result, Search};

/// A port binding.  `mismatch` is set when the device at the port carries a
/// different driver than requested; the handle is bound regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub id: u32,
    pub mismatch: Option<DriverMismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IdDevice {
    id: u32,
    name: String,
}

/// Bind `dst` to the first device after `after` whose driver is `driver`.
/// With no cursor (or an unbound one) the first matching device is chosen.
///
/// `after` and `dst` must be of the same kind.  On error `dst` is untouched.
pub fn find_after(
    after: Option<&dyn Device>,
    dst: &dyn Device,
    driver: &str,
) -> Result<u32> {
    discoverable(dst)?;
    let cursor = match after {
        Some(after) if after.kind() != dst.kind() => {
            return Err(Error::TypeMismatch {
                want: dst.kind(),
                have: after.kind(),
            });
        }
        Some(after) => after.handle().id(),
        None => None,
    };

    let handle = dst.handle();
    for device in sorted_devices(handle)? {
        if cursor.is_some_and(|c| device.id <= c) {
            continue;
        }
        let have = match read_driver(handle, &device.name) {
            Ok(have) => have,
            Err(err) if err.io_kind() == Some(io::ErrorKind::NotFound) => {
                debug!("{}: vanished during scan, skipping", device.name);
                continue;
            }
            Err(err) => return Err(err),
        };
        if have == driver {
            debug!("{}: matched driver {driver:?}", device.name);
            handle.bind(device.id);
            return Ok(device.id);
        }
    }

    let search = match cursor {
        None => Search::Driver {
            driver: driver.to_owned(),
        },
        Some(after) => Search::DriverAfter {
            driver: driver.to_owned(),
            after: format!("{}{after}", handle.class().prefix()),
        },
    };
    Err(Error::NotFound(search))
}

/// Bind `dst` to the device at port address `port`.
///
/// A device whose address matches but whose driver differs is still bound;
/// the difference is reported in [`Binding::mismatch`].
pub fn bind_to_port(dst: &dyn Device, port: &str, driver: &str) -> Result<Binding> {
    discoverable(dst)?;
    let handle = dst.handle();
    let Some(device) = device_at(handle, port)? else {
        return Err(Error::NotFound(Search::Port {
            port: port.to_owned(),
            driver: Some(driver.to_owned()),
        }));
    };

    let have = read_driver(handle, &device.name)?;
    let mismatch = (have != driver).then(|| DriverMismatch {
        want: driver.to_owned(),
        have,
    });
    if let Some(m) = &mismatch {
        warn!("{}: bound on port {port} despite {m}", device.name);
    }
    handle.bind(device.id);
    Ok(Binding {
        id: device.id,
        mismatch,
    })
}

/// First instance, in id order, whose address is `port`.
pub(crate) fn id_at(handle: &Handle, port: &str) -> Result<Option<u32>> {
    Ok(device_at(handle, port)?.map(|d| d.id))
}

fn device_at(handle: &Handle, port: &str) -> Result<Option<IdDevice>> {
    for device in sorted_devices(handle)? {
        let address = read_named(handle, &device.name, attr::ADDRESS)?;
        if address == port {
            return Ok(Some(device));
        }
    }
    Ok(None)
}

fn discoverable(dst: &dyn Device) -> Result<()> {
    if dst.class().is_named() {
        return Err(Error::NotDiscoverable(dst.kind()));
    }
    Ok(())
}

fn sorted_devices(handle: &Handle) -> Result<Vec<IdDevice>> {
    let names = devices_in(handle.path()).map_err(|err| {
        Error::io(
            &handle.kind().to_string(),
            &handle.path().display().to_string(),
            Op::List,
            err,
        )
    })?;
    let devices = parse_ids(names, handle.class())?;
    debug!(
        "{}: {} candidate(s) in {}",
        handle.kind(),
        devices.len(),
        handle.path().display()
    );
    Ok(devices)
}

fn devices_in(path: &Path) -> io::Result<Vec<String>> {
    std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect()
}

fn parse_ids(names: Vec<String>, class: DeviceClass) -> Result<Vec<IdDevice>> {
    let prefix = class.prefix();
    let mut devices = Vec::with_capacity(names.len());
    for name in names {
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        let id = suffix
            .parse::<u32>()
            .map_err(|err| Error::parse(prefix, "device name", &name, err))?;
        devices.push(IdDevice { id, name });
    }
    devices.sort_by_key(|d| d.id);
    Ok(devices)
}

fn read_driver(handle: &Handle, instance: &str) -> Result<String> {
    read_named(handle, instance, attr::DRIVER_NAME)
}

fn read_named(handle: &Handle, instance: &str, name: &str) -> Result<String> {
    let path = handle.path().join(instance).join(name);
    let bytes = std::fs::read(&path).map_err(|err| Error::io(instance, name, Op::Read, err))?;
    Ok(String::from_utf8_lossy(attr::chomp(&bytes)).into_owned())
}
