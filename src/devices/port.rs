//! LEGO input/output ports.

use crate::attr::{self, Value};
use crate::config::Sysfs;
use crate::device::{DeviceKind, Handle};
use crate::devices::{device_type, get, set};
use crate::discovery;
use crate::error::{Error, Op, Result, Search};

device_type!(
    /// A handle to a lego-port.
    LegoPort,
    DeviceKind::LegoPort
);

impl LegoPort {
    /// The port whose address is `name`, e.g. `ev3-ports:in1` or `outA`
    /// style names.  Only input (`in…`) and output (`out…`) names are
    /// accepted.
    pub fn for_name(sysfs: &Sysfs, name: &str) -> Result<Self> {
        let port = Self::new(sysfs);
        let short = name.rsplit(':').next().unwrap_or(name);
        if !(short.starts_with("in") || short.starts_with("out")) {
            return Err(Error::InvalidValue {
                device: port.handle.class().prefix().to_owned(),
                attribute: attr::ADDRESS.to_owned(),
                message: "invalid port name".to_owned(),
                value: name.to_owned(),
                valid: vec!["in*".to_owned(), "out*".to_owned()],
            });
        }
        match discovery::id_at(&port.handle, name)? {
            Some(id) => Ok(Self::with_id(sysfs, id)),
            None => Err(Error::NotFound(Search::Port {
                port: name.to_owned(),
                driver: None,
            })),
        }
    }

    pub fn modes(&self) -> Result<Vec<String>> {
        get(&self.handle, attr::MODES).map(|v| v.list())
    }

    pub fn mode(&self) -> Result<String> {
        get(&self.handle, attr::MODE).map(Value::into_string)
    }

    pub fn set_mode(&self, mode: &str) -> &Self {
        set(&self.handle, attr::MODE, mode);
        self
    }

    /// Load the driver `device` on the port (ports in `other-*` modes).
    pub fn set_device(&self, device: &str) -> &Self {
        set(&self.handle, attr::SET_DEVICE, device);
        self
    }

    pub fn status(&self) -> Result<String> {
        get(&self.handle, attr::STATUS).map(Value::into_string)
    }

    /// The attached device entry, `{inX,outY}:DEVICE-NAME` with X in 1-4 and
    /// Y in A-D, or `None` when nothing is attached.
    pub fn connected_to(&self) -> Result<Option<String>> {
        self.handle.result(attached_device)
    }
}

fn attached_device(h: &Handle) -> Result<Option<String>> {
    let device = h.instance_name();
    let path = h.instance_path();
    let entries = std::fs::read_dir(&path)
        .and_then(|dir| {
            dir.map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
                .collect::<std::io::Result<Vec<_>>>()
        })
        .map_err(|err| Error::io(&device, &path.display().to_string(), Op::List, err))?;
    Ok(entries.into_iter().find(|n| is_attachment(n)))
}

fn is_attachment(name: &str) -> bool {
    let b = name.as_bytes();
    if name.starts_with("in") {
        b.len() >= 4 && b[3] == b':' && (b'1'..=b'4').contains(&b[2])
    } else if name.starts_with("out") {
        b.len() >= 5 && b[4] == b':' && (b'A'..=b'D').contains(&b[3])
    } else {
        false
    }
}
