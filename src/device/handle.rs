//! Device identity plus the one-shot error latch.
//!
//! ## Action / result protocol
//!
//! Device methods are either *actions* (they change robot state and return
//! the device for chaining) or *results* (they read state and return a
//! [`Result`]).  A failing action records its error in the latch; every
//! later action sees the latch and does nothing.  The next result call
//! drains the latch and returns that error instead of reading.
//!
//! ```text
//!   Clear ──action fails──▶ Latched(e) ──result call──▶ Clear  (returns e)
//!     ▲                        │
//!     └──── bind (discovery) ──┘        further failures are dropped
//! ```
//!
//! Actions and results on one handle are serialized: each holds the handle's
//! operation lock from the latch check to its last attribute access, so a
//! handle shared between threads never writes after a failure that another
//! thread latched first.  [`wait`](crate::wait::wait) drains the latch but
//! does not take the operation lock, so actions such as `stop` still run
//! while another thread waits.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Sysfs;
use crate::device::{DeviceClass, DeviceKind};
use crate::error::{Error, Result};

/// Single-slot error storage.
#[derive(Debug, Default)]
pub enum Latch {
    #[default]
    Clear,
    Latched(Error),
}

impl Latch {
    /// Store `err` unless an earlier error is already held.  Returns whether
    /// the error was kept.
    pub fn record(&mut self, err: Error) -> bool {
        match self {
            Self::Clear => {
                *self = Self::Latched(err);
                true
            }
            Self::Latched(_) => false,
        }
    }

    pub fn take(&mut self) -> Option<Error> {
        match std::mem::take(self) {
            Self::Clear => None,
            Self::Latched(err) => Some(err),
        }
    }

    pub fn peek(&self) -> Option<&Error> {
        match self {
            Self::Clear => None,
            Self::Latched(err) => Some(err),
        }
    }

    pub fn is_latched(&self) -> bool {
        matches!(self, Self::Latched(_))
    }
}

#[derive(Debug, Default)]
struct HandleState {
    id: Option<u32>,
    latch: Latch,
}

/// Shared core of every device type.
#[derive(Debug)]
pub struct Handle {
    kind: DeviceKind,
    sysfs: Sysfs,
    path: PathBuf,
    /// Fixed instance directory of the named classes.
    name: Option<String>,
    state: Mutex<HandleState>,
    ops: Mutex<()>,
}

impl Handle {
    /// Create a handle; `None` leaves it unbound until discovery.
    pub fn new(sysfs: &Sysfs, kind: DeviceKind, id: Option<u32>) -> Self {
        Self::build(sysfs, kind, id, None)
    }

    /// A handle for an instance addressed by directory name, such as
    /// `legoev3-battery` or `led0:green:brick-status`.
    pub fn named(sysfs: &Sysfs, kind: DeviceKind, name: impl Into<String>) -> Self {
        Self::build(sysfs, kind, None, Some(name.into()))
    }

    fn build(sysfs: &Sysfs, kind: DeviceKind, id: Option<u32>, name: Option<String>) -> Self {
        Self {
            kind,
            path: sysfs.class_path(kind),
            sysfs: sysfs.clone(),
            name,
            state: Mutex::new(HandleState {
                id,
                latch: Latch::Clear,
            }),
            ops: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn class(&self) -> DeviceClass {
        self.kind.class()
    }

    /// Class directory holding every instance of this kind.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sysfs(&self) -> &Sysfs {
        &self.sysfs
    }

    /// The bound instance id, `None` while unbound.
    pub fn id(&self) -> Option<u32> {
        self.lock().id
    }

    /// Class prefix plus id, e.g. `motor3`, or the fixed name of a named
    /// instance.  Unbound handles render the `-1` sentinel, which never
    /// names a real directory.
    pub fn instance_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let prefix = self.class().prefix();
        match self.id() {
            Some(id) => format!("{prefix}{id}"),
            None => format!("{prefix}-1"),
        }
    }

    /// Directory of this instance.
    pub fn instance_path(&self) -> PathBuf {
        self.path.join(self.instance_name())
    }

    /// Return and clear the latched error.
    pub fn take_error(&self) -> Option<Error> {
        self.lock().latch.take()
    }

    /// A copy of the latched error, leaving the latch set.
    pub fn latched(&self) -> Option<Error> {
        self.lock().latch.peek().cloned()
    }

    /// Latch `err` if the latch is clear.
    pub fn record(&self, err: Error) {
        if !self.lock().latch.record(err) {
            log::trace!("{}: dropped error behind an earlier one", self.instance_name());
        }
    }

    /// Run an action.  Skipped entirely while an error is latched; a failure
    /// is latched rather than returned.
    pub fn act(&self, action: impl FnOnce(&Self) -> Result<()>) {
        let _serial = self.serialize();
        if self.lock().latch.is_latched() {
            return;
        }
        if let Err(err) = action(self) {
            self.record(err);
        }
    }

    /// Run a result call.  A latched error is drained and returned instead.
    pub fn result<T>(&self, read: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let _serial = self.serialize();
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        read(self)
    }

    /// Rebind to `id`, clearing any latched error.  Only discovery calls this.
    pub(crate) fn bind(&self, id: u32) {
        let mut state = self.lock();
        state.id = Some(id);
        state.latch = Latch::Clear;
    }

    fn serialize(&self) -> MutexGuard<'_, ()> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, HandleState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
