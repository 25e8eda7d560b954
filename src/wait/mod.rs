//! Blocking until a motor state condition holds.
//!
//! [`wait`] opens the `state` attribute once and keeps that descriptor for
//! the whole call, so a notification raised between two reads is not lost.
//! Reaching the deadline is not an error: the outcome reports the last state
//! read with `satisfied == false`.

pub mod readiness;

use std::fs::File;
use std::os::unix::fs::FileExt;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace};

pub use crate::config::ReadinessPolicy;
pub use readiness::{Notify, Readiness, Sleep};

use crate::attr::{self, Value};
use crate::device::StateDevice;
use crate::error::{Error, Op, Result};
use crate::state::MotorState;

/// Largest status attribute accepted, in bytes.
const STATUS_BUF_LEN: usize = 4096;

/// What [`wait`] waits for.
///
/// With `any == false` the condition holds when
/// `(state & mask) ^ not == want | not`.  With `any == true` it holds when
/// at least one masked bit outside `not` is set and no bit of `not` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub mask: MotorState,
    pub want: MotorState,
    pub not: MotorState,
    pub any: bool,
}

impl Condition {
    /// The masked state must equal `want`.
    pub const fn all(mask: MotorState, want: MotorState) -> Self {
        Self {
            mask,
            want,
            not: MotorState::empty(),
            any: false,
        }
    }

    /// Any bit of `mask` must be set.
    pub const fn any(mask: MotorState) -> Self {
        Self {
            mask,
            want: MotorState::empty(),
            not: MotorState::empty(),
            any: true,
        }
    }

    pub const fn excluding(mut self, not: MotorState) -> Self {
        self.not = not;
        self
    }

    pub fn is_met(&self, state: MotorState) -> bool {
        let masked = state & self.mask;
        if self.any {
            return !(masked ^ self.not).is_empty() && (masked & self.not).is_empty();
        }
        masked ^ self.not == self.want | self.not
    }
}

/// Result of a [`wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    /// The last state read.
    pub state: MotorState,
    /// Whether `state` met the condition.
    pub satisfied: bool,
}

/// Block until the state of `dev` meets `condition` or `timeout` passes.
/// `None` waits indefinitely.
///
/// A latched error on `dev` is drained and returned without touching the
/// filesystem.  Errors met while waiting are returned, never latched.
pub fn wait<D>(dev: &D, condition: Condition, timeout: Option<Duration>) -> Result<WaitOutcome>
where
    D: StateDevice + ?Sized,
{
    let handle = dev.handle();
    if let Some(err) = handle.take_error() {
        return Err(err);
    }

    let mut status = StatusFile::open(handle.instance_name(), &handle.instance_path())?;
    let mut state = status.read()?;
    if condition.is_met(state) {
        return Ok(WaitOutcome {
            state,
            satisfied: true,
        });
    }

    // An overflowing deadline is as good as none.
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
    let mut readiness = readiness::select(handle.sysfs().readiness(), &status.file);
    let quantum = handle.sysfs().poll_quantum();
    debug!(
        "{}: waiting for {condition:?} using {} readiness",
        status.device,
        readiness.name()
    );

    loop {
        let remaining = match deadline {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    break;
                }
                Some(left)
            }
            None => None,
        };

        let ready = readiness
            .wait(&status.file, remaining)
            .map_err(|err| Error::io(&status.device, attr::STATE, Op::Read, err))?;
        if !ready {
            break;
        }

        state = status.read()?;
        trace!("{}: state {state}", status.device);
        if condition.is_met(state) {
            return Ok(WaitOutcome {
                state,
                satisfied: true,
            });
        }

        let relax = match deadline {
            Some(deadline) => quantum.min(deadline.saturating_duration_since(Instant::now())),
            None => quantum,
        };
        thread::sleep(relax);
    }

    Ok(WaitOutcome {
        state,
        satisfied: false,
    })
}

/// The `state` attribute, held open for positional re-reads.
struct StatusFile {
    device: String,
    file: File,
    buf: Box<[u8; STATUS_BUF_LEN]>,
}

impl StatusFile {
    fn open(device: String, instance: &std::path::Path) -> Result<Self> {
        let file = File::open(instance.join(attr::STATE))
            .map_err(|err| Error::io(&device, attr::STATE, Op::Read, err))?;
        Ok(Self {
            device,
            file,
            buf: Box::new([0; STATUS_BUF_LEN]),
        })
    }

    /// Read from offset zero.  Reading also re-arms sysfs notification.
    fn read(&mut self) -> Result<MotorState> {
        let n = self
            .file
            .read_at(&mut self.buf[..], 0)
            .map_err(|err| Error::io(&self.device, attr::STATE, Op::Read, err))?;
        if n == STATUS_BUF_LEN {
            return Err(Error::io(
                &self.device,
                attr::STATE,
                Op::Read,
                std::io::Error::other("status buffer full"),
            ));
        }
        Value::from_bytes(self.device.clone(), attr::STATE, &self.buf[..n])?.state()
    }
}
