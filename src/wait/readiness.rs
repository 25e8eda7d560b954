//! Change notification for an open status file.
//!
//! sysfs attributes that call `sysfs_notify()` wake `poll(2)` waiters with
//! `POLLPRI | POLLERR`.  Filesystems that never do (tmpfs, FUSE) would leave
//! a notifier blocked until its timeout, so they get [`Sleep`] instead.

use std::fs::File;
use std::io;
use std::time::Duration;

use rustix::event::{PollFd, PollFlags, poll};

use crate::config::ReadinessPolicy;

/// Filesystem magic of sysfs.
#[cfg(target_os = "linux")]
const SYSFS_MAGIC: u64 = 0x6265_6572;

/// Something that blocks until a status file may have changed.
pub trait Readiness {
    /// Wait up to `timeout` (`None` is unbounded).  Returns `false` when the
    /// timeout elapsed with nothing to report.
    fn wait(&mut self, file: &File, timeout: Option<Duration>) -> io::Result<bool>;

    fn name(&self) -> &'static str;
}

/// Edge notification via `poll(2)`.
#[derive(Debug, Default)]
pub struct Notify;

impl Readiness for Notify {
    fn wait(&mut self, file: &File, timeout: Option<Duration>) -> io::Result<bool> {
        let mut fds = [PollFd::new(file, PollFlags::PRI | PollFlags::ERR)];
        match poll(&mut fds, poll_timeout(timeout)) {
            Ok(n) => Ok(n > 0),
            // An interrupted poll is treated as a wakeup; the caller re-reads.
            Err(rustix::io::Errno::INTR) => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    fn name(&self) -> &'static str {
        "notify"
    }
}

/// No notification: every call reports "re-read now" and the caller's
/// bounded sleep paces the loop.
#[derive(Debug, Default)]
pub struct Sleep;

impl Readiness for Sleep {
    fn wait(&mut self, _file: &File, _timeout: Option<Duration>) -> io::Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "sleep"
    }
}

/// Pick the strategy for `file` according to `policy`.
pub fn select(policy: ReadinessPolicy, file: &File) -> Box<dyn Readiness + Send> {
    match policy {
        ReadinessPolicy::Notify => Box::new(Notify),
        ReadinessPolicy::Sleep => Box::new(Sleep),
        ReadinessPolicy::Auto if is_sysfs(file) => Box::new(Notify),
        ReadinessPolicy::Auto => Box::new(Sleep),
    }
}

#[cfg(target_os = "linux")]
fn is_sysfs(file: &File) -> bool {
    rustix::fs::fstatfs(file)
        .ok()
        .and_then(|stat| u64::try_from(stat.f_type).ok())
        == Some(SYSFS_MAGIC)
}

#[cfg(not(target_os = "linux"))]
fn is_sysfs(_file: &File) -> bool {
    false
}

/// Milliseconds for `poll(2)`, rounded up so a sub-millisecond remainder
/// still waits; `-1` is unbounded.
fn poll_timeout(timeout: Option<Duration>) -> i32 {
    timeout.map_or(-1, |t| {
        i32::try_from(t.as_micros().div_ceil(1000)).unwrap_or(i32::MAX)
    })
}
