//! Sysfs location and wait tuning.
//!
//! All device handles are built from a [`Sysfs`], which carries the
//! filesystem root explicitly.  Tests point it at a scratch directory;
//! production code uses [`Sysfs::system`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::DeviceKind;

/// Default class directories, relative to the filesystem root.
pub const TACHO_MOTOR_PATH: &str = "/sys/class/tacho-motor";
pub const SERVO_MOTOR_PATH: &str = "/sys/class/servo-motor";
pub const DC_MOTOR_PATH: &str = "/sys/class/dc-motor";
pub const SENSOR_PATH: &str = "/sys/class/lego-sensor";
pub const LEGO_PORT_PATH: &str = "/sys/class/lego-port";
pub const POWER_SUPPLY_PATH: &str = "/sys/class/power_supply";
pub const LED_PATH: &str = "/sys/class/leds";

/// Longest sleep allowed between two status re-reads.
pub const MAX_POLL_QUANTUM_MS: u64 = 50;

/// How [`wait`](crate::wait::wait) learns that a status attribute changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessPolicy {
    /// Probe the opened status file; notify on sysfs, sleep elsewhere.
    #[default]
    Auto,
    /// Always block in `poll(2)` for a priority event.
    Notify,
    /// Always re-read after a bounded sleep.
    Sleep,
}

/// Tunable sysfs parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysfsConfig {
    /// Filesystem root every class directory is resolved against.
    pub root: PathBuf,

    // --- Class directories (absolute, resolved under `root`) ---
    pub tacho_motor_path: PathBuf,
    pub servo_motor_path: PathBuf,
    pub dc_motor_path: PathBuf,
    pub sensor_path: PathBuf,
    pub lego_port_path: PathBuf,
    pub power_supply_path: PathBuf,
    pub led_path: PathBuf,

    // --- Wait ---
    /// Upper bound on the sleep between two status re-reads (milliseconds,
    /// 1 to [`MAX_POLL_QUANTUM_MS`]).
    pub poll_quantum_ms: u64,
    /// Change notification strategy.
    pub readiness: ReadinessPolicy,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            tacho_motor_path: PathBuf::from(TACHO_MOTOR_PATH),
            servo_motor_path: PathBuf::from(SERVO_MOTOR_PATH),
            dc_motor_path: PathBuf::from(DC_MOTOR_PATH),
            sensor_path: PathBuf::from(SENSOR_PATH),
            lego_port_path: PathBuf::from(LEGO_PORT_PATH),
            power_supply_path: PathBuf::from(POWER_SUPPLY_PATH),
            led_path: PathBuf::from(LED_PATH),
            poll_quantum_ms: MAX_POLL_QUANTUM_MS,
            readiness: ReadinessPolicy::Auto,
        }
    }
}

impl SysfsConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject values that would make discovery or waiting misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_quantum_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_quantum_ms must be non-zero"));
        }
        if self.poll_quantum_ms > MAX_POLL_QUANTUM_MS {
            return Err(ConfigError::ValidationFailed(
                "poll_quantum_ms must not exceed 50",
            ));
        }
        let dirs = [
            &self.tacho_motor_path,
            &self.servo_motor_path,
            &self.dc_motor_path,
            &self.sensor_path,
            &self.lego_port_path,
            &self.power_supply_path,
            &self.led_path,
        ];
        if dirs.iter().any(|dir| !dir.is_absolute()) {
            return Err(ConfigError::ValidationFailed(
                "class directories must be absolute paths",
            ));
        }
        Ok(())
    }

    fn class_dir(&self, kind: DeviceKind) -> &Path {
        match kind {
            DeviceKind::TachoMotor | DeviceKind::LinearActuator => &self.tacho_motor_path,
            DeviceKind::ServoMotor => &self.servo_motor_path,
            DeviceKind::DcMotor => &self.dc_motor_path,
            DeviceKind::Sensor => &self.sensor_path,
            DeviceKind::LegoPort => &self.lego_port_path,
            DeviceKind::PowerSupply => &self.power_supply_path,
            DeviceKind::Led => &self.led_path,
        }
    }
}

/// Errors from loading a [`SysfsConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),
}

/// A validated, shareable sysfs configuration.
#[derive(Debug, Clone)]
pub struct Sysfs {
    config: Arc<SysfsConfig>,
}

impl Sysfs {
    pub fn new(config: SysfsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// The live `/sys` tree with default tuning.
    pub fn system() -> Self {
        Self {
            config: Arc::new(SysfsConfig::default()),
        }
    }

    /// Default layout under an alternative root directory.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(SysfsConfig {
                root: root.into(),
                ..SysfsConfig::default()
            }),
        }
    }

    pub fn config(&self) -> &SysfsConfig {
        &self.config
    }

    /// Absolute directory holding every instance of `kind`.
    pub fn class_path(&self, kind: DeviceKind) -> PathBuf {
        let dir = self.config.class_dir(kind);
        let relative = dir.strip_prefix("/").unwrap_or(dir);
        self.config.root.join(relative)
    }

    /// Relax sleep of [`wait`](crate::wait::wait), never above
    /// [`MAX_POLL_QUANTUM_MS`] even for an unvalidated config.
    pub fn poll_quantum(&self) -> Duration {
        Duration::from_millis(self.config.poll_quantum_ms.clamp(1, MAX_POLL_QUANTUM_MS))
    }

    pub fn readiness(&self) -> ReadinessPolicy {
        self.config.readiness
    }
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::system()
    }
}
