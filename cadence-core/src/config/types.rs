//! Scheduler configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::watchdog::StallThresholds;

/// Magic number to identify stored scheduler configuration
pub const CONFIG_MAGIC: u32 = 0x4344_4E43; // "CDNC"

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Largest encoded size of a [`SchedulerConfig`] (postcard varints)
pub const MAX_CONFIG_SIZE: usize = 48;

/// Errors from validating or loading a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick quantum of zero microseconds
    ZeroTick,
    /// Stall thresholds not strictly increasing
    UnorderedThresholds,
    /// Stored blob does not start with [`CONFIG_MAGIC`]
    BadMagic,
    /// Stored blob has another format version
    VersionMismatch,
    /// Output buffer too small or value not encodable
    Serialize,
    /// Stored blob is truncated or corrupt
    Deserialize,
}

/// Scheduler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Length of one tick in microseconds (used for duty cycle)
    pub tick_us: u32,
    /// Watchdog escalation thresholds, in skipped sweeps
    pub stall: StallThresholds,
}

impl SchedulerConfig {
    /// Stock configuration: 1 ms ticks, stock thresholds
    pub const DEFAULT: Self = Self {
        magic: CONFIG_MAGIC,
        version: CONFIG_VERSION,
        tick_us: 1000,
        stall: StallThresholds::DEFAULT,
    };

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.magic != CONFIG_MAGIC {
            return Err(ConfigError::BadMagic);
        }
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        if self.tick_us == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if !self.stall.is_ordered() {
            return Err(ConfigError::UnorderedThresholds);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        self.validate()?;
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate a stored blob
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
