//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to parameterize
//! a simulation run. It provides:
//! 1. **Defaults:** Baseline cache geometry when a field is omitted.
//! 2. **Structures:** Cache geometry, timing constants, and replay options.
//! 3. **Enums:** Replacement policy and invalid-record handling.
//!
//! Configuration is read from JSON (`Config::load`) or built in code via
//! `Config::default()` and struct literals.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cache::CacheGeometry;
use crate::common::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline cache when a field is not
/// explicitly given in the configuration file.
mod defaults {
    /// Default cache size in bytes (4 KiB).
    pub const CACHE_SIZE: u64 = 4096;

    /// Default block size in bytes (64 bytes).
    ///
    /// Matches typical modern processor cache line sizes and DRAM burst length.
    pub const BLOCK_SIZE: u64 = 64;

    /// Default cache associativity (1 way = direct-mapped).
    pub const ASSOCIATIVITY: u64 = 1;
}

/// Cache replacement policy algorithms.
///
/// Every policy name is accepted by the parser so configurations written for
/// other tools load, but only [`ReplacementPolicy::Lru`] builds a cache. The
/// rest are rejected with [`ConfigError::UnsupportedPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the valid line with the largest recency counter, preferring
    /// empty ways and breaking ties toward the lowest way index.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// Pseudo-LRU (tree-based) replacement policy.
    #[serde(alias = "Plru", alias = "plru")]
    Plru,
    /// First In First Out replacement policy.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Random replacement policy.
    #[serde(alias = "Random", alias = "random")]
    Random,
    /// Most Recently Used replacement policy.
    #[serde(alias = "Mru", alias = "mru")]
    Mru,
}

impl ReplacementPolicy {
    /// Returns `true` if the simulator can model this policy.
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Lru)
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lru => "LRU",
            Self::Plru => "PLRU",
            Self::Fifo => "FIFO",
            Self::Random => "RANDOM",
            Self::Mru => "MRU",
        };
        f.write_str(name)
    }
}

/// What a replay does with a trace record it cannot parse or apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log a warning, count the record as skipped, and continue.
    Skip,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Config, ReplacementPolicy};
///
/// let json = r#"{
///     "L1_cache": {
///         "size_kb": 32,
///         "block_size_bytes": 64,
///         "associativity": 4,
///         "replacement_policy": "LRU"
///     },
///     "timing": {
///         "L1_hit_time": 1,
///         "L1_miss_penalty": 100
///     }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.cache.size_kb, Some(32));
/// assert_eq!(config.cache.replacement_policy, ReplacementPolicy::Lru);
/// assert_eq!(config.timing.unwrap().miss_penalty(), 100.0);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// The simulated cache.
    #[serde(rename = "L1_cache", alias = "cache", default)]
    pub cache: CacheConfig,
    /// Timing constants for AMAT; no AMAT is reported without them.
    #[serde(default)]
    pub timing: Option<TimingConfig>,
    /// Trace replay options.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid JSON for this
    /// schema, including invalid timing constants.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::ParseFile`] if its contents are invalid. Both name `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Cache geometry as written in the configuration file.
///
/// Fields are unvalidated; [`CacheConfig::geometry`] checks them and
/// produces the [`CacheGeometry`] a cache is built from.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in KiB.
    #[serde(default)]
    pub size_kb: Option<u64>,

    /// Total cache size in bytes (alternative to `size_kb`).
    #[serde(default)]
    pub total_bytes: Option<u64>,

    /// Block (line) size in bytes
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size_bytes: u64,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: u64,

    /// Replacement policy
    #[serde(default)]
    pub replacement_policy: ReplacementPolicy,
}

impl CacheConfig {
    /// Returns the default block size in bytes.
    const fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default cache associativity (number of ways).
    const fn default_associativity() -> u64 {
        defaults::ASSOCIATIVITY
    }

    /// Resolves the cache capacity in bytes.
    ///
    /// Uses `total_bytes` or `size_kb * 1024`; with neither, the 4 KiB default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SizeOverflow`] if `size_kb` does not fit in bytes, and
    /// [`ConfigError::ConflictingSize`] if both fields are given and differ.
    pub fn resolved_total_bytes(&self) -> Result<u64, ConfigError> {
        let from_kb = self
            .size_kb
            .map(|kb| {
                kb.checked_mul(1024)
                    .ok_or(ConfigError::SizeOverflow { size_kb: kb })
            })
            .transpose()?;

        match (from_kb, self.total_bytes) {
            (Some(kb_bytes), Some(total)) if kb_bytes != total => {
                Err(ConfigError::ConflictingSize {
                    size_kb: self.size_kb.unwrap_or_default(),
                    total_bytes: total,
                })
            }
            (_, Some(total)) => Ok(total),
            (Some(kb_bytes), None) => Ok(kb_bytes),
            (None, None) => Ok(defaults::CACHE_SIZE),
        }
    }

    /// Validates this configuration into a [`CacheGeometry`].
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] geometry variant; see [`CacheGeometry::new`].
    pub fn geometry(&self) -> Result<CacheGeometry, ConfigError> {
        CacheGeometry::new(
            self.resolved_total_bytes()?,
            self.block_size_bytes,
            self.associativity,
            self.replacement_policy,
        )
    }
}

impl Default for CacheConfig {
    /// Creates a 4 KiB direct-mapped LRU cache with 64-byte blocks.
    fn default() -> Self {
        Self {
            size_kb: None,
            total_bytes: None,
            block_size_bytes: defaults::BLOCK_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            replacement_policy: ReplacementPolicy::default(),
        }
    }
}

/// Timing constants used to derive AMAT.
///
/// Both values are validated on construction and deserialization; there
/// are no defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawTiming")]
pub struct TimingConfig {
    hit_time: f64,
    miss_penalty: f64,
}

/// Unvalidated timing section as it appears in JSON.
#[derive(Deserialize)]
struct RawTiming {
    #[serde(rename = "L1_hit_time", alias = "hit_time")]
    hit_time: f64,
    #[serde(rename = "L1_miss_penalty", alias = "miss_penalty")]
    miss_penalty: f64,
}

impl TryFrom<RawTiming> for TimingConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTiming) -> Result<Self, Self::Error> {
        Self::new(raw.hit_time, raw.miss_penalty)
    }
}

impl TimingConfig {
    /// Creates timing constants, in cycles.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTiming`] if either value is negative, NaN, or infinite.
    pub fn new(hit_time: f64, miss_penalty: f64) -> Result<Self, ConfigError> {
        for (field, value) in [("hit_time", hit_time), ("miss_penalty", miss_penalty)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTiming { field, value });
            }
        }
        Ok(Self {
            hit_time,
            miss_penalty,
        })
    }

    /// Cycles to service a hit.
    pub const fn hit_time(&self) -> f64 {
        self.hit_time
    }

    /// Additional cycles to service a miss.
    pub const fn miss_penalty(&self) -> f64 {
        self.miss_penalty
    }
}

/// Trace replay options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SimulationConfig {
    /// Handling of malformed trace records.
    #[serde(default)]
    pub on_invalid_record: InvalidRecordPolicy,

    /// Log a progress report every N accesses (0 disables).
    #[serde(default)]
    pub report_interval: u64,
}
