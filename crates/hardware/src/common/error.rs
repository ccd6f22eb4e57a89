//! Error definitions.
//!
//! This module defines every recoverable failure the simulator reports. It provides:
//! 1. **Configuration Errors:** Geometry, policy, and timing problems caught before a cache exists.
//! 2. **Access Errors:** A single malformed access, reported without touching prior statistics.
//! 3. **Trace Errors:** Unparseable trace lines, tagged with their line number.
//! 4. **Simulation Errors:** The union of the above as seen by a full replay.
//!
//! Internal-consistency violations (two valid ways holding the same tag)
//! are not represented here; they indicate a simulator bug and panic.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ReplacementPolicy;

/// Rejected cache or timing configuration.
///
/// Raised before any [`Cache`](crate::cache::Cache) is constructed, so a
/// partially valid cache is never observable.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A geometry field was zero.
    #[error("{field} must be positive")]
    ZeroField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A quantity used as a shift width was not a power of two.
    #[error("{field} must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Name of the offending quantity.
        field: &'static str,
        /// The value supplied or derived.
        value: u64,
    },

    /// Total capacity is not a whole number of blocks.
    #[error("cache size {total_bytes} B is not divisible by block size {block_size_bytes} B")]
    SizeNotDivisible {
        /// Total capacity in bytes.
        total_bytes: u64,
        /// Block size in bytes.
        block_size_bytes: u64,
    },

    /// Block count cannot be split evenly into sets.
    #[error("{num_blocks} blocks cannot be divided into sets of {associativity} ways")]
    BlocksNotDivisible {
        /// Number of blocks in the cache.
        num_blocks: u64,
        /// Requested ways per set.
        associativity: u64,
    },

    /// `size_kb * 1024` does not fit in 64 bits.
    #[error("cache size of {size_kb} KiB overflows a 64-bit byte count")]
    SizeOverflow {
        /// The requested size in KiB.
        size_kb: u64,
    },

    /// Both `size_kb` and `total_bytes` were given and disagree.
    #[error("size_kb ({size_kb} KiB) and total_bytes ({total_bytes} B) disagree")]
    ConflictingSize {
        /// The `size_kb` value.
        size_kb: u64,
        /// The `total_bytes` value.
        total_bytes: u64,
    },

    /// The configured replacement policy has no implementation.
    #[error("replacement policy {0} is not supported (only LRU is implemented)")]
    UnsupportedPolicy(ReplacementPolicy),

    /// A timing constant was negative or not finite.
    #[error("timing constant {field} must be a finite, non-negative number (got {value})")]
    InvalidTiming {
        /// Name of the offending constant.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The configuration file could not be read.
    #[error("could not read config file '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid JSON for the expected schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration file is not valid JSON for the expected schema.
    #[error("invalid config file '{}': {source}", path.display())]
    ParseFile {
        /// Path that failed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// A single access that cannot be applied to the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Operation code other than read or write.
    #[error("invalid operation '{0}' (expected R or W)")]
    InvalidOperation(String),

    /// Decoded set index outside `[0, num_sets)`.
    #[error("address {address:#x} decodes to set {set_index}, but the cache has {num_sets} sets")]
    SetIndexOutOfRange {
        /// The accessed address.
        address: u64,
        /// The decoded set index.
        set_index: usize,
        /// Number of sets in the cache.
        num_sets: usize,
    },
}

/// An unusable line in a textual trace.
#[derive(Error, Debug)]
pub enum TraceError {
    /// The line has an operation but no address.
    #[error("line {line}: missing address")]
    MissingAddress {
        /// 1-based line number.
        line: usize,
    },

    /// The operation code is not `R` or `W`.
    #[error("line {line}: {source}")]
    InvalidOperation {
        /// 1-based line number.
        line: usize,
        /// The decoding failure.
        #[source]
        source: AccessError,
    },

    /// The address is not a 64-bit hexadecimal number.
    #[error("line {line}: invalid hex address '{text}': {source}")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The offending text.
        text: String,
        /// The integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The line is not valid UTF-8.
    #[error("line {line}: not valid UTF-8: {source}")]
    InvalidEncoding {
        /// 1-based line number.
        line: usize,
        /// The decoding failure.
        #[source]
        source: std::str::Utf8Error,
    },

    /// Reading the trace failed.
    #[error("could not read trace: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Line the error refers to, if it refers to one.
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MissingAddress { line }
            | Self::InvalidOperation { line, .. }
            | Self::InvalidAddress { line, .. }
            | Self::InvalidEncoding { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Failure of a full simulation run.
#[derive(Error, Debug)]
pub enum SimError {
    /// The cache could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace could not be read or parsed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// A parsed record could not be applied.
    #[error("line {line}: {source}")]
    Access {
        /// 1-based trace line number.
        line: usize,
        /// The rejected access.
        #[source]
        source: AccessError,
    },
}
