//! Memory Access Types.
//!
//! This module defines the classification of memory accesses replayed
//! against the cache. These types are used for the following:
//! 1. **Dirty Tracking:** Writes mark lines dirty under write-back, write-allocate.
//! 2. **Statistics Tracking:** Every access counts as exactly one read or one write.
//! 3. **Trace Decoding:** Operation codes `R`/`W` map onto the two variants.

use std::fmt;
use std::str::FromStr;

use super::error::AccessError;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access (`R`).
    Read,

    /// Data write access (`W`).
    ///
    /// Dirties the line it hits or installs.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// The single-letter operation code used in traces.
    pub const fn code(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }
}

impl TryFrom<char> for AccessType {
    type Error = AccessError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'R' | 'r' => Ok(Self::Read),
            'W' | 'w' => Ok(Self::Write),
            other => Err(AccessError::InvalidOperation(other.to_string())),
        }
    }
}

impl FromStr for AccessType {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(AccessError::InvalidOperation(s.to_string())),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One replayed memory access: an address and what was done to it.
///
/// Consumed by [`Cache::access`](crate::cache::Cache::access) and never
/// retained past the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccessRecord {
    /// Byte address, in whatever radix the trace used.
    pub address: u64,
    /// Read or write.
    pub op: AccessType,
}

impl AccessRecord {
    /// Creates a read of `address`.
    pub const fn read(address: u64) -> Self {
        Self {
            address,
            op: AccessType::Read,
        }
    }

    /// Creates a write of `address`.
    pub const fn write(address: u64) -> Self {
        Self {
            address,
            op: AccessType::Write,
        }
    }
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#x}", self.op, self.address)
    }
}
