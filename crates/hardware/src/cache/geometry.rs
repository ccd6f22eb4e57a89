//! Validated cache geometry.
//!
//! A [`CacheGeometry`] can only be obtained through [`CacheGeometry::new`],
//! which enforces every constraint the shift-based address decoder relies on.

use crate::common::{AddressDecoder, ConfigError};
use crate::config::ReplacementPolicy;

/// Immutable shape of a set-associative cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    total_bytes: u64,
    block_size_bytes: u64,
    associativity: u64,
    num_sets: u64,
    replacement_policy: ReplacementPolicy,
}

impl CacheGeometry {
    /// Validates and creates a geometry.
    ///
    /// # Arguments
    ///
    /// * `total_bytes` - Total capacity in bytes.
    /// * `block_size_bytes` - Block size in bytes; must be a power of two.
    /// * `associativity` - Ways per set.
    /// * `replacement_policy` - Must be an implemented policy.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroField`] if any size is zero.
    /// - [`ConfigError::NotPowerOfTwo`] if the block size or the derived set count is not a power of two.
    /// - [`ConfigError::SizeNotDivisible`] if capacity is not a whole number of blocks.
    /// - [`ConfigError::BlocksNotDivisible`] if blocks do not split evenly into sets.
    /// - [`ConfigError::UnsupportedPolicy`] for any policy other than LRU.
    pub fn new(
        total_bytes: u64,
        block_size_bytes: u64,
        associativity: u64,
        replacement_policy: ReplacementPolicy,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("total_bytes", total_bytes),
            ("block_size_bytes", block_size_bytes),
            ("associativity", associativity),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroField { field });
            }
        }

        if !block_size_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "block_size_bytes",
                value: block_size_bytes,
            });
        }

        if total_bytes % block_size_bytes != 0 {
            return Err(ConfigError::SizeNotDivisible {
                total_bytes,
                block_size_bytes,
            });
        }

        let num_blocks = total_bytes / block_size_bytes;
        if num_blocks % associativity != 0 {
            return Err(ConfigError::BlocksNotDivisible {
                num_blocks,
                associativity,
            });
        }

        let num_sets = num_blocks / associativity;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "num_sets",
                value: num_sets,
            });
        }

        if !replacement_policy.is_implemented() {
            return Err(ConfigError::UnsupportedPolicy(replacement_policy));
        }

        Ok(Self {
            total_bytes,
            block_size_bytes,
            associativity,
            num_sets,
            replacement_policy,
        })
    }

    /// Total capacity in bytes.
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Block size in bytes.
    pub const fn block_size_bytes(&self) -> u64 {
        self.block_size_bytes
    }

    /// Ways per set.
    pub const fn associativity(&self) -> usize {
        self.associativity as usize
    }

    /// `total_bytes / block_size_bytes`.
    pub const fn num_blocks(&self) -> u64 {
        self.total_bytes / self.block_size_bytes
    }

    /// `num_blocks / associativity`; always a power of two.
    pub const fn num_sets(&self) -> usize {
        self.num_sets as usize
    }

    /// The configured replacement policy.
    pub const fn replacement_policy(&self) -> ReplacementPolicy {
        self.replacement_policy
    }

    /// `log2(block_size_bytes)`.
    pub const fn offset_bits(&self) -> u32 {
        self.block_size_bytes.trailing_zeros()
    }

    /// `log2(num_sets)`.
    pub const fn index_bits(&self) -> u32 {
        self.num_sets.trailing_zeros()
    }

    /// Builds the address decoder for this geometry.
    pub const fn decoder(&self) -> AddressDecoder {
        AddressDecoder::new(self.offset_bits(), self.index_bits())
    }
}
