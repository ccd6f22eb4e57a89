//! Trace-driven cache simulator library.
//!
//! This crate models a single-level set-associative cache under a replayed
//! sequence of memory accesses:
//! 1. **Common:** Address decoding, access types, and errors.
//! 2. **Cache:** Geometry validation, lines, sets with LRU replacement, and the cache itself.
//! 3. **Config:** JSON configuration for geometry, timing, and replay options.
//! 4. **Simulation:** Trace reading and in-order replay.
//! 5. **Statistics:** Hit/miss rates, writebacks, and AMAT.
//!
//! # Examples
//!
//! ```
//! use cachesim_core::{AccessType, Cache, CacheGeometry};
//! use cachesim_core::config::ReplacementPolicy;
//!
//! let geometry = CacheGeometry::new(1024, 64, 2, ReplacementPolicy::Lru).unwrap();
//! let mut cache = Cache::new(geometry);
//! assert!(!cache.access(0x00, AccessType::Read).unwrap());
//! assert!(cache.access(0x04, AccessType::Read).unwrap());
//! assert_eq!(cache.stats().hits, 1);
//! ```

/// Set-associative cache model (geometry, lines, sets, LRU).
pub mod cache;
/// Common types (addresses, access types, errors).
pub mod common;
/// Simulator configuration (defaults, enums, JSON structures).
pub mod config;
/// Trace reader and replay driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// The cache model; construct with `Cache::new` or `Cache::from_config`.
pub use crate::cache::{Cache, CacheGeometry};
/// Read/write classification and the replayed access record.
pub use crate::common::{AccessRecord, AccessType};
/// Root configuration type; use `Config::load` or `Config::default()`.
pub use crate::config::Config;
/// Trace replay driver.
pub use crate::sim::Simulator;
/// Derived statistics record.
pub use crate::stats::Statistics;
