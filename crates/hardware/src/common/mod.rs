//! Common types shared across the cache simulator.
//!
//! This module provides the building blocks every other component uses. It includes:
//! 1. **Address Decoding:** Tag, set index, and block offset extraction.
//! 2. **Memory Access:** The read/write classification and the replayed access record.
//! 3. **Error Handling:** Configuration, access, trace, and simulation error types.

/// Address decomposition into tag, set index, and block offset.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr};
pub use data::{AccessRecord, AccessType};
pub use error::{AccessError, ConfigError, SimError, TraceError};
