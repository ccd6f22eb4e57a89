//! Trace input and replay.
//!
//! Provides the textual trace reader and the simulator that drives a
//! cache through a trace and reports statistics.

/// Textual memory trace parsing.
pub mod trace;

/// Trace replay driver.
pub mod simulator;

pub use simulator::{RunSummary, Simulator};
pub use trace::{TraceReader, parse_line};
