//! Simulator: owns the cache and replays a trace against it.
//!
//! Replay is strictly sequential. Each access's outcome depends on every
//! prior access to the same set, so records are applied one at a time in
//! trace order.

use tracing::{info, warn};

use crate::cache::Cache;
use crate::common::{AccessError, AccessRecord, ConfigError, SimError, TraceError};
use crate::config::{Config, InvalidRecordPolicy, TimingConfig};
use crate::stats::{self, Statistics};

/// Outcome counts of a [`Simulator::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records applied to the cache.
    pub processed: u64,
    /// Malformed records skipped under [`InvalidRecordPolicy::Skip`].
    pub skipped: u64,
}

/// Top-level simulator: one cache plus the options for replaying into it.
#[derive(Clone, Debug)]
pub struct Simulator {
    cache: Cache,
    timing: Option<TimingConfig>,
    on_invalid_record: InvalidRecordPolicy,
    report_interval: u64,
}

impl Simulator {
    /// Creates a simulator from a full configuration.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from validating the cache geometry.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: Cache::from_config(&config.cache)?,
            timing: config.timing,
            on_invalid_record: config.simulation.on_invalid_record,
            report_interval: config.simulation.report_interval,
        })
    }

    /// Wraps an existing cache, aborting on invalid records.
    pub const fn with_cache(cache: Cache, timing: Option<TimingConfig>) -> Self {
        Self {
            cache,
            timing,
            on_invalid_record: InvalidRecordPolicy::Abort,
            report_interval: 0,
        }
    }

    /// Overrides the invalid-record policy.
    #[must_use]
    pub const fn on_invalid_record(mut self, policy: InvalidRecordPolicy) -> Self {
        self.on_invalid_record = policy;
        self
    }

    /// Overrides the progress report interval (0 disables).
    #[must_use]
    pub const fn report_interval(mut self, every: u64) -> Self {
        self.report_interval = every;
        self
    }

    /// The simulated cache.
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Timing constants, if configured.
    pub const fn timing(&self) -> Option<&TimingConfig> {
        self.timing.as_ref()
    }

    /// Applies a single access.
    ///
    /// # Errors
    ///
    /// [`AccessError`] if the access cannot be applied; counters are unchanged.
    pub fn step(&mut self, record: AccessRecord) -> Result<bool, AccessError> {
        self.cache.access(record.address, record.op)
    }

    /// Current statistics, including AMAT when timing is configured.
    pub fn report(&self) -> Statistics {
        stats::report(self.cache.stats(), self.timing.as_ref())
    }

    /// Replays a trace to completion.
    ///
    /// `trace` yields `(line_number, record)` pairs, as produced by
    /// [`TraceReader`](crate::sim::trace::TraceReader).
    ///
    /// # Errors
    ///
    /// Under [`InvalidRecordPolicy::Abort`], the first [`TraceError`] or
    /// [`AccessError`] ends the run. I/O errors always end the run. Counters
    /// for records applied before the failure are kept.
    pub fn run<I>(&mut self, trace: I) -> Result<RunSummary, SimError>
    where
        I: IntoIterator<Item = Result<(usize, AccessRecord), TraceError>>,
    {
        let mut summary = RunSummary::default();
        info!(
            policy = ?self.on_invalid_record,
            report_interval = self.report_interval,
            "replay started"
        );

        for item in trace {
            let outcome = match item {
                Ok((line, record)) => self
                    .step(record)
                    .map(|_| ())
                    .map_err(|source| SimError::Access { line, source }),
                Err(TraceError::Io(e)) => return Err(TraceError::Io(e).into()),
                Err(e) => Err(e.into()),
            };

            match outcome {
                Ok(()) => {
                    summary.processed += 1;
                    if self.report_interval > 0 && summary.processed % self.report_interval == 0 {
                        let progress = self.report();
                        info!(
                            accesses = progress.total_accesses,
                            hit_rate = progress.hit_rate,
                            writebacks = progress.writebacks,
                            "progress"
                        );
                    }
                }
                Err(e) if self.on_invalid_record == InvalidRecordPolicy::Skip => {
                    warn!(error = %e, "skipping invalid trace record");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            "replay finished"
        );
        Ok(summary)
    }
}
