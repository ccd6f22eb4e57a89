//! Simulation statistics collection and reporting.
//!
//! This module tracks and derives the cache's performance metrics. It provides:
//! 1. **Counters:** Hits, misses, reads, writes, and writebacks, updated by every access.
//! 2. **Rates:** Hit and miss rate, guarded so an untouched cache reports 0.0 rather than NaN.
//! 3. **AMAT:** `hit_time + miss_rate * miss_penalty` from caller-supplied timing.
//! 4. **Rendering:** Sectioned text output and a serializable record for JSON.

use serde::Serialize;

use crate::config::TimingConfig;

/// Raw access counters maintained by [`Cache`](crate::cache::Cache).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that had to install their block.
    pub misses: u64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,
    /// Dirty lines evicted on a miss.
    pub writebacks: u64,
}

impl CacheStats {
    /// `hits + misses`.
    pub const fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Derived statistics for one point in a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Statistics {
    /// Accesses that hit.
    pub hits: u64,
    /// Accesses that missed.
    pub misses: u64,
    /// `hits + misses`.
    pub total_accesses: u64,
    /// `hits / total_accesses`, or 0.0 with no accesses.
    pub hit_rate: f64,
    /// `1 - hit_rate`, or 0.0 with no accesses.
    pub miss_rate: f64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,
    /// Dirty evictions.
    pub writebacks: u64,
    /// Average memory access time in cycles, when timing was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amat: Option<f64>,
}

/// Derives [`Statistics`] from raw counters.
///
/// Pure: the counters are not modified, so this may be called repeatedly
/// during a run for progressive reporting.
///
/// # Arguments
///
/// * `counters` - The cache's counters.
/// * `timing` - Hit time and miss penalty; AMAT is `None` without them.
pub fn report(counters: &CacheStats, timing: Option<&TimingConfig>) -> Statistics {
    let total_accesses = counters.total_accesses();
    let (hit_rate, miss_rate) = if total_accesses > 0 {
        let hit_rate = counters.hits as f64 / total_accesses as f64;
        (hit_rate, 1.0 - hit_rate)
    } else {
        (0.0, 0.0)
    };

    Statistics {
        hits: counters.hits,
        misses: counters.misses,
        total_accesses,
        hit_rate,
        miss_rate,
        reads: counters.reads,
        writes: counters.writes,
        writebacks: counters.writebacks,
        amat: timing.map(|t| amat(miss_rate, t)),
    }
}

/// Average memory access time: `hit_time + miss_rate * miss_penalty`.
pub fn amat(miss_rate: f64, timing: &TimingConfig) -> f64 {
    miss_rate.mul_add(timing.miss_penalty(), timing.hit_time())
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"breakdown"`, `"timing"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "breakdown", "timing"];

impl Statistics {
    /// Renders the requested sections as text.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"breakdown"`,
    /// or `"timing"`. An empty slice selects all sections. The timing section
    /// is omitted when no AMAT was computed.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = Vec::new();

        out.push("==========================================================".to_string());
        out.push("CACHE SIMULATION STATISTICS".to_string());
        out.push("==========================================================".to_string());
        if want("summary") {
            out.push(format!("accesses                 {}", self.total_accesses));
            out.push(format!("hits                     {}", self.hits));
            out.push(format!("misses                   {}", self.misses));
            out.push(format!("hit_rate                 {:.2}%", self.hit_rate * 100.0));
            out.push(format!("miss_rate                {:.2}%", self.miss_rate * 100.0));
            out.push("----------------------------------------------------------".to_string());
        }
        if want("breakdown") {
            out.push("ACCESS BREAKDOWN".to_string());
            out.push(format!("  op.read                {}", self.reads));
            out.push(format!("  op.write               {}", self.writes));
            out.push(format!("  writebacks             {}", self.writebacks));
            out.push("----------------------------------------------------------".to_string());
        }
        if want("timing") {
            if let Some(amat) = self.amat {
                out.push("TIMING".to_string());
                out.push(format!("  amat                   {amat:.2} cycles"));
                out.push("----------------------------------------------------------".to_string());
            }
        }
        out.push("==========================================================".to_string());
        out.join("\n")
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// See [`Statistics::render_sections`] for section names.
    pub fn print_sections(&self, sections: &[String]) {
        println!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
