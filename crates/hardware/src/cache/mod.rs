//! Set-Associative Cache Model.
//!
//! This module implements a single-level set-associative cache with
//! write-back, write-allocate semantics and LRU replacement. It models
//! hits, misses, and dirty writebacks; no data payload is stored.

/// Validated cache shape.
pub mod geometry;

/// Per-way line state.
pub mod line;

/// Per-index group of ways and the LRU policy.
pub mod set;

pub use geometry::CacheGeometry;
pub use line::CacheLine;
pub use set::CacheSet;

use tracing::{debug, trace};

use crate::common::{AccessError, AccessType, AddressDecoder, ConfigError, DecodedAddr};
use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// A set-associative cache and its access counters.
///
/// Constructed once from a [`CacheGeometry`], mutated by every
/// [`Cache::access`], and read by the statistics reporter.
#[derive(Clone, Debug)]
pub struct Cache {
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    sets: Vec<CacheSet>,
    stats: CacheStats,
}

impl Cache {
    /// Creates an empty cache with the given geometry.
    pub fn new(geometry: CacheGeometry) -> Self {
        let decoder = geometry.decoder();
        debug!(
            total_bytes = geometry.total_bytes(),
            block_size = geometry.block_size_bytes(),
            ways = geometry.associativity(),
            num_sets = geometry.num_sets(),
            offset_bits = decoder.offset_bits(),
            index_bits = decoder.index_bits(),
            policy = %geometry.replacement_policy(),
            "cache constructed"
        );

        Self {
            geometry,
            decoder,
            sets: vec![CacheSet::new(geometry.associativity()); geometry.num_sets()],
            stats: CacheStats::default(),
        }
    }

    /// Validates `config` and creates an empty cache from it.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised by [`CacheConfig::geometry`].
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.geometry()?))
    }

    /// The geometry this cache was built with.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// The address decoder for this cache's geometry.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Access counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// All sets, indexed by set index.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// The set at `index`, if it exists.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    /// Number of valid lines across all sets.
    pub fn valid_lines(&self) -> usize {
        self.sets.iter().map(CacheSet::valid_count).sum()
    }

    /// Checks whether the block holding `address` is resident.
    ///
    /// Does not count as an access and does not change recency.
    pub fn contains(&self, address: u64) -> bool {
        let DecodedAddr { tag, set_index, .. } = self.decoder.decode(address);
        self.sets
            .get(set_index)
            .is_some_and(|set| set.find(tag).is_some())
    }

    /// Performs one read or write.
    ///
    /// On a hit the line becomes most recently used and, for a write, dirty.
    /// On a miss the LRU victim is replaced (counting a writeback if it was
    /// valid and dirty), the new block is installed clean for a read or
    /// dirty for a write, and becomes most recently used.
    ///
    /// # Arguments
    ///
    /// * `address` - The byte address accessed.
    /// * `op` - Read or write.
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    ///
    /// # Errors
    ///
    /// [`AccessError::SetIndexOutOfRange`] if the address decodes outside the
    /// set array. Counters are left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if the set holds the tag in more than one valid way.
    pub fn access(&mut self, address: u64, op: AccessType) -> Result<bool, AccessError> {
        let DecodedAddr {
            tag, set_index, ..
        } = self.decoder.decode(address);

        let num_sets = self.sets.len();
        let set = self
            .sets
            .get_mut(set_index)
            .ok_or(AccessError::SetIndexOutOfRange {
                address,
                set_index,
                num_sets,
            })?;

        match op {
            AccessType::Read => self.stats.reads += 1,
            AccessType::Write => self.stats.writes += 1,
        }

        if let Some(way) = set.find(tag) {
            self.stats.hits += 1;
            set.touch(way);
            if op.is_write() {
                set.mark_dirty(way);
            }
            trace!(address, set_index, tag, way, %op, "hit");
            return Ok(true);
        }

        self.stats.misses += 1;
        let victim = set.select_victim();
        let evicted = set.install(victim, tag, op.is_write());
        if evicted.needs_writeback() {
            self.stats.writebacks += 1;
        }
        set.touch(victim);

        trace!(
            address,
            set_index,
            tag,
            way = victim,
            %op,
            evicted_tag = ?evicted.tag.filter(|_| evicted.valid),
            writeback = evicted.needs_writeback(),
            "miss"
        );
        Ok(false)
    }
}
