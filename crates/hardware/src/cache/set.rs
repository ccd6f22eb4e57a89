//! Cache set: hit lookup, recency update, and LRU victim selection.
//!
//! Replacement is driven entirely by the per-line `recency` counters.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `find()`: O(W) where W is the number of ways (associativity)
//!   - `touch()`: O(W)
//!   - `select_victim()`: O(W)
//! - **Space Complexity:** O(W) per set
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Scanning patterns larger than the set (thrashing)

use super::line::CacheLine;

/// A fixed-length group of ways sharing one set index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    /// Creates a set of `ways` invalid lines.
    pub fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
        }
    }

    /// Number of ways.
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// All lines, indexed by way number.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// The line in `way`, if it exists.
    pub fn line(&self, way: usize) -> Option<&CacheLine> {
        self.lines.get(way)
    }

    /// Number of valid lines.
    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }

    /// Looks up the way holding `tag`.
    ///
    /// # Returns
    ///
    /// The way index of the valid line whose tag matches, or `None` on a miss.
    ///
    /// # Panics
    ///
    /// Panics if more than one valid way holds `tag`. Install and hit logic
    /// never produce that state, so reaching it means the simulator is broken
    /// and its statistics cannot be trusted.
    pub fn find(&self, tag: u64) -> Option<usize> {
        let mut matches = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.holds(tag))
            .map(|(way, _)| way);

        let found = matches.next();
        if let (Some(first), Some(second)) = (found, matches.next()) {
            panic!(
                "cache set consistency violated: tag {tag:#x} is valid in ways {first} and {second}"
            );
        }
        found
    }

    /// Marks `way` as most recently used.
    ///
    /// Every other valid line ages by one; the touched line's recency becomes 0.
    ///
    /// # Panics
    ///
    /// Panics if `way` is not a way of this set.
    pub fn touch(&mut self, way: usize) {
        assert!(
            way < self.lines.len(),
            "way {way} out of range for a {}-way set",
            self.lines.len()
        );

        for (i, line) in self.lines.iter_mut().enumerate() {
            if i != way && line.valid {
                line.recency = line.recency.saturating_add(1);
            }
        }
        self.lines[way].recency = 0;
    }

    /// Chooses the way to fill on a miss.
    ///
    /// Two phases: the first invalid way in index order, if any; otherwise
    /// the way with the strictly largest recency, the lowest index winning ties.
    pub fn select_victim(&self) -> usize {
        if let Some(way) = self.lines.iter().position(|line| !line.valid) {
            return way;
        }

        let mut victim = 0;
        let mut oldest = self.lines.first().map_or(0, |line| line.recency);
        for (way, line) in self.lines.iter().enumerate().skip(1) {
            if line.recency > oldest {
                oldest = line.recency;
                victim = way;
            }
        }
        victim
    }

    /// Sets the dirty bit of `way`.
    ///
    /// # Panics
    ///
    /// Panics if `way` is not a way of this set.
    pub fn mark_dirty(&mut self, way: usize) {
        self.lines[way].dirty = true;
    }

    /// Loads `tag` into `way` and returns the line it replaced.
    ///
    /// Does not update recency; callers follow up with [`CacheSet::touch`].
    ///
    /// # Panics
    ///
    /// Panics if `way` is not a way of this set.
    pub fn install(&mut self, way: usize, tag: u64, dirty: bool) -> CacheLine {
        let line = &mut self.lines[way];
        let evicted = *line;
        line.valid = true;
        line.tag = Some(tag);
        line.dirty = dirty;
        evicted
    }
}
