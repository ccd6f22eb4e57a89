//! Cache line state.

/// One storage slot of a set.
///
/// `tag` is only meaningful while `valid` is set. `recency` orders valid
/// lines for replacement: 0 is the most recently used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// The line holds a block.
    pub valid: bool,
    /// Tag of the resident block.
    pub tag: Option<u64>,
    /// Written since it was loaded.
    pub dirty: bool,
    /// Accesses to this set since the line was last touched.
    pub recency: u64,
}

impl CacheLine {
    /// Returns `true` if the line is valid and holds `tag`.
    #[inline(always)]
    pub fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == Some(tag)
    }

    /// Returns `true` if evicting this line requires a writeback.
    #[inline(always)]
    pub const fn needs_writeback(&self) -> bool {
        self.valid && self.dirty
    }
}
