//! Address decomposition.
//!
//! This module splits a raw byte address into the three fields a
//! set-associative cache indexes by. It provides the following:
//! 1. **Field Extraction:** Tag, set index, and block offset via shifts and masks.
//! 2. **Recomposition:** The inverse mapping, and block base addresses.
//! 3. **Width Safety:** Shift amounts are checked so a full 64-bit address never overflows.

/// An address split into its cache-indexing fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddr {
    /// High-order bits identifying the memory block.
    pub tag: u64,
    /// Bits selecting the set the block maps to.
    pub set_index: usize,
    /// Low-order bits selecting a byte within the block.
    pub block_offset: u64,
}

/// Pure mapping from raw addresses to `(tag, set_index, block_offset)`.
///
/// Built from the bit widths of a validated geometry; both widths are
/// exact base-2 logarithms of power-of-two quantities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

/// Returns a mask with the low `bits` bits set.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl AddressDecoder {
    /// Creates a decoder for the given field widths.
    ///
    /// # Arguments
    ///
    /// * `offset_bits` - `log2(block_size_bytes)`.
    /// * `index_bits` - `log2(num_sets)`.
    pub const fn new(offset_bits: u32, index_bits: u32) -> Self {
        Self {
            offset_bits,
            index_bits,
        }
    }

    /// Number of block-offset bits.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits in a 64-bit address.
    pub const fn tag_bits(&self) -> u32 {
        u64::BITS.saturating_sub(self.offset_bits + self.index_bits)
    }

    /// Splits `address` into its tag, set index, and block offset.
    ///
    /// # Arguments
    ///
    /// * `address` - The raw byte address.
    ///
    /// # Returns
    ///
    /// The decoded fields. `compose` on the result yields `address` again.
    #[inline]
    pub fn decode(&self, address: u64) -> DecodedAddr {
        let block_offset = address & low_mask(self.offset_bits);
        let set_index = address
            .checked_shr(self.offset_bits)
            .unwrap_or(0)
            & low_mask(self.index_bits);
        let tag = address
            .checked_shr(self.offset_bits + self.index_bits)
            .unwrap_or(0);

        DecodedAddr {
            tag,
            set_index: set_index as usize,
            block_offset,
        }
    }

    /// Rebuilds a byte address from its fields.
    ///
    /// `tag << (offset_bits + index_bits) | set_index << offset_bits | block_offset`
    pub fn compose(&self, fields: DecodedAddr) -> u64 {
        let tag = fields
            .tag
            .checked_shl(self.offset_bits + self.index_bits)
            .unwrap_or(0);
        let set = (fields.set_index as u64)
            .checked_shl(self.offset_bits)
            .unwrap_or(0);
        tag | set | fields.block_offset
    }

    /// Returns the address of the first byte of the block holding `address`.
    pub fn block_base(&self, address: u64) -> u64 {
        address & !low_mask(self.offset_bits)
    }
}
