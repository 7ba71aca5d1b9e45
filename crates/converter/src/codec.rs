//! Address hierarchy codec.
//!
//! This module turns the raw geometry knobs into an immutable bit partition
//! and provides the pure decomposition/composition functions over it. It
//! covers:
//! 1. **Derivation:** Transaction offset, column/row/bank widths, row and
//!    subarray shifts, and the total configured address width.
//! 2. **Decomposition:** Physical address to outermost-first level vector,
//!    at block (cache-line) or byte granularity.
//! 3. **Composition:** The exact inverse, placing each level at its
//!    accumulated bit offset.
//! 4. **Subarray tests:** Index extraction and the same-subarray predicate
//!    that gates RowClone substitution.
//!
//! The codec never rejects out-of-range input; [`AddressSpec::mask`] is the
//! only normalization. Callers that may hold addresses from a wider space
//! must mask before decomposing, and callers requiring strict validation
//! must validate themselves.

use std::fmt;

use crate::config::GeometryConfig;
use crate::error::ConfigError;

/// Block-granularity level vector: `[bank, row, column]`, outermost first.
///
/// Produced by [`AddressSpec::decompose`]; each field is confined to its
/// level's width. [`AddressSpec::compose`] is the inverse for in-range
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLevels {
    /// Bank index.
    pub bank: u64,
    /// Row index within the bank.
    pub row: u64,
    /// Column (cache line) index within the row.
    pub column: u64,
}

/// Byte-granularity level vector: `[bank, row, column, byte]`.
///
/// The byte field addresses within one channel fetch; its width is the
/// transaction offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteLevels {
    /// Bank index.
    pub bank: u64,
    /// Row index within the bank.
    pub row: u64,
    /// Column (cache line) index within the row.
    pub column: u64,
    /// Byte offset within the channel fetch.
    pub byte: u64,
}

impl fmt::Display for BlockLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.bank, self.row, self.column)
    }
}

impl fmt::Display for ByteLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.bank, self.row, self.column, self.byte
        )
    }
}

/// Immutable derived address partition.
///
/// Built once from a [`GeometryConfig`] and threaded by reference through
/// every codec and converter call; nothing global, so multiple geometries
/// can be exercised in one process without cross-contamination.
///
/// For the default geometry the partition is: transaction offset 6, column
/// width 6, row width 15, bank width 3 — a 30-bit configured address space
/// with the row field starting at bit 12 and the subarray boundary at
/// bit 21.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpec {
    tx_offset: u32,
    column_bits: u32,
    row_bits: u32,
    bank_bits: u32,
    subarray_bits: u32,
    subarray_rows: u64,
}

/// Returns a mask of the low `bits` bits.
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Returns `log2(value)` if `value` is a nonzero power of two.
fn log2_exact(field: &'static str, value: u64) -> Result<u32, ConfigError> {
    if value.is_power_of_two() {
        Ok(value.trailing_zeros())
    } else {
        Err(ConfigError::NotPowerOfTwo { field, value })
    }
}

impl AddressSpec {
    /// Derives the bit partition from a raw geometry configuration.
    ///
    /// The derivation is:
    /// - transaction offset = `log2(prefetch * channel_width / 8)` bytes
    ///   per channel fetch;
    /// - column width = `log2(page_bytes)` minus the transaction offset;
    /// - row width = `log2(density_bits / (page_bytes * 8))` minus the bank
    ///   width;
    /// - bank width = `log2(banks)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a field feeding a `log2` is not a power
    /// of two, a derived width would be negative, or the subarray size does
    /// not evenly divide the rows in a bank.
    pub fn new(config: &GeometryConfig) -> Result<Self, ConfigError> {
        let channel_bits = log2_exact("channel_width_bits", config.channel_width_bits)?;
        if channel_bits < 3 {
            return Err(ConfigError::NegativeWidth {
                field: "channel byte",
                wide: 8,
                narrow: config.channel_width_bits,
            });
        }
        let prefetch_bits = log2_exact("prefetch", config.prefetch)?;
        // Bytes moved per column access: prefetch beats of channel_width bits.
        let tx_offset = prefetch_bits + channel_bits - 3;

        let page_bits = log2_exact("page_kb", config.page_kb)? + 10;
        if page_bits < tx_offset {
            return Err(ConfigError::NegativeWidth {
                field: "column",
                wide: u64::from(tx_offset),
                narrow: u64::from(page_bits),
            });
        }
        let column_bits = page_bits - tx_offset;

        // density_gb gigabits, page_bits + 3 the log2 of bits per row.
        let density_bits = log2_exact("density_gb", config.density_gb)? + 30;
        let row_bits_per_row = page_bits + 3;
        if density_bits < row_bits_per_row {
            return Err(ConfigError::NegativeWidth {
                field: "row",
                wide: u64::from(row_bits_per_row),
                narrow: u64::from(density_bits),
            });
        }
        let rows_total_bits = density_bits - row_bits_per_row;

        let bank_bits = log2_exact("banks", config.banks)?;
        if rows_total_bits < bank_bits {
            return Err(ConfigError::NegativeWidth {
                field: "row",
                wide: u64::from(bank_bits),
                narrow: u64::from(rows_total_bits),
            });
        }
        let row_bits = rows_total_bits - bank_bits;

        let subarray_bits = log2_exact("subarray_rows", config.subarray_rows)?;
        if subarray_bits > row_bits {
            return Err(ConfigError::SubarrayDivision {
                subarray_rows: config.subarray_rows,
                rows_per_bank: 1u64 << row_bits,
            });
        }

        Ok(Self {
            tx_offset,
            column_bits,
            row_bits,
            bank_bits,
            subarray_bits,
            subarray_rows: config.subarray_rows,
        })
    }

    /// Bit offset of the column field: bytes moved per channel fetch.
    #[inline]
    pub const fn tx_offset(&self) -> u32 {
        self.tx_offset
    }

    /// Width of the column (cache line index) field.
    #[inline]
    pub const fn column_bits(&self) -> u32 {
        self.column_bits
    }

    /// Width of the row index field.
    #[inline]
    pub const fn row_bits(&self) -> u32 {
        self.row_bits
    }

    /// Width of the bank index field.
    #[inline]
    pub const fn bank_bits(&self) -> u32 {
        self.bank_bits
    }

    /// Bit position of the row field's low boundary.
    #[inline]
    pub const fn row_shift(&self) -> u32 {
        self.tx_offset + self.column_bits
    }

    /// Bit position of the subarray boundary: `log2(subarray_rows)` above
    /// the row field's low boundary.
    #[inline]
    pub const fn subarray_shift(&self) -> u32 {
        self.row_shift() + self.subarray_bits
    }

    /// Total configured address width in bits.
    #[inline]
    pub const fn total_bits(&self) -> u32 {
        self.row_shift() + self.row_bits + self.bank_bits
    }

    /// Cache lines per row (one per column).
    #[inline]
    pub const fn cache_lines_per_row(&self) -> u64 {
        1u64 << self.column_bits
    }

    /// Clears bits above the configured total width.
    ///
    /// Required before decomposition if the address may come from a wider
    /// address space; this is the only normalization the codec performs.
    #[inline]
    pub const fn mask(&self, addr: u64) -> u64 {
        addr & low_mask(self.total_bits())
    }

    /// Decomposes a physical address into its block-granularity levels.
    ///
    /// Shifts past the transaction offset, then peels each level from
    /// innermost to outermost. Bits above the configured width are ignored.
    pub const fn decompose(&self, addr: u64) -> BlockLevels {
        let a = addr >> self.tx_offset;
        let column = a & low_mask(self.column_bits);
        let a = a >> self.column_bits;
        let row = a & low_mask(self.row_bits);
        let a = a >> self.row_bits;
        let bank = a & low_mask(self.bank_bits);
        BlockLevels { bank, row, column }
    }

    /// Decomposes a physical address down to the byte level.
    pub const fn decompose_bytes(&self, addr: u64) -> ByteLevels {
        let byte = addr & low_mask(self.tx_offset);
        let BlockLevels { bank, row, column } = self.decompose(addr);
        ByteLevels {
            bank,
            row,
            column,
            byte,
        }
    }

    /// Composes a physical address from block-granularity levels.
    ///
    /// Inverse of [`Self::decompose`] for fields confined to their widths:
    /// `compose(decompose(x)) == x` whenever `x == mask(x)` and
    /// `x & (tx - 1) == 0`. Out-of-range fields are not rejected and simply
    /// overflow into the next level.
    pub const fn compose(&self, levels: &BlockLevels) -> u64 {
        let mut addr = levels.bank;
        addr = (addr << self.row_bits) | levels.row;
        addr = (addr << self.column_bits) | levels.column;
        addr << self.tx_offset
    }

    /// Composes a physical address from byte-granularity levels.
    pub const fn compose_bytes(&self, levels: &ByteLevels) -> u64 {
        let block = BlockLevels {
            bank: levels.bank,
            row: levels.row,
            column: levels.column,
        };
        self.compose(&block) | (levels.byte & low_mask(self.tx_offset))
    }

    /// Extracts the subarray index field of an address.
    ///
    /// The field spans from the subarray boundary upward for
    /// `log2(subarray_rows)` bits' worth of index space.
    #[inline]
    pub const fn subarray_index_of(&self, addr: u64) -> u64 {
        (addr >> self.subarray_shift()) & (self.subarray_rows - 1)
    }

    /// Whether two masked addresses fall in the same subarray.
    ///
    /// Two addresses share a subarray iff every field above the subarray
    /// boundary agrees, i.e. equal bank index and equal subarray index.
    #[inline]
    pub const fn same_subarray(&self, a: u64, b: u64) -> bool {
        (a >> self.subarray_shift()) == (b >> self.subarray_shift())
    }

    /// Clears the column and byte fields, yielding the row's base address.
    #[inline]
    pub const fn row_base(&self, addr: u64) -> u64 {
        addr & !low_mask(self.row_shift())
    }

    /// Address of the `index`-th cache line within the row holding `addr`.
    #[inline]
    pub const fn line_address(&self, addr: u64, index: u64) -> u64 {
        self.row_base(addr) + (index << self.tx_offset)
    }
}

impl Default for AddressSpec {
    /// Partition for the default geometry; the default config is statically
    /// known valid.
    fn default() -> Self {
        Self {
            tx_offset: 6,
            column_bits: 6,
            row_bits: 15,
            bank_bits: 3,
            subarray_bits: 9,
            subarray_rows: 512,
        }
    }
}
