//! Color-presence pre-pass over packed 2-bit images.
//!
//! A 2-bit-encoded image often uses fewer codes than it could: a "4-gray"
//! screen full of text is usually pure black and white. Knowing the actual
//! code population up front lets the caller pick a cheap single-plane partial
//! refresh instead of the slow multi-plane full refresh. The scan does O(1)
//! work per packed byte via a 256-entry presence table.

use core::ops::Range;

use enough::Stop;

use crate::convert::PackedImage;
use crate::error::PlaneError;

/// For each byte value, the set of 2-bit groups present when the byte is read
/// as 4 sequential 2-bit fields. Bit `i` marks the presence of code `i`.
const fn two_bit_flags() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut byte = 0usize;
    while byte < 256 {
        let mut flags = 0u8;
        let mut group = 0;
        while group < 4 {
            flags |= 1 << ((byte >> (group * 2)) & 3);
            group += 1;
        }
        table[byte] = flags;
        byte += 1;
    }
    table
}

static TWO_BIT_FLAGS: [u8; 256] = two_bit_flags();

/// Which of the 4 quantized codes occur in an image: bit `i` is set iff
/// code `i` was seen. Bits only ever turn on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorPresence {
    bits: u8,
}

impl ColorPresence {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Fold one packed 2-bpp row into the set.
    ///
    /// Trailing pad bits of a partial byte count as code 0; a full-width
    /// image always contains at least one real code-0-or-padding byte, so
    /// callers caring about exactness should use whole-byte widths.
    pub fn merge_row(&mut self, packed_row: &[u8]) {
        let mut bits = self.bits;
        for &byte in packed_row {
            bits |= TWO_BIT_FLAGS[byte as usize];
        }
        self.bits = bits;
    }

    /// Whether quantized code `code` (0..=3) was seen.
    pub fn contains(&self, code: u8) -> bool {
        self.bits & (1 << (code & 3)) != 0
    }

    /// Number of distinct codes seen (0..=4).
    pub fn distinct_colors(&self) -> u32 {
        u32::from(self.bits.count_ones())
    }

    /// The raw 4-bit set.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Cheapest legal refresh for an image with this code population.
    pub fn refresh_strategy(&self) -> RefreshStrategy {
        if self.distinct_colors() <= 2 {
            RefreshStrategy::PartialMono
        } else {
            RefreshStrategy::FullMultiPlane
        }
    }
}

/// Hardware refresh strategy implied by an image's code population.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshStrategy {
    /// At most 2 distinct codes: the image can be collapsed to one plane and
    /// drawn with a fast, non-flickering partial update.
    PartialMono,
    /// 3 or 4 distinct codes: every plane must be written, full refresh.
    FullMultiPlane,
}

/// Scan a packed 2-bit image and report which codes occur.
///
/// `exclude_rows` skips a band of pixel rows, e.g. a fixed on-screen overlay
/// that should not influence refresh-mode selection. The accumulation is a
/// plain OR-reduction, so row order never affects the result.
pub fn count_colors(
    image: &PackedImage,
    exclude_rows: Option<Range<u32>>,
    stop: impl Stop,
) -> Result<ColorPresence, PlaneError> {
    let stop: &dyn Stop = &stop;
    let mut presence = ColorPresence::empty();
    for (y, row) in image.rows().enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        if let Some(range) = &exclude_rows {
            if range.contains(&(y as u32)) {
                continue;
            }
        }
        presence.merge_row(row);
    }
    Ok(presence)
}
