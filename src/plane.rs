//! MSB-first bit-plane packing and plane splitting.
//!
//! A "plane" is one binary raster layer: one bit per pixel, row-major, each
//! row padded to a whole byte. A 2-bit image is represented either packed
//! (4 pixels per byte) or as two planes where
//! `code = plane1_bit * 2 + plane0_bit`. Panels that refresh a red/yellow
//! layer separately consume the planes independently.

use alloc::vec::Vec;

use crate::error::PlaneError;

/// Bytes per packed row: `ceil(width * bits_per_code / 8)`.
pub fn row_pitch(width: u32, bits_per_code: u8) -> usize {
    (width as usize * bits_per_code as usize).div_ceil(8)
}

/// Pack one row of quantized codes MSB-first into `out`.
///
/// The accumulator shifts left by `bits_per_code` before each code is OR-ed
/// in and flushes every 8 bits; a trailing partial byte is left-aligned with
/// zero-filled low bits. Returns the number of bytes written.
pub fn pack_row_into(
    codes: &[u8],
    bits_per_code: u8,
    out: &mut [u8],
) -> Result<usize, PlaneError> {
    debug_assert!(matches!(bits_per_code, 1 | 2));
    let needed = row_pitch(codes.len() as u32, bits_per_code);
    if out.len() < needed {
        return Err(PlaneError::BufferTooSmall {
            needed,
            actual: out.len(),
        });
    }
    let mask = (1u8 << bits_per_code) - 1;
    let mut acc = 0u8;
    let mut remaining = 8u8;
    let mut written = 0usize;
    for &code in codes {
        acc = (acc << bits_per_code) | (code & mask);
        remaining -= bits_per_code;
        if remaining == 0 {
            out[written] = acc;
            written += 1;
            acc = 0;
            remaining = 8;
        }
    }
    if remaining != 8 {
        out[written] = acc << remaining;
        written += 1;
    }
    Ok(written)
}

/// Pack one row of quantized codes into a fresh buffer.
pub fn pack_row(codes: &[u8], bits_per_code: u8) -> Vec<u8> {
    let mut out = alloc::vec![0u8; row_pitch(codes.len() as u32, bits_per_code)];
    // out is sized exactly, so packing cannot fail
    let _ = pack_row_into(codes, bits_per_code, &mut out);
    out
}

/// Which of the two planes of a 2-bit image to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneSelect {
    /// Low bit of each code.
    Plane0,
    /// High bit of each code.
    Plane1,
}

/// Split a row of 2-bit codes into two independently packed 1-bit plane rows.
///
/// Plane 0 carries `code & 1`, plane 1 carries `(code >> 1) & 1`.
pub fn split_planes(codes: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut p0 = alloc::vec![0u8; row_pitch(codes.len() as u32, 1)];
    let mut p1 = alloc::vec![0u8; row_pitch(codes.len() as u32, 1)];
    for (x, &code) in codes.iter().enumerate() {
        let bit = 7 - (x & 7);
        p0[x / 8] |= (code & 1) << bit;
        p1[x / 8] |= ((code >> 1) & 1) << bit;
    }
    (p0, p1)
}

/// Extract one packed 1-bit plane row from a packed 2-bpp row.
///
/// This is the decode-side mirror of [`split_planes`]: a consumer working
/// through the concatenated dual-plane stream only unpacks the bits of the
/// plane it currently wants.
pub fn extract_plane_row(packed: &[u8], width: u32, plane: PlaneSelect) -> Vec<u8> {
    let mut out = alloc::vec![0u8; row_pitch(width, 1)];
    let shift = match plane {
        PlaneSelect::Plane0 => 0,
        PlaneSelect::Plane1 => 1,
    };
    for x in 0..width as usize {
        let code = (packed[x / 4] >> (6 - (x & 3) * 2)) & 0x03;
        out[x / 8] |= ((code >> shift) & 1) << (7 - (x & 7));
    }
    out
}

/// Monochrome approximation of a packed 2-bpp row for fast partial updates.
///
/// The output bit is set (white) only where the code equals `white_code`;
/// every other code renders as black. `white_code` is mode-dependent: 1 for
/// BW/BWR/BWYR, 0 for the inverted 4-gray ramp.
pub fn mono_row(packed: &[u8], width: u32, white_code: u8) -> Vec<u8> {
    let mut out = alloc::vec![0u8; row_pitch(width, 1)];
    for x in 0..width as usize {
        let code = (packed[x / 4] >> (6 - (x & 3) * 2)) & 0x03;
        if code == white_code {
            out[x / 8] |= 1 << (7 - (x & 7));
        }
    }
    out
}

/// Recombine two packed plane rows into 2-bit codes (`plane1 * 2 + plane0`).
pub fn recombine_rows(plane0: &[u8], plane1: &[u8], width: u32) -> Vec<u8> {
    let mut codes = Vec::with_capacity(width as usize);
    for x in 0..width as usize {
        let bit = 7 - (x & 7);
        let b0 = (plane0[x / 8] >> bit) & 1;
        let b1 = (plane1[x / 8] >> bit) & 1;
        codes.push(b1 * 2 + b0);
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_row_partial_byte_is_left_aligned() {
        // 3 pixels of 2-bit code 3 -> 111111xx, low bits zero
        assert_eq!(pack_row(&[3, 3, 3], 2), [0b1111_1100]);
        // 5 one-bit pixels 1,0,1,1,0 -> 10110xxx
        assert_eq!(pack_row(&[1, 0, 1, 1, 0], 1), [0b1011_0000]);
    }

    #[test]
    fn pack_row_into_rejects_short_buffer() {
        let mut out = [0u8; 1];
        let err = pack_row_into(&[0u8; 9], 1, &mut out).unwrap_err();
        assert!(matches!(err, PlaneError::BufferTooSmall { needed: 2, .. }));
    }

    #[test]
    fn split_then_recombine_is_identity() {
        for width in [1usize, 7, 8, 13, 32, 33] {
            let codes: Vec<u8> = (0..width).map(|x| (x % 4) as u8).collect();
            let (p0, p1) = split_planes(&codes);
            assert_eq!(recombine_rows(&p0, &p1, width as u32), codes);
        }
    }

    #[test]
    fn extract_matches_split() {
        let codes: Vec<u8> = (0..13).map(|x| (x * 3 % 4) as u8).collect();
        let packed = pack_row(&codes, 2);
        let (p0, p1) = split_planes(&codes);
        assert_eq!(extract_plane_row(&packed, 13, PlaneSelect::Plane0), p0);
        assert_eq!(extract_plane_row(&packed, 13, PlaneSelect::Plane1), p1);
    }

    #[test]
    fn mono_row_keeps_only_white() {
        let codes = [0u8, 1, 2, 3, 1, 1, 0, 2];
        let packed = pack_row(&codes, 2);
        // white_code = 1 -> bits at x = 1, 4, 5
        assert_eq!(mono_row(&packed, 8, 1), [0b0100_1100]);
        // inverted 4-gray ramp: white_code = 0 -> bits at x = 0, 6
        assert_eq!(mono_row(&packed, 8, 0), [0b1000_0010]);
    }
}
