//! Translation from an indexed PNG palette to a panel's native color codes.
//!
//! Panels with a wide native gamut expect each pixel as a device color code,
//! not a palette index. The server preparing images is expected to emit
//! palettes that match the panel exactly, so the mapping is an exact RGB888
//! match; anything else is a warning with a defined fallback, never a guess.

use alloc::vec::Vec;

use crate::error::PlaneError;

/// One native panel color: its RGB888 value and the control code the panel
/// driver expects for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceColor {
    /// 0xRRGGBB.
    pub rgb: u32,
    /// The device's control value for this color.
    pub code: u8,
}

/// Non-fatal conditions found while building a palette map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PaletteWarning {
    /// The PNG's used palette length differs from the device's color count.
    SizeMismatch { palette_len: usize, device_len: usize },
    /// A palette entry has no exact device match; code 0 was substituted.
    EntryUnmapped { index: usize, rgb: u32 },
}

/// Maps source palette indices to device color codes. Owned by the caller
/// and valid only for the image it was built from; rebuild it whenever a new
/// palette arrives.
#[derive(Clone, Debug)]
pub struct PaletteMap {
    codes: Vec<u8>,
    warnings: Vec<PaletteWarning>,
}

impl PaletteMap {
    /// Number of used palette entries covered by the map.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Device code for a source palette index. Out-of-range indices fall
    /// back to code 0 (usually the device's white equivalent).
    pub fn lookup(&self, index: u8) -> u8 {
        self.codes.get(index as usize).copied().unwrap_or(0)
    }

    /// Warnings recorded while building the map.
    pub fn warnings(&self) -> &[PaletteWarning] {
        &self.warnings
    }
}

/// Used length of a PNG palette (3 bytes per entry, up to 256 entries).
///
/// Scans from index 0 and stops at the first pair of two consecutive all-zero
/// triplets. A single 0,0,0 triplet (true black) followed by a non-zero one
/// counts as a valid entry.
pub fn used_palette_len(palette: &[u8]) -> usize {
    let entries = (palette.len() / 3).min(256);
    let mut count = 0;
    for i in 0..entries {
        if triplet_rgb888(palette, i) == 0 {
            if i + 1 >= entries {
                break; // no next triplet; treat as terminator
            }
            if triplet_rgb888(palette, i + 1) == 0 {
                break;
            }
            count += 1; // lone true black
            continue;
        }
        count += 1;
    }
    count
}

fn triplet_rgb888(palette: &[u8], index: usize) -> u32 {
    let off = index * 3;
    (u32::from(palette[off]) << 16) | (u32::from(palette[off + 1]) << 8) | u32::from(palette[off + 2])
}

/// Build the palette-index to device-code map for one image.
///
/// Each used palette entry is matched exactly (RGB888) against the device
/// color table. Unmapped entries get code 0 and a warning; a used length that
/// differs from the device's color count is also only a warning. An empty or
/// missing palette is fatal.
pub fn build_palette_map(
    png_palette: &[u8],
    device: &[DeviceColor],
) -> Result<PaletteMap, PlaneError> {
    let used = used_palette_len(png_palette);
    if used == 0 {
        return Err(PlaneError::InvalidPalette(
            "unable to determine used palette length".into(),
        ));
    }

    let mut warnings = Vec::new();
    if used != device.len() {
        log::warn!(
            "PNG palette has {used} used entries but the device expects {}",
            device.len()
        );
        warnings.push(PaletteWarning::SizeMismatch {
            palette_len: used,
            device_len: device.len(),
        });
    }

    let mut codes = Vec::with_capacity(used);
    for i in 0..used {
        let rgb = triplet_rgb888(png_palette, i);
        match device.iter().find(|c| c.rgb == rgb) {
            Some(color) => codes.push(color.code),
            None => {
                log::warn!(
                    "palette entry {i} ({rgb:#08x}) has no device color; substituting code 0"
                );
                warnings.push(PaletteWarning::EntryUnmapped { index: i, rgb });
                codes.push(0);
            }
        }
    }

    Ok(PaletteMap { codes, warnings })
}

/// Translate a row of palette indices to packed device codes, two pixels per
/// byte: even pixel in the high nibble, odd pixel in the low nibble. Indices
/// past the end of the row pack as code 0.
pub fn pack_device_row(indices: &[u8], map: &PaletteMap) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len().div_ceil(2));
    for pair in indices.chunks(2) {
        let hi = map.lookup(pair[0]);
        let lo = pair.get(1).map(|&i| map.lookup(i)).unwrap_or(0);
        out.push((hi << 4) | lo);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> [DeviceColor; 3] {
        [
            DeviceColor { rgb: 0x000000, code: 0x0 },
            DeviceColor { rgb: 0xff0000, code: 0x3 },
            DeviceColor { rgb: 0x0000ff, code: 0x5 },
        ]
    }

    #[test]
    fn maps_exact_matches() {
        // red, blue, then the double-zero terminator
        let mut palette = [0u8; 768];
        palette[0] = 0xff; // (255, 0, 0)
        palette[5] = 0xff; // (0, 0, 255)
        let map = build_palette_map(&palette, &device()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup(0), 0x3);
        assert_eq!(map.lookup(1), 0x5);
        // size mismatch against 3 device colors is tolerated, but noted
        assert!(matches!(
            map.warnings()[0],
            PaletteWarning::SizeMismatch { palette_len: 2, device_len: 3 }
        ));
    }

    #[test]
    fn lone_black_counts_as_entry() {
        let mut palette = [0u8; 768];
        // entry 0 = black, entry 1 = red, then terminator
        palette[3] = 0xff;
        assert_eq!(used_palette_len(&palette), 2);
        let map = build_palette_map(&palette, &device()).unwrap();
        assert_eq!(map.lookup(0), 0x0);
        assert_eq!(map.lookup(1), 0x3);
    }

    #[test]
    fn unmapped_entry_defaults_to_zero() {
        let mut palette = [0u8; 768];
        palette[0] = 0x12;
        palette[1] = 0x34;
        palette[2] = 0x56;
        let map = build_palette_map(&palette, &device()).unwrap();
        assert_eq!(map.lookup(0), 0);
        assert!(map
            .warnings()
            .iter()
            .any(|w| matches!(w, PaletteWarning::EntryUnmapped { index: 0, rgb: 0x123456 })));
    }

    #[test]
    fn empty_palette_is_fatal() {
        let palette = [0u8; 768];
        assert!(matches!(
            build_palette_map(&palette, &device()),
            Err(PlaneError::InvalidPalette(_))
        ));
    }

    #[test]
    fn out_of_range_lookup_defaults_to_zero() {
        let mut palette = [0u8; 768];
        palette[0] = 0xff;
        let map = build_palette_map(&palette, &device()).unwrap();
        assert_eq!(map.lookup(200), 0);
    }

    #[test]
    fn device_row_packs_two_per_byte() {
        let mut palette = [0u8; 768];
        palette[0] = 0xff; // red -> 0x3
        palette[5] = 0xff; // blue -> 0x5
        let map = build_palette_map(&palette, &device()).unwrap();
        // odd width: last byte's low nibble is 0
        assert_eq!(pack_device_row(&[0, 1, 0], &map), [0x35, 0x30]);
    }
}
