//! Source pixel normalization: any supported format to 8-bit RGB.

use rgb::RGB8;

use crate::error::PlaneError;

/// 2-bit to 8-bit gray ramp for non-indexed 2-bpp sources.
const GRAY_2BIT: [u8; 4] = [0x00, 0x55, 0xaa, 0xff];

/// Declared layout of the source pixel data.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// Palette indices, 1/2/4/8 bits per pixel, MSB-first within a byte.
    Indexed { bpp: u8 },
    /// Grayscale, 1/2/4/8 bits per pixel, MSB-first within a byte.
    Gray { bpp: u8 },
    /// Packed 5-6-5 RGB, 2 bytes per pixel, little-endian.
    Rgb565,
    /// 3 bytes per pixel, R,G,B order.
    Truecolor,
    /// 4 bytes per pixel, R,G,B,A order. Alpha is ignored.
    TruecolorAlpha,
}

impl SourceFormat {
    /// Bits per pixel for this format.
    pub fn bits_per_pixel(&self) -> u8 {
        match self {
            Self::Indexed { bpp } | Self::Gray { bpp } => *bpp,
            Self::Rgb565 => 16,
            Self::Truecolor => 24,
            Self::TruecolorAlpha => 32,
        }
    }
}

/// A read-only view of caller-owned source pixels plus an optional palette.
///
/// Rows are assumed packed at `ceil(width * bpp / 8)` bytes each, top-down.
/// The palette, when present, is 3 bytes (R,G,B) per entry.
#[derive(Clone, Copy, Debug)]
pub struct PixelSource<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    format: SourceFormat,
    palette: Option<&'a [u8]>,
    pitch: usize,
}

impl<'a> PixelSource<'a> {
    /// Wrap source pixel data, validating depth, palette and buffer size.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        format: SourceFormat,
        palette: Option<&'a [u8]>,
    ) -> Result<Self, PlaneError> {
        let bpp = format.bits_per_pixel();
        if let SourceFormat::Indexed { bpp } | SourceFormat::Gray { bpp } = format {
            if !matches!(bpp, 1 | 2 | 4 | 8) {
                return Err(PlaneError::UnsupportedBitDepth { bpp });
            }
        }
        if let SourceFormat::Indexed { bpp } = format {
            let pal = palette.ok_or_else(|| {
                PlaneError::InvalidPalette("palette required for indexed source".into())
            })?;
            let needed = 3usize << bpp;
            if pal.len() < needed {
                return Err(PlaneError::InvalidPalette(alloc::format!(
                    "palette has {} bytes, need {needed} for {bpp} bpp",
                    pal.len()
                )));
            }
        }
        let pitch = (width as usize * bpp as usize).div_ceil(8);
        let needed = pitch
            .checked_mul(height as usize)
            .ok_or(PlaneError::DimensionsTooLarge { width, height })?;
        if data.len() < needed {
            return Err(PlaneError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
            palette,
            pitch,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Row stride in bytes.
    pub fn pitch_bytes(&self) -> usize {
        self.pitch
    }

    /// One packed source row.
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.pitch;
        &self.data[start..start + self.pitch]
    }

    /// Decode the pixel at (x, y) to 8-bit RGB.
    ///
    /// `x` and `y` must be inside the image; rows were bounds-checked at
    /// construction so in-range coordinates cannot read past the buffer.
    pub fn read_pixel(&self, x: u32, y: u32) -> RGB8 {
        let row = self.row(y);
        let x = x as usize;
        match self.format {
            SourceFormat::Truecolor => {
                let off = x * 3;
                RGB8::new(row[off], row[off + 1], row[off + 2])
            }
            SourceFormat::TruecolorAlpha => {
                let off = x * 4;
                RGB8::new(row[off], row[off + 1], row[off + 2])
            }
            SourceFormat::Rgb565 => {
                let lo = row[x * 2];
                let hi = row[x * 2 + 1];
                let raw = u16::from(lo) | (u16::from(hi) << 8);
                RGB8::new(hi & 0xf8, ((raw >> 3) & 0xfc) as u8, lo << 3)
            }
            SourceFormat::Indexed { bpp } => self.palette_rgb(sub_byte(row, x, bpp)),
            SourceFormat::Gray { bpp } => {
                let v = sub_byte(row, x, bpp);
                let g = match bpp {
                    8 => v,
                    4 => v | (v << 4),
                    2 => GRAY_2BIT[v as usize],
                    _ => if v != 0 { 0xff } else { 0x00 },
                };
                RGB8::new(g, g, g)
            }
        }
    }

    fn palette_rgb(&self, index: u8) -> RGB8 {
        // new() guarantees the palette covers every index this depth can produce
        let pal = self.palette.unwrap_or(&[]);
        let off = index as usize * 3;
        RGB8::new(pal[off], pal[off + 1], pal[off + 2])
    }
}

/// Extract the MSB-first sub-byte value for pixel `x` at `bpp` bits each.
fn sub_byte(row: &[u8], x: usize, bpp: u8) -> u8 {
    match bpp {
        8 => row[x],
        4 => {
            let byte = row[x / 2];
            if x & 1 == 1 { byte & 0x0f } else { byte >> 4 }
        }
        2 => {
            let byte = row[x / 4];
            (byte >> (6 - (x & 3) * 2)) & 0x03
        }
        _ => {
            let byte = row[x / 8];
            (byte >> (7 - (x & 7))) & 0x01
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb565_unpack_matches_reference_shifts() {
        // 0xF800 = pure red in 5-6-5
        let data = [0x00u8, 0xf8];
        let src = PixelSource::new(&data, 1, 1, SourceFormat::Rgb565, None).unwrap();
        assert_eq!(src.read_pixel(0, 0), RGB8::new(0xf8, 0x00, 0x00));

        // 0x07E0 = pure green
        let data = [0xe0u8, 0x07];
        let src = PixelSource::new(&data, 1, 1, SourceFormat::Rgb565, None).unwrap();
        assert_eq!(src.read_pixel(0, 0), RGB8::new(0x00, 0xfc, 0x00));

        // 0x001F = pure blue
        let data = [0x1fu8, 0x00];
        let src = PixelSource::new(&data, 1, 1, SourceFormat::Rgb565, None).unwrap();
        assert_eq!(src.read_pixel(0, 0), RGB8::new(0x00, 0x00, 0xf8));
    }

    #[test]
    fn gray_nibble_replicates() {
        let data = [0xa3u8];
        let src = PixelSource::new(&data, 2, 1, SourceFormat::Gray { bpp: 4 }, None).unwrap();
        assert_eq!(src.read_pixel(0, 0), RGB8::new(0xaa, 0xaa, 0xaa));
        assert_eq!(src.read_pixel(1, 0), RGB8::new(0x33, 0x33, 0x33));
    }

    #[test]
    fn gray_2bpp_uses_fixed_ramp() {
        // codes 0,1,2,3 packed MSB-first
        let data = [0b00_01_10_11u8];
        let src = PixelSource::new(&data, 4, 1, SourceFormat::Gray { bpp: 2 }, None).unwrap();
        let grays: alloc::vec::Vec<u8> = (0..4).map(|x| src.read_pixel(x, 0).r).collect();
        assert_eq!(grays, [0x00, 0x55, 0xaa, 0xff]);
    }

    #[test]
    fn indexed_requires_palette() {
        let data = [0u8];
        let err = PixelSource::new(&data, 1, 1, SourceFormat::Indexed { bpp: 8 }, None).unwrap_err();
        assert!(matches!(err, PlaneError::InvalidPalette(_)));
    }

    #[test]
    fn unsupported_depth_rejected() {
        let data = [0u8; 8];
        let err = PixelSource::new(&data, 2, 1, SourceFormat::Gray { bpp: 3 }, None).unwrap_err();
        assert!(matches!(err, PlaneError::UnsupportedBitDepth { bpp: 3 }));
    }
}
