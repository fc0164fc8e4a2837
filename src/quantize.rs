//! Fixed-threshold color quantization for reflective panel gamuts.
//!
//! The BWR/BWYR heuristics are empirically tuned comparisons for a specific
//! reflective pigment set, not a nearest-neighbor color match. The exact
//! integer comparisons and truncations are part of the contract: both the
//! offline converter and the on-device renderer must produce identical codes
//! for identical input.

use rgb::RGB8;

/// Target panel color set. Fixed for the duration of one conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// 1-bit black/white.
    Bw,
    /// 2-bit black/white/red. Code 2 is reserved and never produced.
    Bwr,
    /// 2-bit black/white/yellow/red.
    Bwyr,
    /// 2-bit, 4 gray levels stored as an inverted ramp (darker = larger code).
    FourGray,
}

impl ColorMode {
    /// Bits per quantized code (1 or 2).
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Bw => 1,
            Self::Bwr | Self::Bwyr | Self::FourGray => 2,
        }
    }

    /// The code that renders as white on this mode's panel.
    ///
    /// 4-gray stores an inverted ramp, so its brightest bucket is code 0.
    pub fn white_code(self) -> u8 {
        match self {
            Self::FourGray => 0,
            _ => 1,
        }
    }
}

/// Map an RGB triple to this mode's quantized code.
///
/// Output is always below `1 << mode.bits_per_pixel()`.
pub fn quantize(rgb: RGB8, mode: ColorMode) -> u8 {
    let (r, g, b) = (i32::from(rgb.r), i32::from(rgb.g), i32::from(rgb.b));
    match mode {
        ColorMode::Bw => {
            let gray = (r + g * 2 + b) / 4;
            (gray >> 7) as u8
        }
        ColorMode::FourGray => {
            let gray = (r + g * 2 + b) / 4;
            (3 ^ (gray >> 6)) as u8
        }
        ColorMode::Bwr => bwr_code(r, g, b),
        ColorMode::Bwyr => bwyr_code(r, g, b),
    }
}

/// Match to black (0), white (1) or red (3).
fn bwr_code(r: i32, g: i32, b: i32) -> u8 {
    let gr = (b + r + g * 2) >> 2;
    if r > g && r > b {
        // red is dominant
        if gr < 100 && r < 80 {
            0 // dark enough to stay black
        } else if r - b > 32 && r - g > 32 {
            3 // red (3 rather than 2, numerically compatible with BWYR)
        } else {
            1 // pinkish/yellowish reads better as white
        }
    } else if gr >= 100 {
        1
    } else {
        0
    }
}

/// Match to black (0), white (1), yellow (2) or red (3).
fn bwyr_code(r: i32, g: i32, b: i32) -> u8 {
    let gr = (b + r + g * 2) >> 2;
    if r > b || g > b {
        // red or yellow is dominant
        if gr < 90 && r < 80 && g < 80 {
            0
        } else if r - b > 32 && r - g > 32 {
            3
        } else if r - b > 32 && g - b > 32 {
            2
        } else {
            1
        }
    } else if gr >= 100 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_corners() -> impl Iterator<Item = RGB8> {
        // channel extremes plus mid values catch every comparison branch
        const V: [u8; 5] = [0, 64, 100, 160, 255];
        V.iter().flat_map(|&r| {
            V.iter()
                .flat_map(move |&g| V.iter().map(move |&b| RGB8::new(r, g, b)))
        })
    }

    #[test]
    fn bw_is_top_bit_of_gray() {
        for px in all_corners() {
            let gray = (u32::from(px.r) + u32::from(px.g) * 2 + u32::from(px.b)) / 4;
            let want = u8::from(gray >= 128);
            assert_eq!(quantize(px, ColorMode::Bw), want, "{px:?}");
        }
    }

    #[test]
    fn four_gray_is_inverted_ramp() {
        assert_eq!(quantize(RGB8::new(0, 0, 0), ColorMode::FourGray), 3);
        assert_eq!(quantize(RGB8::new(255, 255, 255), ColorMode::FourGray), 0);
        assert_eq!(quantize(RGB8::new(0x55, 0x55, 0x55), ColorMode::FourGray), 2);
        assert_eq!(quantize(RGB8::new(0xaa, 0xaa, 0xaa), ColorMode::FourGray), 1);
    }

    #[test]
    fn bwr_never_yields_code_two() {
        for px in all_corners() {
            let code = quantize(px, ColorMode::Bwr);
            assert_ne!(code, 2, "{px:?}");
            assert!(code <= 3);
        }
    }

    #[test]
    fn codes_fit_mode_bit_width() {
        for px in all_corners() {
            assert!(quantize(px, ColorMode::Bw) <= 1);
            assert!(quantize(px, ColorMode::FourGray) <= 3);
            assert!(quantize(px, ColorMode::Bwyr) <= 3);
        }
    }

    #[test]
    fn bwr_reference_colors() {
        assert_eq!(quantize(RGB8::new(255, 0, 0), ColorMode::Bwr), 3);
        assert_eq!(quantize(RGB8::new(255, 255, 255), ColorMode::Bwr), 1);
        assert_eq!(quantize(RGB8::new(0, 0, 0), ColorMode::Bwr), 0);
        // dark red below both thresholds stays black
        assert_eq!(quantize(RGB8::new(70, 10, 10), ColorMode::Bwr), 0);
        // pale pink: red dominant but not by 32 on both channels
        assert_eq!(quantize(RGB8::new(220, 200, 200), ColorMode::Bwr), 1);
    }

    #[test]
    fn bwyr_reference_colors() {
        assert_eq!(quantize(RGB8::new(255, 0, 0), ColorMode::Bwyr), 3);
        assert_eq!(quantize(RGB8::new(255, 255, 0), ColorMode::Bwyr), 2);
        assert_eq!(quantize(RGB8::new(255, 255, 255), ColorMode::Bwyr), 1);
        assert_eq!(quantize(RGB8::new(0, 0, 0), ColorMode::Bwyr), 0);
        // blue-dominant mid gray goes through the white/black branch
        assert_eq!(quantize(RGB8::new(10, 10, 200), ColorMode::Bwyr), 0);
    }
}
