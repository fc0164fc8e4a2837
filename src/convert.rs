//! Whole-image conversion: source pixels to a packed 1- or 2-bit image,
//! and packed 2-bit images to the dual-plane layout the plane codec consumes.

use alloc::vec::Vec;

use enough::Stop;

use crate::error::PlaneError;
use crate::limits::Limits;
use crate::pixel::PixelSource;
use crate::plane::{self, PlaneSelect};
use crate::quantize::{ColorMode, quantize};

/// Conversion request builder.
///
/// ```
/// # use inkplanes::{ColorMode, ConvertRequest, PixelSource, SourceFormat, Limits};
/// # use enough::Unstoppable;
/// # let pixels = [0u8; 12];
/// # let src = PixelSource::new(&pixels, 2, 2, SourceFormat::Truecolor, None)?;
/// let limits = Limits { max_pixels: Some(1 << 20), ..Default::default() };
/// let packed = ConvertRequest::new(&src, ColorMode::Bw)
///     .with_limits(&limits)
///     .convert(Unstoppable)?;
/// # Ok::<(), inkplanes::PlaneError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ConvertRequest<'a> {
    source: &'a PixelSource<'a>,
    mode: ColorMode,
    limits: Option<&'a Limits>,
}

impl<'a> ConvertRequest<'a> {
    pub fn new(source: &'a PixelSource<'a>, mode: ColorMode) -> Self {
        Self {
            source,
            mode,
            limits: None,
        }
    }

    /// Apply resource limits to the conversion.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Quantize and pack every pixel of the source.
    pub fn convert(self, stop: impl Stop) -> Result<PackedImage, PlaneError> {
        let stop: &dyn Stop = &stop;
        let width = self.source.width();
        let height = self.source.height();
        let bits = self.mode.bits_per_pixel();
        let pitch = plane::row_pitch(width, bits);
        let out_bytes = pitch
            .checked_mul(height as usize)
            .ok_or(PlaneError::DimensionsTooLarge { width, height })?;
        if let Some(limits) = self.limits {
            limits.check(width, height)?;
            limits.check_memory(out_bytes)?;
        }

        let mut data = alloc::vec![0u8; out_bytes];
        let mut codes = alloc::vec![0u8; width as usize];
        for y in 0..height {
            if y % 16 == 0 {
                stop.check()?;
            }
            for (x, code) in codes.iter_mut().enumerate() {
                *code = quantize(self.source.read_pixel(x as u32, y), self.mode);
            }
            let row = &mut data[y as usize * pitch..(y as usize + 1) * pitch];
            plane::pack_row_into(&codes, bits, row)?;
        }

        Ok(PackedImage {
            data,
            width,
            height,
            mode: self.mode,
        })
    }
}

/// A quantized image packed at 1 or 2 bits per pixel, row-major,
/// rows padded to whole bytes.
#[derive(Clone, Debug)]
pub struct PackedImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    mode: ColorMode,
}

impl PackedImage {
    /// Wrap already-packed rows (e.g. decoded from an external source).
    ///
    /// `data` must hold exactly `row_pitch(width, bpp) * height` bytes.
    pub fn from_packed(
        data: Vec<u8>,
        width: u32,
        height: u32,
        mode: ColorMode,
    ) -> Result<Self, PlaneError> {
        let needed = plane::row_pitch(width, mode.bits_per_pixel())
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
            mode,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.mode.bits_per_pixel()
    }

    /// Row stride in bytes.
    pub fn pitch_bytes(&self) -> usize {
        plane::row_pitch(self.width, self.mode.bits_per_pixel())
    }

    /// The packed bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over packed rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.pitch_bytes())
    }

    /// One packed row.
    pub fn row(&self, y: u32) -> &[u8] {
        let pitch = self.pitch_bytes();
        &self.data[y as usize * pitch..(y as usize + 1) * pitch]
    }

    /// Lay the image out as the logical binary image the plane codec encodes.
    ///
    /// A 1-bit image passes through as-is. A 2-bit image becomes two
    /// concatenated planes — plane 0 rows for all `height` rows, then plane 1
    /// rows — so the codec sees one image of height `2 * height`. Each plane
    /// is produced by its own stateless pass over the packed data.
    pub fn to_plane_image(&self, stop: impl Stop) -> Result<PlaneImage, PlaneError> {
        let stop: &dyn Stop = &stop;
        if self.mode.bits_per_pixel() == 1 {
            return Ok(PlaneImage {
                rows: self.data.clone(),
                width: self.width,
                logical_height: self.height,
            });
        }
        let plane_pitch = plane::row_pitch(self.width, 1);
        let mut rows = Vec::with_capacity(plane_pitch * self.height as usize * 2);
        for select in [PlaneSelect::Plane0, PlaneSelect::Plane1] {
            for (y, row) in self.rows().enumerate() {
                if y % 16 == 0 {
                    stop.check()?;
                }
                rows.extend_from_slice(&plane::extract_plane_row(row, self.width, select));
            }
        }
        Ok(PlaneImage {
            rows,
            width: self.width,
            logical_height: self.height * 2,
        })
    }

    /// Collapse a 2-bit image to a single monochrome plane: white where the
    /// code is the mode's white, black everywhere else. Used for fast partial
    /// updates when the presence pre-pass shows only 2 distinct codes.
    pub fn to_mono_plane(&self, stop: impl Stop) -> Result<PlaneImage, PlaneError> {
        let stop: &dyn Stop = &stop;
        if self.mode.bits_per_pixel() == 1 {
            return Ok(PlaneImage {
                rows: self.data.clone(),
                width: self.width,
                logical_height: self.height,
            });
        }
        let white = self.mode.white_code();
        let mut rows = Vec::with_capacity(plane::row_pitch(self.width, 1) * self.height as usize);
        for (y, row) in self.rows().enumerate() {
            if y % 16 == 0 {
                stop.check()?;
            }
            rows.extend_from_slice(&plane::mono_row(row, self.width, white));
        }
        Ok(PlaneImage {
            rows,
            width: self.width,
            logical_height: self.height,
        })
    }
}

/// The logical 1-bit image handed to the external plane codec: packed rows,
/// `logical_height` of them (twice the image height for dual-plane layouts).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaneImage {
    pub rows: Vec<u8>,
    pub width: u32,
    pub logical_height: u32,
}

impl PlaneImage {
    /// Row stride in bytes (always the 1-bit pitch).
    pub fn pitch_bytes(&self) -> usize {
        plane::row_pitch(self.width, 1)
    }

    /// One packed plane row by logical index.
    pub fn row(&self, y: u32) -> &[u8] {
        let pitch = self.pitch_bytes();
        &self.rows[y as usize * pitch..(y as usize + 1) * pitch]
    }
}
