//! # inkplanes
//!
//! Prepares raster images for reflective e-paper panels that support only a
//! handful of physical colors (2–4) and whose wire format is one or two
//! packed binary bit-planes.
//!
//! The pipeline, encode direction:
//!
//! 1. [`PixelSource`] normalizes any supported source format (1/2/4/8/16/24/32
//!    bpp, indexed/gray/truecolor) to 8-bit RGB.
//! 2. [`quantize`] maps RGB to a small mode-dependent code
//!    ([`ColorMode`]: BW, BWR, BWYR, 4-gray).
//! 3. [`ConvertRequest`] packs the codes MSB-first into rows of a
//!    [`PackedImage`]; 2-bit images split into two 1-bit planes
//!    ([`PackedImage::to_plane_image`]) for the external plane codec.
//! 4. [`Container`] frames the codec's compressed payload with a small
//!    marker/width/height header, optionally rendered as a `0xNN` source
//!    literal ([`to_hex_literal`]) for firmware embedding.
//!
//! The render direction mirrors it: decode the container, run the external
//! plane codec line by line, then either re-split planes
//! ([`plane::extract_plane_row`]) or translate indexed palette entries to
//! device color codes ([`PaletteMap`]).
//!
//! [`ColorPresence`] is an independent pre-pass over packed 2-bit data that
//! determines which codes actually occur, so a caller can pick the cheapest
//! legal panel refresh strategy before committing to a per-line pass.
//!
//! ## Non-Goals
//!
//! - The plane codec itself (run-length/predictive compression) — payloads
//!   are opaque bytes here
//! - PNG/BMP container parsing and panel/SPI bring-up
//! - General color-science quantization — the heuristics are fixed, tuned
//!   for a specific reflective pigment gamut, and bit-exact by contract
//!
//! ## Usage
//!
//! ```
//! use inkplanes::{
//!     ColorMode, Container, ConvertRequest, PixelSource, SourceFormat,
//! };
//! use enough::Unstoppable;
//!
//! // An 8x1 row of pure red, 24-bit RGB
//! let pixels = [[0xffu8, 0x00, 0x00]; 8].concat();
//! let src = PixelSource::new(&pixels, 8, 1, SourceFormat::Truecolor, None)?;
//!
//! let packed = ConvertRequest::new(&src, ColorMode::Bwyr).convert(Unstoppable)?;
//! assert_eq!(packed.rows().next().unwrap(), &[0xff, 0xff]);
//!
//! // Split into plane0 + plane1 rows for the external plane codec,
//! // then frame the compressed result.
//! let planes = packed.to_plane_image(Unstoppable)?;
//! let compressed = planes.rows.clone(); // stand-in for the plane codec
//! let container = Container::dual_plane(8, 1, compressed);
//! let bytes = container.encode();
//! assert_eq!(Container::decode(&bytes)?.width, 8);
//! # Ok::<(), inkplanes::PlaneError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod limits;
mod pixel;

pub mod container;
pub mod convert;
pub mod hex;
pub mod palette;
pub mod plane;
pub mod presence;
pub mod quantize;

// Re-exports
pub use container::{Container, ContainerKind};
pub use convert::{ConvertRequest, PackedImage, PlaneImage};
pub use enough::{Stop, Unstoppable};
pub use error::PlaneError;
pub use hex::{container_from_source, from_hex_literal, to_hex_literal};
pub use limits::Limits;
pub use palette::{DeviceColor, PaletteMap, PaletteWarning};
pub use pixel::{PixelSource, SourceFormat};
pub use presence::{ColorPresence, RefreshStrategy};
pub use quantize::{ColorMode, quantize};
