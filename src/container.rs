//! Bitmap container framing: a small fixed header around an opaque
//! compressed plane payload.
//!
//! Layout, all little-endian: `marker: u16`, `width: u16`, `height: u16`,
//! `payload_len: u32`, then the payload bytes. The marker distinguishes
//! single-plane from dual-plane payloads; the payload itself belongs to the
//! external plane codec and is never inspected here.

use alloc::vec::Vec;

use crate::error::PlaneError;

/// Marker for a single-plane (1-bit) payload.
pub const SINGLE_PLANE_MARKER: u16 = 0x4231;
/// Marker for a dual-plane (2-bit, plane0 rows then plane1 rows) payload.
pub const DUAL_PLANE_MARKER: u16 = 0x4232;

/// Header size in bytes.
pub const HEADER_LEN: usize = 10;

/// Whether a container frames one plane or two concatenated planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    SinglePlane,
    DualPlane,
}

impl ContainerKind {
    pub fn marker(self) -> u16 {
        match self {
            Self::SinglePlane => SINGLE_PLANE_MARKER,
            Self::DualPlane => DUAL_PLANE_MARKER,
        }
    }
}

/// A framed compressed plane image. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    /// Image width in pixels.
    pub width: u16,
    /// Image height in pixels. For dual-plane payloads the plane codec's
    /// logical height is `2 * height`.
    pub height: u16,
    /// Opaque compressed payload from the plane codec.
    pub payload: Vec<u8>,
}

impl Container {
    pub fn single_plane(width: u16, height: u16, payload: Vec<u8>) -> Self {
        Self {
            kind: ContainerKind::SinglePlane,
            width,
            height,
            payload,
        }
    }

    pub fn dual_plane(width: u16, height: u16, payload: Vec<u8>) -> Self {
        Self {
            kind: ContainerKind::DualPlane,
            width,
            height,
            payload,
        }
    }

    /// The height the plane codec decodes at (doubled for dual-plane).
    pub fn codec_height(&self) -> u32 {
        match self.kind {
            ContainerKind::SinglePlane => u32::from(self.height),
            ContainerKind::DualPlane => u32::from(self.height) * 2,
        }
    }

    /// Serialize header + payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&self.kind.marker().to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse and validate a serialized container.
    ///
    /// The marker is checked before any other field is read; an unrecognized
    /// marker fails with [`PlaneError::InvalidContainer`] without touching
    /// width, height or payload.
    pub fn decode(data: &[u8]) -> Result<Self, PlaneError> {
        let marker_bytes = data.get(0..2).ok_or(PlaneError::UnexpectedEof)?;
        let marker = u16::from_le_bytes([marker_bytes[0], marker_bytes[1]]);
        let kind = match marker {
            SINGLE_PLANE_MARKER => ContainerKind::SinglePlane,
            DUAL_PLANE_MARKER => ContainerKind::DualPlane,
            _ => return Err(PlaneError::InvalidContainer { marker }),
        };
        let header = data.get(2..HEADER_LEN).ok_or(PlaneError::UnexpectedEof)?;
        let width = u16::from_le_bytes([header[0], header[1]]);
        let height = u16::from_le_bytes([header[2], header[3]]);
        let payload_len =
            u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let payload = data
            .get(HEADER_LEN..HEADER_LEN + payload_len)
            .ok_or(PlaneError::UnexpectedEof)?;
        Ok(Self {
            kind,
            width,
            height,
            payload: payload.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let c = Container::dual_plane(800, 480, alloc::vec![1, 2, 3, 4, 5]);
        let bytes = c.encode();
        assert_eq!(bytes.len(), HEADER_LEN + 5);
        let back = Container::decode(&bytes).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.codec_height(), 960);
    }

    #[test]
    fn unknown_marker_fails_before_header_fields() {
        // bogus marker followed by garbage too short to be a header: the
        // marker check must fire, not an EOF from reading width/height
        let bytes = [0xde, 0xad, 0x01];
        match Container::decode(&bytes) {
            Err(PlaneError::InvalidContainer { marker: 0xadde }) => {}
            other => panic!("expected InvalidContainer, got {other:?}"),
        }
    }

    #[test]
    fn truncated_payload_fails() {
        let mut bytes = Container::single_plane(8, 8, alloc::vec![9; 16]).encode();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            Container::decode(&bytes),
            Err(PlaneError::UnexpectedEof)
        ));
    }

    #[test]
    fn empty_input_is_eof() {
        assert!(matches!(
            Container::decode(&[]),
            Err(PlaneError::UnexpectedEof)
        ));
    }
}
