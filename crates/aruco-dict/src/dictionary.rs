//! Marker dictionary: rotation-precoded storage and identification queries.
//!
//! Each marker is kept as four packed byte codes, one per 90° rotation, so
//! identification never rotates bits at query time: an observed grid is
//! packed once and compared byte-wise against every stored rotation.
//! Marker ids are storage indices; a finished dictionary is never mutated,
//! which makes concurrent reads safe without locking.

use crate::bits::{bytes_per_marker, encode_rotations, hamming, BitGrid};
use crate::error::DictionaryError;
use crate::image::GrayImage;

/// Result of a successful [`Dictionary::identify`] query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identification {
    /// Marker id in the dictionary.
    pub id: u32,
    /// Rotation `0..=3` such that the observed grid equals the stored
    /// marker rotated clockwise that many times (up to corrected bits).
    pub rotation: u8,
    /// Hamming distance between observed and matched rotation code.
    pub distance: u32,
}

/// Immutable set of same-sized square markers with an error-correction budget.
///
/// Black cells are encoded as 1-bits. `max_correction_bits` is derived from
/// the minimum pairwise distance of the set; [`Dictionary::identify`] scales
/// it by a caller-supplied rate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    marker_size: usize,
    max_correction_bits: u32,
    /// One entry per marker id: packed bytes of rotations 0°/90°/180°/270°.
    codes: Vec<[Vec<u8>; 4]>,
}

impl Dictionary {
    /// Build from a flat rotation-precoded buffer.
    ///
    /// Layout: per marker, four byte codes of `bytes_per_marker(marker_size)`
    /// bytes each (rotations 0°, 90°, 180°, 270°), markers concatenated in
    /// id order.
    pub fn from_bytes(
        bytes: &[u8],
        marker_size: usize,
        max_correction_bits: u32,
    ) -> Result<Self, DictionaryError> {
        if marker_size == 0 {
            return Err(DictionaryError::InvalidMarkerSize);
        }
        let bpm = bytes_per_marker(marker_size);
        let stride = 4 * bpm;
        if bytes.is_empty() || bytes.len() % stride != 0 {
            return Err(DictionaryError::InvalidByteBuffer {
                len: bytes.len(),
                stride,
            });
        }

        let codes = bytes
            .chunks_exact(stride)
            .map(|marker| {
                [
                    marker[..bpm].to_vec(),
                    marker[bpm..2 * bpm].to_vec(),
                    marker[2 * bpm..3 * bpm].to_vec(),
                    marker[3 * bpm..].to_vec(),
                ]
            })
            .collect();

        Ok(Self {
            marker_size,
            max_correction_bits,
            codes,
        })
    }

    /// Build from canonical bit grids, encoding all four rotations.
    ///
    /// All grids must share the same side length.
    pub fn from_grids(
        grids: &[BitGrid],
        max_correction_bits: u32,
    ) -> Result<Self, DictionaryError> {
        let Some(first) = grids.first() else {
            return Err(DictionaryError::InvalidMarkerCount);
        };
        let marker_size = first.size();
        let mut dict = Self::with_capacity(marker_size, grids.len());
        dict.max_correction_bits = max_correction_bits;
        for grid in grids {
            if grid.size() != marker_size {
                return Err(DictionaryError::GridSizeMismatch {
                    expected: marker_size,
                    got: grid.size(),
                });
            }
            dict.push_code(encode_rotations(grid));
        }
        Ok(dict)
    }

    /// Empty dictionary being populated by the generator.
    pub(crate) fn with_capacity(marker_size: usize, capacity: usize) -> Self {
        Self {
            marker_size,
            max_correction_bits: 0,
            codes: Vec::with_capacity(capacity),
        }
    }

    /// Append one rotation-precoded marker; its id is the new last index.
    pub(crate) fn push_code(&mut self, rotations: [Vec<u8>; 4]) {
        self.codes.push(rotations);
    }

    pub(crate) fn set_max_correction_bits(&mut self, bits: u32) {
        self.max_correction_bits = bits;
    }

    /// Clone the four rotation codes of marker `id`, if present.
    pub(crate) fn clone_code(&self, id: usize) -> Option<[Vec<u8>; 4]> {
        self.codes.get(id).cloned()
    }

    /// Number of markers.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Side length of every marker, in bits.
    #[inline]
    pub fn marker_size(&self) -> usize {
        self.marker_size
    }

    /// Bit-flip budget the dictionary guarantees to correct unambiguously.
    #[inline]
    pub fn max_correction_bits(&self) -> u32 {
        self.max_correction_bits
    }

    /// Packed byte code of marker `id` at `rotation` (0..=3).
    pub fn code_bytes(&self, id: u32, rotation: u8) -> Option<&[u8]> {
        self.codes
            .get(id as usize)
            .and_then(|rots| rots.get(rotation as usize))
            .map(Vec::as_slice)
    }

    /// Canonical (0°) bit grid of marker `id`.
    pub fn grid(&self, id: u32) -> Result<BitGrid, DictionaryError> {
        let rots = self
            .codes
            .get(id as usize)
            .ok_or(DictionaryError::IdOutOfRange {
                id,
                len: self.codes.len(),
            })?;
        BitGrid::unpack(&rots[0], self.marker_size)
    }

    /// Match an observed grid against every marker in all four rotations.
    ///
    /// Returns the minimum-distance candidate if its distance is within
    /// `floor(max_correction_bits * max_correction_rate)`, `Ok(None)`
    /// otherwise (a normal outcome for noise, not an error). Ties resolve
    /// to the lowest id, then the lowest rotation index.
    pub fn identify(
        &self,
        observed: &BitGrid,
        max_correction_rate: f64,
    ) -> Result<Option<Identification>, DictionaryError> {
        if !max_correction_rate.is_finite() || !(0.0..=1.0).contains(&max_correction_rate) {
            return Err(DictionaryError::InvalidCorrectionRate {
                rate: max_correction_rate,
            });
        }
        if observed.size() != self.marker_size {
            return Err(DictionaryError::GridSizeMismatch {
                expected: self.marker_size,
                got: observed.size(),
            });
        }

        let budget = (self.max_correction_bits as f64 * max_correction_rate).floor() as u32;
        let packed = observed.pack();

        let mut best: Option<Identification> = None;
        'scan: for (id, rots) in self.codes.iter().enumerate() {
            for (rot, code) in rots.iter().enumerate() {
                let d = hamming(&packed, code);
                if best.map_or(true, |b| d < b.distance) {
                    best = Some(Identification {
                        id: id as u32,
                        rotation: rot as u8,
                        distance: d,
                    });
                    if d == 0 {
                        break 'scan;
                    }
                }
            }
        }

        Ok(best.filter(|m| m.distance <= budget))
    }

    /// Hamming distance from `bits` to marker `id`.
    ///
    /// With `all_rotations` the minimum over the four stored rotations is
    /// returned, otherwise only the canonical rotation is compared.
    pub fn distance_to_id(
        &self,
        bits: &BitGrid,
        id: u32,
        all_rotations: bool,
    ) -> Result<u32, DictionaryError> {
        if bits.size() != self.marker_size {
            return Err(DictionaryError::GridSizeMismatch {
                expected: self.marker_size,
                got: bits.size(),
            });
        }
        let rots = self
            .codes
            .get(id as usize)
            .ok_or(DictionaryError::IdOutOfRange {
                id,
                len: self.codes.len(),
            })?;

        let packed = bits.pack();
        let n = if all_rotations { 4 } else { 1 };
        let dist = rots[..n]
            .iter()
            .map(|code| hamming(&packed, code))
            .min()
            .unwrap_or(0);
        Ok(dist)
    }

    /// Render the canonical image of marker `id`.
    ///
    /// The coded region is surrounded by `border_bits` rings of black cells
    /// and scaled to `side_pixels × side_pixels` with nearest-neighbor
    /// mapping. Requires at least one pixel per cell.
    pub fn draw_marker(
        &self,
        id: u32,
        side_pixels: usize,
        border_bits: usize,
    ) -> Result<GrayImage, DictionaryError> {
        let grid = self.grid(id)?;
        let cells = self.marker_size + 2 * border_bits;
        if side_pixels < cells {
            return Err(DictionaryError::SidePixelsTooSmall { side_pixels, cells });
        }

        let mut img = GrayImage::filled(side_pixels, side_pixels, 255);
        for py in 0..side_pixels {
            let cy = py * cells / side_pixels;
            for px in 0..side_pixels {
                let cx = px * cells / side_pixels;
                let in_border = cx < border_bits
                    || cy < border_bits
                    || cx >= cells - border_bits
                    || cy >= cells - border_bits;
                let black = in_border || grid.get(cx - border_bits, cy - border_bits);
                if black {
                    img.set(px, py, 0);
                }
            }
        }
        Ok(img)
    }
}
