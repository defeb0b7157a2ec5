//! Square bit grids, 90° rotation, and the packed byte codec.
//!
//! A marker's source of truth is its canonical (0°) [`BitGrid`]. The packed
//! byte form exists so Hamming distances can be computed byte-wise against a
//! popcount table instead of bit by bit; the four rotation encodings produced
//! by [`encode_rotations`] are a derived cache, never decoded independently.

use rand::Rng;

use crate::error::DictionaryError;

/// Square boolean grid, row-major. `true` means a black cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitGrid {
    size: usize,
    bits: Vec<bool>,
}

impl BitGrid {
    /// All-white grid of side `size`.
    pub fn new(size: usize) -> Result<Self, DictionaryError> {
        if size == 0 {
            return Err(DictionaryError::InvalidMarkerSize);
        }
        Ok(Self {
            size,
            bits: vec![false; size * size],
        })
    }

    /// Grid from row-major cells; `bits.len()` must equal `size * size`.
    pub fn from_bits(size: usize, bits: Vec<bool>) -> Result<Self, DictionaryError> {
        if size == 0 || bits.len() != size * size {
            return Err(DictionaryError::InvalidMarkerSize);
        }
        Ok(Self { size, bits })
    }

    /// Uniformly random grid, used by the dictionary generator.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, DictionaryError> {
        if size == 0 {
            return Err(DictionaryError::InvalidMarkerSize);
        }
        let bits = (0..size * size).map(|_| rng.gen::<bool>()).collect();
        Ok(Self { size, bits })
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at column `x`, row `y`. Panics if out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.size && y < self.size);
        self.bits[y * self.size + x]
    }

    /// Set cell at column `x`, row `y`. Panics if out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        assert!(x < self.size && y < self.size);
        self.bits[y * self.size + x] = value;
    }

    /// Grid rotated 90° clockwise. Four applications are the identity.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size;
        let mut out = vec![false; n * n];
        for y in 0..n {
            for x in 0..n {
                // dst(x, y) <- src(y, n-1-x)
                out[y * n + x] = self.bits[(n - 1 - x) * n + y];
            }
        }
        Self { size: n, bits: out }
    }

    /// Pack row-major into bytes, most-significant bit first.
    ///
    /// The last byte is zero-padded in its low-order bits when the cell
    /// count is not a multiple of 8.
    pub fn pack(&self) -> Vec<u8> {
        let nbits = self.size * self.size;
        let mut out = vec![0u8; bytes_per_marker(self.size)];
        for (k, &bit) in self.bits.iter().enumerate().take(nbits) {
            if bit {
                out[k / 8] |= 1 << (7 - (k % 8));
            }
        }
        out
    }

    /// Inverse of [`BitGrid::pack`] for the canonical rotation.
    pub fn unpack(bytes: &[u8], size: usize) -> Result<Self, DictionaryError> {
        if size == 0 {
            return Err(DictionaryError::InvalidMarkerSize);
        }
        let expected = bytes_per_marker(size);
        if bytes.len() != expected {
            return Err(DictionaryError::InvalidByteCode {
                len: bytes.len(),
                expected,
                marker_size: size,
            });
        }
        let nbits = size * size;
        let mut bits = Vec::with_capacity(nbits);
        for k in 0..nbits {
            bits.push((bytes[k / 8] >> (7 - (k % 8))) & 1 == 1);
        }
        Ok(Self { size, bits })
    }
}

/// Bytes needed to pack one `size × size` marker: `ceil(size²/8)`.
#[inline]
pub fn bytes_per_marker(size: usize) -> usize {
    (size * size + 7) / 8
}

/// Packed bytes of the four clockwise rotations (0°, 90°, 180°, 270°).
pub fn encode_rotations(grid: &BitGrid) -> [Vec<u8>; 4] {
    let r1 = grid.rotated_cw();
    let r2 = r1.rotated_cw();
    let r3 = r2.rotated_cw();
    [grid.pack(), r1.pack(), r2.pack(), r3.pack()]
}

/// Per-byte popcount lookup table.
static POPCOUNT: [u8; 256] = build_popcount();

const fn build_popcount() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
}

/// Hamming distance between two packed byte codes of equal length.
#[inline]
pub fn hamming(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| POPCOUNT[(x ^ y) as usize] as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pack_unpack_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for size in 1..=9 {
            let grid = BitGrid::random(size, &mut rng).unwrap();
            let packed = grid.pack();
            assert_eq!(packed.len(), bytes_per_marker(size));
            let back = BitGrid::unpack(&packed, size).unwrap();
            assert_eq!(grid, back);
        }
    }

    #[test]
    fn pack_is_msb_first() {
        // Single black cell in the top-left corner of a 3x3 grid.
        let mut grid = BitGrid::new(3).unwrap();
        grid.set(0, 0, true);
        assert_eq!(grid.pack(), vec![0b1000_0000, 0]);

        // Cell index 8 lands in the second byte, high bit.
        let mut grid = BitGrid::new(3).unwrap();
        grid.set(2, 2, true);
        assert_eq!(grid.pack(), vec![0, 0b1000_0000]);
    }

    #[test]
    fn last_byte_low_bits_are_zero_padding() {
        let grid = BitGrid::from_bits(3, vec![true; 9]).unwrap();
        let packed = grid.pack();
        // 9 bits -> 0b11111111, 0b10000000
        assert_eq!(packed, vec![0xff, 0x80]);
    }

    #[test]
    fn rotation_four_times_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for size in 1..=8 {
            for grid in [
                BitGrid::from_bits(size, vec![false; size * size]).unwrap(),
                BitGrid::from_bits(size, vec![true; size * size]).unwrap(),
                BitGrid::random(size, &mut rng).unwrap(),
            ] {
                let r = grid
                    .rotated_cw()
                    .rotated_cw()
                    .rotated_cw()
                    .rotated_cw();
                assert_eq!(grid, r);
            }
        }
    }

    #[test]
    fn rotation_moves_top_left_to_top_right() {
        let mut grid = BitGrid::new(4).unwrap();
        grid.set(0, 0, true);
        let r = grid.rotated_cw();
        assert!(r.get(3, 0));
        assert!(!r.get(0, 0));
    }

    #[test]
    fn rotated_encodings_decode_to_rotated_grids() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = BitGrid::random(5, &mut rng).unwrap();
        let rots = encode_rotations(&grid);

        let mut expected = grid.clone();
        for code in &rots {
            assert_eq!(BitGrid::unpack(code, 5).unwrap(), expected);
            expected = expected.rotated_cw();
        }
    }

    #[test]
    fn hamming_matches_naive_bit_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for size in [4usize, 5, 6, 7] {
            let a = BitGrid::random(size, &mut rng).unwrap();
            let b = BitGrid::random(size, &mut rng).unwrap();

            let mut naive = 0u32;
            for y in 0..size {
                for x in 0..size {
                    if a.get(x, y) != b.get(x, y) {
                        naive += 1;
                    }
                }
            }
            assert_eq!(hamming(&a.pack(), &b.pack()), naive);
        }
    }

    #[test]
    fn unpack_rejects_wrong_length() {
        assert!(matches!(
            BitGrid::unpack(&[0u8; 3], 4),
            Err(DictionaryError::InvalidByteCode { .. })
        ));
    }
}
