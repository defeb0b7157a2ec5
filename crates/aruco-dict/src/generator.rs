//! Greedy custom dictionary generation.
//!
//! Markers are collected one slot at a time: random grids are proposed
//! until one reaches the current separation target, otherwise the best
//! proposal seen within the trial budget is kept and the target relaxes
//! to what was actually achieved. Settling for a locally-best marker is
//! a quality trade-off, never an error.

use log::debug;
use rand::Rng;

use crate::bits::{encode_rotations, hamming, BitGrid};
use crate::dictionary::Dictionary;
use crate::error::DictionaryError;

/// Random proposals evaluated per marker slot before settling for the
/// best candidate seen so far.
const MAX_PROPOSALS_PER_SLOT: u32 = 100;

/// Generate `n_markers` markers of side `marker_size`, maximizing the
/// minimum pairwise Hamming distance greedily.
///
/// If `base` is given, its first `min(n_markers, base.len())` markers are
/// copied verbatim before any new marker is synthesized; `base` must use
/// the same `marker_size`. Uses a thread-local RNG; see
/// [`generate_custom_dictionary_with_rng`] for reproducible output.
pub fn generate_custom_dictionary(
    n_markers: usize,
    marker_size: usize,
    base: Option<&Dictionary>,
) -> Result<Dictionary, DictionaryError> {
    generate_custom_dictionary_with_rng(n_markers, marker_size, base, &mut rand::thread_rng())
}

/// [`generate_custom_dictionary`] with an explicit RNG for deterministic output.
pub fn generate_custom_dictionary_with_rng<R: Rng + ?Sized>(
    n_markers: usize,
    marker_size: usize,
    base: Option<&Dictionary>,
    rng: &mut R,
) -> Result<Dictionary, DictionaryError> {
    if n_markers == 0 {
        return Err(DictionaryError::InvalidMarkerCount);
    }
    if marker_size == 0 {
        return Err(DictionaryError::InvalidMarkerSize);
    }
    if let Some(base) = base {
        if !base.is_empty() && base.marker_size() != marker_size {
            return Err(DictionaryError::BaseSizeMismatch {
                base: base.marker_size(),
                requested: marker_size,
            });
        }
    }

    let mut dict = Dictionary::with_capacity(marker_size, n_markers);

    if let Some(base) = base {
        for id in 0..base.len().min(n_markers) {
            if let Some(code) = base.clone_code(id) {
                dict.push_code(code);
            }
        }
    }

    let bits = marker_size * marker_size;
    // Random codes differ in bits/2 positions on average; start there and
    // relax only when the search proves the target unreachable.
    let mut target = (bits as u32 / 2).max(1);

    while dict.len() < n_markers {
        let first = propose(marker_size, &dict, rng)?;
        let (mut rotations, mut score) = first;

        let mut trial = 1;
        while score < target && trial < MAX_PROPOSALS_PER_SLOT {
            let (cand, cand_score) = propose(marker_size, &dict, rng)?;
            if cand_score > score {
                rotations = cand;
                score = cand_score;
            }
            trial += 1;
        }

        if score < target {
            debug!(
                "marker slot {}: relaxing separation target {} -> {}",
                dict.len(),
                target,
                score.max(1)
            );
            target = score.max(1);
        }
        dict.push_code(rotations);
    }

    let min_dist = min_pairwise_distance(&dict);
    dict.set_max_correction_bits(min_dist.saturating_sub(1) / 2);
    debug!(
        "generated {} markers of size {}: min distance {}, correcting up to {} bits",
        dict.len(),
        marker_size,
        min_dist,
        dict.max_correction_bits()
    );

    Ok(dict)
}

/// One random candidate and its separation score against the accepted set.
fn propose<R: Rng + ?Sized>(
    marker_size: usize,
    dict: &Dictionary,
    rng: &mut R,
) -> Result<([Vec<u8>; 4], u32), DictionaryError> {
    let grid = BitGrid::random(marker_size, rng)?;
    let rotations = encode_rotations(&grid);
    let score = candidate_score(&rotations, dict);
    Ok((rotations, score))
}

/// Minimum Hamming distance of a candidate to everything already accepted,
/// including its own non-zero rotations (rotational self-ambiguity).
fn candidate_score(rotations: &[Vec<u8>; 4], dict: &Dictionary) -> u32 {
    let canonical = &rotations[0];

    let mut min = rotations[1..]
        .iter()
        .map(|r| hamming(canonical, r))
        .min()
        .unwrap_or(u32::MAX);

    for id in 0..dict.len() as u32 {
        for rot in 0u8..4 {
            // dist(cand rot r, marker rot s) == dist(cand rot 0, marker rot s-r),
            // so comparing the canonical candidate against all four stored
            // rotations covers every rotation pairing.
            if let Some(code) = dict.code_bytes(id, rot) {
                min = min.min(hamming(canonical, code));
            }
        }
    }
    min
}

/// Minimum distance over all distinct marker pairs (any rotation pairing)
/// and over every marker's own rotations.
fn min_pairwise_distance(dict: &Dictionary) -> u32 {
    let bits = dict.marker_size() * dict.marker_size();
    let mut min = bits as u32;

    for i in 0..dict.len() as u32 {
        let Some(canonical) = dict.code_bytes(i, 0) else {
            continue;
        };
        for rot in 1u8..4 {
            if let Some(code) = dict.code_bytes(i, rot) {
                min = min.min(hamming(canonical, code));
            }
        }
        for j in (i + 1)..dict.len() as u32 {
            for rot in 0u8..4 {
                if let Some(code) = dict.code_bytes(j, rot) {
                    min = min.min(hamming(canonical, code));
                }
            }
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generate(n: usize, size: usize, seed: u64) -> Dictionary {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_custom_dictionary_with_rng(n, size, None, &mut rng).unwrap()
    }

    #[test]
    fn generates_requested_count_and_size() {
        let dict = generate(10, 4, 42);
        assert_eq!(dict.len(), 10);
        assert_eq!(dict.marker_size(), 4);
        for id in 0..10 {
            assert_eq!(dict.grid(id).unwrap().size(), 4);
        }
    }

    #[test]
    fn correction_budget_respects_separation_guarantee() {
        let dict = generate(12, 5, 7);
        let min_dist = min_pairwise_distance(&dict);
        assert!(2 * dict.max_correction_bits() + 1 <= min_dist.max(1));
    }

    #[test]
    fn markers_are_mutually_identifiable() {
        let dict = generate(10, 5, 3);
        for id in 0..dict.len() as u32 {
            let grid = dict.grid(id).unwrap();
            let m = dict.identify(&grid, 1.0).unwrap().unwrap();
            assert_eq!(m.id, id);
            assert_eq!(m.distance, 0);
        }
    }

    #[test]
    fn base_dictionary_markers_are_kept_verbatim() {
        let base = generate(6, 4, 11);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let dict = generate_custom_dictionary_with_rng(10, 4, Some(&base), &mut rng).unwrap();

        assert_eq!(dict.len(), 10);
        for id in 0..6u32 {
            for rot in 0u8..4 {
                assert_eq!(dict.code_bytes(id, rot), base.code_bytes(id, rot));
            }
        }
    }

    #[test]
    fn oversized_base_is_truncated_without_new_markers() {
        let base = generate(8, 4, 13);
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let dict = generate_custom_dictionary_with_rng(5, 4, Some(&base), &mut rng).unwrap();

        assert_eq!(dict.len(), 5);
        for id in 0..5u32 {
            assert_eq!(dict.code_bytes(id, 0), base.code_bytes(id, 0));
        }
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            generate_custom_dictionary_with_rng(0, 4, None, &mut rng),
            Err(DictionaryError::InvalidMarkerCount)
        ));
        assert!(matches!(
            generate_custom_dictionary_with_rng(4, 0, None, &mut rng),
            Err(DictionaryError::InvalidMarkerSize)
        ));

        let base = generate(3, 5, 1);
        assert!(matches!(
            generate_custom_dictionary_with_rng(6, 4, Some(&base), &mut rng),
            Err(DictionaryError::BaseSizeMismatch {
                base: 5,
                requested: 4
            })
        ));
    }

    #[test]
    fn deterministic_for_equal_seeds() {
        let a = generate(8, 5, 77);
        let b = generate(8, 5, 77);
        assert_eq!(a, b);
    }
}
