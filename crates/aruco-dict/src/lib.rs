//! Rotation-invariant binary codebooks for square fiducial markers.
//!
//! This crate covers the algorithmic core of ArUco-style marker handling:
//! - a packed byte codec for square bit grids and their four rotations,
//! - [`Dictionary`]: identification of noisy observations by Hamming
//!   distance with a per-dictionary correction budget,
//! - built-in dictionaries behind [`get_predefined_dictionary`],
//! - greedy generation of custom dictionaries with
//!   [`generate_custom_dictionary`],
//! - canonical marker rendering via [`Dictionary::draw_marker`].
//!
//! It does **not** detect markers in images. The expected input is a
//! thresholded, perspective-corrected bit grid produced by an external
//! extraction pipeline; the rendered [`GrayImage`] raster is likewise
//! handed off to external print or display code.

mod bits;
mod builtins;
mod dictionary;
mod error;
mod generator;
mod image;
mod io;

pub use bits::{bytes_per_marker, encode_rotations, hamming, BitGrid};
pub use builtins::{get_predefined_dictionary, PredefinedDictionary};
pub use dictionary::{Dictionary, Identification};
pub use error::DictionaryError;
pub use generator::{generate_custom_dictionary, generate_custom_dictionary_with_rng};
pub use image::GrayImage;
pub use io::DictionaryData;
