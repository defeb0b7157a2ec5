//! Serializable dictionary data model.
//!
//! Only the canonical (0°) byte code of each marker is persisted; the
//! rotation cache is rebuilt on load so a stored file can never disagree
//! with its own rotations.

use serde::{Deserialize, Serialize};

use crate::bits::{encode_rotations, BitGrid};
use crate::dictionary::Dictionary;
use crate::error::DictionaryError;

/// JSON-friendly mirror of a [`Dictionary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryData {
    pub marker_size: usize,
    pub max_correction_bits: u32,
    /// Canonical packed byte code per marker, in id order.
    pub codes: Vec<Vec<u8>>,
}

impl Dictionary {
    /// Extract the persistable form of this dictionary.
    pub fn to_data(&self) -> DictionaryData {
        let codes = (0..self.len() as u32)
            .filter_map(|id| self.code_bytes(id, 0).map(<[u8]>::to_vec))
            .collect();
        DictionaryData {
            marker_size: self.marker_size(),
            max_correction_bits: self.max_correction_bits(),
            codes,
        }
    }

    /// Rebuild a dictionary from its persisted form, re-encoding rotations.
    pub fn from_data(data: &DictionaryData) -> Result<Self, DictionaryError> {
        if data.marker_size == 0 {
            return Err(DictionaryError::InvalidMarkerSize);
        }
        if data.codes.is_empty() {
            return Err(DictionaryError::InvalidMarkerCount);
        }

        let mut dict = Dictionary::with_capacity(data.marker_size, data.codes.len());
        dict.set_max_correction_bits(data.max_correction_bits);
        for code in &data.codes {
            let grid = BitGrid::unpack(code, data.marker_size)?;
            dict.push_code(encode_rotations(&grid));
        }
        Ok(dict)
    }
}
