//! Stable mapping from names to display palette entries.
//!
//! The same string always maps to the same color id, so a slice named
//! "Paint" gets the same color in every thread and every import.

use super::config::NUM_COLOR_IDS;

const HASH_MODULUS: u64 = 0xFFFF_FFFF;

/// Hash a string over its UTF-16 code units
///
/// **Private** - internal helper for string_color_id
fn string_hash(name: &str) -> u64 {
    name.encode_utf16().fold(0u64, |hash, unit| {
        (hash + 37 * hash + 11 * u64::from(unit)) % HASH_MODULUS
    })
}

/// Map a string to a color id in `0..NUM_COLOR_IDS`
///
/// **Public** - used by the importers for slices, counter series and objects
pub fn string_color_id(name: &str) -> usize {
    (string_hash(name) % NUM_COLOR_IDS as u64) as usize
}
