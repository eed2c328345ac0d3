//! Byte-distribution statistics for heuristic classification.
//!
//! High entropy (close to 8.0 for byte data) typically indicates encrypted,
//! compressed, or packed content; a low printable ratio separates binary
//! payloads from plain text.

/// Maximum possible Shannon entropy for byte data.
pub const MAX_ENTROPY: f64 = 8.0;

/// First byte of the printable ASCII range.
const PRINTABLE_LO: u8 = 32;
/// Last byte of the printable ASCII range.
const PRINTABLE_HI: u8 = 126;

/// Calculate Shannon entropy of byte data.
///
/// Returns a value between 0.0 (no randomness) and 8.0 (uniform byte
/// distribution). An empty buffer has entropy 0 by definition.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut frequencies = [0u64; 256];
    for &byte in data {
        frequencies[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;

    for &count in &frequencies {
        if count > 0 {
            let probability = count as f64 / len;
            entropy -= probability * probability.log2();
        }
    }

    entropy
}

/// Fraction of bytes in the printable ASCII range [32, 126].
///
/// An empty buffer has ratio 0.
pub fn printable_ratio(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let printable = data
        .iter()
        .filter(|&&b| (PRINTABLE_LO..=PRINTABLE_HI).contains(&b))
        .count();

    printable as f64 / data.len() as f64
}
