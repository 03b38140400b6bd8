//! padding/validators.rs
//! Last-block rules. Each function inspects one full held block and returns
//! the number of trailing padding bytes, or a short reason on rejection.

use crate::constants::ISO7816_MARKER;

/// Trailing zero count. Always valid; an all-zero block is entirely padding.
///
/// Legitimate trailing zeros in the plaintext are indistinguishable from
/// padding and are stripped as well.
pub fn zero_padding_len(block: &[u8]) -> usize {
    block.iter().rev().take_while(|&&b| b == 0).count()
}

/// Last byte holds the padding length (PKCS#5, PKCS#7, ANSI X9.23, ISO 10126).
///
/// Only the count byte is checked; the filler bytes differ between the schemes
/// and are ignored. A count of 0 is accepted and strips nothing.
pub fn last_byte_padding_len(block: &[u8]) -> Result<usize, &'static str> {
    let count = match block.last() {
        Some(&b) => b as usize,
        None => return Err("empty block"),
    };
    if count > block.len() {
        return Err("padding length exceeds block size");
    }
    Ok(count)
}

/// ISO/IEC 7816-4: zero bytes back to a single 0x80 marker.
pub fn iso7816_padding_len(block: &[u8]) -> Result<usize, &'static str> {
    for (i, &b) in block.iter().enumerate().rev() {
        match b {
            0x00 => continue,
            ISO7816_MARKER => return Ok(block.len() - i),
            _ => return Err("unexpected byte before 0x80 marker"),
        }
    }
    Err("missing 0x80 marker")
}

