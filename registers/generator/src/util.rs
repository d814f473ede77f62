// Licensed under the Apache-2.0 license

//! Literal parsing, mask checks and formatting helpers.

use crate::error::{Error, Result};

/// Parses an integer literal as found in schema attributes.
///
/// Accepts `0x` (hexadecimal), `0b` (binary) or plain decimal. Surrounding
/// whitespace is ignored. Returns `None` if the literal is malformed or does
/// not fit in 32 bits.
///
/// # Examples
/// ```
/// use regmap_generator::util::parse_int;
/// assert_eq!(parse_int("0x10"), Some(16));
/// assert_eq!(parse_int("0b101"), Some(5));
/// assert_eq!(parse_int("42"), Some(42));
/// assert_eq!(parse_int("0xg"), None);
/// ```
pub fn parse_int(literal: &str) -> Option<u32> {
    let s = literal.trim();
    if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = s.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok()
    } else {
        s.parse::<u32>().ok()
    }
}

/// Returns true if the set bits of `mask` form a single contiguous run.
///
/// Zero and full masks are contiguous.
///
/// # Examples
/// ```
/// use regmap_generator::util::is_contiguous_mask;
/// assert!(is_contiguous_mask(0b0011100));
/// assert!(!is_contiguous_mask(0b0010110));
/// ```
pub fn is_contiguous_mask(mask: u32) -> bool {
    if mask == 0 {
        return true;
    }
    // Discard trailing zeros, then the run of ones. Nothing may remain.
    let m = mask >> mask.trailing_zeros();
    m.checked_shr(m.trailing_ones()).unwrap_or(0) == 0
}

/// Fails with [`Error::NonContiguousMask`] if `mask` has holes.
pub fn check_mask(node: &str, mask: u32) -> Result<()> {
    if is_contiguous_mask(mask) {
        Ok(())
    } else {
        Err(Error::NonContiguousMask {
            node: node.to_string(),
            mask,
        })
    }
}

/// Returns true if `name` is a valid Rust identifier (keywords excluded).
pub fn is_identifier(name: &str) -> bool {
    syn::parse_str::<syn::Ident>(name).is_ok()
}

/// Formats an integer as a hex constant with underscores for readability.
///
/// Values <= 9 are formatted as decimal; larger values use hex with
/// underscore separators every 4 digits.
///
/// # Examples
/// ```
/// use regmap_generator::util::hex_const;
/// assert_eq!(hex_const(5), "5");
/// assert_eq!(hex_const(0x1234), "0x1234");
/// assert_eq!(hex_const(0x12345678), "0x1234_5678");
/// ```
pub fn hex_const(val: u64) -> String {
    if val > 9 {
        let mut x = String::new();
        for (i, c) in format!("{val:x}").chars().rev().enumerate() {
            if i % 4 == 0 && i != 0 {
                x.push('_');
            }
            x.push(c);
        }
        "0x".to_string() + &x.chars().rev().collect::<String>()
    } else {
        format!("{val}")
    }
}
