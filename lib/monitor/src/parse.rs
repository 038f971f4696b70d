//! Numeric argument parsing.
//!
//! The base is picked from the prefix: `0x`/`0X` is hexadecimal, a leading
//! `0` is octal, anything else is decimal. The whole token must be consumed;
//! `12ab` or `0x` are errors rather than a partial value.

use core::convert::TryFrom;

use crate::error::CommandError;

/// Parses `s` as an unsigned integer with prefix-selected base.
pub fn parse_u64(s: &str) -> Option<u64> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    // from_str_radix tolerates a sign; strtoul-style input does not get one
    if digits.is_empty() || digits.starts_with('+') || digits.starts_with('-') {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Parses an address, length or count argument named `field`.
pub fn usize_arg(s: &str, field: &'static str) -> Result<usize, CommandError> {
    parse_u64(s)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or(CommandError::Incorrect(field))
}

/// Parses a 32-bit value argument named `field`.
pub fn u32_arg(s: &str, field: &'static str) -> Result<u32, CommandError> {
    parse_u64(s)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(CommandError::Incorrect(field))
}

/// Parses an optional argument, falling back to `default` when it was not
/// given.
pub fn usize_or(s: &str, default: usize, field: &'static str) -> Result<usize, CommandError> {
    if s.is_empty() {
        Ok(default)
    } else {
        usize_arg(s, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_base() {
        assert_eq!(parse_u64("0"), Some(0));
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("0x2a"), Some(42));
        assert_eq!(parse_u64("0X2A"), Some(42));
        assert_eq!(parse_u64("052"), Some(42));
        assert_eq!(parse_u64("0xffffffff"), Some(0xffff_ffff));
    }

    #[test]
    fn rejects_partial_input() {
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("0x"), None);
        assert_eq!(parse_u64("12ab"), None);
        assert_eq!(parse_u64("0x12g"), None);
        assert_eq!(parse_u64("09"), None);
        assert_eq!(parse_u64("-1"), None);
        assert_eq!(parse_u64("+1"), None);
        assert_eq!(parse_u64("0x-1"), None);
        assert_eq!(parse_u64("1 "), None);
    }

    #[test]
    fn typed_arguments_name_the_field() {
        assert_eq!(u32_arg("0x1_0", "value"), Err(CommandError::Incorrect("value")));
        assert_eq!(u32_arg("0x100000000", "value"), Err(CommandError::Incorrect("value")));
        assert_eq!(u32_arg("0xffffffff", "value"), Ok(0xffff_ffff));
        assert_eq!(usize_arg("0x40", "address"), Ok(0x40));
        assert_eq!(usize_or("", 4, "length"), Ok(4));
        assert_eq!(usize_or("16", 4, "length"), Ok(16));
        assert_eq!(usize_or("sixteen", 4, "length"), Err(CommandError::Incorrect("length")));
    }
}
