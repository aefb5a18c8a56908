//! Text-form rendering/parsing helpers: hex, string escaping, FourCC
//! delimited form (spec.md §4.1).

use crate::error::CodecError;

/// Render bytes as an uppercase `0x`-prefixed hex string (`DATA`/`CNCT`/
/// unknown-type text form).
pub fn to_hex_upper(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str("0x");
    s.push_str(&hex::encode_upper(bytes));
    s
}

/// Parse a `0x`/`0X`-prefixed (or bare) hex string into bytes.
pub fn from_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    hex::decode(stripped).map_err(|_| CodecError::invalid_string("DATA", s))
}

/// Render a FourCC: `'abcd'` when all four bytes are printable ASCII
/// (0x21-0x7E) and none of them is the single-quote character and the first
/// byte is not `'`; otherwise `0xHHHHHHHH` uppercase (spec.md §4.1).
pub fn fourcc_to_string(bytes: [u8; 4]) -> String {
    let printable = bytes
        .iter()
        .all(|&b| (0x21..=0x7E).contains(&b) && b != b'\'');
    if printable {
        let mut s = String::with_capacity(6);
        s.push('\'');
        for b in bytes {
            s.push(b as char);
        }
        s.push('\'');
        s
    } else {
        format!(
            "0x{:02X}{:02X}{:02X}{:02X}",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}

/// Parse a FourCC from either its `'abcd'` or `0xHHHHHHHH` text form.
pub fn fourcc_from_string(s: &str) -> Result<[u8; 4], CodecError> {
    if let Some(inner) = s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        let bytes = inner.as_bytes();
        if bytes.len() != 4 {
            return Err(CodecError::invalid_string("FC32", s));
        }
        let mut arr = [0u8; 4];
        arr.copy_from_slice(bytes);
        Ok(arr)
    } else if s.starts_with("0x") || s.starts_with("0X") {
        let v = from_hex(s)?;
        if v.len() != 4 {
            return Err(CodecError::invalid_string("FC32", s));
        }
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&v);
        Ok(arr)
    } else {
        Err(CodecError::invalid_string("FC32", s))
    }
}

/// Escape bytes into the quoted string text form: `\n`, `\r`, `\\`, `\"` for
/// their respective bytes, `\xHH` (uppercase) for any other byte < 0x20 or
/// >= 0x7F (spec.md §4.1).
pub fn escape_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            0x0A => out.push_str("\\n"),
            0x0D => out.push_str("\\r"),
            0x5C => out.push_str("\\\\"),
            0x22 => out.push_str("\\\""),
            b if b < 0x20 || b >= 0x7F => out.push_str(&format!("\\x{:02X}", b)),
            b => out.push(b as char),
        }
    }
    out.push('"');
    out
}

/// Reverse [`escape_string`]: `s` must include the surrounding quotes.
/// Rejects any `\X` sequence not in the documented escape set.
pub fn unescape_string(s: &str) -> Result<Vec<u8>, CodecError> {
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CodecError::invalid_string("CSTR", s))?;
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if i + 1 >= bytes.len() {
                return Err(CodecError::invalid_string("CSTR", s));
            }
            match bytes[i + 1] {
                b'n' => {
                    out.push(0x0A);
                    i += 2;
                }
                b'r' => {
                    out.push(0x0D);
                    i += 2;
                }
                b'\\' => {
                    out.push(0x5C);
                    i += 2;
                }
                b'"' => {
                    out.push(0x22);
                    i += 2;
                }
                b'x' => {
                    if i + 3 >= bytes.len() {
                        return Err(CodecError::invalid_string("CSTR", s));
                    }
                    let hex_pair = std::str::from_utf8(&bytes[i + 2..i + 4])
                        .map_err(|_| CodecError::invalid_string("CSTR", s))?;
                    let byte = u8::from_str_radix(hex_pair, 16)
                        .map_err(|_| CodecError::invalid_string("CSTR", s))?;
                    out.push(byte);
                    i += 4;
                }
                _ => return Err(CodecError::invalid_string("CSTR", s)),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_renders_delimited_form() {
        assert_eq!(fourcc_to_string(*b"abcd"), "'abcd'");
    }

    #[test]
    fn fourcc_renders_hex_when_quote_present() {
        assert_eq!(fourcc_to_string(*b"a'cd"), "0x61276364");
    }

    #[test]
    fn escape_round_trips() {
        let raw = b"hi\n\"there\"\\\x01";
        let escaped = escape_string(raw);
        let back = unescape_string(&escaped).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn unescape_rejects_unknown_sequence() {
        assert!(unescape_string("\"\\q\"").is_err());
    }

    #[test]
    fn hex_round_trips() {
        let data = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let s = to_hex_upper(&data);
        assert_eq!(s, "0xDEADBEEF");
        assert_eq!(from_hex(&s).unwrap(), data);
    }
}
