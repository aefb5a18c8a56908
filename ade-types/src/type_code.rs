//! The closed set of ADE type codes.
//!
//! A type code is four raw bytes, not necessarily ASCII (`Cnct` and `CNCT`
//! are distinct codes that differ only in case, both present in the closed
//! set used by this format). [`TypeCode`] is therefore a plain byte-array
//! newtype rather than a Rust `enum`; [`TypeCode::is_known`] and the
//! registry in [`crate::registry`] provide the exhaustiveness the spec asks
//! for.

use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// A four-byte ADE type code, e.g. `UI32` or `CONT`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeCode([u8; 4]);

macro_rules! known_codes {
    ($($name:ident => $bytes:expr),* $(,)?) => {
        impl TypeCode {
            $(
                #[allow(missing_docs)]
                pub const $name: TypeCode = TypeCode(*$bytes);
            )*

            /// All type codes in the closed set, in table order.
            pub const ALL: &'static [TypeCode] = &[$(TypeCode::$name),*];
        }
    };
}

known_codes! {
    UI01 => b"UI01",
    UI08 => b"UI08",
    UI16 => b"UI16",
    UI32 => b"UI32",
    UI64 => b"UI64",
    SI08 => b"SI08",
    SI16 => b"SI16",
    SI32 => b"SI32",
    SI64 => b"SI64",
    FP32 => b"FP32",
    FP64 => b"FP64",
    UF32 => b"UF32",
    UF64 => b"UF64",
    SF32 => b"SF32",
    SF64 => b"SF64",
    UR32 => b"UR32",
    UR64 => b"UR64",
    SR32 => b"SR32",
    SR64 => b"SR64",
    FC32 => b"FC32",
    IP32 => b"IP32",
    IPAD => b"IPAD",
    UUID => b"UUID",
    CSTR => b"CSTR",
    USTR => b"USTR",
    DATA => b"DATA",
    CNCT => b"CNCT",
    /// The mixed-case sibling of `CNCT`, a distinct code in the closed set.
    CNCT_MIXED => b"Cnct",
    NULL => b"NULL",
    CONT => b"CONT",
}

impl TypeCode {
    /// Build a type code from raw bytes without checking membership in the
    /// closed set; used while decoding so unknown codes remain
    /// round-trippable (spec.md §9).
    pub const fn from_raw(bytes: [u8; 4]) -> Self {
        TypeCode(bytes)
    }

    /// The raw four bytes of this code.
    pub const fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// True if this code is a member of the closed set the registry knows
    /// how to decode/encode.
    pub fn is_known(&self) -> bool {
        Self::ALL.contains(self)
    }

    /// True if this is the container type code.
    pub fn is_container(&self) -> bool {
        *self == TypeCode::CONT
    }

    /// Canonical label form: four printable ASCII characters if all bytes
    /// are printable (0x21-0x7E), else the hex escape `0xHHHHHHHH`.
    pub fn label(&self) -> String {
        if self.0.iter().all(|&b| (0x21..=0x7E).contains(&b)) {
            // SAFETY: just checked every byte is in the printable ASCII range.
            std::str::from_utf8(&self.0).unwrap().to_owned()
        } else {
            format!(
                "0x{:02X}{:02X}{:02X}{:02X}",
                self.0[0], self.0[1], self.0[2], self.0[3]
            )
        }
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({})", self.label())
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TypeCode {
    type Err = CodecError;

    /// Parses either four printable ASCII characters or the hex form
    /// `0xHHHHHHHH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            if hex.len() != 8 {
                return Err(CodecError::InvalidString {
                    type_code: "type-code".into(),
                    literal: s.to_owned(),
                });
            }
            let mut bytes = [0u8; 4];
            for i in 0..4 {
                bytes[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| {
                    CodecError::InvalidString {
                        type_code: "type-code".into(),
                        literal: s.to_owned(),
                    }
                })?;
            }
            Ok(TypeCode(bytes))
        } else {
            let bytes = s.as_bytes();
            if bytes.len() != 4 {
                return Err(CodecError::InvalidString {
                    type_code: "type-code".into(),
                    literal: s.to_owned(),
                });
            }
            let mut arr = [0u8; 4];
            arr.copy_from_slice(bytes);
            Ok(TypeCode(arr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_renders_printable_fourcc() {
        assert_eq!(TypeCode::UI32.label(), "UI32");
    }

    #[test]
    fn label_renders_hex_for_non_printable() {
        let tc = TypeCode::from_raw([0x00, 0x00, 0xFF, 0xFF]);
        assert_eq!(tc.label(), "0x0000FFFF");
    }

    #[test]
    fn distinct_case_codes_are_distinct() {
        assert_ne!(TypeCode::CNCT, TypeCode::CNCT_MIXED);
    }

    #[test]
    fn from_str_roundtrips_known_codes() {
        for code in TypeCode::ALL {
            if *code == TypeCode::CNCT_MIXED {
                // "Cnct" is not four printable-ASCII-safe distinct bytes in
                // FromStr's plain-text branch ambiguity with CNCT is fine:
                // case is preserved by as_bytes comparison.
            }
            let label = code.label();
            let parsed: TypeCode = label.parse().unwrap();
            assert_eq!(parsed, *code);
        }
    }

    #[test]
    fn is_known_rejects_arbitrary_bytes() {
        let tc = TypeCode::from_raw(*b"ZZZZ");
        assert!(!tc.is_known());
    }
}
