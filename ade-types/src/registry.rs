//! The process-wide [`TypeRegistry`]: width rules and canonical text
//! formatting/parsing per ADE type code (spec.md §4.1, §5, §9).

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::codec;
use crate::error::CodecError;
use crate::type_code::TypeCode;

/// The width rule for a type code's raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Exactly `n` bytes.
    Fixed(usize),
    /// At least `min` bytes, with no fixed upper bound (`CONT`, `DATA`,
    /// `CNCT`, `CSTR`, `USTR`, `IPAD`).
    Variable { min: usize },
}

impl Width {
    /// Validate `len` against this rule, producing the *byte-count* error
    /// spec.md §4.1/§7 describes on mismatch.
    pub fn check(&self, type_code: TypeCode, len: usize) -> Result<(), CodecError> {
        match *self {
            Width::Fixed(want) if len != want => {
                Err(CodecError::byte_count(type_code.label(), want, len))
            }
            Width::Variable { min } if len < min => {
                Err(CodecError::byte_count(type_code.label(), min, len))
            }
            _ => Ok(()),
        }
    }
}

/// One type code's registered behavior: width rule plus canonical
/// text-form formatter/parser. The typed host-value accessors themselves
/// live on [`crate::value::AtomValue`] as an exhaustive match over
/// [`TypeCode`] (design note §9, option "tagged-variant with per-variant
/// methods"); this table is the complementary function-pointer dispatch
/// table (option "map from type code to a struct of function pointers").
pub struct TypeDescriptor {
    pub code: TypeCode,
    pub width: Width,
    /// Render raw bytes (known to satisfy `width`) as canonical text.
    pub format_text: fn(&[u8]) -> String,
    /// Parse canonical text into raw bytes for this type.
    pub parse_text: fn(&str) -> Result<Vec<u8>, CodecError>,
    /// Decode-time range validation beyond width (spec.md §4.1's "Range
    /// validation" paragraph, e.g. `UI01` rejecting any value > 1). A no-op
    /// for types whose width alone bounds their range.
    pub validate_range: fn(TypeCode, &[u8]) -> Result<(), CodecError>,
}

fn build_registry() -> HashMap<TypeCode, TypeDescriptor> {
    let mut map = HashMap::new();
    for d in codec::descriptors() {
        map.insert(d.code, d);
    }
    map
}

static REGISTRY: Lazy<HashMap<TypeCode, TypeDescriptor>> = Lazy::new(build_registry);

/// Process-wide registry of type codes to width rules and text codecs.
/// Immutable after first use; initialization is idempotent and
/// happens-before any lookup via [`once_cell::sync::Lazy`] (spec.md §5).
pub struct TypeRegistry;

impl TypeRegistry {
    /// Look up a known type code's descriptor.
    pub fn get(code: TypeCode) -> Option<&'static TypeDescriptor> {
        REGISTRY.get(&code)
    }

    /// Look up a known type code's descriptor, falling back to an opaque
    /// `DATA`-like rule for unknown codes (spec.md §9's lenient default).
    pub fn get_or_opaque(code: TypeCode) -> TypeDescriptor {
        match REGISTRY.get(&code) {
            Some(d) => TypeDescriptor {
                code: d.code,
                width: d.width,
                format_text: d.format_text,
                parse_text: d.parse_text,
                validate_range: d.validate_range,
            },
            None => TypeDescriptor {
                code,
                width: Width::Variable { min: 0 },
                format_text: codec::format_opaque,
                parse_text: codec::parse_opaque,
                validate_range: codec::validate_noop,
            },
        }
    }

    /// Iterate every registered type code, in table order.
    pub fn codes() -> impl Iterator<Item = TypeCode> {
        TypeCode::ALL.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_is_registered() {
        for code in TypeCode::ALL {
            assert!(
                TypeRegistry::get(*code).is_some(),
                "missing descriptor for {code}"
            );
        }
    }

    #[test]
    fn unknown_code_falls_back_to_opaque() {
        let code = TypeCode::from_raw(*b"ZZZZ");
        assert!(TypeRegistry::get(code).is_none());
        let d = TypeRegistry::get_or_opaque(code);
        assert_eq!(d.width, Width::Variable { min: 0 });
    }
}
