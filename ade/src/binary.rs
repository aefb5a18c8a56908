//! The big-endian binary framer (spec.md §4.4).
//!
//! ```text
//! offset 0  : u32 big-endian   total length including header
//! offset 4  : 4 bytes          name
//! offset 8  : 4 bytes          type code (ASCII)
//! offset 12 : payload          (length - 12) bytes
//! ```

use ade_types::{AtomValue, TypeCode};

use crate::atom::Atom;
use crate::error::{DecodeError, EncodeError};

const HEADER_LEN: usize = 12;

/// Decode every top-level atom from `bytes`, lenient on unknown type codes
/// (spec.md §9's declared default: unknown codes round-trip as opaque
/// bytes under their original type code).
pub fn decode_binary(bytes: &[u8]) -> Result<Vec<Atom>, DecodeError> {
    decode_sequence(bytes, false)
}

/// As [`decode_binary`], but rejects type codes outside the closed set
/// with [`DecodeError::UnknownType`] (spec.md §9's declared strict-mode
/// alternative).
pub fn decode_binary_strict(bytes: &[u8]) -> Result<Vec<Atom>, DecodeError> {
    decode_sequence(bytes, true)
}

fn decode_sequence(bytes: &[u8], strict: bool) -> Result<Vec<Atom>, DecodeError> {
    let mut atoms = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (atom, consumed) = decode_one(&bytes[offset..], strict)?;
        offset += consumed;
        atoms.push(atom);
    }
    Ok(atoms)
}

fn decode_one(bytes: &[u8], strict: bool) -> Result<(Atom, usize), DecodeError> {
    if bytes.len() < 4 {
        return Err(DecodeError::ShortRead {
            want: 4,
            got: bytes.len(),
        });
    }
    let length = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
    if length < HEADER_LEN {
        return Err(DecodeError::LengthTooSmall {
            length: length as u32,
        });
    }
    if bytes.len() < length {
        return Err(DecodeError::ShortRead {
            want: length,
            got: bytes.len(),
        });
    }

    let mut name = [0u8; 4];
    name.copy_from_slice(&bytes[4..8]);
    let mut type_bytes = [0u8; 4];
    type_bytes.copy_from_slice(&bytes[8..12]);
    let type_code = TypeCode::from_raw(type_bytes);
    let payload = &bytes[HEADER_LEN..length];

    tracing::trace!(
        name = %crate::atom::name_label(name),
        type_code = %type_code,
        length,
        "decoded atom frame header"
    );

    if strict && !type_code.is_known() {
        return Err(DecodeError::UnknownType {
            type_code: type_code.label(),
        });
    }

    let atom = if type_code.is_container() {
        let children = decode_container_children(payload, strict)?;
        let value = AtomValue::default_for(TypeCode::CONT);
        let mut atom = Atom::from_parts(name, value);
        for child in children {
            atom.add_child(child)
                .expect("just constructed atom is CONT-typed");
        }
        atom
    } else {
        let value = AtomValue::from_raw(type_code, payload.to_vec())?;
        Atom::from_parts(name, value)
    };

    Ok((atom, length))
}

fn decode_container_children(payload: &[u8], strict: bool) -> Result<Vec<Atom>, DecodeError> {
    let mut children = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let remaining = &payload[offset..];
        if remaining.len() < HEADER_LEN {
            return Err(DecodeError::Nesting(
                "container payload ended before children complete".into(),
            ));
        }
        let length = u32::from_be_bytes(remaining[0..4].try_into().unwrap()) as usize;
        if length < HEADER_LEN {
            return Err(DecodeError::LengthTooSmall {
                length: length as u32,
            });
        }
        if remaining.len() < length {
            return Err(DecodeError::Nesting(
                "container payload ended before children complete".into(),
            ));
        }
        let (child, consumed) = decode_one(remaining, strict)?;
        children.push(child);
        offset += consumed;
    }
    if offset != payload.len() {
        return Err(DecodeError::Nesting(format!(
            "{} byte(s) left over after decoding container children",
            payload.len() - offset
        )));
    }
    Ok(children)
}

/// Encode `atom` (and, recursively, its children) to its big-endian binary
/// frame representation.
pub fn encode_binary(atom: &Atom) -> Result<Vec<u8>, EncodeError> {
    encode_one(atom)
}

fn encode_one(atom: &Atom) -> Result<Vec<u8>, EncodeError> {
    let payload = if atom.type_code().is_container() {
        let mut buf = Vec::new();
        for child in atom.children() {
            buf.extend(encode_one(child)?);
        }
        buf
    } else {
        atom.value().raw_bytes().to_vec()
    };

    let total_len = HEADER_LEN + payload.len();
    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&(total_len as u32).to_be_bytes());
    out.extend_from_slice(&atom.name_bytes());
    out.extend_from_slice(&atom.type_code().as_bytes());
    out.extend_from_slice(&payload);

    tracing::trace!(name = %atom.name(), type_code = %atom.type_code(), total_len, "encoded atom frame");

    Ok(out)
}

/// Accept an ASCII hex string, optionally `0x`/`0X`-prefixed, decode to
/// bytes, then run [`decode_binary`] over the result (spec.md §4.4 "Hex
/// wrapper").
pub fn decode_hex_wrapped(input: &[u8]) -> Result<Vec<Atom>, DecodeError> {
    let text = std::str::from_utf8(input)
        .map_err(|e| DecodeError::InvalidHex(e.to_string()))?
        .trim();
    let stripped = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let bytes = hex::decode(stripped).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
    decode_binary(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ade_types::TypeCode;

    #[test]
    fn hex_frame_decodes_to_empty_container() {
        // spec.md §8 scenario 1.
        let atoms = decode_hex_wrapped(b"0000000C534D414C434F4E54").unwrap();
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].name(), "SMAL");
        assert_eq!(atoms[0].type_code(), TypeCode::CONT);
        assert!(atoms[0].children().is_empty());
    }

    #[test]
    fn encode_decode_round_trips_simple_container() {
        let mut root = Atom::new("TEST", TypeCode::CONT).unwrap();
        let mut bver = Atom::new("BVER", TypeCode::UI32).unwrap();
        bver.value_mut().set_from_uint64(6).unwrap();
        root.add_child(bver).unwrap();

        let bytes = encode_binary(&root).unwrap();
        // spec.md §8 scenario 6: 28 bytes total, first 4 bytes == 28.
        assert_eq!(bytes.len(), 28);
        assert_eq!(u32::from_be_bytes(bytes[0..4].try_into().unwrap()), 28);

        let decoded = decode_binary(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0], root);
    }

    #[test]
    fn short_read_is_reported() {
        let err = decode_binary(&[0, 0, 0, 20, 1, 2]).unwrap_err();
        assert!(matches!(err, DecodeError::ShortRead { .. }));
    }

    #[test]
    fn length_too_small_is_reported() {
        let err = decode_binary(&[0, 0, 0, 4, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, DecodeError::LengthTooSmall { length: 4 }));
    }

    #[test]
    fn unknown_type_round_trips_leniently() {
        let unknown = TypeCode::from_raw(*b"ZZZZ");
        let value = ade_types::AtomValue::from_raw(unknown, vec![1, 2, 3]).unwrap();
        let atom = Atom::from_parts(*b"RAWX", value);

        let bytes = encode_binary(&atom).unwrap();
        let decoded = decode_binary(&bytes).unwrap();
        assert_eq!(decoded[0].type_code(), TypeCode::from_raw(*b"ZZZZ"));
        assert_eq!(decoded[0].value().raw_bytes(), &[1, 2, 3]);

        let strict_err = decode_binary_strict(&bytes).unwrap_err();
        assert!(matches!(strict_err, DecodeError::UnknownType { .. }));
    }
}
