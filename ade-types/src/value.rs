//! [`AtomValue`]: a type code plus its raw payload, with typed accessors
//! that dispatch through the registry (spec.md §4.2).

use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::type_code::TypeCode;

/// A typed, width-validated payload.
///
/// Invariant: after any mutating call returns success, the raw bytes
/// satisfy the width/range rule of the current type (spec.md §3).
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomValue {
    type_code: TypeCode,
    raw: Vec<u8>,
}

impl std::fmt::Debug for AtomValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomValue")
            .field("type_code", &self.type_code)
            .field("text", &self.to_text())
            .finish()
    }
}

impl AtomValue {
    /// Construct from raw bytes already known to be well-formed for
    /// `type_code` (e.g. freshly decoded from a binary frame). Validates
    /// width, per the invariant.
    pub fn from_raw(type_code: TypeCode, raw: Vec<u8>) -> Result<Self, CodecError> {
        let descriptor = TypeRegistry::get_or_opaque(type_code);
        descriptor.width.check(type_code, raw.len())?;
        (descriptor.validate_range)(type_code, &raw)?;
        Ok(AtomValue { type_code, raw })
    }

    /// Construct the canonical zero value for `type_code` (empty payload
    /// for variable-width/`NULL` types, zero-filled for fixed-width types).
    pub fn default_for(type_code: TypeCode) -> Self {
        let descriptor = TypeRegistry::get_or_opaque(type_code);
        let len = match descriptor.width {
            crate::registry::Width::Fixed(n) => n,
            crate::registry::Width::Variable { min } => min,
        };
        AtomValue {
            type_code,
            raw: vec![0u8; len],
        }
    }

    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Change the type code, reinitializing to that type's default value.
    /// Used by `Atom` when a caller wants to retype an atom in place.
    pub fn retype(&mut self, type_code: TypeCode) {
        *self = AtomValue::default_for(type_code);
    }

    /// Raw payload bytes.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Canonical text-form rendering via the registered formatter.
    pub fn to_text(&self) -> String {
        let descriptor = TypeRegistry::get_or_opaque(self.type_code);
        (descriptor.format_text)(&self.raw)
    }

    /// Parse and store a canonical text-form literal for the current type.
    pub fn set_from_text(&mut self, text: &str) -> Result<(), CodecError> {
        let descriptor = TypeRegistry::get_or_opaque(self.type_code);
        let raw = (descriptor.parse_text)(text)?;
        descriptor.width.check(self.type_code, raw.len())?;
        self.raw = raw;
        Ok(())
    }

    fn mismatch(&self, requested: &'static str) -> CodecError {
        CodecError::type_mismatch(self.type_code.label(), requested)
    }

    // ---- getters ----

    pub fn get_bool(&self) -> Result<bool, CodecError> {
        if self.type_code != TypeCode::UI01 {
            return Err(self.mismatch("bool"));
        }
        let v = u32::from_be_bytes(self.raw.clone().try_into().unwrap_or([0; 4]));
        Ok(v != 0)
    }

    pub fn get_uint64(&self) -> Result<u64, CodecError> {
        match self.type_code {
            TypeCode::UI01 | TypeCode::UI08 | TypeCode::UI16 | TypeCode::UI32 | TypeCode::UI64 => {
                let mut buf = [0u8; 8];
                buf[8 - self.raw.len()..].copy_from_slice(&self.raw);
                Ok(u64::from_be_bytes(buf))
            }
            _ => Err(self.mismatch("uint64")),
        }
    }

    pub fn get_uint32(&self) -> Result<u32, CodecError> {
        if self.type_code != TypeCode::UI32 {
            return Err(self.mismatch("uint32"));
        }
        Ok(u32::from_be_bytes(self.raw.clone().try_into().unwrap()))
    }

    pub fn get_int64(&self) -> Result<i64, CodecError> {
        match self.type_code {
            TypeCode::SI08 | TypeCode::SI16 | TypeCode::SI32 | TypeCode::SI64 => {
                let negative = self.raw[0] & 0x80 != 0;
                let mut buf = if negative { [0xFFu8; 8] } else { [0u8; 8] };
                buf[8 - self.raw.len()..].copy_from_slice(&self.raw);
                Ok(i64::from_be_bytes(buf))
            }
            _ => Err(self.mismatch("int64")),
        }
    }

    pub fn get_int32(&self) -> Result<i32, CodecError> {
        if self.type_code != TypeCode::SI32 {
            return Err(self.mismatch("int32"));
        }
        Ok(i32::from_be_bytes(self.raw.clone().try_into().unwrap()))
    }

    pub fn get_f32(&self) -> Result<f32, CodecError> {
        if self.type_code != TypeCode::FP32 {
            return Err(self.mismatch("f32"));
        }
        Ok(f32::from_be_bytes(self.raw.clone().try_into().unwrap()))
    }

    pub fn get_f64(&self) -> Result<f64, CodecError> {
        match self.type_code {
            TypeCode::FP64 => Ok(f64::from_be_bytes(self.raw.clone().try_into().unwrap())),
            TypeCode::FP32 => Ok(f32::from_be_bytes(self.raw.clone().try_into().unwrap()) as f64),
            TypeCode::UF32 => {
                let raw = u32::from_be_bytes(self.raw.clone().try_into().unwrap());
                Ok(crate::numeric::uf32_from_raw(raw))
            }
            TypeCode::UF64 => {
                let hi = u32::from_be_bytes(self.raw[0..4].try_into().unwrap());
                let lo = u32::from_be_bytes(self.raw[4..8].try_into().unwrap());
                Ok(crate::numeric::uf64_from_raw(hi, lo))
            }
            TypeCode::SF32 => {
                let raw = i32::from_be_bytes(self.raw.clone().try_into().unwrap());
                Ok(crate::numeric::sf32_from_raw(raw))
            }
            TypeCode::SF64 => {
                let hi = i32::from_be_bytes(self.raw[0..4].try_into().unwrap());
                let lo = u32::from_be_bytes(self.raw[4..8].try_into().unwrap());
                Ok(crate::numeric::sf64_from_raw(hi, lo))
            }
            _ => Err(self.mismatch("f64")),
        }
    }

    pub fn get_string(&self) -> Result<String, CodecError> {
        match self.type_code {
            TypeCode::CSTR | TypeCode::USTR | TypeCode::IPAD | TypeCode::IP32 | TypeCode::UUID => {
                let text = self.to_text();
                if text.starts_with('"') {
                    crate::bytes::unescape_string(&text).map(|b| String::from_utf8_lossy(&b).into_owned())
                } else {
                    Ok(text)
                }
            }
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn get_bytes(&self) -> Result<&[u8], CodecError> {
        match self.type_code {
            TypeCode::DATA | TypeCode::CNCT | TypeCode::CNCT_MIXED => Ok(&self.raw),
            _ => Err(self.mismatch("bytes")),
        }
    }

    pub fn get_fourcc(&self) -> Result<[u8; 4], CodecError> {
        if self.type_code != TypeCode::FC32 {
            return Err(self.mismatch("fourcc"));
        }
        Ok(self.raw.clone().try_into().unwrap())
    }

    pub fn get_uint_pair(&self) -> Result<[u64; 2], CodecError> {
        match self.type_code {
            TypeCode::UR32 => Ok([
                u16::from_be_bytes(self.raw[0..2].try_into().unwrap()) as u64,
                u16::from_be_bytes(self.raw[2..4].try_into().unwrap()) as u64,
            ]),
            TypeCode::UR64 => Ok([
                u32::from_be_bytes(self.raw[0..4].try_into().unwrap()) as u64,
                u32::from_be_bytes(self.raw[4..8].try_into().unwrap()) as u64,
            ]),
            _ => Err(self.mismatch("uint_pair")),
        }
    }

    pub fn get_int_pair(&self) -> Result<[i64; 2], CodecError> {
        match self.type_code {
            TypeCode::SR32 => Ok([
                i16::from_be_bytes(self.raw[0..2].try_into().unwrap()) as i64,
                i16::from_be_bytes(self.raw[2..4].try_into().unwrap()) as i64,
            ]),
            TypeCode::SR64 => Ok([
                i32::from_be_bytes(self.raw[0..4].try_into().unwrap()) as i64,
                i32::from_be_bytes(self.raw[4..8].try_into().unwrap()) as i64,
            ]),
            _ => Err(self.mismatch("int_pair")),
        }
    }

    // ---- setters: atomically succeed or leave existing bytes untouched ----

    pub fn set_from_bool(&mut self, value: bool) -> Result<(), CodecError> {
        if self.type_code != TypeCode::UI01 {
            return Err(self.mismatch("bool"));
        }
        self.raw = (value as u32).to_be_bytes().to_vec();
        Ok(())
    }

    pub fn set_from_uint64(&mut self, value: u64) -> Result<(), CodecError> {
        let width = match self.type_code {
            TypeCode::UI01 => {
                if value > 1 {
                    return Err(CodecError::range("UI01", value));
                }
                4
            }
            TypeCode::UI08 => 1,
            TypeCode::UI16 => 2,
            TypeCode::UI32 => 4,
            TypeCode::UI64 => 8,
            _ => return Err(self.mismatch("uint64")),
        };
        let max: u128 = if width == 8 { u64::MAX as u128 } else { (1u128 << (width * 8)) - 1 };
        if (value as u128) > max {
            return Err(CodecError::range(self.type_code.label(), value));
        }
        self.raw = value.to_be_bytes()[8 - width..].to_vec();
        Ok(())
    }

    pub fn set_from_int64(&mut self, value: i64) -> Result<(), CodecError> {
        let width = match self.type_code {
            TypeCode::SI08 => 1,
            TypeCode::SI16 => 2,
            TypeCode::SI32 => 4,
            TypeCode::SI64 => 8,
            _ => return Err(self.mismatch("int64")),
        };
        if width < 8 {
            let min: i128 = -(1i128 << (width * 8 - 1));
            let max: i128 = (1i128 << (width * 8 - 1)) - 1;
            if (value as i128) < min || (value as i128) > max {
                return Err(CodecError::range(self.type_code.label(), value));
            }
        }
        self.raw = value.to_be_bytes()[8 - width..].to_vec();
        Ok(())
    }

    pub fn set_from_float64(&mut self, value: f64) -> Result<(), CodecError> {
        match self.type_code {
            TypeCode::FP64 => {
                self.raw = value.to_be_bytes().to_vec();
                Ok(())
            }
            TypeCode::FP32 => {
                self.raw = (value as f32).to_be_bytes().to_vec();
                Ok(())
            }
            TypeCode::UF32 => {
                let raw = crate::numeric::uf32_to_raw(value)
                    .ok_or_else(|| CodecError::range("UF32", value))?;
                self.raw = raw.to_be_bytes().to_vec();
                Ok(())
            }
            TypeCode::SF32 => {
                let raw = crate::numeric::sf32_to_raw(value)
                    .ok_or_else(|| CodecError::range("SF32", value))?;
                self.raw = raw.to_be_bytes().to_vec();
                Ok(())
            }
            TypeCode::UF64 => {
                let (hi, lo) = crate::numeric::uf64_to_raw(value)
                    .ok_or_else(|| CodecError::range("UF64", value))?;
                let mut raw = hi.to_be_bytes().to_vec();
                raw.extend_from_slice(&lo.to_be_bytes());
                self.raw = raw;
                Ok(())
            }
            TypeCode::SF64 => {
                let (hi, lo) = crate::numeric::sf64_to_raw(value)
                    .ok_or_else(|| CodecError::range("SF64", value))?;
                let mut raw = hi.to_be_bytes().to_vec();
                raw.extend_from_slice(&lo.to_be_bytes());
                self.raw = raw;
                Ok(())
            }
            _ => Err(self.mismatch("float64")),
        }
    }

    pub fn set_from_string(&mut self, value: &str) -> Result<(), CodecError> {
        match self.type_code {
            TypeCode::CSTR => {
                let mut raw = value.as_bytes().to_vec();
                raw.push(0);
                self.raw = raw;
                Ok(())
            }
            TypeCode::USTR => {
                let mut raw = Vec::with_capacity(value.chars().count() * 4);
                for ch in value.chars() {
                    raw.extend_from_slice(&(ch as u32).to_be_bytes());
                }
                self.raw = raw;
                Ok(())
            }
            TypeCode::IPAD => {
                let mut raw = value.as_bytes().to_vec();
                raw.push(0);
                self.raw = raw;
                Ok(())
            }
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn set_from_bytes(&mut self, value: &[u8]) -> Result<(), CodecError> {
        match self.type_code {
            TypeCode::DATA | TypeCode::CNCT | TypeCode::CNCT_MIXED => {
                self.raw = value.to_vec();
                Ok(())
            }
            _ => Err(self.mismatch("bytes")),
        }
    }

    pub fn set_from_uint_pair(&mut self, value: [u64; 2]) -> Result<(), CodecError> {
        match self.type_code {
            TypeCode::UR32 => {
                if value[0] > u16::MAX as u64 || value[1] > u16::MAX as u64 {
                    return Err(CodecError::range("UR32", value[0]));
                }
                let mut raw = (value[0] as u16).to_be_bytes().to_vec();
                raw.extend_from_slice(&(value[1] as u16).to_be_bytes());
                self.raw = raw;
                Ok(())
            }
            TypeCode::UR64 => {
                if value[0] > u32::MAX as u64 || value[1] > u32::MAX as u64 {
                    return Err(CodecError::range("UR64", value[0]));
                }
                let mut raw = (value[0] as u32).to_be_bytes().to_vec();
                raw.extend_from_slice(&(value[1] as u32).to_be_bytes());
                self.raw = raw;
                Ok(())
            }
            _ => Err(self.mismatch("uint_pair")),
        }
    }

    pub fn set_from_int_pair(&mut self, value: [i64; 2]) -> Result<(), CodecError> {
        match self.type_code {
            TypeCode::SR32 => {
                if value[0] < i16::MIN as i64 || value[0] > i16::MAX as i64
                    || value[1] < i16::MIN as i64 || value[1] > i16::MAX as i64
                {
                    return Err(CodecError::range("SR32", value[0]));
                }
                let mut raw = (value[0] as i16).to_be_bytes().to_vec();
                raw.extend_from_slice(&(value[1] as i16).to_be_bytes());
                self.raw = raw;
                Ok(())
            }
            TypeCode::SR64 => {
                if value[0] < i32::MIN as i64 || value[0] > i32::MAX as i64
                    || value[1] < i32::MIN as i64 || value[1] > i32::MAX as i64
                {
                    return Err(CodecError::range("SR64", value[0]));
                }
                let mut raw = (value[0] as i32).to_be_bytes().to_vec();
                raw.extend_from_slice(&(value[1] as i32).to_be_bytes());
                self.raw = raw;
                Ok(())
            }
            _ => Err(self.mismatch("int_pair")),
        }
    }
}
