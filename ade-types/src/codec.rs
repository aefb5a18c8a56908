//! Exhaustive per-type-code canonical text formatting/parsing and width
//! rules (spec.md §4.1). This is the "tagged enum, exhaustive match" half of
//! the registry dispatch design (see `registry.rs` for the table half).

use crate::bytes::{escape_string, fourcc_from_string, fourcc_to_string, from_hex, to_hex_upper, unescape_string};
use crate::error::CodecError;
use crate::numeric;
use crate::registry::{TypeDescriptor, Width};
use crate::type_code::TypeCode;

/// Build the descriptor for every type code in the closed set, in table
/// order. Exhaustive over [`TypeCode::ALL`]; a `match` below on an
/// unreachable arm is a compile error, matching design note §9's
/// "exhaustive compile-time checking of coverage" goal.
pub(crate) fn descriptors() -> Vec<TypeDescriptor> {
    TypeCode::ALL
        .iter()
        .map(|&code| descriptor_for(code))
        .collect()
}

fn descriptor_for(code: TypeCode) -> TypeDescriptor {
    macro_rules! fixed {
        ($w:expr, $fmt:expr, $parse:expr) => {
            fixed!($w, $fmt, $parse, validate_noop)
        };
        ($w:expr, $fmt:expr, $parse:expr, $validate:expr) => {
            TypeDescriptor {
                code,
                width: Width::Fixed($w),
                format_text: $fmt,
                parse_text: $parse,
                validate_range: $validate,
            }
        };
    }
    macro_rules! variable {
        ($min:expr, $fmt:expr, $parse:expr) => {
            variable!($min, $fmt, $parse, validate_noop)
        };
        ($min:expr, $fmt:expr, $parse:expr, $validate:expr) => {
            TypeDescriptor {
                code,
                width: Width::Variable { min: $min },
                format_text: $fmt,
                parse_text: $parse,
                validate_range: $validate,
            }
        };
    }

    match code {
        TypeCode::UI01 => fixed!(4, format_ui01, parse_ui01, validate_ui01_range),
        TypeCode::UI08 => fixed!(1, format_u::<1>, parse_u::<1>),
        TypeCode::UI16 => fixed!(2, format_u::<2>, parse_u::<2>),
        TypeCode::UI32 => fixed!(4, format_u::<4>, parse_u32_or_hex),
        TypeCode::UI64 => fixed!(8, format_u::<8>, parse_u::<8>),
        TypeCode::SI08 => fixed!(1, format_i::<1>, parse_i::<1>),
        TypeCode::SI16 => fixed!(2, format_i::<2>, parse_i::<2>),
        TypeCode::SI32 => fixed!(4, format_i::<4>, parse_i::<4>),
        TypeCode::SI64 => fixed!(8, format_i::<8>, parse_i::<8>),
        TypeCode::FP32 => fixed!(4, format_fp32, parse_fp32),
        TypeCode::FP64 => fixed!(8, format_fp64, parse_fp64),
        TypeCode::UF32 => fixed!(4, format_uf32, parse_uf32),
        TypeCode::UF64 => fixed!(8, format_uf64, parse_uf64),
        TypeCode::SF32 => fixed!(4, format_sf32, parse_sf32),
        TypeCode::SF64 => fixed!(8, format_sf64, parse_sf64),
        TypeCode::UR32 => fixed!(4, format_ur32, parse_ur32),
        TypeCode::UR64 => fixed!(8, format_ur64, parse_ur64),
        TypeCode::SR32 => fixed!(4, format_sr32, parse_sr32),
        TypeCode::SR64 => fixed!(8, format_sr64, parse_sr64),
        TypeCode::FC32 => fixed!(4, format_fc32, parse_fc32),
        TypeCode::IP32 => variable!(4, format_ip32, parse_ip32, validate_ip32_width),
        TypeCode::IPAD => variable!(1, format_ipad, parse_ipad),
        TypeCode::UUID => fixed!(16, format_uuid, parse_uuid),
        TypeCode::CSTR => variable!(1, format_cstr, parse_cstr),
        TypeCode::USTR => variable!(0, format_ustr, parse_ustr),
        TypeCode::DATA => variable!(0, format_opaque, parse_opaque),
        TypeCode::CNCT => variable!(0, format_opaque, parse_opaque),
        TypeCode::CNCT_MIXED => variable!(0, format_opaque, parse_opaque),
        TypeCode::NULL => fixed!(0, format_null, parse_null),
        TypeCode::CONT => variable!(0, format_opaque, parse_opaque),
        _ => unreachable!("TypeCode::ALL is the exhaustive closed set"),
    }
}

/// No additional range constraint beyond width.
pub(crate) fn validate_noop(_code: TypeCode, _bytes: &[u8]) -> Result<(), CodecError> {
    Ok(())
}

fn validate_ui01_range(_code: TypeCode, bytes: &[u8]) -> Result<(), CodecError> {
    let v = u32::from_be_bytes(bytes.try_into().unwrap_or([0; 4]));
    if v > 1 {
        return Err(CodecError::range("UI01", v));
    }
    Ok(())
}

/// `IP32` is a single address (4 bytes) or an address range (8 bytes); no
/// other length is valid even though the registry's width rule only
/// enforces a 4-byte structural minimum (spec.md §4.1's payload column:
/// "4 or 8 bytes").
fn validate_ip32_width(_code: TypeCode, bytes: &[u8]) -> Result<(), CodecError> {
    if bytes.len() != 4 && bytes.len() != 8 {
        return Err(CodecError::byte_count("IP32", 4, bytes.len()));
    }
    Ok(())
}

// ---- UI01 ----

fn format_ui01(bytes: &[u8]) -> String {
    let v = u32::from_be_bytes(bytes.try_into().unwrap_or([0; 4]));
    v.to_string()
}

fn parse_ui01(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: u32 = match s {
        "true" => 1,
        "false" => 0,
        _ => s
            .parse()
            .map_err(|_| CodecError::invalid_string("UI01", s))?,
    };
    if v > 1 {
        return Err(CodecError::range("UI01", v));
    }
    Ok(v.to_be_bytes().to_vec())
}

// ---- unsigned/signed fixed-width integers ----

fn format_u<const N: usize>(bytes: &[u8]) -> String {
    let mut buf = [0u8; 8];
    buf[8 - N..].copy_from_slice(bytes);
    u64::from_be_bytes(buf).to_string()
}

fn parse_u<const N: usize>(s: &str) -> Result<Vec<u8>, CodecError> {
    let label = width_label::<N>(false);
    let v: u64 = s
        .parse()
        .map_err(|_| CodecError::invalid_string(label.clone(), s))?;
    let max: u128 = (1u128 << (N * 8)) - 1;
    if (v as u128) > max {
        return Err(CodecError::range(label, v));
    }
    Ok(v.to_be_bytes()[8 - N..].to_vec())
}

fn parse_u32_or_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        let v = u32::from_str_radix(hex, 16).map_err(|_| CodecError::invalid_string("UI32", s))?;
        Ok(v.to_be_bytes().to_vec())
    } else {
        parse_u::<4>(s)
    }
}

fn format_i<const N: usize>(bytes: &[u8]) -> String {
    let negative = bytes[0] & 0x80 != 0;
    let mut buf = if negative { [0xFFu8; 8] } else { [0u8; 8] };
    buf[8 - N..].copy_from_slice(bytes);
    i64::from_be_bytes(buf).to_string()
}

fn parse_i<const N: usize>(s: &str) -> Result<Vec<u8>, CodecError> {
    let label = width_label::<N>(true);
    let v: i64 = s
        .parse()
        .map_err(|_| CodecError::invalid_string(label.clone(), s))?;
    let min: i128 = -(1i128 << (N * 8 - 1));
    let max: i128 = (1i128 << (N * 8 - 1)) - 1;
    if (v as i128) < min || (v as i128) > max {
        return Err(CodecError::range(label, v));
    }
    Ok(v.to_be_bytes()[8 - N..].to_vec())
}

fn width_label<const N: usize>(signed: bool) -> String {
    format!("{}{:02}", if signed { "SI" } else { "UI" }, N * 8)
}

// ---- floats ----

fn format_fp32(bytes: &[u8]) -> String {
    let v = f32::from_be_bytes(bytes.try_into().unwrap());
    format!("{:E}", v).replace('E', "e")
}

fn parse_fp32(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: f32 = s.parse().map_err(|_| CodecError::invalid_string("FP32", s))?;
    Ok(v.to_be_bytes().to_vec())
}

fn format_fp64(bytes: &[u8]) -> String {
    let v = f64::from_be_bytes(bytes.try_into().unwrap());
    v.to_string()
}

fn parse_fp64(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: f64 = s.parse().map_err(|_| CodecError::invalid_string("FP64", s))?;
    Ok(v.to_be_bytes().to_vec())
}

// ---- fixed-point binary ----

fn format_uf32(bytes: &[u8]) -> String {
    let raw = u32::from_be_bytes(bytes.try_into().unwrap());
    numeric::uf32_from_raw(raw).to_string()
}

fn parse_uf32(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: f64 = s.parse().map_err(|_| CodecError::invalid_string("UF32", s))?;
    let raw = numeric::uf32_to_raw(v).ok_or_else(|| CodecError::range("UF32", v))?;
    Ok(raw.to_be_bytes().to_vec())
}

fn format_sf32(bytes: &[u8]) -> String {
    let raw = i32::from_be_bytes(bytes.try_into().unwrap());
    numeric::sf32_from_raw(raw).to_string()
}

fn parse_sf32(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: f64 = s.parse().map_err(|_| CodecError::invalid_string("SF32", s))?;
    let raw = numeric::sf32_to_raw(v).ok_or_else(|| CodecError::range("SF32", v))?;
    Ok(raw.to_be_bytes().to_vec())
}

fn format_uf64(bytes: &[u8]) -> String {
    let hi = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let lo = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    numeric::uf64_to_string_truncated(numeric::uf64_from_raw(hi, lo))
}

fn parse_uf64(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: f64 = s.parse().map_err(|_| CodecError::invalid_string("UF64", s))?;
    let (hi, lo) = numeric::uf64_to_raw(v).ok_or_else(|| CodecError::range("UF64", v))?;
    let mut out = hi.to_be_bytes().to_vec();
    out.extend_from_slice(&lo.to_be_bytes());
    Ok(out)
}

fn format_sf64(bytes: &[u8]) -> String {
    let hi = i32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let lo = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    numeric::sf64_from_raw(hi, lo).to_string()
}

fn parse_sf64(s: &str) -> Result<Vec<u8>, CodecError> {
    let v: f64 = s.parse().map_err(|_| CodecError::invalid_string("SF64", s))?;
    let (hi, lo) = numeric::sf64_to_raw(v).ok_or_else(|| CodecError::range("SF64", v))?;
    let mut out = hi.to_be_bytes().to_vec();
    out.extend_from_slice(&lo.to_be_bytes());
    Ok(out)
}

// ---- rationals ----

fn format_ur32(bytes: &[u8]) -> String {
    let n = u16::from_be_bytes(bytes[0..2].try_into().unwrap());
    let d = u16::from_be_bytes(bytes[2..4].try_into().unwrap());
    format!("{}/{}", n, d)
}

fn parse_ur32(s: &str) -> Result<Vec<u8>, CodecError> {
    let (n, d) = parse_fraction::<u16>(s, "UR32")?;
    let mut out = n.to_be_bytes().to_vec();
    out.extend_from_slice(&d.to_be_bytes());
    Ok(out)
}

fn format_ur64(bytes: &[u8]) -> String {
    let n = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let d = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    format!("{}/{}", n, d)
}

fn parse_ur64(s: &str) -> Result<Vec<u8>, CodecError> {
    let (n, d) = parse_fraction::<u32>(s, "UR64")?;
    let mut out = n.to_be_bytes().to_vec();
    out.extend_from_slice(&d.to_be_bytes());
    Ok(out)
}

fn format_sr32(bytes: &[u8]) -> String {
    let n = i16::from_be_bytes(bytes[0..2].try_into().unwrap());
    let d = i16::from_be_bytes(bytes[2..4].try_into().unwrap());
    format!("{}/{}", n, d)
}

fn parse_sr32(s: &str) -> Result<Vec<u8>, CodecError> {
    let (n, d) = parse_fraction::<i16>(s, "SR32")?;
    let mut out = n.to_be_bytes().to_vec();
    out.extend_from_slice(&d.to_be_bytes());
    Ok(out)
}

fn format_sr64(bytes: &[u8]) -> String {
    let n = i32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let d = i32::from_be_bytes(bytes[4..8].try_into().unwrap());
    format!("{}/{}", n, d)
}

fn parse_sr64(s: &str) -> Result<Vec<u8>, CodecError> {
    let (n, d) = parse_fraction::<i32>(s, "SR64")?;
    let mut out = n.to_be_bytes().to_vec();
    out.extend_from_slice(&d.to_be_bytes());
    Ok(out)
}

fn parse_fraction<T: std::str::FromStr>(s: &str, type_code: &str) -> Result<(T, T), CodecError> {
    let (n_str, d_str) = s
        .split_once('/')
        .ok_or_else(|| CodecError::invalid_string(type_code, s))?;
    let n = n_str
        .parse()
        .map_err(|_| CodecError::invalid_string(type_code, s))?;
    let d = d_str
        .parse()
        .map_err(|_| CodecError::invalid_string(type_code, s))?;
    Ok((n, d))
}

// ---- FourCC ----

fn format_fc32(bytes: &[u8]) -> String {
    fourcc_to_string(bytes.try_into().unwrap())
}

fn parse_fc32(s: &str) -> Result<Vec<u8>, CodecError> {
    Ok(fourcc_from_string(s)?.to_vec())
}

// ---- IPv4 ----

fn format_ip32(bytes: &[u8]) -> String {
    if bytes.len() == 8 {
        format!(
            "{}-{}",
            ipv4_to_string(&bytes[0..4]),
            ipv4_to_string(&bytes[4..8])
        )
    } else {
        ipv4_to_string(bytes)
    }
}

fn ipv4_to_string(bytes: &[u8]) -> String {
    format!("{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
}

fn parse_ip32(s: &str) -> Result<Vec<u8>, CodecError> {
    if let Some((a, b)) = s.split_once('-') {
        let mut out = parse_one_ipv4(a, s)?;
        out.extend_from_slice(&parse_one_ipv4(b, s)?);
        Ok(out)
    } else {
        parse_one_ipv4(s, s)
    }
}

fn parse_one_ipv4(s: &str, full: &str) -> Result<Vec<u8>, CodecError> {
    let octets: Vec<&str> = s.split('.').collect();
    if octets.len() != 4 {
        return Err(CodecError::invalid_string("IP32", full));
    }
    let mut out = Vec::with_capacity(4);
    for o in octets {
        out.push(
            o.parse::<u8>()
                .map_err(|_| CodecError::invalid_string("IP32", full))?,
        );
    }
    Ok(out)
}

// ---- IPAD ----

fn format_ipad(bytes: &[u8]) -> String {
    let trimmed = bytes.strip_suffix(&[0u8]).unwrap_or(bytes);
    escape_string(trimmed)
}

fn parse_ipad(s: &str) -> Result<Vec<u8>, CodecError> {
    let mut bytes = unescape_string(s)?;
    bytes.push(0);
    Ok(bytes)
}

// ---- UUID ----

fn format_uuid(bytes: &[u8]) -> String {
    format!(
        "{:02X}{:02X}{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        bytes[6], bytes[7],
        bytes[8], bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
    )
}

fn parse_uuid(s: &str) -> Result<Vec<u8>, CodecError> {
    let hex_only: String = s.chars().filter(|&c| c != '-').collect();
    if hex_only.len() != 32 || s.len() != 36 {
        return Err(CodecError::invalid_string("UUID", s));
    }
    from_hex(&format!("0x{}", hex_only)).map_err(|_| CodecError::invalid_string("UUID", s))
}

// ---- CSTR ----

fn format_cstr(bytes: &[u8]) -> String {
    let trimmed = bytes.strip_suffix(&[0u8]).unwrap_or(bytes);
    escape_string(trimmed)
}

fn parse_cstr(s: &str) -> Result<Vec<u8>, CodecError> {
    let mut bytes = unescape_string(s)?;
    bytes.push(0);
    Ok(bytes)
}

// ---- USTR: sequence of 4-byte BE code points, no terminator ----

fn format_ustr(bytes: &[u8]) -> String {
    let mut s = String::new();
    for chunk in bytes.chunks_exact(4) {
        let cp = u32::from_be_bytes(chunk.try_into().unwrap());
        if let Some(ch) = char::from_u32(cp) {
            s.push(ch);
        }
    }
    escape_string(s.as_bytes())
}

fn parse_ustr(s: &str) -> Result<Vec<u8>, CodecError> {
    let decoded = unescape_string(s)?;
    let text =
        std::str::from_utf8(&decoded).map_err(|_| CodecError::invalid_string("USTR", s))?;
    let mut out = Vec::with_capacity(text.chars().count() * 4);
    for ch in text.chars() {
        out.extend_from_slice(&(ch as u32).to_be_bytes());
    }
    Ok(out)
}

// ---- opaque (DATA/CNCT/Cnct/unknown/CONT) ----

pub(crate) fn format_opaque(bytes: &[u8]) -> String {
    to_hex_upper(bytes)
}

pub(crate) fn parse_opaque(s: &str) -> Result<Vec<u8>, CodecError> {
    from_hex(s)
}

// ---- NULL ----

fn format_null(_bytes: &[u8]) -> String {
    String::new()
}

fn parse_null(s: &str) -> Result<Vec<u8>, CodecError> {
    if !s.is_empty() {
        return Err(CodecError::invalid_string("NULL", s));
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui01_rejects_out_of_range() {
        let bytes = 2u32.to_be_bytes();
        assert_eq!(
            parse_ui01("2"),
            Err(CodecError::range("UI01", 2u32))
        );
        // decode-side range check is exercised at the registry/value layer;
        // this just checks the raw bytes are what the scenario describes.
        assert_eq!(bytes, [0, 0, 0, 2]);
    }

    #[test]
    fn ui32_accepts_hex_literal() {
        assert_eq!(parse_u32_or_hex("0x0000FFFF").unwrap(), 65535u32.to_be_bytes());
    }

    #[test]
    fn uuid_formats_uppercase_canonical() {
        let bytes: Vec<u8> = (0..16).collect();
        let s = format_uuid(&bytes);
        assert_eq!(s, "00010203-0405-0607-0809-0A0B0C0D0E0F");
    }

    #[test]
    fn uuid_round_trips() {
        let bytes: Vec<u8> = (0..16).collect();
        let s = format_uuid(&bytes);
        assert_eq!(parse_uuid(&s).unwrap(), bytes);
    }

    #[test]
    fn ip32_rejects_lengths_other_than_4_or_8() {
        assert!(validate_ip32_width(TypeCode::IP32, &[1, 2, 3, 4]).is_ok());
        assert!(validate_ip32_width(TypeCode::IP32, &[1, 2, 3, 4, 5, 6, 7, 8]).is_ok());
        assert!(matches!(
            validate_ip32_width(TypeCode::IP32, &[1, 2, 3, 4, 5]),
            Err(CodecError::ByteCount { want: 4, got: 5, .. })
        ));
    }

    #[test]
    fn ip32_formats_range_with_8_bytes() {
        let bytes = [10, 0, 0, 1, 10, 0, 0, 2];
        assert_eq!(format_ip32(&bytes), "10.0.0.1-10.0.0.2");
    }

    #[test]
    fn rational_formats_as_fraction() {
        let bytes = [0u8, 3, 0, 4];
        assert_eq!(format_ur32(&bytes), "3/4");
    }
}
