//! PDF Stream Filters
//!
//! Decoding of stream data according to ISO 32000-1 Section 7.4. The tree
//! never emits stream payloads; decoding only serves to report a stream's
//! decoded length.

use super::objects::{PdfDictionary, PdfObject};

#[cfg(feature = "compression")]
use flate2::read::ZlibDecoder;
#[cfg(feature = "compression")]
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecodeError {
    #[error("Invalid Filter entry: {0}")]
    InvalidFilter(String),

    #[error("Filter {0} is not supported")]
    Unsupported(String),

    #[error("Stream decode error: {0}")]
    Corrupt(String),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Supported PDF filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    ASCIIHexDecode,
    ASCII85Decode,
    FlateDecode,
    /// JPEG image data, kept encoded
    DCTDecode,
    /// JPEG 2000 image data, kept encoded
    JPXDecode,
}

impl Filter {
    /// Parse filter from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ASCIIHexDecode" | "AHx" => Some(Filter::ASCIIHexDecode),
            "ASCII85Decode" | "A85" => Some(Filter::ASCII85Decode),
            "FlateDecode" | "Fl" => Some(Filter::FlateDecode),
            "DCTDecode" | "DCT" => Some(Filter::DCTDecode),
            "JPXDecode" => Some(Filter::JPXDecode),
            _ => None,
        }
    }
}

/// Decode stream data according to the filters named in its dictionary
pub fn decode_stream(data: &[u8], dict: &PdfDictionary) -> DecodeResult<Vec<u8>> {
    let names: Vec<&str> = match dict.get("Filter") {
        None | Some(PdfObject::Null) => return Ok(data.to_vec()),
        Some(PdfObject::Name(name)) => vec![name.as_str()],
        Some(PdfObject::Array(array)) => array
            .iter()
            .map(|obj| {
                obj.as_name()
                    .map(|n| n.as_str())
                    .ok_or_else(|| DecodeError::InvalidFilter(obj.type_name().to_string()))
            })
            .collect::<DecodeResult<_>>()?,
        Some(other) => return Err(DecodeError::InvalidFilter(other.type_name().to_string())),
    };

    let mut result = data.to_vec();
    for name in names {
        let filter =
            Filter::from_name(name).ok_or_else(|| DecodeError::Unsupported(name.to_string()))?;
        result = apply_filter(&result, filter)?;
    }

    Ok(result)
}

fn apply_filter(data: &[u8], filter: Filter) -> DecodeResult<Vec<u8>> {
    match filter {
        Filter::FlateDecode => decode_flate(data),
        Filter::ASCIIHexDecode => decode_ascii_hex(data),
        Filter::ASCII85Decode => decode_ascii85(data),
        // Image codecs pass through; their payload length is the encoded one
        Filter::DCTDecode | Filter::JPXDecode => Ok(data.to_vec()),
    }
}

#[cfg(feature = "compression")]
fn decode_flate(data: &[u8]) -> DecodeResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(|e| DecodeError::Corrupt(format!("Flate decode error: {e}")))?;
    Ok(result)
}

#[cfg(not(feature = "compression"))]
fn decode_flate(_data: &[u8]) -> DecodeResult<Vec<u8>> {
    Err(DecodeError::Unsupported(
        "FlateDecode (requires 'compression' feature)".to_string(),
    ))
}

fn decode_ascii_hex(data: &[u8]) -> DecodeResult<Vec<u8>> {
    let digits: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .take_while(|&b| b != b'>')
        .collect();

    digits
        .chunks(2)
        .map(|pair| {
            let high = hex_digit_value(pair[0])?;
            // Odd number of digits: the last one is padded with 0
            let low = pair.get(1).map_or(Ok(0), |&b| hex_digit_value(b))?;
            Ok((high << 4) | low)
        })
        .collect()
}

fn hex_digit_value(ch: u8) -> DecodeResult<u8> {
    match ch {
        b'0'..=b'9' => Ok(ch - b'0'),
        b'A'..=b'F' => Ok(ch - b'A' + 10),
        b'a'..=b'f' => Ok(ch - b'a' + 10),
        _ => Err(DecodeError::Corrupt(format!(
            "Invalid hex digit: {}",
            ch as char
        ))),
    }
}

fn decode_ascii85(data: &[u8]) -> DecodeResult<Vec<u8>> {
    let mut chars: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if chars.starts_with(b"<~") {
        chars.drain(..2);
    }
    if let Some(end) = chars.windows(2).position(|w| w == b"~>") {
        chars.truncate(end);
    }

    let mut result = Vec::with_capacity(chars.len() * 4 / 5);
    let mut group: Vec<u8> = Vec::with_capacity(5);

    for c in chars {
        match c {
            b'z' if group.is_empty() => result.extend_from_slice(&[0, 0, 0, 0]),
            b'!'..=b'u' => {
                group.push(c);
                if group.len() == 5 {
                    result.extend_from_slice(&ascii85_group_value(&group).to_be_bytes());
                    group.clear();
                }
            }
            _ => {
                return Err(DecodeError::Corrupt(format!(
                    "Invalid ASCII85 character: {}",
                    c as char
                )))
            }
        }
    }

    if !group.is_empty() {
        let encoded = group.len();
        group.resize(5, b'u');
        let bytes = ascii85_group_value(&group).to_be_bytes();
        result.extend_from_slice(&bytes[..encoded - 1]);
    }

    Ok(result)
}

fn ascii85_group_value(group: &[u8]) -> u32 {
    group
        .iter()
        .fold(0u32, |acc, &ch| acc.wrapping_mul(85).wrapping_add((ch - b'!') as u32))
}
