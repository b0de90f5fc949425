//! PDF Object Model
//!
//! In-memory form of the objects an [`ObjectGraph`](crate::graph::ObjectGraph)
//! hands to the serializer, following ISO 32000-1 Section 7.3. Indirect
//! references stay unresolved here; following them is the graph's job.

use super::encoding;
use super::filters::{self, DecodeResult};
use std::collections::HashMap;

/// PDF Name object (stored without the leading slash)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PdfName(pub String);

/// PDF String object
#[derive(Debug, Clone, PartialEq)]
pub struct PdfString(pub Vec<u8>);

/// PDF Array object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfArray(pub Vec<PdfObject>);

/// PDF Dictionary object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfDictionary(pub HashMap<PdfName, PdfObject>);

/// PDF Stream object
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
}

impl PdfStream {
    pub fn new(dict: PdfDictionary, data: Vec<u8>) -> Self {
        PdfStream { dict, data }
    }

    /// Get the decoded stream data
    pub fn decode(&self) -> DecodeResult<Vec<u8>> {
        filters::decode_stream(&self.data, &self.dict)
    }
}

/// PDF Object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(PdfName),
    Array(PdfArray),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    Reference(u32, u16), // object number, generation number
    /// An object kind the loading library exposes but this model does not
    /// know; `kind` names it and `repr` is its debug form.
    Other { kind: String, repr: String },
}

impl PdfObject {
    /// Short name of the object kind, used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            PdfObject::Null => "null",
            PdfObject::Boolean(_) => "boolean",
            PdfObject::Integer(_) => "integer",
            PdfObject::Real(_) => "real",
            PdfObject::String(_) => "string",
            PdfObject::Name(_) => "name",
            PdfObject::Array(_) => "array",
            PdfObject::Dictionary(_) => "dictionary",
            PdfObject::Stream(_) => "stream",
            PdfObject::Reference(_, _) => "reference",
            PdfObject::Other { kind, .. } => kind,
        }
    }

    /// Get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PdfObject::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as name
    pub fn as_name(&self) -> Option<&PdfName> {
        match self {
            PdfObject::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&PdfArray> {
        match self {
            PdfObject::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as dictionary
    pub fn as_dict(&self) -> Option<&PdfDictionary> {
        match self {
            PdfObject::Dictionary(d) => Some(d),
            PdfObject::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    /// Get as reference
    pub fn as_reference(&self) -> Option<(u32, u16)> {
        match self {
            PdfObject::Reference(obj, gen) => Some((*obj, *gen)),
            _ => None,
        }
    }

    pub fn name(name: &str) -> Self {
        PdfObject::Name(PdfName::new(name))
    }

    pub fn string(text: &str) -> Self {
        PdfObject::String(PdfString::new(text.as_bytes().to_vec()))
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<PdfArray> for PdfObject {
    fn from(array: PdfArray) -> Self {
        PdfObject::Array(array)
    }
}

impl From<PdfStream> for PdfObject {
    fn from(stream: PdfStream) -> Self {
        PdfObject::Stream(stream)
    }
}

impl PdfDictionary {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        PdfDictionary(HashMap::new())
    }

    /// Get a value by key (without the leading slash)
    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.0.get(&PdfName::new(key))
    }

    /// Insert a key-value pair
    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.0.insert(PdfName(key.into()), value);
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: PdfObject) -> Self {
        self.insert(key, value);
        self
    }

    /// Check if dictionary contains a key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&PdfName::new(key))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PdfName, &PdfObject)> {
        self.0.iter()
    }

    /// Get the dictionary type (value of /Type key)
    pub fn get_type(&self) -> Option<&str> {
        self.get("Type")
            .and_then(|obj| obj.as_name())
            .map(|n| n.0.as_str())
    }
}

impl PdfArray {
    /// Create a new empty array
    pub fn new() -> Self {
        PdfArray(Vec::new())
    }

    /// Get array length
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PdfObject> {
        self.0.iter()
    }
}

impl FromIterator<PdfObject> for PdfArray {
    fn from_iter<I: IntoIterator<Item = PdfObject>>(iter: I) -> Self {
        PdfArray(iter.into_iter().collect())
    }
}

impl PdfString {
    /// Create a new PDF string
    pub fn new(data: Vec<u8>) -> Self {
        PdfString(data)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode as a text string.
    ///
    /// Accepts UTF-16BE with a byte order mark, UTF-8 (BOM optional)
    /// holding no control characters other than tab, CR and LF, and
    /// finally PDFDocEncoding. Anything else is binary data and yields
    /// `None`.
    pub fn to_text(&self) -> Option<String> {
        let bytes = self.as_bytes();

        if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
            if rest.len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            return String::from_utf16(&units).ok();
        }

        let unmarked = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
        if let Ok(text) = std::str::from_utf8(unmarked) {
            if !text
                .chars()
                .any(|c| c.is_control() && !matches!(c, '\t' | '\r' | '\n'))
            {
                return Some(text.to_string());
            }
        }

        encoding::decode_pdf_doc(bytes)
    }

    /// Hex rendering used when the string is not text, e.g. `<00ff>`.
    pub fn to_hex(&self) -> String {
        format!("<{}>", hex::encode(&self.0))
    }
}

impl PdfName {
    /// Create a new PDF name
    pub fn new(name: impl Into<String>) -> Self {
        PdfName(name.into())
    }

    /// Get the name as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name in its written form, with the leading slash.
    pub fn to_symbol(&self) -> String {
        format!("/{}", self.0)
    }
}
