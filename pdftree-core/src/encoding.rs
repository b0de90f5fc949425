//! PDFDocEncoding
//!
//! The default encoding of PDF text strings that carry no byte order mark.
//! It matches ASCII in the printable range and Latin-1 from 0xA1 upwards;
//! 0x18..=0x1F and 0x80..=0xA0 hold typographic characters of their own.

/// Characters assigned to 0x18..=0x1F
const LOW_DIACRITICS: [char; 8] = [
    '\u{02D8}', // breve
    '\u{02C7}', // caron
    '\u{02C6}', // circumflex
    '\u{02D9}', // dot above
    '\u{02DD}', // double acute
    '\u{02DB}', // ogonek
    '\u{02DA}', // ring
    '\u{02DC}', // small tilde
];

/// Characters assigned to 0x80..=0xA0; `None` marks the unassigned 0x9F
const HIGH_PUNCTUATION: [Option<char>; 33] = [
    Some('\u{2022}'), // bullet
    Some('\u{2020}'), // dagger
    Some('\u{2021}'), // double dagger
    Some('\u{2026}'), // ellipsis
    Some('\u{2014}'), // em dash
    Some('\u{2013}'), // en dash
    Some('\u{0192}'), // florin
    Some('\u{2044}'), // fraction slash
    Some('\u{2039}'), // single left angle quote
    Some('\u{203A}'), // single right angle quote
    Some('\u{2212}'), // minus
    Some('\u{2030}'), // per mille
    Some('\u{201E}'), // double low quote
    Some('\u{201C}'), // left double quote
    Some('\u{201D}'), // right double quote
    Some('\u{2018}'), // left single quote
    Some('\u{2019}'), // right single quote
    Some('\u{201A}'), // single low quote
    Some('\u{2122}'), // trademark
    Some('\u{FB01}'), // fi ligature
    Some('\u{FB02}'), // fl ligature
    Some('\u{0141}'), // L stroke
    Some('\u{0152}'), // OE
    Some('\u{0160}'), // S caron
    Some('\u{0178}'), // Y diaeresis
    Some('\u{017D}'), // Z caron
    Some('\u{0131}'), // dotless i
    Some('\u{0142}'), // l stroke
    Some('\u{0153}'), // oe
    Some('\u{0161}'), // s caron
    Some('\u{017E}'), // z caron
    None,
    Some('\u{20AC}'), // euro
];

/// Map one PDFDocEncoding byte to its character.
///
/// Control bytes other than tab, LF and CR are unassigned, as are 0x7F
/// and 0x9F.
pub fn pdf_doc_char(byte: u8) -> Option<char> {
    match byte {
        b'\t' | b'\n' | b'\r' => Some(char::from(byte)),
        0x18..=0x1F => Some(LOW_DIACRITICS[usize::from(byte - 0x18)]),
        0x20..=0x7E => Some(char::from(byte)),
        0x80..=0xA0 => HIGH_PUNCTUATION[usize::from(byte - 0x80)],
        0xA1..=0xFF => Some(char::from(byte)),
        _ => None,
    }
}

/// Decode a whole string, or `None` if any byte is unassigned.
pub fn decode_pdf_doc(bytes: &[u8]) -> Option<String> {
    bytes.iter().map(|&b| pdf_doc_char(b)).collect()
}
