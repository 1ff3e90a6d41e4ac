//! Cheap pre-parse detection of CFDI documents.

/// SAT namespace URI prefix shared by CFDI 3.2 (`cfd/3`) and 4.0 (`cfd/4`).
pub const SAT_CFD_NAMESPACE: &str = "http://www.sat.gob.mx/cfd/";

/// The root element and its namespace declaration open near the start of
/// the document; only this many leading bytes are inspected.
const SNIFF_WINDOW: usize = 64 * 1024;

const MARKERS: &[&[u8]] = &[
    b"cfdi:Comprobante",
    b"<Comprobante",
    b"xmlns:cfdi",
    SAT_CFD_NAMESPACE.as_bytes(),
];

/// Check whether `content` looks like a CFDI document without parsing it.
///
/// Matches the `Comprobante` root element (prefixed or bare) or the CFDI
/// namespace declaration. Works on raw bytes, so non-UTF-8 input is fine.
/// Use this to choose between the XML parser and another extraction path
/// (e.g. OCR) before calling [`crate::parser::parse_cfdi`].
///
/// A positive answer does not guarantee a successful parse. The parser
/// knows the `cfdi:` prefix and bare names only, so a document that binds
/// the SAT namespace to another prefix (`<c:Comprobante xmlns:c=...>`) is
/// accepted here but fails with a missing-root error.
pub fn looks_like_cfdi(content: impl AsRef<[u8]>) -> bool {
    let bytes = content.as_ref();
    let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    MARKERS.iter().any(|marker| contains(window, marker))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|w| w == needle)
}
