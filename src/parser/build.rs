use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::extract::extract;
use super::tree::XmlTree;
use crate::core::{CfdiError, ParseError, ParseLimits, ParsedInvoice};

/// Parse a CFDI document with the default [`ParseLimits`].
///
/// Never fails and never panics: problems are reported through
/// `parse_success` and `parse_errors` on the returned value.
pub fn parse_cfdi(content: impl AsRef<[u8]>) -> ParsedInvoice {
    parse_cfdi_with_limits(content, &ParseLimits::default())
}

/// Parse a CFDI document, rejecting input beyond `limits`.
///
/// Bytes are decoded as UTF-8 (invalid sequences replaced, BOM dropped).
/// A missing root, malformed XML, exceeded limit or internal fault yields a
/// result with `parse_success == false`, a single structural error and all
/// other fields at their defaults.
pub fn parse_cfdi_with_limits(content: impl AsRef<[u8]>, limits: &ParseLimits) -> ParsedInvoice {
    let bytes = content.as_ref();
    if bytes.len() > limits.max_bytes {
        // Not copied into raw_xml: the point of the limit is to not hold it.
        return failed(
            CfdiError::TooLarge {
                size: bytes.len(),
                limit: limits.max_bytes,
            },
            String::new(),
        );
    }

    let decoded = String::from_utf8_lossy(bytes);
    let xml = decoded.strip_prefix('\u{feff}').unwrap_or(&*decoded);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let tree = XmlTree::parse(xml, limits)?;
        extract(&tree)
    }))
    .unwrap_or_else(|payload| Err(CfdiError::Internal(panic_message(&*payload))));

    match outcome {
        Ok(mut invoice) => {
            tracing::debug!(
                uuid = invoice.uuid.as_deref().unwrap_or("-"),
                issuer = invoice.issuer.name.as_deref().unwrap_or("-"),
                total = ?invoice.total,
                currency = invoice.currency.as_deref().unwrap_or("-"),
                line_items = invoice.line_items.len(),
                field_errors = invoice.parse_errors.len(),
                "CFDI parsed"
            );
            invoice.raw_xml = xml.to_string();
            invoice
        }
        Err(err) => failed(err, xml.to_string()),
    }
}

fn failed(err: CfdiError, raw_xml: String) -> ParsedInvoice {
    tracing::warn!(error = %err, "CFDI parse failed");
    ParsedInvoice {
        parse_success: false,
        parse_errors: vec![ParseError::from(err)],
        raw_xml,
        ..ParsedInvoice::default()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
