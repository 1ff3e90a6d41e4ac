//! # cfdi
//!
//! Fault-tolerant parser for Mexican CFDI (Comprobante Fiscal Digital por
//! Internet) electronic invoices, versions 3.2, 3.3 and 4.0.
//!
//! Given raw document bytes it produces a typed [`ParsedInvoice`] and,
//! from that, a normalized [`projection::InvoiceProjection`] for payment
//! matching. Parsing never fails and never panics: structural problems and
//! per-field conversion errors are data on the result.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use cfdi::{looks_like_cfdi, parser::parse_cfdi, projection::to_projection};
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4" Version="4.0"
//!     Serie="A" Folio="1001" Fecha="2024-06-15T10:00:00" Total="1160.00"
//!     TipoDeComprobante="I" MetodoPago="PUE" FormaPago="03">
//!   <cfdi:Emisor Rfc="AAA010101AAA" Nombre="ACME SA DE CV" RegimenFiscal="601"/>
//! </cfdi:Comprobante>"#;
//!
//! assert!(looks_like_cfdi(xml));
//! let invoice = parse_cfdi(xml);
//! assert!(invoice.parse_success);
//!
//! let projection = to_projection(&invoice);
//! assert_eq!(projection.invoice_number.as_deref(), Some("A-1001"));
//! assert_eq!(projection.supplier_name.as_deref(), Some("ACME SA DE CV"));
//! assert_eq!(projection.confidence, 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Types, SAT catalog codes, error model, sniffer |
//! | `parser` | quick-xml based CFDI parser |
//! | `projection` | Normalized invoice projection |
//! | `all` | Everything (same as default) |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "parser")]
pub mod parser;

#[cfg(feature = "projection")]
pub mod projection;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
