//! CFDI XML parsing.
//!
//! Pipeline: [`tree::XmlTree`] builds an element tree with quick-xml, the
//! extractor walks it section by section through the [`qname`] resolver,
//! and [`parse_cfdi`] assembles the result behind a boundary that turns
//! every fault into data.
//!
//! # Example
//!
//! ```
//! let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
//!     Version="4.0" Total="1160.00" Moneda="MXN">
//!   <cfdi:Emisor Rfc="AAA010101AAA" Nombre="ACME SA DE CV" RegimenFiscal="601"/>
//! </cfdi:Comprobante>"#;
//!
//! let invoice = cfdi::parser::parse_cfdi(xml);
//! assert!(invoice.parse_success);
//! assert_eq!(invoice.issuer.tax_id.as_deref(), Some("AAA010101AAA"));
//! assert_eq!(invoice.total.unwrap().to_string(), "1160.00");
//! ```

mod build;
mod extract;
pub mod qname;
pub mod tree;

pub use build::{parse_cfdi, parse_cfdi_with_limits};
pub use extract::{DEFAULT_CURRENCY, parse_datetime, parse_decimal};

/// Namespace URIs of the documents this parser reads.
pub mod ns {
    pub const CFDI_40: &str = "http://www.sat.gob.mx/cfd/4";
    pub const CFDI_33: &str = "http://www.sat.gob.mx/cfd/3";
    pub const TIMBRE_FISCAL_DIGITAL: &str = "http://www.sat.gob.mx/TimbreFiscalDigital";
}
