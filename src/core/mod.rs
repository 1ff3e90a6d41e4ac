//! Core CFDI types, SAT catalog codes, error model and document sniffing.
//!
//! Nothing in here touches XML; these are the value types produced by the
//! parser and consumed by the projection.

pub mod codes;
mod error;
mod limits;
mod sniff;
mod types;

pub use codes::{DocumentType, FactorType, SettlementTiming, TaxCode, TaxKind, payment_form_label};
pub use error::*;
pub use limits::*;
pub use sniff::*;
pub use types::*;
