//! Normalized invoice projection for payment matching.
//!
//! Maps a [`ParsedInvoice`] onto the generic shape the invoice-management
//! side works with: who to pay, how much, by when, and what kind of
//! document it is.

mod terms;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{DocumentType, ParsedInvoice, payment_form_label};

pub use terms::explicit_term_days;

/// Days added to the issue date when the document states no terms.
pub const DEFAULT_GRACE_DAYS: u32 = 30;

/// Business defaults applied while projecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPolicy {
    /// Grace period for the due date when no explicit terms are found.
    pub default_grace_days: u32,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            default_grace_days: DEFAULT_GRACE_DAYS,
        }
    }
}

impl ProjectionPolicy {
    pub fn with_default_grace_days(mut self, days: u32) -> Self {
        self.default_grace_days = days;
        self
    }
}

/// Document classification used by payment matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectedType {
    Invoice,
    CreditNote,
    PaymentComplement,
    Unknown,
}

impl ProjectedType {
    /// Fixed mapping from the CFDI document type. Transfer and payroll
    /// documents are not payables and map to `Unknown`.
    pub fn from_document_type(document_type: Option<&DocumentType>) -> Self {
        match document_type {
            Some(DocumentType::Income) => Self::Invoice,
            Some(DocumentType::Expense) => Self::CreditNote,
            Some(DocumentType::Payment) => Self::PaymentComplement,
            _ => Self::Unknown,
        }
    }
}

/// CFDI-specific data carried alongside the generic projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CfdiDetails {
    pub uuid: Option<String>,
    pub recipient_tax_id: Option<String>,
    pub recipient_name: Option<String>,
    pub line_count: usize,
    pub transferred_total: Option<Decimal>,
}

/// The normalized view of one parsed CFDI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceProjection {
    /// Issuer name.
    pub supplier_name: Option<String>,
    /// Document total.
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub issue_date: Option<NaiveDate>,
    /// "series-folio", or whichever of the two is present.
    pub invoice_number: Option<String>,
    /// Issuer RFC.
    pub tax_id: Option<String>,
    /// Stamp UUID.
    pub reference: Option<String>,
    pub document_type: ProjectedType,
    /// 1.0 if the parse succeeded, else 0.0.
    pub confidence: f32,
    /// FormaPago label, or the raw code when not in the catalog.
    pub payment_method: Option<String>,
    /// MetodoPago label, or the raw code when not in the catalog.
    pub payment_terms: Option<String>,
    pub details: CfdiDetails,
}

/// Project with the default [`ProjectionPolicy`].
pub fn to_projection(invoice: &ParsedInvoice) -> InvoiceProjection {
    to_projection_with(invoice, &ProjectionPolicy::default())
}

/// Project `invoice`, taking business defaults from `policy`.
pub fn to_projection_with(invoice: &ParsedInvoice, policy: &ProjectionPolicy) -> InvoiceProjection {
    let issue_date = invoice.issued_at.map(|dt| dt.date());

    InvoiceProjection {
        supplier_name: invoice.issuer.name.clone(),
        amount: invoice.total,
        currency: invoice.currency.clone(),
        due_date: issue_date.and_then(|d| due_date(d, invoice, policy)),
        issue_date,
        invoice_number: invoice_number(invoice.series.as_deref(), invoice.folio.as_deref()),
        tax_id: invoice.issuer.tax_id.clone(),
        reference: invoice.uuid.clone(),
        document_type: ProjectedType::from_document_type(invoice.document_type.as_ref()),
        confidence: if invoice.parse_success { 1.0 } else { 0.0 },
        payment_method: invoice.payment_form.as_deref().map(|code| {
            payment_form_label(code)
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string())
        }),
        payment_terms: invoice.settlement.as_ref().map(|s| {
            s.label()
                .map(str::to_string)
                .unwrap_or_else(|| s.code().to_string())
        }),
        details: CfdiDetails {
            uuid: invoice.uuid.clone(),
            recipient_tax_id: invoice.recipient.tax_id.clone(),
            recipient_name: invoice.recipient.name.clone(),
            line_count: invoice.line_items.len(),
            transferred_total: invoice.taxes.total_transferred,
        },
    }
}

/// Compose `series-folio`; either part alone is used as is.
pub fn invoice_number(series: Option<&str>, folio: Option<&str>) -> Option<String> {
    match (series, folio) {
        (Some(s), Some(f)) => Some(format!("{s}-{f}")),
        (None, Some(f)) => Some(f.to_string()),
        (Some(s), None) => Some(s.to_string()),
        (None, None) => None,
    }
}

fn due_date(issued: NaiveDate, invoice: &ParsedInvoice, policy: &ProjectionPolicy) -> Option<NaiveDate> {
    let days = invoice
        .payment_conditions
        .as_deref()
        .and_then(explicit_term_days)
        .unwrap_or(policy.default_grace_days);
    issued.checked_add_days(Days::new(u64::from(days)))
}
