use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::{DocumentType, FactorType, SettlementTiming, TaxCode, TaxKind};
use super::error::ParseError;

/// The full extraction result for one CFDI document.
///
/// Every field is optional: a value is `None` when the attribute is absent
/// or could not be converted (in which case `parse_errors` says why).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Folio fiscal. Always equal to `stamp.uuid`; `None` without a stamp.
    pub uuid: Option<String>,
    /// Version / version: schema version ("4.0", "3.3", "3.2").
    pub version: Option<String>,
    /// Fecha: issue timestamp (local time of the place of issue).
    pub issued_at: Option<NaiveDateTime>,
    /// Serie.
    pub series: Option<String>,
    /// Folio.
    pub folio: Option<String>,
    /// FormaPago: c_FormaPago code.
    pub payment_form: Option<String>,
    /// MetodoPago.
    pub settlement: Option<SettlementTiming>,
    /// TipoDeComprobante.
    pub document_type: Option<DocumentType>,
    /// Moneda: ISO 4217, `MXN` when the root omits it.
    pub currency: Option<String>,
    /// TipoCambio.
    pub exchange_rate: Option<Decimal>,
    /// SubTotal.
    pub subtotal: Option<Decimal>,
    /// Descuento.
    pub discount: Option<Decimal>,
    /// Total.
    pub total: Option<Decimal>,
    /// NoCertificado: serial of the issuer's signing certificate.
    pub issuer_certificate: Option<String>,
    /// LugarExpedicion: postal code of the place of issue.
    pub place_of_issue: Option<String>,
    /// CondicionesDePago: free-text payment conditions.
    pub payment_conditions: Option<String>,
    /// Exportacion (4.0 only).
    pub export_code: Option<String>,
    /// CfdiRelacionados blocks, in document order.
    pub related: Vec<RelatedDocuments>,
    pub issuer: Issuer,
    pub recipient: Recipient,
    /// Conceptos, in document order.
    pub line_items: Vec<LineItem>,
    pub taxes: TaxSummary,
    /// TimbreFiscalDigital complement.
    pub stamp: Option<DigitalStamp>,
    /// True iff the root was found and extraction completed.
    pub parse_success: bool,
    /// Structural and field errors in order of discovery.
    pub parse_errors: Vec<ParseError>,
    /// The decoded document text.
    pub raw_xml: String,
}

impl ParsedInvoice {
    /// Whether the critical fields for reconciliation are present:
    /// UUID, total and issuer RFC.
    pub fn is_usable(&self) -> bool {
        self.uuid.is_some() && self.total.is_some() && self.issuer.tax_id.is_some()
    }

    /// Field-level errors only.
    pub fn field_errors(&self) -> impl Iterator<Item = &ParseError> {
        self.parse_errors.iter().filter(|e| !e.is_structural())
    }
}

/// Emisor: the seller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// Rfc.
    pub tax_id: Option<String>,
    /// Nombre.
    pub name: Option<String>,
    /// RegimenFiscal: c_RegimenFiscal code.
    pub tax_regime: Option<String>,
}

/// Receptor: the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Rfc.
    pub tax_id: Option<String>,
    /// Nombre.
    pub name: Option<String>,
    /// UsoCFDI: c_UsoCFDI code.
    pub cfdi_use: Option<String>,
    /// DomicilioFiscalReceptor: postal code (4.0 only).
    pub fiscal_address: Option<String>,
    /// RegimenFiscalReceptor (4.0 only).
    pub tax_regime: Option<String>,
}

/// Concepto: one billed product or service row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// ClaveProdServ: c_ClaveProdServ code.
    pub product_code: Option<String>,
    /// NoIdentificacion: seller's own item id.
    pub identification: Option<String>,
    /// Cantidad.
    pub quantity: Option<Decimal>,
    /// ClaveUnidad: c_ClaveUnidad code.
    pub unit_code: Option<String>,
    /// Unidad: free-text unit label.
    pub unit: Option<String>,
    /// Descripcion.
    pub description: Option<String>,
    /// ValorUnitario.
    pub unit_price: Option<Decimal>,
    /// Importe.
    pub amount: Option<Decimal>,
    /// Descuento.
    pub discount: Option<Decimal>,
    /// ObjetoImp: c_ObjetoImp code (4.0 only).
    pub tax_object: Option<String>,
    /// Taxes declared on this concepto, transferred first.
    pub taxes: Vec<TaxEntry>,
}

/// Document-level Impuestos block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// TotalImpuestosTrasladados.
    pub total_transferred: Option<Decimal>,
    /// TotalImpuestosRetenidos.
    pub total_withheld: Option<Decimal>,
    /// Traslados, in document order.
    pub transferred: Vec<TaxEntry>,
    /// Retenciones, in document order.
    pub withheld: Vec<TaxEntry>,
}

impl TaxSummary {
    pub fn is_empty(&self) -> bool {
        self.total_transferred.is_none()
            && self.total_withheld.is_none()
            && self.transferred.is_empty()
            && self.withheld.is_empty()
    }
}

/// One Traslado or Retencion line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxEntry {
    pub kind: TaxKind,
    /// Impuesto / impuesto.
    pub tax: Option<TaxCode>,
    /// TipoFactor (absent on withholdings and in 3.2).
    pub factor: Option<FactorType>,
    /// TasaOCuota / tasa.
    pub rate: Option<Decimal>,
    /// Base (3.3+, concepto level and 4.0 summary level).
    pub base: Option<Decimal>,
    /// Importe / importe.
    pub amount: Option<Decimal>,
}

/// TimbreFiscalDigital: the SAT stamp complement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalStamp {
    /// Version of the stamp complement ("1.1", "1.0").
    pub version: Option<String>,
    /// UUID: the folio fiscal.
    pub uuid: Option<String>,
    /// FechaTimbrado.
    pub stamped_at: Option<NaiveDateTime>,
    /// RfcProvCertif: certification provider (PAC) RFC.
    pub provider_tax_id: Option<String>,
    /// SelloCFD: the issuer's signature, copied into the stamp.
    pub cfd_signature: Option<String>,
    /// SelloSAT: the SAT signature.
    pub sat_signature: Option<String>,
    /// NoCertificadoSAT.
    pub sat_certificate: Option<String>,
}

/// CfdiRelacionados: documents this CFDI relates to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDocuments {
    /// TipoRelacion: c_TipoRelacion code ("01" credit note, "04" substitution, ...).
    pub relation: Option<String>,
    /// UUIDs of the related CfdiRelacionado entries.
    pub uuids: Vec<String>,
}
