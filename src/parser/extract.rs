use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::qname::{QName, attributes as attr, elements as el, local_name};
use super::tree::{Node, XmlTree};
use crate::core::*;

/// Currency assumed when the Comprobante omits `Moneda`.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Walk `tree` section by section and convert attributes to typed fields.
///
/// Returns [`CfdiError::RootNotFound`] when no `Comprobante` exists; every
/// other problem is recorded as a field error in the returned invoice's
/// `parse_errors` and the field is left `None`.
pub(crate) fn extract(tree: &XmlTree) -> Result<ParsedInvoice, CfdiError> {
    let root = find_root(tree).ok_or(CfdiError::RootNotFound)?;

    let mut errors = Vec::new();
    let mut doc = Fields::new(root, local_name(root.name()).to_string(), &mut errors);

    let mut invoice = ParsedInvoice {
        version: doc.text(attr::VERSION),
        issued_at: doc.datetime(attr::FECHA),
        series: doc.text(attr::SERIE),
        folio: doc.text(attr::FOLIO),
        payment_form: doc.text(attr::FORMA_PAGO),
        settlement: doc.code(attr::METODO_PAGO, SettlementTiming::from_code),
        document_type: doc.code(attr::TIPO_DE_COMPROBANTE, DocumentType::from_code),
        currency: Some(
            doc.text(attr::MONEDA)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        ),
        exchange_rate: doc.decimal(attr::TIPO_CAMBIO),
        subtotal: doc.decimal(attr::SUB_TOTAL),
        discount: doc.decimal(attr::DESCUENTO),
        total: doc.decimal(attr::TOTAL),
        issuer_certificate: doc.text(attr::NO_CERTIFICADO),
        place_of_issue: doc.text(attr::LUGAR_EXPEDICION),
        payment_conditions: doc.text(attr::CONDICIONES_DE_PAGO),
        export_code: doc.text(attr::EXPORTACION),
        ..ParsedInvoice::default()
    };

    invoice.related = el::CFDI_RELACIONADOS
        .children(root)
        .map(related_documents)
        .collect();

    if let Some(node) = el::EMISOR.child(root) {
        invoice.issuer = issuer(node, &mut errors);
    }
    if let Some(node) = el::RECEPTOR.child(root) {
        invoice.recipient = recipient(node, &mut errors);
    }

    if let Some(conceptos) = el::CONCEPTOS.child(root) {
        invoice.line_items = el::CONCEPTO
            .children(conceptos)
            .enumerate()
            .map(|(i, node)| line_item(node, i + 1, &mut errors))
            .collect();
    }

    // Only the Impuestos directly under the root; each Concepto has its own.
    if let Some(node) = el::IMPUESTOS.child(root) {
        invoice.taxes = tax_summary(node, &mut errors);
    }

    invoice.stamp = find_stamp(root).map(|node| digital_stamp(node, &mut errors));
    invoice.uuid = invoice.stamp.as_ref().and_then(|s| s.uuid.clone());

    invoice.parse_success = true;
    invoice.parse_errors = errors;
    Ok(invoice)
}

/// The outermost Comprobante in document order, whatever its spelling.
/// Pre-order puts the document element first, so a copy nested in an
/// Addenda never wins over the real root.
fn find_root(tree: &XmlTree) -> Option<Node<'_>> {
    tree.descendants()
        .find(|n| el::COMPROBANTE.matches(n.name()))
}

/// Only the root's Complemento carries this document's stamp; stamps
/// elsewhere belong to embedded documents.
fn find_stamp(root: Node<'_>) -> Option<Node<'_>> {
    el::COMPLEMENTO
        .children(root)
        .find_map(|complemento| el::TIMBRE_FISCAL_DIGITAL.child(complemento))
}

fn related_documents(node: Node<'_>) -> RelatedDocuments {
    RelatedDocuments {
        relation: plain_text(node, attr::TIPO_RELACION),
        uuids: el::CFDI_RELACIONADO
            .children(node)
            .filter_map(|n| plain_text(n, attr::UUID))
            .collect(),
    }
}

fn issuer(node: Node<'_>, errors: &mut Vec<ParseError>) -> Issuer {
    let f = Fields::new(node, "Emisor".into(), errors);
    Issuer {
        tax_id: f.text(attr::RFC),
        name: f.text(attr::NOMBRE),
        tax_regime: f.text(attr::REGIMEN_FISCAL),
    }
}

fn recipient(node: Node<'_>, errors: &mut Vec<ParseError>) -> Recipient {
    let f = Fields::new(node, "Receptor".into(), errors);
    Recipient {
        tax_id: f.text(attr::RFC),
        name: f.text(attr::NOMBRE),
        cfdi_use: f.text(attr::USO_CFDI),
        fiscal_address: f.text(attr::DOMICILIO_FISCAL_RECEPTOR),
        tax_regime: f.text(attr::REGIMEN_FISCAL_RECEPTOR),
    }
}

fn line_item(node: Node<'_>, position: usize, errors: &mut Vec<ParseError>) -> LineItem {
    let path = format!("Conceptos/Concepto[{position}]");
    let mut f = Fields::new(node, path.clone(), errors);
    let mut item = LineItem {
        product_code: f.text(attr::CLAVE_PROD_SERV),
        identification: f.text(attr::NO_IDENTIFICACION),
        quantity: f.decimal(attr::CANTIDAD),
        unit_code: f.text(attr::CLAVE_UNIDAD),
        unit: f.text(attr::UNIDAD),
        description: f.text(attr::DESCRIPCION),
        unit_price: f.decimal(attr::VALOR_UNITARIO),
        amount: f.decimal(attr::IMPORTE),
        discount: f.decimal(attr::DESCUENTO),
        tax_object: f.text(attr::OBJETO_IMP),
        taxes: Vec::new(),
    };

    if let Some(impuestos) = el::IMPUESTOS.child(node) {
        let (transferred, withheld) =
            tax_entries(impuestos, &format!("{path}/Impuestos"), f.errors);
        item.taxes = transferred.into_iter().chain(withheld).collect();
    }
    item
}

fn tax_summary(node: Node<'_>, errors: &mut Vec<ParseError>) -> TaxSummary {
    let mut f = Fields::new(node, "Impuestos".into(), errors);
    let total_transferred = f.decimal(attr::TOTAL_IMPUESTOS_TRASLADADOS);
    let total_withheld = f.decimal(attr::TOTAL_IMPUESTOS_RETENIDOS);
    let (transferred, withheld) = tax_entries(node, "Impuestos", f.errors);
    TaxSummary {
        total_transferred,
        total_withheld,
        transferred,
        withheld,
    }
}

/// Traslados and Retenciones under one Impuestos element.
fn tax_entries(
    impuestos: Node<'_>,
    path: &str,
    errors: &mut Vec<ParseError>,
) -> (Vec<TaxEntry>, Vec<TaxEntry>) {
    let transferred = el::TRASLADOS
        .child(impuestos)
        .map(|group| {
            el::TRASLADO
                .children(group)
                .enumerate()
                .map(|(i, node)| {
                    let path = format!("{path}/Traslados/Traslado[{}]", i + 1);
                    tax_entry(node, TaxKind::Transferred, path, errors)
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let withheld = el::RETENCIONES
        .child(impuestos)
        .map(|group| {
            el::RETENCION
                .children(group)
                .enumerate()
                .map(|(i, node)| {
                    let path = format!("{path}/Retenciones/Retencion[{}]", i + 1);
                    tax_entry(node, TaxKind::Withheld, path, errors)
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    (transferred, withheld)
}

fn tax_entry(node: Node<'_>, kind: TaxKind, path: String, errors: &mut Vec<ParseError>) -> TaxEntry {
    let mut f = Fields::new(node, path, errors);
    TaxEntry {
        kind,
        tax: f.code(attr::IMPUESTO, TaxCode::from_code),
        factor: f.code(attr::TIPO_FACTOR, FactorType::from_code),
        rate: f.decimal(attr::TASA_O_CUOTA),
        base: f.decimal(attr::BASE),
        amount: f.decimal(attr::IMPORTE),
    }
}

fn digital_stamp(node: Node<'_>, errors: &mut Vec<ParseError>) -> DigitalStamp {
    let mut f = Fields::new(node, "Complemento/TimbreFiscalDigital".into(), errors);
    DigitalStamp {
        version: f.text(attr::VERSION),
        uuid: f.text(attr::UUID),
        stamped_at: f.datetime(attr::FECHA_TIMBRADO),
        provider_tax_id: f.text(attr::RFC_PROV_CERTIF),
        cfd_signature: f.text(attr::SELLO_CFD),
        sat_signature: f.text(attr::SELLO_SAT),
        sat_certificate: f.text(attr::NO_CERTIFICADO_SAT),
    }
}

fn plain_text(node: Node<'_>, name: QName) -> Option<String> {
    name.attribute(node).map(|(_, v)| v.trim().to_string())
}

/// Typed attribute access for one element, appending a field error for
/// every value that is present but not convertible.
struct Fields<'a, 't> {
    node: Node<'t>,
    path: String,
    errors: &'a mut Vec<ParseError>,
}

impl<'a, 't> Fields<'a, 't> {
    fn new(node: Node<'t>, path: String, errors: &'a mut Vec<ParseError>) -> Self {
        Self { node, path, errors }
    }

    fn text(&self, name: QName) -> Option<String> {
        plain_text(self.node, name)
    }

    fn code<T>(&self, name: QName, from_code: fn(&str) -> T) -> Option<T> {
        name.attribute(self.node).map(|(_, v)| from_code(v.trim()))
    }

    fn decimal(&mut self, name: QName) -> Option<Decimal> {
        let (matched, raw) = name.attribute(self.node)?;
        match parse_decimal(raw) {
            Ok(d) => Some(d),
            Err(message) => self.fail(matched, message),
        }
    }

    fn datetime(&mut self, name: QName) -> Option<NaiveDateTime> {
        let (matched, raw) = name.attribute(self.node)?;
        match parse_datetime(raw) {
            Ok(dt) => Some(dt),
            Err(message) => self.fail(matched, message),
        }
    }

    fn fail<T>(&mut self, attribute: &str, message: String) -> Option<T> {
        let field = format!("{}@{attribute}", self.path);
        tracing::debug!(%field, %message, "CFDI field not convertible");
        self.errors.push(ParseError::field(field, message));
        None
    }
}

/// Locale-agnostic decimal: `.` separator, no grouping, whitespace trimmed.
pub fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|e| format!("invalid decimal '{raw}': {e}"))
}

/// CFDI timestamps are ISO 8601 local times without offset
/// (`2024-01-15T10:30:00`). Fractional seconds, an explicit offset (kept as
/// the local wall-clock time) and bare dates are accepted as well.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let s = raw.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_local()))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| format!("invalid date '{raw}'"))
}
