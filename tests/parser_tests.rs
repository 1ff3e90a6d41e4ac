#![cfg(feature = "parser")]

use chrono::{NaiveDate, NaiveDateTime};
use cfdi::core::*;
use cfdi::parser::parse_cfdi;
use rust_decimal_macros::dec;

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

/// A complete, stamped CFDI 4.0 income invoice.
const CFDI_40: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4"
    xmlns:tfd="http://www.sat.gob.mx/TimbreFiscalDigital"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    Version="4.0" Serie="F" Folio="2024-0117" Fecha="2024-03-08T09:41:27"
    FormaPago="03" NoCertificado="00001000000509846663" SubTotal="2500.00"
    Descuento="100.00" Moneda="MXN" Total="2784.00" TipoDeComprobante="I"
    Exportacion="01" MetodoPago="PUE" LugarExpedicion="06600"
    CondicionesDePago="Contado" Sello="c2VsbG8=" Certificado="Y2VydA==">
  <cfdi:Emisor Rfc="EKU9003173C9" Nombre="ESCUELA KEMPER URGATE" RegimenFiscal="601"/>
  <cfdi:Receptor Rfc="URE180429TM6" Nombre="UNIVERSIDAD ROBOTICA ESPAÑOLA"
      DomicilioFiscalReceptor="86991" RegimenFiscalReceptor="601" UsoCFDI="G03"/>
  <cfdi:Conceptos>
    <cfdi:Concepto ClaveProdServ="81112100" NoIdentificacion="SRV-01" Cantidad="2"
        ClaveUnidad="E48" Unidad="Servicio" Descripcion="Soporte técnico mensual"
        ValorUnitario="1000.00" Importe="2000.00" Descuento="100.00" ObjetoImp="02">
      <cfdi:Impuestos>
        <cfdi:Traslados>
          <cfdi:Traslado Base="1900.00" Impuesto="002" TipoFactor="Tasa" TasaOCuota="0.160000" Importe="304.00"/>
        </cfdi:Traslados>
      </cfdi:Impuestos>
    </cfdi:Concepto>
    <cfdi:Concepto ClaveProdServ="43231500" Cantidad="1" ClaveUnidad="H87"
        Descripcion="Licencia de software" ValorUnitario="500.00" Importe="500.00" ObjetoImp="02">
      <cfdi:Impuestos>
        <cfdi:Traslados>
          <cfdi:Traslado Base="500.00" Impuesto="002" TipoFactor="Tasa" TasaOCuota="0.160000" Importe="80.00"/>
        </cfdi:Traslados>
      </cfdi:Impuestos>
    </cfdi:Concepto>
  </cfdi:Conceptos>
  <cfdi:Impuestos TotalImpuestosTrasladados="384.00">
    <cfdi:Traslados>
      <cfdi:Traslado Base="2400.00" Impuesto="002" TipoFactor="Tasa" TasaOCuota="0.160000" Importe="384.00"/>
    </cfdi:Traslados>
  </cfdi:Impuestos>
  <cfdi:Complemento>
    <tfd:TimbreFiscalDigital Version="1.1" UUID="6F1B2E3A-5C4D-4E8F-9A0B-1C2D3E4F5A6B"
        FechaTimbrado="2024-03-08T09:42:03" RfcProvCertif="SAT970701NN3"
        SelloCFD="c2VsbG9DRkQ=" NoCertificadoSAT="00001000000505211329" SelloSAT="c2VsbG9TQVQ="/>
  </cfdi:Complemento>
</cfdi:Comprobante>"#;

#[test]
fn parses_complete_cfdi_40() {
    let inv = parse_cfdi(CFDI_40);

    assert!(inv.parse_success);
    assert!(inv.parse_errors.is_empty(), "{:?}", inv.parse_errors);
    assert!(inv.is_usable());

    assert_eq!(inv.version.as_deref(), Some("4.0"));
    assert_eq!(inv.series.as_deref(), Some("F"));
    assert_eq!(inv.folio.as_deref(), Some("2024-0117"));
    assert_eq!(inv.issued_at, Some(datetime(2024, 3, 8, 9, 41, 27)));
    assert_eq!(inv.payment_form.as_deref(), Some("03"));
    assert_eq!(inv.settlement, Some(SettlementTiming::SingleInstallment));
    assert_eq!(inv.document_type, Some(DocumentType::Income));
    assert_eq!(inv.currency.as_deref(), Some("MXN"));
    assert_eq!(inv.exchange_rate, None);
    assert_eq!(inv.subtotal, Some(dec!(2500.00)));
    assert_eq!(inv.discount, Some(dec!(100.00)));
    assert_eq!(inv.total, Some(dec!(2784.00)));
    assert_eq!(inv.issuer_certificate.as_deref(), Some("00001000000509846663"));
    assert_eq!(inv.place_of_issue.as_deref(), Some("06600"));
    assert_eq!(inv.payment_conditions.as_deref(), Some("Contado"));
    assert_eq!(inv.export_code.as_deref(), Some("01"));
    assert!(inv.related.is_empty());
}

#[test]
fn parses_parties() {
    let inv = parse_cfdi(CFDI_40);

    assert_eq!(
        inv.issuer,
        Issuer {
            tax_id: Some("EKU9003173C9".into()),
            name: Some("ESCUELA KEMPER URGATE".into()),
            tax_regime: Some("601".into()),
        }
    );
    assert_eq!(
        inv.recipient,
        Recipient {
            tax_id: Some("URE180429TM6".into()),
            name: Some("UNIVERSIDAD ROBOTICA ESPAÑOLA".into()),
            cfdi_use: Some("G03".into()),
            fiscal_address: Some("86991".into()),
            tax_regime: Some("601".into()),
        }
    );
}

#[test]
fn parses_line_items_in_order() {
    let inv = parse_cfdi(CFDI_40);
    assert_eq!(inv.line_items.len(), 2);

    let first = &inv.line_items[0];
    assert_eq!(first.product_code.as_deref(), Some("81112100"));
    assert_eq!(first.identification.as_deref(), Some("SRV-01"));
    assert_eq!(first.quantity, Some(dec!(2)));
    assert_eq!(first.unit_code.as_deref(), Some("E48"));
    assert_eq!(first.unit.as_deref(), Some("Servicio"));
    assert_eq!(first.description.as_deref(), Some("Soporte técnico mensual"));
    assert_eq!(first.unit_price, Some(dec!(1000.00)));
    assert_eq!(first.amount, Some(dec!(2000.00)));
    assert_eq!(first.discount, Some(dec!(100.00)));
    assert_eq!(first.tax_object.as_deref(), Some("02"));
    assert_eq!(first.taxes.len(), 1);
    assert_eq!(first.taxes[0].amount, Some(dec!(304.00)));

    let second = &inv.line_items[1];
    assert_eq!(second.description.as_deref(), Some("Licencia de software"));
    assert_eq!(second.unit, None);
    assert_eq!(second.discount, None);
}

#[test]
fn parses_tax_summary() {
    let inv = parse_cfdi(CFDI_40);
    let taxes = &inv.taxes;

    assert_eq!(taxes.total_transferred, Some(dec!(384.00)));
    assert_eq!(taxes.total_withheld, None);
    assert!(taxes.withheld.is_empty());
    assert_eq!(
        taxes.transferred,
        vec![TaxEntry {
            kind: TaxKind::Transferred,
            tax: Some(TaxCode::Iva),
            factor: Some(FactorType::Rate),
            rate: Some(dec!(0.160000)),
            base: Some(dec!(2400.00)),
            amount: Some(dec!(384.00)),
        }]
    );
}

#[test]
fn parses_digital_stamp() {
    let inv = parse_cfdi(CFDI_40);
    let stamp = inv.stamp.as_ref().unwrap();

    assert_eq!(stamp.version.as_deref(), Some("1.1"));
    assert_eq!(stamp.uuid.as_deref(), Some("6F1B2E3A-5C4D-4E8F-9A0B-1C2D3E4F5A6B"));
    assert_eq!(stamp.stamped_at, Some(datetime(2024, 3, 8, 9, 42, 3)));
    assert_eq!(stamp.provider_tax_id.as_deref(), Some("SAT970701NN3"));
    assert_eq!(stamp.cfd_signature.as_deref(), Some("c2VsbG9DRkQ="));
    assert_eq!(stamp.sat_signature.as_deref(), Some("c2VsbG9TQVQ="));
    assert_eq!(stamp.sat_certificate.as_deref(), Some("00001000000505211329"));
    assert_eq!(inv.uuid, stamp.uuid);
}

#[test]
fn keeps_raw_xml() {
    let inv = parse_cfdi(CFDI_40);
    assert_eq!(inv.raw_xml, CFDI_40);
}

#[test]
fn accepts_bytes_and_str_alike() {
    assert_eq!(parse_cfdi(CFDI_40.as_bytes()), parse_cfdi(CFDI_40));
}

#[test]
fn unprefixed_document_yields_identical_fields() {
    let bare = CFDI_40.replace("cfdi:", "").replace("tfd:", "");
    let prefixed = parse_cfdi(CFDI_40);
    let unprefixed = parse_cfdi(&bare);

    assert!(unprefixed.parse_success);
    assert_eq!(
        ParsedInvoice {
            raw_xml: String::new(),
            ..prefixed
        },
        ParsedInvoice {
            raw_xml: String::new(),
            ..unprefixed
        }
    );
}

#[test]
fn default_namespace_document() {
    let xml = r#"<Comprobante xmlns="http://www.sat.gob.mx/cfd/4" Version="4.0" Total="10.00">
        <Emisor Rfc="AAA010101AAA"/>
        <Complemento>
          <TimbreFiscalDigital xmlns="http://www.sat.gob.mx/TimbreFiscalDigital" UUID="U-1"/>
        </Complemento>
      </Comprobante>"#;
    let inv = parse_cfdi(xml);
    assert!(inv.parse_success);
    assert_eq!(inv.total, Some(dec!(10.00)));
    assert_eq!(inv.issuer.tax_id.as_deref(), Some("AAA010101AAA"));
    assert_eq!(inv.uuid.as_deref(), Some("U-1"));
}

#[test]
fn cfdi_33_without_40_attributes() {
    let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/3" Version="3.3"
        Fecha="2021-11-30T18:05:00" Folio="889" Moneda="USD" TipoCambio="20.5120"
        SubTotal="100.00" Total="116.00" TipoDeComprobante="I" MetodoPago="PPD" FormaPago="99">
      <cfdi:Emisor Rfc="AAA010101AAA" Nombre="Proveedor" RegimenFiscal="601"/>
      <cfdi:Receptor Rfc="XAXX010101000" Nombre="Cliente" UsoCFDI="G03"/>
      <cfdi:Conceptos>
        <cfdi:Concepto ClaveProdServ="01010101" Cantidad="1" ClaveUnidad="ACT"
            Descripcion="Servicio" ValorUnitario="100.00" Importe="100.00"/>
      </cfdi:Conceptos>
    </cfdi:Comprobante>"#;
    let inv = parse_cfdi(xml);

    assert!(inv.parse_success);
    assert!(inv.parse_errors.is_empty());
    assert_eq!(inv.recipient.fiscal_address, None);
    assert_eq!(inv.recipient.tax_regime, None);
    assert_eq!(inv.recipient.cfdi_use.as_deref(), Some("G03"));
    assert_eq!(inv.currency.as_deref(), Some("USD"));
    assert_eq!(inv.exchange_rate, Some(dec!(20.5120)));
    assert_eq!(inv.settlement, Some(SettlementTiming::Deferred));
    assert_eq!(inv.export_code, None);
    assert_eq!(inv.line_items[0].tax_object, None);
    assert!(inv.stamp.is_none());
    assert_eq!(inv.uuid, None);
}

#[test]
fn cfdi_32_lower_camel_attributes() {
    let xml = r#"<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/3" version="3.2"
        serie="B" folio="77" fecha="2016-05-02T11:20:00" subTotal="1000.00" descuento="0.00"
        total="1160.00" tipoDeComprobante="ingreso" formaDePago="Pago en una sola exhibición"
        metodoDePago="Transferencia" noCertificado="20001000000200001428">
      <cfdi:Emisor rfc="AAA010101AAA" nombre="Viejo Proveedor"/>
      <cfdi:Receptor rfc="XAXX010101000" nombre="Cliente"/>
      <cfdi:Conceptos>
        <cfdi:Concepto cantidad="10" unidad="pieza" descripcion="Tornillo"
            valorUnitario="100.00" importe="1000.00"/>
      </cfdi:Conceptos>
      <cfdi:Impuestos totalImpuestosTrasladados="160.00">
        <cfdi:Traslados>
          <cfdi:Traslado impuesto="IVA" tasa="16.00" importe="160.00"/>
        </cfdi:Traslados>
      </cfdi:Impuestos>
      <cfdi:Complemento>
        <tfd:TimbreFiscalDigital xmlns:tfd="http://www.sat.gob.mx/TimbreFiscalDigital"
            version="1.0" UUID="AD662D33-6934-459C-A128-BDF0393E0F44"
            FechaTimbrado="2016-05-02T11:21:00" selloCFD="abc" noCertificadoSAT="20001000000100005761" selloSAT="def"/>
      </cfdi:Complemento>
    </cfdi:Comprobante>"#;
    let inv = parse_cfdi(xml);

    assert!(inv.parse_success);
    assert!(inv.parse_errors.is_empty(), "{:?}", inv.parse_errors);
    assert_eq!(inv.version.as_deref(), Some("3.2"));
    assert_eq!(inv.series.as_deref(), Some("B"));
    assert_eq!(inv.total, Some(dec!(1160.00)));
    assert_eq!(inv.subtotal, Some(dec!(1000.00)));
    assert_eq!(inv.document_type, Some(DocumentType::Income));
    assert_eq!(inv.payment_form.as_deref(), Some("Transferencia"));
    assert_eq!(
        inv.settlement,
        Some(SettlementTiming::Unknown("Pago en una sola exhibición".into()))
    );
    assert_eq!(inv.issuer.tax_id.as_deref(), Some("AAA010101AAA"));
    assert_eq!(inv.line_items[0].quantity, Some(dec!(10)));
    assert_eq!(inv.line_items[0].unit.as_deref(), Some("pieza"));
    assert_eq!(inv.taxes.transferred[0].tax, Some(TaxCode::Iva));
    assert_eq!(inv.taxes.transferred[0].rate, Some(dec!(16.00)));
    assert_eq!(inv.taxes.transferred[0].factor, None);
    let stamp = inv.stamp.unwrap();
    assert_eq!(stamp.version.as_deref(), Some("1.0"));
    assert_eq!(stamp.sat_certificate.as_deref(), Some("20001000000100005761"));
}

#[test]
fn withholdings_are_kept_apart() {
    let xml = r#"<cfdi:Comprobante Total="1060.00">
      <cfdi:Impuestos TotalImpuestosTrasladados="160.00" TotalImpuestosRetenidos="100.00">
        <cfdi:Retenciones>
          <cfdi:Retencion Impuesto="001" Importe="100.00"/>
        </cfdi:Retenciones>
        <cfdi:Traslados>
          <cfdi:Traslado Base="1000.00" Impuesto="002" TipoFactor="Tasa" TasaOCuota="0.160000" Importe="160.00"/>
        </cfdi:Traslados>
      </cfdi:Impuestos>
    </cfdi:Comprobante>"#;
    let inv = parse_cfdi(xml);

    assert_eq!(inv.taxes.total_withheld, Some(dec!(100.00)));
    assert_eq!(inv.taxes.withheld.len(), 1);
    let isr = &inv.taxes.withheld[0];
    assert_eq!(isr.kind, TaxKind::Withheld);
    assert_eq!(isr.tax, Some(TaxCode::Isr));
    assert_eq!(isr.factor, None);
    assert_eq!(isr.rate, None);
    assert_eq!(inv.taxes.transferred.len(), 1);
    assert_eq!(inv.taxes.transferred[0].kind, TaxKind::Transferred);
}

#[test]
fn exempt_transfer_without_rate() {
    let xml = r#"<Comprobante><Impuestos><Traslados>
        <Traslado Base="500.00" Impuesto="002" TipoFactor="Exento"/>
      </Traslados></Impuestos></Comprobante>"#;
    let inv = parse_cfdi(xml);
    let entry = &inv.taxes.transferred[0];
    assert_eq!(entry.factor, Some(FactorType::Exempt));
    assert_eq!(entry.rate, None);
    assert_eq!(entry.amount, None);
    assert!(inv.parse_errors.is_empty());
}

#[test]
fn payment_complement_with_related_documents() {
    let xml = r#"<cfdi:Comprobante Version="4.0" TipoDeComprobante="P" Moneda="XXX" SubTotal="0" Total="0">
      <cfdi:CfdiRelacionados TipoRelacion="04">
        <cfdi:CfdiRelacionado UUID="11111111-1111-1111-1111-111111111111"/>
      </cfdi:CfdiRelacionados>
      <cfdi:CfdiRelacionados TipoRelacion="07">
        <cfdi:CfdiRelacionado UUID="22222222-2222-2222-2222-222222222222"/>
        <cfdi:CfdiRelacionado UUID="33333333-3333-3333-3333-333333333333"/>
      </cfdi:CfdiRelacionados>
    </cfdi:Comprobante>"#;
    let inv = parse_cfdi(xml);

    assert_eq!(inv.document_type, Some(DocumentType::Payment));
    assert_eq!(inv.currency.as_deref(), Some("XXX"));
    assert_eq!(inv.total, Some(dec!(0)));
    assert_eq!(inv.related.len(), 2);
    assert_eq!(inv.related[0].relation.as_deref(), Some("04"));
    assert_eq!(inv.related[1].uuids.len(), 2);
}
