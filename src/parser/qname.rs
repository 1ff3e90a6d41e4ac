//! Qualified-name resolution for CFDI elements and attributes.
//!
//! Producers disagree on namespace prefixes (`cfdi:Concepto` vs a default
//! namespace with bare `Concepto`) and CFDI 3.2 used lower-camel attribute
//! names (`total`, `subTotal`). Every lookup goes through a [`QName`]
//! holding an ordered candidate list; the first candidate that matches wins.
//! New prefixes or spellings are added here and nowhere else.

use super::tree::Node;

/// Ordered candidate names for one element or attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName {
    candidates: &'static [&'static str],
}

impl QName {
    pub const fn new(candidates: &'static [&'static str]) -> Self {
        Self { candidates }
    }

    /// Whether `name` is any of the candidates.
    pub fn matches(self, name: &str) -> bool {
        self.candidates.contains(&name)
    }

    /// First attribute matching a candidate with a non-blank value, as
    /// `(matched name, value)`. Blank values count as absent.
    pub fn attribute<'t>(self, node: Node<'t>) -> Option<(&'static str, &'t str)> {
        self.candidates.iter().find_map(|&name| {
            node.attribute(name)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (name, v))
        })
    }

    /// First direct child matching the candidates, in candidate order.
    pub fn child<'t>(self, node: Node<'t>) -> Option<Node<'t>> {
        self.first_in(node.children())
    }

    /// Direct children carrying the first candidate name that occurs at all.
    ///
    /// Lazy and finite; the candidate is chosen once, so a document mixing
    /// prefixed and bare siblings yields only the preferred spelling.
    pub fn children<'t>(self, node: Node<'t>) -> impl Iterator<Item = Node<'t>> + 't {
        let chosen = self
            .candidates
            .iter()
            .copied()
            .find(|&c| node.children().any(|n| n.name() == c));
        node.children()
            .filter(move |n| chosen.is_some_and(|c| n.name() == c))
    }

    /// First node in `nodes` named by the earliest candidate that matches any.
    pub fn first_in<'t, I>(self, nodes: I) -> Option<Node<'t>>
    where
        I: Iterator<Item = Node<'t>> + Clone,
    {
        self.candidates
            .iter()
            .find_map(|&c| nodes.clone().find(|n| n.name() == c))
    }
}

/// Element name without its namespace prefix, for error paths.
pub fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// Element names, prefixed form first.
pub mod elements {
    use super::QName;

    pub const COMPROBANTE: QName = QName::new(&["cfdi:Comprobante", "Comprobante"]);
    pub const CFDI_RELACIONADOS: QName = QName::new(&["cfdi:CfdiRelacionados", "CfdiRelacionados"]);
    pub const CFDI_RELACIONADO: QName = QName::new(&["cfdi:CfdiRelacionado", "CfdiRelacionado"]);
    pub const EMISOR: QName = QName::new(&["cfdi:Emisor", "Emisor"]);
    pub const RECEPTOR: QName = QName::new(&["cfdi:Receptor", "Receptor"]);
    pub const CONCEPTOS: QName = QName::new(&["cfdi:Conceptos", "Conceptos"]);
    pub const CONCEPTO: QName = QName::new(&["cfdi:Concepto", "Concepto"]);
    pub const IMPUESTOS: QName = QName::new(&["cfdi:Impuestos", "Impuestos"]);
    pub const TRASLADOS: QName = QName::new(&["cfdi:Traslados", "Traslados"]);
    pub const TRASLADO: QName = QName::new(&["cfdi:Traslado", "Traslado"]);
    pub const RETENCIONES: QName = QName::new(&["cfdi:Retenciones", "Retenciones"]);
    pub const RETENCION: QName = QName::new(&["cfdi:Retencion", "Retencion"]);
    pub const COMPLEMENTO: QName = QName::new(&["cfdi:Complemento", "Complemento"]);
    pub const TIMBRE_FISCAL_DIGITAL: QName =
        QName::new(&["tfd:TimbreFiscalDigital", "TimbreFiscalDigital"]);
}

/// Attribute names, CFDI 3.3/4.0 spelling first, then CFDI 3.2.
pub mod attributes {
    use super::QName;

    // Comprobante
    pub const VERSION: QName = QName::new(&["Version", "version"]);
    pub const FECHA: QName = QName::new(&["Fecha", "fecha"]);
    pub const SERIE: QName = QName::new(&["Serie", "serie"]);
    pub const FOLIO: QName = QName::new(&["Folio", "folio"]);
    // 3.2 swapped the meanings: metodoDePago held the payment form and
    // formaDePago the settlement timing.
    pub const FORMA_PAGO: QName = QName::new(&["FormaPago", "metodoDePago"]);
    pub const METODO_PAGO: QName = QName::new(&["MetodoPago", "formaDePago"]);
    pub const TIPO_DE_COMPROBANTE: QName = QName::new(&["TipoDeComprobante", "tipoDeComprobante"]);
    pub const MONEDA: QName = QName::new(&["Moneda"]);
    pub const TIPO_CAMBIO: QName = QName::new(&["TipoCambio"]);
    pub const SUB_TOTAL: QName = QName::new(&["SubTotal", "subTotal"]);
    pub const DESCUENTO: QName = QName::new(&["Descuento", "descuento"]);
    pub const TOTAL: QName = QName::new(&["Total", "total"]);
    pub const NO_CERTIFICADO: QName = QName::new(&["NoCertificado", "noCertificado"]);
    pub const LUGAR_EXPEDICION: QName = QName::new(&["LugarExpedicion"]);
    pub const CONDICIONES_DE_PAGO: QName = QName::new(&["CondicionesDePago", "condicionesDePago"]);
    pub const EXPORTACION: QName = QName::new(&["Exportacion"]);

    // CfdiRelacionados
    pub const TIPO_RELACION: QName = QName::new(&["TipoRelacion"]);

    // Emisor / Receptor
    pub const RFC: QName = QName::new(&["Rfc", "rfc"]);
    pub const NOMBRE: QName = QName::new(&["Nombre", "nombre"]);
    pub const REGIMEN_FISCAL: QName = QName::new(&["RegimenFiscal"]);
    pub const USO_CFDI: QName = QName::new(&["UsoCFDI"]);
    pub const DOMICILIO_FISCAL_RECEPTOR: QName = QName::new(&["DomicilioFiscalReceptor"]);
    pub const REGIMEN_FISCAL_RECEPTOR: QName = QName::new(&["RegimenFiscalReceptor"]);

    // Concepto
    pub const CLAVE_PROD_SERV: QName = QName::new(&["ClaveProdServ"]);
    pub const NO_IDENTIFICACION: QName = QName::new(&["NoIdentificacion", "noIdentificacion"]);
    pub const CANTIDAD: QName = QName::new(&["Cantidad", "cantidad"]);
    pub const CLAVE_UNIDAD: QName = QName::new(&["ClaveUnidad"]);
    pub const UNIDAD: QName = QName::new(&["Unidad", "unidad"]);
    pub const DESCRIPCION: QName = QName::new(&["Descripcion", "descripcion"]);
    pub const VALOR_UNITARIO: QName = QName::new(&["ValorUnitario", "valorUnitario"]);
    pub const IMPORTE: QName = QName::new(&["Importe", "importe"]);
    pub const OBJETO_IMP: QName = QName::new(&["ObjetoImp"]);

    // Impuestos / Traslado / Retencion
    pub const TOTAL_IMPUESTOS_TRASLADADOS: QName =
        QName::new(&["TotalImpuestosTrasladados", "totalImpuestosTrasladados"]);
    pub const TOTAL_IMPUESTOS_RETENIDOS: QName =
        QName::new(&["TotalImpuestosRetenidos", "totalImpuestosRetenidos"]);
    pub const IMPUESTO: QName = QName::new(&["Impuesto", "impuesto"]);
    pub const TIPO_FACTOR: QName = QName::new(&["TipoFactor"]);
    pub const TASA_O_CUOTA: QName = QName::new(&["TasaOCuota", "tasa"]);
    pub const BASE: QName = QName::new(&["Base"]);

    // TimbreFiscalDigital
    pub const UUID: QName = QName::new(&["UUID"]);
    pub const FECHA_TIMBRADO: QName = QName::new(&["FechaTimbrado"]);
    pub const RFC_PROV_CERTIF: QName = QName::new(&["RfcProvCertif"]);
    pub const SELLO_CFD: QName = QName::new(&["SelloCFD", "selloCFD"]);
    pub const SELLO_SAT: QName = QName::new(&["SelloSAT", "selloSAT"]);
    pub const NO_CERTIFICADO_SAT: QName = QName::new(&["NoCertificadoSAT", "noCertificadoSAT"]);
}
