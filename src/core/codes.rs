//! SAT catalog codes used by the CFDI attributes.
//!
//! Every code-valued attribute becomes a closed enum with an `Unknown`
//! variant that keeps the raw value, so unrecognized codes survive
//! extraction instead of failing it.

use serde::{Deserialize, Serialize};

/// c_TipoDeComprobante: document type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// I: Ingreso (regular invoice).
    Income,
    /// E: Egreso (credit note, refund, discount).
    Expense,
    /// T: Traslado (transport of goods).
    Transfer,
    /// N: Nómina (payroll receipt).
    Payroll,
    /// P: Pago (payment complement, "REP").
    Payment,
    /// Any other code value.
    Unknown(String),
}

impl DocumentType {
    pub fn code(&self) -> &str {
        match self {
            Self::Income => "I",
            Self::Expense => "E",
            Self::Transfer => "T",
            Self::Payroll => "N",
            Self::Payment => "P",
            Self::Unknown(c) => c,
        }
    }

    /// Parse from a c_TipoDeComprobante code. CFDI 3.2 spelled the type out
    /// in lower case ("ingreso", "egreso", "traslado").
    pub fn from_code(code: &str) -> Self {
        match code {
            "I" | "ingreso" => Self::Income,
            "E" | "egreso" => Self::Expense,
            "T" | "traslado" => Self::Transfer,
            "N" => Self::Payroll,
            "P" => Self::Payment,
            c => Self::Unknown(c.to_string()),
        }
    }
}

/// c_MetodoPago: settlement timing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementTiming {
    /// PUE: paid in a single installment at issue.
    SingleInstallment,
    /// PPD: paid in installments or deferred.
    Deferred,
    /// Any other code value.
    Unknown(String),
}

impl SettlementTiming {
    pub fn code(&self) -> &str {
        match self {
            Self::SingleInstallment => "PUE",
            Self::Deferred => "PPD",
            Self::Unknown(c) => c,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "PUE" => Self::SingleInstallment,
            "PPD" => Self::Deferred,
            c => Self::Unknown(c.to_string()),
        }
    }

    /// Human-readable label, `None` for unknown codes.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::SingleInstallment => Some("Pago en una sola exhibición"),
            Self::Deferred => Some("Pago en parcialidades o diferido"),
            Self::Unknown(_) => None,
        }
    }
}

/// Whether a tax line is charged to the recipient or withheld at source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxKind {
    /// Traslado.
    Transferred,
    /// Retención.
    Withheld,
}

/// c_Impuesto: tax code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCode {
    /// 001: ISR (income tax).
    Isr,
    /// 002: IVA (value added tax).
    Iva,
    /// 003: IEPS (special tax on production and services).
    Ieps,
    /// Any other code value.
    Unknown(String),
}

impl TaxCode {
    pub fn code(&self) -> &str {
        match self {
            Self::Isr => "001",
            Self::Iva => "002",
            Self::Ieps => "003",
            Self::Unknown(c) => c,
        }
    }

    /// Parse from a c_Impuesto code, or the tax name used by CFDI 3.2.
    pub fn from_code(code: &str) -> Self {
        match code {
            "001" | "ISR" => Self::Isr,
            "002" | "IVA" => Self::Iva,
            "003" | "IEPS" => Self::Ieps,
            c => Self::Unknown(c.to_string()),
        }
    }
}

/// c_TipoFactor: how the tax rate is expressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorType {
    /// Tasa: a percentage rate (0.160000).
    Rate,
    /// Cuota: a fixed amount per unit.
    Quota,
    /// Exento: exempt, no rate or amount.
    Exempt,
    /// Any other code value.
    Unknown(String),
}

impl FactorType {
    pub fn code(&self) -> &str {
        match self {
            Self::Rate => "Tasa",
            Self::Quota => "Cuota",
            Self::Exempt => "Exento",
            Self::Unknown(c) => c,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "Tasa" => Self::Rate,
            "Cuota" => Self::Quota,
            "Exento" => Self::Exempt,
            c => Self::Unknown(c.to_string()),
        }
    }
}

/// Label for a c_FormaPago code, `None` if the code is not in the catalog.
pub fn payment_form_label(code: &str) -> Option<&'static str> {
    PAYMENT_FORMS
        .binary_search_by(|(c, _)| c.cmp(&code))
        .ok()
        .map(|i| PAYMENT_FORMS[i].1)
}

/// c_FormaPago, sorted by code for binary search.
static PAYMENT_FORMS: &[(&str, &str)] = &[
    ("01", "Efectivo"),
    ("02", "Cheque nominativo"),
    ("03", "Transferencia electrónica de fondos"),
    ("04", "Tarjeta de crédito"),
    ("05", "Monedero electrónico"),
    ("06", "Dinero electrónico"),
    ("08", "Vales de despensa"),
    ("12", "Dación en pago"),
    ("13", "Pago por subrogación"),
    ("14", "Pago por consignación"),
    ("15", "Condonación"),
    ("17", "Compensación"),
    ("23", "Novación"),
    ("24", "Confusión"),
    ("25", "Remisión de deuda"),
    ("26", "Prescripción o caducidad"),
    ("27", "A satisfacción del acreedor"),
    ("28", "Tarjeta de débito"),
    ("29", "Tarjeta de servicios"),
    ("30", "Aplicación de anticipos"),
    ("31", "Intermediario pagos"),
    ("99", "Por definir"),
];
