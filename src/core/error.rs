use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Faults that abort a parse. At the public boundary every one of these is
/// turned into a single [`ErrorClass::Structural`] entry on the result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CfdiError {
    /// The underlying XML reader rejected the document.
    #[error("XML error: {0}")]
    Xml(String),

    /// Input is larger than the caller-configured limit.
    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// Element nesting exceeds the caller-configured limit.
    #[error("element nesting exceeds depth limit of {limit}")]
    TooDeep { limit: usize },

    /// Element count exceeds the caller-configured limit.
    #[error("document has more than {limit} elements")]
    TooManyElements { limit: usize },

    /// No `Comprobante` element anywhere in the document.
    #[error("no Comprobante element found in the document")]
    RootNotFound,

    /// A fault inside extraction itself (caught panic).
    #[error("internal fault during extraction: {0}")]
    Internal(String),
}

/// Severity class of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Fatal to the parse; `parse_success` is false.
    Structural,
    /// One attribute could not be converted; the field is `None`.
    Field,
}

/// One entry in the ordered error list carried by a parse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub class: ErrorClass,
    /// Element path plus attribute (e.g. "Conceptos/Concepto[2]@Importe").
    /// `None` for document-level structural errors.
    pub field: Option<String>,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl ParseError {
    /// Create a structural (fatal) error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            class: ErrorClass::Structural,
            field: None,
            message: message.into(),
        }
    }

    /// Create a field-level (non-fatal) error.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: ErrorClass::Field,
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn is_structural(&self) -> bool {
        self.class == ErrorClass::Structural
    }
}

impl From<CfdiError> for ParseError {
    fn from(err: CfdiError) -> Self {
        Self::structural(err.to_string())
    }
}
