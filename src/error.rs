//! Calculation errors.
//!
//! Two classes of failure exist.  Field errors are recoverable and
//! reported together, one per failing field.  Fatal precondition errors
//! abort the calculation outright and carry a single message.

use crate::locale::{message, Locale, MessageKind};
use crate::models::FieldId;
use serde::Serialize;
use thiserror::Error;

/// A failed field together with its localized message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldId,
    pub kind: MessageKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The optional tax rate is present but not a number in `[0, 100]`.
    #[error("tax rate must be between 0 and 100")]
    TaxRateOutOfRange,
    /// Percentage mode only: the return amount consumes the whole
    /// principal, or the duration is zero.
    #[error("used amount must be positive")]
    UsedAmountNotPositive,
    #[error("{} field(s) failed validation", .0.len())]
    InvalidFields(Vec<FieldError>),
}

impl CalcError {
    /// Whether the error blocks the calculation as a whole rather than
    /// pointing at individual fields.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CalcError::InvalidFields(_))
    }

    /// The blocking message for fatal errors, in `locale`.
    pub fn localized(&self, locale: Locale) -> Option<&'static str> {
        match self {
            CalcError::TaxRateOutOfRange => Some(message(locale, MessageKind::TaxRateRange)),
            CalcError::UsedAmountNotPositive => {
                Some(message(locale, MessageKind::UsedAmountPositive))
            }
            CalcError::InvalidFields(_) => None,
        }
    }
}
