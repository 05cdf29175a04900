//! Data models for the Return Engine.
//!
//! The `models` module defines the serialisable types that flow
//! through a calculation: the raw form fields as typed by the user,
//! the validated numeric [`InputSet`], and the [`ReturnResult`] the
//! engine produces.  They derive `Serialize` and `Deserialize` so the
//! HTTP layer can exchange them as JSON without extra mapping.

use crate::tax::TaxBreakdown;
use serde::{Deserialize, Serialize};

/// Which of the two inverse calculations is active.
///
/// The mode decides which secondary input is required and which
/// output set is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMode {
    /// Known annual rate, compute the return amount.
    #[default]
    #[serde(rename = "return")]
    ComputeReturn,
    /// Known return amount, compute the annual yield rate.
    #[serde(rename = "percentage")]
    ComputePercentage,
}

impl CalculationMode {
    /// The secondary field this mode requires.
    pub fn secondary_field(self) -> FieldId {
        match self {
            CalculationMode::ComputeReturn => FieldId::Percentage,
            CalculationMode::ComputePercentage => FieldId::ReturnAmount,
        }
    }

    /// The secondary field this mode hides.
    pub fn hidden_field(self) -> FieldId {
        match self {
            CalculationMode::ComputeReturn => FieldId::ReturnAmount,
            CalculationMode::ComputePercentage => FieldId::Percentage,
        }
    }
}

/// Identifies an input on the calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Total,
    Duration,
    /// Annual rate in percent, used by [`CalculationMode::ComputeReturn`].
    Percentage,
    /// Known payout, used by [`CalculationMode::ComputePercentage`].
    #[serde(rename = "return")]
    ReturnAmount,
    TaxRate,
}

impl FieldId {
    /// Whether the field is fed by a selector rather than free text.
    pub fn is_select(self) -> bool {
        matches!(self, FieldId::Duration)
    }
}

/// The raw string fields of one calculation request.
///
/// Values are kept exactly as entered.  Missing fields deserialise to
/// the empty string, which the validator reports as "enter a value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    pub total: String,
    pub duration: String,
    /// Either the annual rate or the known return amount, depending on
    /// the active [`CalculationMode`].
    pub secondary: String,
    /// Optional; empty means no tax.
    pub tax_rate: String,
}

/// Validated numeric inputs.
///
/// `total` and `secondary` are positive and finite once they come out
/// of [`crate::engine::evaluate`].  Library callers building an
/// `InputSet` by hand are responsible for the same invariants; the
/// percentage calculation still guards its own division.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSet {
    /// Deposited principal.
    pub total: f64,
    /// Term length in days.
    pub duration_days: u32,
    /// Annual rate in percent (return mode) or the known return
    /// amount (percentage mode).
    pub secondary: f64,
    pub tax_rate: crate::tax::TaxRate,
}

/// The output of one successful calculation.
///
/// A result is built in one go once all preconditions hold; there is
/// no partially populated state.  `tax` is present only when the tax
/// rate is strictly positive, and in that case `refund_amount` is the
/// principal less the tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum ReturnResult {
    #[serde(rename = "return")]
    Return {
        used_amount: f64,
        gross_return: f64,
        refund_amount: f64,
        tax: Option<TaxBreakdown>,
    },
    #[serde(rename = "percentage")]
    Percentage {
        used_amount: f64,
        /// The known payout the yield was derived from.
        return_amount: f64,
        /// Annual yield rate in percent.
        percentage: f64,
        refund_amount: f64,
        tax: Option<TaxBreakdown>,
    },
}

impl ReturnResult {
    pub fn mode(&self) -> CalculationMode {
        match self {
            ReturnResult::Return { .. } => CalculationMode::ComputeReturn,
            ReturnResult::Percentage { .. } => CalculationMode::ComputePercentage,
        }
    }

    pub fn used_amount(&self) -> f64 {
        match self {
            ReturnResult::Return { used_amount, .. }
            | ReturnResult::Percentage { used_amount, .. } => *used_amount,
        }
    }

    pub fn refund_amount(&self) -> f64 {
        match self {
            ReturnResult::Return { refund_amount, .. }
            | ReturnResult::Percentage { refund_amount, .. } => *refund_amount,
        }
    }

    pub fn tax(&self) -> Option<&TaxBreakdown> {
        match self {
            ReturnResult::Return { tax, .. } | ReturnResult::Percentage { tax, .. } => tax.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_selects_secondary_and_hidden_fields() {
        assert_eq!(CalculationMode::ComputeReturn.secondary_field(), FieldId::Percentage);
        assert_eq!(CalculationMode::ComputeReturn.hidden_field(), FieldId::ReturnAmount);
        assert_eq!(CalculationMode::ComputePercentage.secondary_field(), FieldId::ReturnAmount);
        assert_eq!(CalculationMode::ComputePercentage.hidden_field(), FieldId::Percentage);
    }

    #[test]
    fn raw_inputs_default_missing_fields_to_empty() {
        let raw: RawInputs = serde_json::from_str(r#"{"total": "1000"}"#).unwrap();
        assert_eq!(raw.total, "1000");
        assert_eq!(raw.duration, "");
        assert_eq!(raw.tax_rate, "");
    }

    #[test]
    fn mode_uses_form_values_on_the_wire() {
        assert_eq!(serde_json::to_string(&CalculationMode::ComputeReturn).unwrap(), r#""return""#);
        let mode: CalculationMode = serde_json::from_str(r#""percentage""#).unwrap();
        assert_eq!(mode, CalculationMode::ComputePercentage);
        assert_eq!(serde_json::to_string(&FieldId::ReturnAmount).unwrap(), r#""return""#);
    }
}
