//! Calculator form state and mode controller.
//!
//! [`FormState`] is the rendering-free model of the calculator page:
//! the field values, which input groups show an error, which secondary
//! group is hidden, and whether the results area is revealed.  It is
//! the boundary layer that applies validation outcomes; the validator
//! and engine themselves stay pure.

use crate::engine::{compute, parse_inputs};
use crate::error::CalcError;
use crate::locale::Locale;
use crate::models::{CalculationMode, FieldId, RawInputs, ReturnResult};
use crate::present::{render, ResultItem};
use crate::validation::sanitize_live;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FormState {
    mode: CalculationMode,
    values: BTreeMap<FieldId, String>,
    errors: BTreeMap<FieldId, String>,
    results: Vec<ResultItem>,
    results_visible: bool,
}

impl FormState {
    /// A blank form in return mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> CalculationMode {
        self.mode
    }

    pub fn value(&self, field: FieldId) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// The error currently shown on `field`'s input group, if any.
    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_hidden(&self, field: FieldId) -> bool {
        field == self.mode.hidden_field()
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    /// Items of the last successful calculation.
    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    /// Store a field value as the user typed it.  Numeric fields are
    /// filtered the way the live input filter does; the duration comes
    /// from a selector and is stored verbatim.
    pub fn set_value(&mut self, field: FieldId, raw: &str) {
        let value = if field.is_select() {
            raw.to_string()
        } else {
            sanitize_live(raw)
        };
        self.values.insert(field, value);
    }

    /// Switch calculation mode.
    ///
    /// Clears every error, and blanks the secondary field the new mode
    /// hides so a stale value cannot leak into the next calculation.
    pub fn select_mode(&mut self, mode: CalculationMode) {
        debug!(?mode, "mode selected");
        self.mode = mode;
        self.errors.clear();
        self.values.remove(&mode.hidden_field());
    }

    /// The raw fields the active mode reads.
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            total: self.value(FieldId::Total).to_string(),
            duration: self.value(FieldId::Duration).to_string(),
            secondary: self.value(self.mode.secondary_field()).to_string(),
            tax_rate: self.value(FieldId::TaxRate).to_string(),
        }
    }

    /// Run a calculation against the current values.
    ///
    /// A bad tax rate aborts without touching error state.  Otherwise
    /// prior errors are cleared and every failing field is marked.  On
    /// success the results are rendered and revealed.  A failed
    /// calculation leaves any earlier results as they were.
    pub fn calculate(&mut self, locale: Locale) -> Result<ReturnResult, CalcError> {
        let parsed = parse_inputs(&self.raw_inputs(), self.mode, locale);
        if let Err(CalcError::TaxRateOutOfRange) = parsed {
            return Err(CalcError::TaxRateOutOfRange);
        }

        self.errors.clear();
        let inputs = parsed.inspect_err(|err| {
            if let CalcError::InvalidFields(fields) = err {
                for failure in fields {
                    self.errors.insert(failure.field, failure.message.clone());
                }
            }
        })?;

        let result = compute(&inputs, self.mode)?;
        self.results = render(&result, locale);
        self.results_visible = true;
        Ok(result)
    }

    /// Blank every field, clear errors, hide results and return to
    /// return mode.
    pub fn reset(&mut self) {
        self.values.clear();
        self.results.clear();
        self.results_visible = false;
        self.select_mode(CalculationMode::ComputeReturn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LabelKind;
    use pretty_assertions::assert_eq;

    fn filled(mode: CalculationMode) -> FormState {
        let mut form = FormState::new();
        form.select_mode(mode);
        form.set_value(FieldId::Total, "10000");
        form.set_value(FieldId::Duration, "90");
        form
    }

    #[test]
    fn starts_in_return_mode_with_return_amount_hidden() {
        let form = FormState::new();
        assert_eq!(form.mode(), CalculationMode::ComputeReturn);
        assert!(form.is_hidden(FieldId::ReturnAmount));
        assert!(!form.is_hidden(FieldId::Percentage));
        assert!(!form.results_visible());
    }

    #[test]
    fn switching_mode_blanks_hidden_field_and_clears_errors() {
        let mut form = FormState::new();
        form.set_value(FieldId::Percentage, "15");
        form.calculate(Locale::En).unwrap_err();
        assert!(form.has_errors());

        form.select_mode(CalculationMode::ComputePercentage);
        assert!(!form.has_errors());
        assert_eq!(form.value(FieldId::Percentage), "");
        assert!(form.is_hidden(FieldId::Percentage));
        assert!(!form.is_hidden(FieldId::ReturnAmount));
    }

    #[test]
    fn numeric_fields_are_filtered_while_typing() {
        let mut form = FormState::new();
        form.set_value(FieldId::Total, "10,000.5.0");
        form.set_value(FieldId::Duration, "90");
        assert_eq!(form.value(FieldId::Total), "10000.50");
        assert_eq!(form.value(FieldId::Duration), "90");
    }

    #[test]
    fn every_failing_group_is_marked() {
        let mut form = FormState::new();
        let err = form.calculate(Locale::En).unwrap_err();
        assert!(matches!(err, CalcError::InvalidFields(ref f) if f.len() == 3));
        assert_eq!(form.error(FieldId::Total), Some("Please enter a value"));
        assert_eq!(form.error(FieldId::Duration), Some("Please select duration"));
        assert_eq!(form.error(FieldId::Percentage), Some("Please enter a value"));
        assert_eq!(form.error(FieldId::ReturnAmount), None);
    }

    #[test]
    fn fixed_fields_clear_their_errors_on_next_pass() {
        let mut form = FormState::new();
        form.calculate(Locale::En).unwrap_err();
        form.set_value(FieldId::Total, "10000");
        form.calculate(Locale::En).unwrap_err();
        assert_eq!(form.error(FieldId::Total), None);
        assert!(form.error(FieldId::Duration).is_some());
    }

    #[test]
    fn bad_tax_rate_leaves_error_state_untouched() {
        let mut form = FormState::new();
        form.calculate(Locale::En).unwrap_err();
        let before = form.error(FieldId::Total).map(str::to_string);

        form.set_value(FieldId::Total, "10000");
        form.set_value(FieldId::TaxRate, "101");
        assert_eq!(form.calculate(Locale::En), Err(CalcError::TaxRateOutOfRange));
        assert_eq!(form.error(FieldId::Total).map(str::to_string), before);
    }

    #[test]
    fn successful_calculation_reveals_results() {
        let mut form = filled(CalculationMode::ComputeReturn);
        form.set_value(FieldId::Percentage, "15");
        form.set_value(FieldId::TaxRate, "20");
        let result = form.calculate(Locale::En).unwrap();
        assert_eq!(result.mode(), CalculationMode::ComputeReturn);
        assert!(form.results_visible());
        assert_eq!(form.results().len(), 6);
        assert_eq!(form.results()[3].kind, LabelKind::ReturnAfterTax);
    }

    #[test]
    fn failure_keeps_previous_results_visible() {
        let mut form = filled(CalculationMode::ComputePercentage);
        form.set_value(FieldId::ReturnAmount, "500");
        form.calculate(Locale::En).unwrap();

        form.set_value(FieldId::ReturnAmount, "20000");
        assert_eq!(form.calculate(Locale::En), Err(CalcError::UsedAmountNotPositive));
        assert!(form.results_visible());
        assert_eq!(form.results().len(), 3);
        assert!(!form.has_errors());
    }

    #[test]
    fn reset_returns_to_a_blank_return_mode_form() {
        let mut form = filled(CalculationMode::ComputePercentage);
        form.set_value(FieldId::ReturnAmount, "500");
        form.set_value(FieldId::TaxRate, "10");
        form.calculate(Locale::Ar).unwrap();

        form.reset();
        assert_eq!(form.mode(), CalculationMode::ComputeReturn);
        assert_eq!(form.raw_inputs(), RawInputs::default());
        assert_eq!(form.value(FieldId::ReturnAmount), "");
        assert!(!form.results_visible());
        assert!(form.results().is_empty());
    }
}
