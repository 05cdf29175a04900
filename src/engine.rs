//! Return computation engine.
//!
//! The `engine` module turns raw form fields into a [`ReturnResult`].
//! [`evaluate`] runs the whole pipeline: tax-rate precondition, field
//! validation (all fields, errors accumulated), then one of the two
//! inverse formulas.  [`evaluate_batch`] uses [`rayon`] to evaluate
//! independent requests across CPU cores.

use crate::error::{CalcError, FieldError};
use crate::locale::{message, Locale, MessageKind};
use crate::models::{CalculationMode, FieldId, InputSet, RawInputs, ReturnResult};
use crate::tax::{annualized_percent, TaxRate};
use crate::validation::{validate, ValidationResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One calculation to run: the active mode plus the raw fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    #[serde(default)]
    pub mode: CalculationMode,
    #[serde(flatten)]
    pub inputs: RawInputs,
}

/// Validate and compute in one step.
///
/// Fatal errors win over field errors: an out-of-range tax rate is
/// reported before any field is looked at.
pub fn evaluate(
    raw: &RawInputs,
    mode: CalculationMode,
    locale: Locale,
) -> Result<ReturnResult, CalcError> {
    let inputs = parse_inputs(raw, mode, locale).inspect_err(|err| {
        if err.is_fatal() {
            warn!(%err, "calculation aborted");
        }
    })?;
    compute(&inputs, mode)
}

/// Evaluate many independent requests in parallel.  Each entry
/// succeeds or fails on its own; output order matches input order.
pub fn evaluate_batch(
    requests: Vec<CalculationRequest>,
    locale: Locale,
) -> Vec<Result<ReturnResult, CalcError>> {
    requests
        .into_par_iter()
        .map(|request| evaluate(&request.inputs, request.mode, locale))
        .collect()
}

/// Turn raw fields into a validated [`InputSet`].
///
/// Total, duration and the mode's secondary field are validated
/// independently; every failure is collected.
pub fn parse_inputs(
    raw: &RawInputs,
    mode: CalculationMode,
    locale: Locale,
) -> Result<InputSet, CalcError> {
    let tax_rate = TaxRate::parse(&raw.tax_rate)?;

    let mut errors = Vec::new();
    let total = check_field(FieldId::Total, &raw.total, locale, &mut errors);
    let duration = check_field(FieldId::Duration, &raw.duration, locale, &mut errors);
    let secondary = check_field(mode.secondary_field(), &raw.secondary, locale, &mut errors);

    let duration_days = match duration {
        Some(value) => {
            let days = whole_days(value);
            if days.is_none() {
                errors.push(field_error(FieldId::Duration, MessageKind::InvalidNumber, locale));
            }
            days
        }
        None => None,
    };

    match (total, duration_days, secondary) {
        (Some(total), Some(duration_days), Some(secondary)) if errors.is_empty() => Ok(InputSet {
            total,
            duration_days,
            secondary,
            tax_rate,
        }),
        _ => {
            // Keep form order regardless of which check failed first.
            errors.sort_by_key(|e| e.field);
            Err(CalcError::InvalidFields(errors))
        }
    }
}

fn check_field(
    field: FieldId,
    raw: &str,
    locale: Locale,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    match validate(raw, field.is_select(), locale) {
        ValidationResult::Valid { value } => Some(value),
        ValidationResult::Invalid { kind, message } => {
            errors.push(FieldError {
                field,
                kind,
                message,
            });
            None
        }
    }
}

fn field_error(field: FieldId, kind: MessageKind, locale: Locale) -> FieldError {
    FieldError {
        field,
        kind,
        message: message(locale, kind).to_string(),
    }
}

fn whole_days(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
}

/// Run the formula for `mode` on already validated inputs.
pub fn compute(inputs: &InputSet, mode: CalculationMode) -> Result<ReturnResult, CalcError> {
    let result = match mode {
        CalculationMode::ComputeReturn => compute_return(inputs),
        CalculationMode::ComputePercentage => compute_percentage(inputs)?,
    };
    debug!(?mode, total = inputs.total, days = inputs.duration_days, ?result, "calculation complete");
    Ok(result)
}

/// Known annual rate: compute the return on a true-discount basis.
///
/// `secondary` is the annual rate in percent.  The used amount is not
/// re-checked here; for extreme rate and duration combinations it can
/// reach zero or below.
pub fn compute_return(inputs: &InputSet) -> ReturnResult {
    let total = inputs.total;
    let rate = inputs.secondary;
    let days = f64::from(inputs.duration_days);

    let gross_return = ((rate / 100.0) * total * days / 365.0) / (1.0 + rate * days / 36500.0);
    let used_amount = total - gross_return;
    let tax = inputs
        .tax_rate
        .apply(gross_return, used_amount, inputs.duration_days);
    let refund_amount = match &tax {
        Some(breakdown) => total - breakdown.tax_amount,
        None => total,
    };

    ReturnResult::Return {
        used_amount,
        gross_return,
        refund_amount,
        tax,
    }
}

/// Known return amount: compute the annual yield rate it implies.
///
/// `secondary` is the payout already received.  Fails when it leaves
/// no positive used amount or when the duration is zero.
pub fn compute_percentage(inputs: &InputSet) -> Result<ReturnResult, CalcError> {
    let total = inputs.total;
    let return_amount = inputs.secondary;
    let used_amount = total - return_amount;

    if used_amount <= 0.0 || inputs.duration_days == 0 {
        warn!(total, return_amount, days = inputs.duration_days, "used amount not positive");
        return Err(CalcError::UsedAmountNotPositive);
    }

    let percentage = annualized_percent(return_amount, used_amount, inputs.duration_days);
    let tax = inputs
        .tax_rate
        .apply(return_amount, used_amount, inputs.duration_days);
    let refund_amount = match &tax {
        Some(breakdown) => total - breakdown.tax_amount,
        None => total,
    };

    Ok(ReturnResult::Percentage {
        used_amount,
        return_amount,
        percentage,
        refund_amount,
        tax,
    })
}
