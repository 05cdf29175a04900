//! Result presentation.
//!
//! Turns a [`ReturnResult`] into the ordered list of labelled figures
//! the page displays, each with the text its copy button puts on the
//! clipboard.

use crate::locale::{copy_caption, currency, label, LabelKind, Locale};
use crate::models::ReturnResult;
use crate::tax::TaxBreakdown;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// One labelled figure in the results area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub kind: LabelKind,
    pub label: String,
    /// Display text including the currency unit or percent sign.
    pub value: String,
    /// What the copy button writes to the clipboard.
    pub copy_text: String,
    pub copy_caption: &'static str,
    /// The headline figure of the result set.
    pub primary: bool,
}

/// Format with exactly three fractional digits, rounding exact ties
/// away from zero.
///
/// Magnitudes of `1e21` and above are written out in full rather than
/// in exponent notation as browsers' `toFixed` would.
pub fn format_fixed3(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    match Decimal::from_f64_retain(value) {
        Some(decimal) => {
            let rounded = decimal.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.3}")
        }
        // Beyond Decimal's range; no fractional digits left to round.
        None => format!("{value:.3}"),
    }
}

enum Unit {
    Money,
    Percent,
}

struct Renderer {
    locale: Locale,
    tax_percent: String,
    items: Vec<ResultItem>,
}

impl Renderer {
    fn push(&mut self, kind: LabelKind, amount: f64, unit: Unit, primary: bool) {
        let number = format_fixed3(amount);
        let (value, copy_text) = match unit {
            Unit::Money => (format!("{number} {}", currency(self.locale)), number),
            Unit::Percent => (format!("{number}%"), format!("{number}%")),
        };
        self.items.push(ResultItem {
            kind,
            label: label(self.locale, kind, &self.tax_percent),
            value,
            copy_text,
            copy_caption: copy_caption(self.locale),
            primary,
        });
    }

    fn push_tax_tail(&mut self, tax: &TaxBreakdown, refund_amount: f64) {
        self.push(LabelKind::NetPercentage, tax.net_percentage, Unit::Percent, false);
        self.push(LabelKind::RefundAmount, refund_amount, Unit::Money, false);
    }
}

/// Lay out the figures of `result` in display order for `locale`.
pub fn render(result: &ReturnResult, locale: Locale) -> Vec<ResultItem> {
    // Shortest round-trip digits, never exponent form (`1e-7` prints as
    // `0.0000001`).
    let tax_percent = result
        .tax()
        .map(|tax| tax.rate.to_string())
        .unwrap_or_default();
    let mut r = Renderer {
        locale,
        tax_percent,
        items: Vec::with_capacity(6),
    };

    match result {
        ReturnResult::Return {
            used_amount,
            gross_return,
            refund_amount,
            tax: Some(tax),
        } => {
            r.push(LabelKind::UsedAmount, *used_amount, Unit::Money, false);
            r.push(LabelKind::ReturnBeforeTax, *gross_return, Unit::Money, false);
            r.push(LabelKind::TaxAmount, tax.tax_amount, Unit::Money, false);
            r.push(LabelKind::ReturnAfterTax, tax.net_return, Unit::Money, true);
            r.push_tax_tail(tax, *refund_amount);
        }
        ReturnResult::Return {
            used_amount,
            gross_return,
            refund_amount,
            tax: None,
        } => {
            r.push(LabelKind::UsedAmount, *used_amount, Unit::Money, false);
            r.push(LabelKind::ReturnAmount, *gross_return, Unit::Money, true);
            r.push(LabelKind::RefundAmount, *refund_amount, Unit::Money, false);
        }
        ReturnResult::Percentage {
            used_amount,
            percentage,
            refund_amount,
            tax,
            ..
        } => {
            r.push(LabelKind::UsedAmount, *used_amount, Unit::Money, false);
            r.push(LabelKind::AnnualYieldRate, *percentage, Unit::Percent, true);
            match tax {
                Some(tax) => {
                    r.push(LabelKind::TaxAmount, tax.tax_amount, Unit::Money, false);
                    r.push(LabelKind::ReturnAfterTax, tax.net_return, Unit::Money, false);
                    r.push_tax_tail(tax, *refund_amount);
                }
                None => r.push(LabelKind::RefundAmount, *refund_amount, Unit::Money, false),
            }
        }
    }
    r.items
}
