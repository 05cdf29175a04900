//! Tax deduction on deposit returns.
//!
//! The `tax` module owns the optional flat tax applied to a return:
//! parsing the user's tax rate into a bounded [`TaxRate`] and deriving
//! the after-tax figures shared by both calculation modes.

use crate::error::CalcError;
use crate::validation::parse_leading_float;
use serde::{Deserialize, Serialize};

/// A tax rate in percent, always within `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(f64);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0.0);

    /// Build a rate from a percentage, rejecting anything outside
    /// `[0, 100]` (NaN included).
    pub fn new(percent: f64) -> Result<Self, CalcError> {
        if (0.0..=100.0).contains(&percent) {
            Ok(TaxRate(percent))
        } else {
            Err(CalcError::TaxRateOutOfRange)
        }
    }

    /// Parse the raw tax field.
    ///
    /// The field is optional: an empty string means no tax.  Any other
    /// value must start with a number in range, otherwise the whole
    /// calculation is aborted.
    pub fn parse(raw: &str) -> Result<Self, CalcError> {
        if raw.is_empty() {
            return Ok(TaxRate::ZERO);
        }
        let percent = parse_leading_float(raw).ok_or(CalcError::TaxRateOutOfRange)?;
        TaxRate::new(percent)
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    /// Only a strictly positive rate produces tax figures.
    pub fn is_taxable(self) -> bool {
        self.0 > 0.0
    }

    /// Derive the after-tax figures for a return of `gross` earned on
    /// `used_amount` over `days`.  Returns `None` for a zero rate.
    pub fn apply(self, gross: f64, used_amount: f64, days: u32) -> Option<TaxBreakdown> {
        if !self.is_taxable() {
            return None;
        }
        let tax_amount = gross * (self.0 / 100.0);
        let net_return = gross - tax_amount;
        Some(TaxBreakdown {
            rate: self.0,
            tax_amount,
            net_return,
            net_percentage: annualized_percent(net_return, used_amount, days),
        })
    }
}

/// After-tax figures of a taxed calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// The rate that was applied, in percent.
    pub rate: f64,
    pub tax_amount: f64,
    pub net_return: f64,
    /// Net return expressed as an annual percentage of the used amount.
    pub net_percentage: f64,
}

/// Annual percentage that `amount` earned on `used_amount` represents
/// over `days`, on a 365-day year.
pub(crate) fn annualized_percent(amount: f64, used_amount: f64, days: u32) -> f64 {
    (amount * 365.0) / (used_amount * f64::from(days)) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_field_means_no_tax() {
        assert_eq!(TaxRate::parse(""), Ok(TaxRate::ZERO));
        assert!(!TaxRate::ZERO.is_taxable());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(TaxRate::parse("0").map(TaxRate::percent), Ok(0.0));
        assert_eq!(TaxRate::parse("100").map(TaxRate::percent), Ok(100.0));
        assert_eq!(TaxRate::parse("100.5"), Err(CalcError::TaxRateOutOfRange));
        assert_eq!(TaxRate::parse("-1"), Err(CalcError::TaxRateOutOfRange));
    }

    #[test]
    fn unparseable_rate_is_fatal() {
        assert_eq!(TaxRate::parse("abc"), Err(CalcError::TaxRateOutOfRange));
        assert_eq!(TaxRate::parse(" "), Err(CalcError::TaxRateOutOfRange));
        assert_eq!(TaxRate::parse("Infinity"), Err(CalcError::TaxRateOutOfRange));
    }

    #[test]
    fn leading_number_is_enough() {
        assert_eq!(TaxRate::parse("20%").map(TaxRate::percent), Ok(20.0));
    }

    #[test]
    fn zero_rate_yields_no_breakdown() {
        assert_eq!(TaxRate::ZERO.apply(100.0, 900.0, 30), None);
    }

    #[test]
    fn full_rate_leaves_nothing_net() {
        let breakdown = TaxRate::new(100.0).unwrap().apply(250.0, 9750.0, 90).unwrap();
        assert_eq!(breakdown.tax_amount, 250.0);
        assert_eq!(breakdown.net_return, 0.0);
        assert_eq!(breakdown.net_percentage, 0.0);
    }

    #[test]
    fn breakdown_splits_gross_into_tax_and_net() {
        let breakdown = TaxRate::new(10.0).unwrap().apply(500.0, 9500.0, 180).unwrap();
        assert_eq!(breakdown.rate, 10.0);
        assert_eq!(breakdown.tax_amount, 50.0);
        assert_eq!(breakdown.net_return, 450.0);
        assert_eq!(breakdown.net_percentage, (450.0 * 365.0) / (9500.0 * 180.0) * 100.0);
    }
}
