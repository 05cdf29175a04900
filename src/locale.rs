//! Two-locale message table.
//!
//! Every user-visible string the engine produces comes from this
//! module.  Callers pass the active [`Locale`] explicitly; nothing here
//! reads global state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// The other locale.
    pub fn toggle(self) -> Locale {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }

    /// Text direction for the document root.
    pub fn direction(self) -> &'static str {
        match self {
            Locale::Ar => "rtl",
            Locale::En => "ltr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Validation and precondition messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    SelectDuration,
    EnterValue,
    InvalidNumber,
    PositiveValue,
    InvalidValue,
    TaxRateRange,
    UsedAmountPositive,
}

/// Look up a message in the given locale.
pub fn message(locale: Locale, kind: MessageKind) -> &'static str {
    use MessageKind::*;
    match (locale, kind) {
        (Locale::Ar, SelectDuration) => "الرجاء اختيار المدة",
        (Locale::En, SelectDuration) => "Please select duration",
        (Locale::Ar, EnterValue) => "الرجاء إدخال قيمة",
        (Locale::En, EnterValue) => "Please enter a value",
        (Locale::Ar, InvalidNumber) => "الرجاء إدخال رقم صحيح",
        (Locale::En, InvalidNumber) => "Please enter a valid number",
        (Locale::Ar, PositiveValue) => "الرجاء إدخال قيمة موجبة",
        (Locale::En, PositiveValue) => "Please enter a positive value",
        (Locale::Ar, InvalidValue) => "القيمة غير صالحة",
        (Locale::En, InvalidValue) => "Invalid value",
        (Locale::Ar, TaxRateRange) => "خطأ: نسبة الضريبة يجب أن تكون بين 0 و 100",
        (Locale::En, TaxRateRange) => "Error: Tax rate must be between 0 and 100",
        (Locale::Ar, UsedAmountPositive) => "خطأ: المبلغ المستخدم يجب أن يكون موجب",
        (Locale::En, UsedAmountPositive) => "Error: Used amount must be positive",
    }
}

/// Result labels shown next to each computed figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    UsedAmount,
    ReturnBeforeTax,
    TaxAmount,
    ReturnAfterTax,
    NetPercentage,
    RefundAmount,
    ReturnAmount,
    AnnualYieldRate,
}

/// Look up a result label.  The tax label embeds the rate, so it takes
/// the already formatted percentage.
pub fn label(locale: Locale, kind: LabelKind, tax_percent: &str) -> String {
    use LabelKind::*;
    let text = match (locale, kind) {
        (Locale::Ar, UsedAmount) => "المبلغ المستخدم",
        (Locale::En, UsedAmount) => "Used Amount",
        (Locale::Ar, ReturnBeforeTax) => "العائد قبل الضريبة",
        (Locale::En, ReturnBeforeTax) => "Return Before Tax",
        (Locale::Ar, TaxAmount) => return format!("قيمة الضريبة ({tax_percent}%)"),
        (Locale::En, TaxAmount) => return format!("Tax Amount ({tax_percent}%)"),
        (Locale::Ar, ReturnAfterTax) => "العائد بعد الضريبة",
        (Locale::En, ReturnAfterTax) => "Return After Tax",
        (Locale::Ar, NetPercentage) => "نسبة الصافي",
        (Locale::En, NetPercentage) => "Net Percentage",
        (Locale::Ar, RefundAmount) => "المبلغ المسترد",
        (Locale::En, RefundAmount) => "Refund Amount",
        (Locale::Ar, ReturnAmount) => "العائد بالمبلغ",
        (Locale::En, ReturnAmount) => "Return Amount",
        (Locale::Ar, AnnualYieldRate) => "نسبة العائد السنوي",
        (Locale::En, AnnualYieldRate) => "Annual Yield Rate",
    };
    text.to_string()
}

pub fn currency(locale: Locale) -> &'static str {
    match locale {
        Locale::Ar => "جنيه",
        Locale::En => "EGP",
    }
}

/// Caption of the per-item copy button.
pub fn copy_caption(locale: Locale) -> &'static str {
    match locale {
        Locale::Ar => "📋 نسخ",
        Locale::En => "📋 Copy",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_flips_between_the_two_locales() {
        assert_eq!(Locale::Ar.toggle(), Locale::En);
        assert_eq!(Locale::En.toggle(), Locale::Ar);
        assert_eq!(Locale::default(), Locale::Ar);
    }

    #[test]
    fn direction_follows_script() {
        assert_eq!(Locale::Ar.direction(), "rtl");
        assert_eq!(Locale::En.direction(), "ltr");
    }

    #[test]
    fn parses_only_known_codes() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("ar".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!("fr".parse::<Locale>(), Err(UnknownLocale("fr".into())));
    }

    #[test]
    fn tax_label_embeds_rate() {
        assert_eq!(label(Locale::En, LabelKind::TaxAmount, "20"), "Tax Amount (20%)");
        assert_eq!(label(Locale::Ar, LabelKind::TaxAmount, "12.5"), "قيمة الضريبة (12.5%)");
    }

    #[test]
    fn messages_exist_in_both_locales() {
        assert_eq!(message(Locale::En, MessageKind::EnterValue), "Please enter a value");
        assert_eq!(message(Locale::Ar, MessageKind::EnterValue), "الرجاء إدخال قيمة");
    }
}
