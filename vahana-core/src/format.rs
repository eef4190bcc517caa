//! Numeric coercion and display formatting shared by sorting and rendering.
//!
//! [`to_number`] is the only place the crate turns a raw catalog value into a
//! number. Sorting, mileage display and currency display all go through it, so the
//! order of columns and the figures shown in them cannot disagree.

use serde::{Deserialize, Serialize};

use crate::types::FieldValue;

/// Display for missing values and placeholder cells.
pub const EM_DASH: &str = "—";

/// Most letters a leading currency marker may carry (`Rs`, `USD`, `INR`).
const MAX_MARKER_LETTERS: usize = 3;

/// Coerce a raw value into a finite number, or `fallback` when that is impossible.
///
/// Numbers pass through when finite. Text has whitespace and thousands separators
/// removed, then an optional sign and a short leading currency marker (`₹`, `$`,
/// `Rs.`, `USD`) before parsing. Blank text, absent values and anything that does
/// not parse to a finite number yield `fallback`.
pub fn to_number(value: &FieldValue, fallback: f64) -> f64 {
    match value {
        FieldValue::Absent => fallback,
        FieldValue::Number(n) if n.is_finite() => *n,
        FieldValue::Number(_) => fallback,
        FieldValue::Text(s) => parse_amount(s).unwrap_or(fallback),
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let (negative, rest) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.strip_prefix('+').unwrap_or(compact.as_str())),
    };
    let body = strip_currency_marker(rest)?;
    if body.is_empty() {
        return None;
    }
    let n: f64 = body.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(if negative { -n } else { n })
}

/// Drop everything before the first digit, point or sign, provided it is short
/// enough to be a currency marker. `Rs.` loses its trailing point too.
fn strip_currency_marker(text: &str) -> Option<&str> {
    let start = text
        .find(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .unwrap_or(text.len());
    let (marker, rest) = text.split_at(start);
    if marker.chars().filter(|c| c.is_alphabetic()).count() > MAX_MARKER_LETTERS {
        return None;
    }
    let abbreviated = marker.chars().last().is_some_and(char::is_alphabetic);
    match rest.strip_prefix('.') {
        Some(after) if abbreviated => Some(after),
        _ => Some(rest),
    }
}

/// Digit grouping convention for currency amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// Thousands boundary, then every two digits: `1,23,45,678`.
    #[default]
    Indian,
    /// Every three digits: `12,345,678`.
    Western,
}

impl std::fmt::Display for DigitGrouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigitGrouping::Indian => write!(f, "indian"),
            DigitGrouping::Western => write!(f, "western"),
        }
    }
}

/// Currency display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol placed before the amount.
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: "₹".into(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl CurrencyConfig {
    /// Format an amount in whole currency units.
    ///
    /// - absent or blank input renders as an em-dash
    /// - numeric input (or numeric text) renders grouped, with the symbol and no
    ///   fractional digits
    /// - any other text is returned unchanged
    pub fn format(&self, value: &FieldValue) -> String {
        if let FieldValue::Text(s) = value {
            if s.trim().is_empty() {
                return EM_DASH.to_string();
            }
        }
        if value.is_absent() {
            return EM_DASH.to_string();
        }

        let amount = to_number(value, f64::NAN);
        if !amount.is_finite() {
            return value.to_string();
        }

        let rounded = amount.round();
        let sign = if rounded < 0.0 { "-" } else { "" };
        let digits = format!("{:.0}", rounded.abs());
        format!(
            "{sign}{}{}",
            self.symbol,
            group_digits(&digits, self.grouping)
        )
    }
}

/// Format with the default rupee settings.
pub fn format_currency(value: &FieldValue) -> String {
    CurrencyConfig::default().format(value)
}

/// Insert separators into a plain run of ASCII digits.
fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

/// Mileage with its unit: `km` per charge for electric vehicles, `km/l` otherwise.
/// Non-numeric mileage counts as zero.
pub fn format_mileage(value: &FieldValue, electric: bool) -> String {
    let unit = if electric { "km" } else { "km/l" };
    format!("{} {unit}", to_number(value, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number_plain_number() {
        assert_eq!(to_number(&FieldValue::Number(80000.0), 0.0), 80000.0);
    }

    #[test]
    fn test_to_number_strips_separators_and_symbol() {
        assert_eq!(to_number(&FieldValue::from("1,20,000"), 0.0), 120000.0);
        assert_eq!(to_number(&FieldValue::from("₹ 95,000"), 0.0), 95000.0);
        assert_eq!(to_number(&FieldValue::from(" 42.5 "), 0.0), 42.5);
    }

    #[test]
    fn test_to_number_other_currency_markers() {
        assert_eq!(to_number(&FieldValue::from("$1,500"), 0.0), 1500.0);
        assert_eq!(to_number(&FieldValue::from("Rs.1,500"), 0.0), 1500.0);
        assert_eq!(to_number(&FieldValue::from("Rs 1,500"), 0.0), 1500.0);
        assert_eq!(to_number(&FieldValue::from("USD 2,000"), 0.0), 2000.0);
        assert_eq!(to_number(&FieldValue::from("€ 12.5"), 0.0), 12.5);
        assert_eq!(to_number(&FieldValue::from("-₹1,500"), 0.0), -1500.0);
        assert_eq!(to_number(&FieldValue::from(".5"), 0.0), 0.5);
    }

    #[test]
    fn test_to_number_reads_back_formatted_currency() {
        for symbol in ["₹", "$", "Rs.", "USD "] {
            let config = CurrencyConfig {
                symbol: symbol.into(),
                grouping: DigitGrouping::Western,
            };
            for amount in [0.0, 999.0, 1500.0, -1500.0, 12345678.0] {
                let shown = config.format(&FieldValue::Number(amount));
                assert_eq!(to_number(&FieldValue::from(shown.as_str()), f64::NAN), amount, "{shown}");
            }
        }
    }

    #[test]
    fn test_to_number_fallbacks() {
        assert_eq!(to_number(&FieldValue::Absent, 0.0), 0.0);
        assert_eq!(to_number(&FieldValue::from("Electric Motor"), 7.0), 7.0);
        assert_eq!(to_number(&FieldValue::from("   "), 3.0), 3.0);
        assert_eq!(to_number(&FieldValue::from("inf"), 0.0), 0.0);
        assert_eq!(to_number(&FieldValue::from("Launching 2025"), 4.0), 4.0);
        assert_eq!(to_number(&FieldValue::from("$"), 2.0), 2.0);
        assert_eq!(to_number(&FieldValue::Number(f64::NAN), 1.0), 1.0);
        assert!(to_number(&FieldValue::Absent, f64::NAN).is_nan());
    }

    #[test]
    fn test_format_currency_zero() {
        assert_eq!(format_currency(&FieldValue::Number(0.0)), "₹0");
    }

    #[test]
    fn test_format_currency_absent_and_empty() {
        assert_eq!(format_currency(&FieldValue::Absent), EM_DASH);
        assert_eq!(format_currency(&FieldValue::from("")), EM_DASH);
        assert_eq!(format_currency(&FieldValue::from("  ")), EM_DASH);
    }

    #[test]
    fn test_format_currency_indian_grouping() {
        assert_eq!(format_currency(&FieldValue::Number(123456.0)), "₹1,23,456");
        assert_eq!(format_currency(&FieldValue::Number(999.0)), "₹999");
        assert_eq!(format_currency(&FieldValue::Number(1000.0)), "₹1,000");
        assert_eq!(
            format_currency(&FieldValue::Number(12345678.0)),
            "₹1,23,45,678"
        );
        assert_eq!(format_currency(&FieldValue::Number(1020000.0)), "₹10,20,000");
    }

    #[test]
    fn test_format_currency_rounds_and_signs() {
        assert_eq!(format_currency(&FieldValue::Number(80000.5)), "₹80,001");
        assert_eq!(format_currency(&FieldValue::Number(-1500.0)), "-₹1,500");
    }

    #[test]
    fn test_format_currency_numeric_text() {
        assert_eq!(format_currency(&FieldValue::from("1,20,000")), "₹1,20,000");
    }

    #[test]
    fn test_format_currency_non_numeric_passes_through() {
        assert_eq!(
            format_currency(&FieldValue::from("Price on request")),
            "Price on request"
        );
    }

    #[test]
    fn test_format_currency_western_grouping() {
        let config = CurrencyConfig {
            symbol: "$".into(),
            grouping: DigitGrouping::Western,
        };
        assert_eq!(config.format(&FieldValue::Number(12345678.0)), "$12,345,678");
    }

    #[test]
    fn test_format_mileage_units() {
        assert_eq!(format_mileage(&FieldValue::Number(60.0), false), "60 km/l");
        assert_eq!(format_mileage(&FieldValue::Number(100.0), true), "100 km");
        assert_eq!(format_mileage(&FieldValue::Absent, false), "0 km/l");
    }
}
