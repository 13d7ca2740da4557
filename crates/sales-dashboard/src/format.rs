//! Number formatting for metrics and chart labels

use crate::constants;

/// Group the integer part with commas: 1234567 -> "1,234,567"
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    if value < 0 {
        result.insert(0, '-');
    }
    result
}

/// Two decimals with thousands separators: 1234.5 -> "1,234.50"
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return constants::MISSING_VALUE.to_string();
    }
    let cents = (value.abs() * 100.0).round() as i64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, format_thousands(cents / 100), cents % 100)
}

/// Currency amount: "$1,234.50"
pub fn format_money(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return constants::MISSING_VALUE.to_string();
    }
    let amount = format_amount(value.abs());
    if value < 0.0 && amount != "0.00" {
        format!("-{}{}", symbol, amount)
    } else {
        format!("{}{}", symbol, amount)
    }
}

/// Percentage with fixed decimals; undefined values get the placeholder
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.prec$}%", v, prec = decimals),
        _ => constants::MISSING_VALUE.to_string(),
    }
}
