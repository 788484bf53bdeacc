use serde::{Deserialize, Serialize};

/// Display value for blank text fields and zero amounts.
pub const PLACEHOLDER: &str = "-";

/// Separator between the currency symbol and the digits (no-break space).
const SYMBOL_SEPARATOR: char = '\u{a0}';

/// Locale-style currency formatter: symbol, grouping separators and
/// two fraction digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl CurrencyFormat {
    /// Argentine pesos, `es-AR` style: `$ 1.234,56`.
    pub fn ars() -> Self {
        Self {
            symbol: "$".to_string(),
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }

    /// US dollars written in the `es-AR` locale: `US$ 1.234,56`.
    pub fn usd() -> Self {
        Self {
            symbol: "US$".to_string(),
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }

    /// Format an amount with the currency symbol, grouping and two decimals.
    /// Amounts that round to zero never carry a minus sign.
    pub fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let rounds_to_zero = fixed.chars().all(|c| c == '0' || c == '.');
        let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };

        format!(
            "{}{}{}{}{}{}",
            sign,
            self.symbol,
            SYMBOL_SEPARATOR,
            group_digits(int_part, self.grouping_separator),
            self.decimal_separator,
            frac_part
        )
    }

    /// Format a non-zero amount, or the placeholder for zero.
    pub fn format_or_placeholder(&self, amount: f64) -> String {
        if amount == 0.0 {
            PLACEHOLDER.to_string()
        } else {
            self.format(amount)
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::ars()
    }
}

/// Insert a separator every three digits, counting from the right.
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

/// Plain two-decimal rendering used for the secondary amount column.
pub fn format_fixed(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Return the text as-is, or the placeholder when it is blank.
pub fn or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
