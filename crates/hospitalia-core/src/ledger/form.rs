use serde::{Deserialize, Serialize};

/// One field of the entry form, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Date,
    Income,
    Expense,
    PriorBalance,
    Cause,
    Notes,
    Dollars,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Date,
        FormField::Income,
        FormField::Expense,
        FormField::PriorBalance,
        FormField::Cause,
        FormField::Notes,
        FormField::Dollars,
    ];

    /// Label shown next to the field.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Date => "Fecha",
            FormField::Income => "Ingresos",
            FormField::Expense => "Egresos",
            FormField::PriorBalance => "Saldo Anterior",
            FormField::Cause => "Causa",
            FormField::Notes => "Observaciones",
            FormField::Dollars => "Dólares",
        }
    }

    /// Whether the field holds numeric-as-text.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FormField::Income | FormField::Expense | FormField::PriorBalance | FormField::Dollars
        )
    }

    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Outcome of reading a numeric field.
///
/// The accumulator only ever uses [`AmountInput::or_zero`]; the other
/// variants exist so a front-end can tell the user which fields were coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    /// Blank field
    Absent,
    /// Text with no usable numeric prefix
    Invalid(String),
    Value(f64),
}

impl AmountInput {
    /// Classify raw field text using decimal-prefix parsing: whitespace is
    /// ignored and the longest leading prefix that parses as a finite
    /// decimal wins ("12abc" is 12, "1,5" is 1).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return AmountInput::Absent;
        }

        match longest_numeric_prefix(trimmed) {
            Some(value) => AmountInput::Value(value),
            None => AmountInput::Invalid(raw.to_string()),
        }
    }

    /// Silent-zero coercion: absent and invalid input both count as 0.0.
    pub fn or_zero(&self) -> f64 {
        match self {
            AmountInput::Value(v) => *v,
            AmountInput::Absent | AmountInput::Invalid(_) => 0.0,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AmountInput::Absent)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, AmountInput::Invalid(_))
    }
}

fn longest_numeric_prefix(text: &str) -> Option<f64> {
    // f64::from_str also accepts words like "inf" and "NaN"
    if !text.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.')) {
        return None;
    }

    let mut ends: Vec<usize> = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
    ends.reverse();

    ends.into_iter()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse a numeric field, treating blank or unparseable text as zero.
pub fn parse_amount(raw: &str) -> f64 {
    AmountInput::parse(raw).or_zero()
}

/// Raw text of every form field. Reset to all-empty after each submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub date: String,
    pub income: String,
    pub expense: String,
    pub prior_balance: String,
    pub cause: String,
    pub notes: String,
    pub dollars: String,
}

impl FormInput {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Income => &self.income,
            FormField::Expense => &self.expense,
            FormField::PriorBalance => &self.prior_balance,
            FormField::Cause => &self.cause,
            FormField::Notes => &self.notes,
            FormField::Dollars => &self.dollars,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Date => &mut self.date,
            FormField::Income => &mut self.income,
            FormField::Expense => &mut self.expense,
            FormField::PriorBalance => &mut self.prior_balance,
            FormField::Cause => &mut self.cause,
            FormField::Notes => &mut self.notes,
            FormField::Dollars => &mut self.dollars,
        }
    }

    /// Builder-style setter, handy for tests and scripted input.
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        *self.get_mut(field) = value.into();
        self
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn amount(&self, field: FormField) -> AmountInput {
        AmountInput::parse(self.get(field))
    }

    /// Numeric fields whose text was not blank but could not be read as a
    /// number. These are still submitted, as zero.
    pub fn invalid_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .iter()
            .copied()
            .filter(|f| f.is_numeric() && self.amount(*f).is_invalid())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("1000"), 1000.0);
        assert_eq!(parse_amount("  200.5 "), 200.5);
        assert_eq!(parse_amount("-50"), -50.0);
        assert_eq!(parse_amount(".25"), 0.25);
        assert_eq!(parse_amount("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_amount_prefix() {
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount("1,5"), 1.0);
        assert_eq!(parse_amount("3.5.7"), 3.5);
        assert_eq!(parse_amount("1e"), 1.0);
    }

    #[test]
    fn test_parse_amount_silent_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("$100"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn test_amount_input_classification() {
        assert_eq!(AmountInput::parse(""), AmountInput::Absent);
        assert_eq!(AmountInput::parse("0"), AmountInput::Value(0.0));
        assert_eq!(AmountInput::parse("x1"), AmountInput::Invalid("x1".to_string()));
        assert!(AmountInput::parse("x1").is_invalid());
        assert!(AmountInput::parse(" ").is_absent());
    }

    #[test]
    fn test_invalid_fields() {
        let input = FormInput::default()
            .with(FormField::Income, "mil")
            .with(FormField::Expense, "200")
            .with(FormField::Dollars, "??")
            .with(FormField::Cause, "not numeric but free text");
        assert_eq!(input.invalid_fields(), vec![FormField::Income, FormField::Dollars]);
    }

    #[test]
    fn test_reset() {
        let mut input = FormInput::default().with(FormField::Date, "2024-01-01");
        assert!(!input.is_empty());
        input.reset();
        assert!(input.is_empty());
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(FormField::Date.next(), FormField::Income);
        assert_eq!(FormField::Dollars.next(), FormField::Date);
        assert_eq!(FormField::Date.prev(), FormField::Dollars);
        assert_eq!(FormField::Cause.prev(), FormField::PriorBalance);
    }
}
