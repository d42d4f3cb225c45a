//! Form fields and the validation schema applied before a conversion is sent.

use super::model::{ConversionRequest, CryptoAsset, FiatCurrency, Listed};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Field {
    Cryptocurrency,
    Amount,
    Currency,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Field::Cryptocurrency => "cryptocurrency",
                Field::Amount => "amount",
                Field::Currency => "currency",
            }
        )
    }
}

/// Raw values as typed or selected by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub cryptocurrency: String,
    pub amount: String,
    pub currency: String,
}

impl FormValues {
    pub const DEFAULT_AMOUNT: &'static str = "0";

    pub fn new(default_currency: &str) -> Self {
        Self {
            cryptocurrency: String::new(),
            amount: Self::DEFAULT_AMOUNT.to_string(),
            currency: default_currency.to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Cryptocurrency => &self.cryptocurrency,
            Field::Amount => &self.amount,
            Field::Currency => &self.currency,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Cryptocurrency => self.cryptocurrency = value,
            Field::Amount => self.amount = value,
            Field::Currency => self.currency = value,
        }
    }

    /// Resets the amount and keeps both selections.
    pub fn reset_amount(&mut self) {
        self.amount = Self::DEFAULT_AMOUNT.to_string();
    }
}

/// How a field's raw text is interpreted before its constraint runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    NonEmpty,
    GreaterThan(Decimal),
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: Field,
    pub kind: FieldKind,
    pub constraint: Constraint,
    /// Shown when the value is missing.
    pub required_message: String,
    /// Shown when the constraint does not hold.
    pub message: String,
}

impl FieldRule {
    fn check(&self, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(self.required_message.clone());
        }
        match (self.kind, &self.constraint) {
            (FieldKind::Text, Constraint::NonEmpty) => Ok(()),
            (FieldKind::Number, constraint) => {
                let value = parse_amount(raw).ok_or_else(|| "Amount must be a number".to_string())?;
                match constraint {
                    Constraint::GreaterThan(min) if value <= *min => Err(self.message.clone()),
                    _ => Ok(()),
                }
            }
            (FieldKind::Text, Constraint::GreaterThan(_)) => Ok(()),
        }
    }
}

/// Coerces typed text into a decimal amount. Accepts `1.5`, `1,000.25` and
/// scientific notation; rejects anything else, including commas that are not
/// thousands separators.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains('_') {
        return None;
    }
    let cleaned = if raw.contains(',') {
        strip_thousands_separators(raw)?
    } else {
        raw.to_string()
    };
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// `12,345.6` -> `12345.6`. The first group has 1-3 digits, every later group
/// exactly 3, and the fraction carries no commas.
fn strip_thousands_separators(raw: &str) -> Option<String> {
    let unsigned = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let sign = &raw[..raw.len() - unsigned.len()];
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let mut groups = int_part.split(',');
    let first = groups.next()?;
    let is_digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());
    if !(1..=3).contains(&first.len()) || !is_digits(first) {
        return None;
    }
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !is_digits(group) {
            return None;
        }
        digits.push_str(group);
    }

    Some(match fraction {
        Some(fraction) => format!("{sign}{digits}.{fraction}"),
        None => format!("{sign}{digits}"),
    })
}

/// Field-level validation failures, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn push(&mut self, field: Field, message: String) {
        // First failure per field wins
        if self.get(field).is_none() {
            self.errors.push((field, message));
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// The declarative rule set for the conversion form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(min_amount: Decimal) -> Self {
        let rules = vec![
            FieldRule {
                field: Field::Cryptocurrency,
                kind: FieldKind::Text,
                constraint: Constraint::NonEmpty,
                required_message: "Please select a source cryptocurrency".to_string(),
                message: "Please select a source cryptocurrency".to_string(),
            },
            FieldRule {
                field: Field::Amount,
                kind: FieldKind::Number,
                constraint: Constraint::GreaterThan(min_amount),
                required_message: "Please enter the amount".to_string(),
                message: format!("Amount has to be larger than {}", min_amount.normalize()),
            },
            FieldRule {
                field: Field::Currency,
                kind: FieldKind::Text,
                constraint: Constraint::NonEmpty,
                required_message: "Please select a currency".to_string(),
                message: "Please select a currency".to_string(),
            },
        ];
        Self { rules }
    }

    /// Runs every rule, then checks that both selections exist in the lists
    /// loaded for this session.
    pub fn validate(
        &self,
        values: &FormValues,
        cryptos: &[CryptoAsset],
        fiats: &[FiatCurrency],
    ) -> Result<ConversionRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for rule in &self.rules {
            if let Err(message) = rule.check(values.get(rule.field)) {
                errors.push(rule.field, message);
            }
        }

        let crypto = values.cryptocurrency.trim();
        if !crypto.is_empty() && !contains_symbol(cryptos, crypto) {
            errors.push(
                Field::Cryptocurrency,
                format!("Unknown cryptocurrency: {crypto}"),
            );
        }
        let currency = values.currency.trim();
        if !currency.is_empty() && !contains_symbol(fiats, currency) {
            errors.push(Field::Currency, format!("Unknown currency: {currency}"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let amount = parse_amount(&values.amount).ok_or_else(|| {
            let mut errors = ValidationErrors::default();
            errors.push(Field::Amount, "Amount must be a number".to_string());
            errors
        })?;

        Ok(ConversionRequest {
            cryptocurrency_symbol: crypto.to_string(),
            amount,
            fiat_symbol: currency.to_string(),
        })
    }
}

fn contains_symbol<T: Listed>(items: &[T], symbol: &str) -> bool {
    items.iter().any(|item| item.symbol() == symbol)
}
