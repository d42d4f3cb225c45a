//! Text rendering of form elements: select options, submit control and the
//! conversion result line.

use crate::core::{ConversionResult, FormState, Listed};
use rust_decimal::{Decimal, RoundingStrategy};

/// Most fraction digits shown for a converted amount.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Formats a number the way an English locale would: `,` between thousands,
/// at most three fraction digits, no trailing zeros.
pub fn format_grouped(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Option labels for a currency selector, `"<SYMBOL> (<Name>)"`.
pub fn select_options<T: Listed>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .map(|item| format!("{} ({})", item.symbol(), item.name()))
        .collect()
}

pub fn submit_label(state: FormState) -> &'static str {
    match state {
        FormState::Loading => "Loading",
        FormState::Idle | FormState::Error => "Submit",
    }
}

pub fn submit_enabled(state: FormState) -> bool {
    state != FormState::Loading
}

pub fn result_line(result: &ConversionResult) -> String {
    format!(
        "Your converted amount is {} {}",
        format_grouped(result.converted_amount),
        result.fiat_symbol
    )
}
