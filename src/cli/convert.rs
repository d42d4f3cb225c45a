use super::{render, ui};
use crate::core::config::FormConfig;
use crate::core::{
    ConversionGateway, ConvertorForm, Field, FormState, SubmitOutcome, ValidationErrors,
};
use anyhow::{Result, bail};
use std::sync::Arc;

/// Renders the field errors, each next to its field name.
pub fn field_errors_text(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| {
            format!(
                "{}: {}",
                ui::style_text(field_label(field), ui::StyleType::Label),
                ui::style_text(message, ui::StyleType::Error)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn field_label(field: Field) -> &'static str {
    match field {
        Field::Cryptocurrency => "Cryptocurrency",
        Field::Amount => "Amount",
        Field::Currency => "Currency",
    }
}

/// Loads the lists, submits once with the given values and prints the result.
pub async fn run(
    gateway: Arc<dyn ConversionGateway>,
    config: &FormConfig,
    crypto: &str,
    amount: &str,
    currency: Option<&str>,
) -> Result<()> {
    let mut form = ConvertorForm::new(gateway, config);

    let pb = ui::new_spinner("Loading currencies...");
    form.mount();
    form.wait_for_lists().await;
    pb.finish_and_clear();

    form.set_value(Field::Cryptocurrency, crypto.trim().to_uppercase());
    form.set_value(Field::Amount, amount);
    if let Some(currency) = currency {
        form.set_value(Field::Currency, currency.trim().to_uppercase());
    }

    let pb = ui::new_spinner(render::submit_label(FormState::Loading));
    let outcome = form.submit().await;
    pb.finish_and_clear();

    match outcome {
        SubmitOutcome::Converted(result) => {
            println!(
                "{}",
                ui::style_text(&render::result_line(&result), ui::StyleType::Result)
            );
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            eprintln!("{}", field_errors_text(&errors));
            bail!("Invalid conversion input")
        }
        SubmitOutcome::Rejected | SubmitOutcome::Failed | SubmitOutcome::Busy => {
            let message = form
                .last_error()
                .unwrap_or_else(|| "Conversion did not produce a result".to_string());
            bail!(message)
        }
    }
}
