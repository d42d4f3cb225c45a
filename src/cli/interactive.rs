//! Prompt-driven version of the conversion form.
//!
//! Each round asks for the three fields (Enter keeps the current value, `?`
//! lists the options, `q` quits), submits, and prints either the field errors
//! or the result line. The last result stays on screen until a new conversion
//! succeeds.

use super::convert::{field_errors_text, field_label};
use super::{render, ui};
use crate::core::config::FormConfig;
use crate::core::{ConversionGateway, ConvertorForm, Field, FormState, SubmitOutcome};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const QUIT: &str = "q";
const LIST: &str = "?";

enum Input {
    Value(String),
    Keep,
    Quit,
}

async fn read_input<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<Input> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .await
        .context("Failed to read input")?;
    if read == 0 {
        return Ok(Input::Quit);
    }
    let line = line.trim();
    Ok(match line {
        "" => Input::Keep,
        QUIT => Input::Quit,
        other => Input::Value(other.to_string()),
    })
}

fn print_options<W: Write>(out: &mut W, options: &[String]) -> Result<()> {
    if options.is_empty() {
        writeln!(out, "{}", ui::style_text("  (no options available)", ui::StyleType::Subtle))?;
    }
    for option in options {
        writeln!(out, "  {option}")?;
    }
    Ok(())
}

/// Asks for one field until a value is given or kept. Returns `false` on quit.
async fn prompt_field<R: AsyncBufRead + Unpin, W: Write>(
    form: &ConvertorForm,
    field: Field,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    loop {
        let current = form.values().get(field).to_string();
        write!(
            out,
            "{} [{}]: ",
            ui::style_text(field_label(field), ui::StyleType::Label),
            current
        )?;
        out.flush()?;

        match read_input(input).await? {
            Input::Quit => return Ok(false),
            Input::Keep => return Ok(true),
            Input::Value(v) if v == LIST && field != Field::Amount => {
                let options = match field {
                    Field::Cryptocurrency => render::select_options(&form.crypto_list()),
                    _ => render::select_options(&form.fiat_list()),
                };
                print_options(out, &options)?;
            }
            Input::Value(v) => {
                let v = if field == Field::Amount { v } else { v.to_uppercase() };
                form.set_value(field, v);
                return Ok(true);
            }
        }
    }
}

/// Runs the prompt loop on an already mounted form.
pub async fn run_form<R: AsyncBufRead + Unpin, W: Write>(
    form: &ConvertorForm,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "{}",
        ui::style_text(
            &format!(
                "{} cryptocurrencies, {} fiat currencies loaded. Enter keeps a value, '{}' lists options, '{}' quits.",
                form.crypto_list().len(),
                form.fiat_list().len(),
                LIST,
                QUIT
            ),
            ui::StyleType::Subtle
        )
    )?;

    loop {
        for field in [Field::Cryptocurrency, Field::Amount, Field::Currency] {
            if !prompt_field(form, field, input, out).await? {
                return Ok(());
            }
        }

        if !render::submit_enabled(form.state()) {
            continue;
        }
        let pb = ui::new_spinner(render::submit_label(FormState::Loading));
        let outcome = form.submit().await;
        pb.finish_and_clear();

        match outcome {
            SubmitOutcome::Invalid(errors) => writeln!(out, "{}", field_errors_text(&errors))?,
            SubmitOutcome::Rejected | SubmitOutcome::Failed => {
                if let Some(message) = form.last_error() {
                    writeln!(out, "{}", ui::style_text(&message, ui::StyleType::Error))?;
                }
            }
            SubmitOutcome::Converted(_) | SubmitOutcome::Busy => {}
        }

        if let Some(result) = form.result() {
            writeln!(
                out,
                "{}",
                ui::style_text(&render::result_line(&result), ui::StyleType::Result)
            )?;
        }
        writeln!(out)?;
    }
}

/// Mounts the form, waits for both lists and starts prompting on stdin.
pub async fn run(gateway: Arc<dyn ConversionGateway>, config: &FormConfig) -> Result<()> {
    println!("{}\n", ui::style_text("Crypto Convertor", ui::StyleType::Title));

    let mut form = ConvertorForm::new(gateway, config);
    let pb = ui::new_spinner("Loading currencies...");
    form.mount();
    form.wait_for_lists().await;
    pb.finish_and_clear();

    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    let result = run_form(&form, &mut input, &mut out).await;

    form.unmount();
    result
}
