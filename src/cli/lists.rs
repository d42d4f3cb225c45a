use super::ui;
use crate::core::{ConversionGateway, CryptoAsset, FiatCurrency};
use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn fiat_table(fiats: &[FiatCurrency]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Sign"),
    ]);
    for fiat in fiats {
        table.add_row(vec![
            Cell::new(&fiat.symbol),
            Cell::new(&fiat.name),
            Cell::new(&fiat.sign),
        ]);
    }
    table
}

pub fn crypto_table(cryptos: &[CryptoAsset]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Rank"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Active"),
        ui::header_cell("Data Since"),
    ]);
    for crypto in cryptos {
        table.add_row(vec![
            ui::number_cell(crypto.rank),
            Cell::new(&crypto.symbol),
            Cell::new(&crypto.name),
            Cell::new(if crypto.is_active() { "yes" } else { "no" }),
            ui::format_optional_cell(crypto.first_historical_data, |d| {
                d.format("%Y-%m-%d").to_string()
            }),
        ]);
    }
    table
}

fn render_section(title: &str, count: usize, table: Table) -> String {
    if count == 0 {
        return format!(
            "{}\n\n{}",
            ui::style_text(title, ui::StyleType::Title),
            ui::style_text("No entries available", ui::StyleType::Subtle)
        );
    }
    format!("{}\n\n{}", ui::style_text(title, ui::StyleType::Title), table)
}

/// Fetches both lists concurrently and prints them.
pub async fn run(gateway: &dyn ConversionGateway) -> Result<()> {
    let pb = ui::new_spinner("Fetching currency lists...");
    let (fiats, cryptos) =
        futures::future::join(gateway.fetch_fiat_list(), gateway.fetch_crypto_list()).await;
    pb.finish_and_clear();

    let fiats = fiats.unwrap_or_default();
    let cryptos = cryptos.unwrap_or_default();

    println!(
        "{}",
        render_section("Cryptocurrencies", cryptos.len(), crypto_table(&cryptos))
    );
    ui::print_separator();
    println!(
        "{}",
        render_section("Fiat Currencies", fiats.len(), fiat_table(&fiats))
    );
    Ok(())
}
