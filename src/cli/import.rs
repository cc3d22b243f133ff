use super::ui;
use crate::core::currency::{RateTable, rate_count, sorted_entries};
use crate::core::{MessageLog, RateImporter};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the message log, one styled line per message.
pub fn format_messages(messages: &MessageLog) -> String {
    messages
        .iter()
        .map(ui::style_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a rate table sorted by base and target code.
pub fn format_rate_table(rates: &RateTable) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Base"),
        ui::header_cell("Currency"),
        ui::header_cell("Rate"),
    ]);

    for (base, target, rate) in sorted_entries(rates) {
        table.add_row(vec![Cell::new(base), Cell::new(target), ui::rate_cell(rate)]);
    }

    format!(
        "{}\n\n{}\n\n{} rates",
        ui::style_text("CNB daily rates", ui::StyleType::Title),
        table,
        rate_count(rates)
    )
}

/// Runs a full import and prints its messages. Fails if any error was recorded.
pub async fn run_import(importer: &mut dyn RateImporter) -> Result<()> {
    let pb = ui::new_spinner("Importing currency rates...");
    importer.import_rates().await;
    pb.finish_and_clear();

    println!("{}", format_messages(importer.messages()));

    if importer.messages().has_errors() {
        anyhow::bail!("Currency rate import finished with errors");
    }
    Ok(())
}

/// Fetches rates without saving them and prints the table.
pub async fn run_fetch(importer: &mut dyn RateImporter) -> Result<()> {
    let pb = ui::new_spinner("Fetching currency rates...");
    let rates = importer.fetch_rates().await;
    pb.finish_and_clear();

    if !importer.messages().is_empty() {
        println!("{}", format_messages(importer.messages()));
    }
    if rates.is_empty() {
        anyhow::bail!("No currency rates fetched");
    }

    println!("{}", format_rate_table(&rates));
    Ok(())
}
