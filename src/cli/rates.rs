use super::ui;
use crate::core::{CurrencyRateStore, StoredRate};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Renders stored rates sorted by base and target code.
pub fn format_stored_rates(rates: &[StoredRate]) -> String {
    if rates.is_empty() {
        return ui::style_text(
            "No stored currency rates. Run `cnbrates import` first.",
            ui::StyleType::Subtle,
        );
    }

    let mut sorted: Vec<&StoredRate> = rates.iter().collect();
    sorted.sort_by(|a, b| (&a.base, &a.target).cmp(&(&b.base, &b.target)));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Base"),
        ui::header_cell("Currency"),
        ui::header_cell("Rate"),
        ui::header_cell("Updated (UTC)"),
    ]);
    for rate in sorted {
        table.add_row(vec![
            Cell::new(&rate.base),
            Cell::new(&rate.target),
            ui::rate_cell(rate.rate),
            Cell::new(rate.updated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Stored currency rates", ui::StyleType::Title),
        table
    )
}

pub async fn run(store: &dyn CurrencyRateStore) -> Result<()> {
    let rates = store
        .load_rates()
        .await
        .context("Failed to load stored currency rates")?;
    println!("{}", format_stored_rates(&rates));
    Ok(())
}
