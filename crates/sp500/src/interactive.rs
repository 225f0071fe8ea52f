use crate::session;
use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use sp500_core::export::FILENAME;
use sp500_core::{CompanyCount, Dashboard, SelectionState};
use std::path::Path;
use tracing::{debug, error};

/// Prompt for the sidebar inputs and re-run the whole pipeline after each
/// round, until the user stops. The company list is fetched on the first round
/// only.
pub async fn run(dashboard: &Dashboard, out_dir: &Path) -> Result<()> {
    let theme = ColorfulTheme::default();

    // fatal: there is nothing to show without the company list
    let table = session::load_table(dashboard).await?;
    let options: Vec<String> = table.sectors().into_iter().collect();
    let mut state = SelectionState::all_sectors(&table);

    loop {
        let defaults: Vec<bool> = options.iter().map(|s| state.sectors.contains(s)).collect();
        let picked = MultiSelect::with_theme(&theme)
            .with_prompt("Sector")
            .items(&options)
            .defaults(&defaults)
            .interact()?;
        state.sectors = picked.into_iter().map(|i| options[i].clone()).collect();

        let count: usize = Input::with_theme(&theme)
            .with_prompt("Number of companies for plots")
            .default(state.count.get())
            .validate_with(|n: &usize| -> Result<(), &str> {
                if (1..=10).contains(n) {
                    Ok(())
                } else {
                    Err("choose between 1 and 10")
                }
            })
            .interact_text()?;
        state.count = CompanyCount::new(count);

        let symbol: String = Input::with_theme(&theme)
            .with_prompt("OR choose a specific symbol")
            .allow_empty(true)
            .interact_text()?;
        state.override_symbol = Some(symbol).filter(|s| !s.trim().is_empty());

        let show_plots = Confirm::with_theme(&theme)
            .with_prompt("Show plots?")
            .default(true)
            .interact()?;
        debug!("selection: {state:?}, show plots: {show_plots}");

        match session::evaluate(dashboard, &state, show_plots).await {
            Ok(view) => {
                session::print_companies(&view);
                session::write_csv(&view, &out_dir.join(FILENAME)).await?;
                session::print_notice(&view);
                session::write_plots(&view, out_dir).await?;
            }
            // only this interaction is lost
            Err(e) => {
                error!("interaction failed: {e}");
                eprintln!("{}", e.to_string().red());
            }
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Change the selection?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
    }

    Ok(())
}
