use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use dotenv::dotenv;
use tracing::{info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;
mod interactive;
mod session;
mod ui;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    let config = config::Config::from_env()?;
    let dashboard = session::build(&config, cli.table.as_deref())?;

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> sp500 <COMMAND>"
    match &cli.command {
        // "> sp500 sectors"
        Sectors => {
            let table = session::load_table(&dashboard).await?;
            for sector in table.sectors() {
                println!("{sector}");
            }
        }

        // ---------------------------------------------------------------------------
        // "> sp500 companies [--sector S]... [--csv PATH] [--link]"
        Companies { filter, csv, link } => {
            let table = session::load_table(&dashboard).await?;
            let state = session::selected_sectors(&table, &filter.sectors)?;
            let view = session::evaluate(&dashboard, &state, false).await?;

            session::print_companies(&view);
            if let Some(path) = csv {
                session::write_csv(&view, path).await?;
            }
            if *link {
                println!("{}", view.download.html_link());
            }
        }

        // ---------------------------------------------------------------------------
        // "> sp500 plot [--sector S]... [--count N] [--symbol SYM] [--out-dir DIR]"
        Plot {
            filter,
            count,
            symbol,
            out_dir,
        } => {
            let table = session::load_table(&dashboard).await?;
            let mut state =
                session::selected_sectors(&table, &filter.sectors)?.with_count(usize::from(*count));
            state.override_symbol = symbol.clone();

            let view = session::evaluate(&dashboard, &state, true).await?;
            session::print_notice(&view);
            let written = session::write_plots(&view, out_dir).await?;
            info!("{} of {} plots written", written.len(), view.plots.len());
        }

        // ---------------------------------------------------------------------------
        // "> sp500 dashboard [--out-dir DIR]"
        Dashboard { out_dir } => {
            interactive::run(&dashboard, out_dir).await?;
        }
    }

    Ok(())
}
