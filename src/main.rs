use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use parte::{
    Config, NotionClient, init::init_config, logging::init_logging, obtain_report,
    render::render, report::export_entries_csv,
};
use std::{fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily shelter report from a Notion workspace", long_about = None)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a config template
    Init {
        #[arg(short, long, default_value = "parte.toml")]
        output: String,
    },
    /// Fetch the report of one day and print it as text
    Generate {
        /// Day the report was written (DD/MM/YYYY)
        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,

        #[arg(short, long, env = "PARTE_CONFIG", default_value = "parte.toml")]
        config: PathBuf,

        /// Write the text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also dump the normalized entries as CSV
        #[arg(long)]
        entries_csv: Option<PathBuf>,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .map_err(|err| format!("expected DD/MM/YYYY: {err}"))
}

fn generate(
    date: NaiveDate,
    config: PathBuf,
    output: Option<PathBuf>,
    entries_csv: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(&config)
        .with_context(|| format!("loading configuration from {}", config.display()))?;
    let client = NotionClient::try_new(&config)?;

    let report = obtain_report(&client, &config, date)
        .with_context(|| format!("retrieving the report of {}", date.format("%d/%m/%Y")))?;
    let text = render(&report)?;

    if let Some(path) = entries_csv {
        export_entries_csv(&report.entries, &path)?;
    }
    match output {
        Some(path) => {
            fs::write(&path, &text)?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Init { output } => init_config(&output),
        Command::Generate {
            date,
            config,
            output,
            entries_csv,
        } => generate(date, config, output, entries_csv),
    }
}
