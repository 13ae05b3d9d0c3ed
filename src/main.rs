use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use nyt_bestsellers::config::{Config, DEFAULT_CONFIG_PATH};
use nyt_bestsellers::io::excel_read;
use nyt_bestsellers::io::http::HttpTransport;
use nyt_bestsellers::sync;
use nyt_bestsellers::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Grab) {
        Command::Grab => execute_grab(&cli.config, cli.output_dir),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_grab(config_path: &Path, output_dir: Option<PathBuf>) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let today = chrono::Local::now().date_naive();
    let path = sync::sync_bestsellers(&config, &HttpTransport::new(), today)?;
    println!("{}", path.display());
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    for sheet in excel_read::read_report(&args.workbook)? {
        println!("[{}] {}", sheet.sheet_name, sheet.date_header);
        for row in &sheet.rows {
            let headline = row.text.lines().next().unwrap_or_default();
            println!("{:>3}  {:<3} {headline}", row.rank, row.status);
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Build a printable workbook of the current New York Times bestseller lists."
)]
struct Cli {
    /// Settings file with the API key, organization and lists.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for the generated workbook, overriding the settings file.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the enabled lists and write today's workbook (default).
    Grab,
    /// Print the books recorded in a previously generated workbook.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Workbook to read.
    workbook: PathBuf,
}
