//! Sales Dashboard CLI
//!
//! Renders the retail sales dashboard for a CSV file or the built-in sample
//! data, either once or interactively.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sales_dashboard::console::ConsoleSurface;
use sales_dashboard::filter;
use sales_dashboard::loader::{self, LoadOutcome};
use sales_dashboard::normalize::normalize;
use sales_dashboard::session::{Command as SessionCommand, Flow, HELP, Session};
use sales_dashboard::{Config, DataSource, FilterSelection, MonthSelection, YearSelection};

#[derive(Parser, Debug)]
#[command(name = "sales-dashboard")]
#[command(about = "Retail sales dashboard for transaction CSV files")]
struct Args {
    /// CSV file to analyse
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    /// Use the built-in sample data (takes precedence over FILE)
    #[arg(long, global = true)]
    sample: bool,

    /// Year to show ("all" or e.g. 2024)
    #[arg(long, default_value = "all", global = true)]
    year: YearSelection,

    /// Month to include (repeatable; default: every month)
    #[arg(long = "month", value_name = "MONTH", global = true)]
    months: Vec<String>,

    /// Select no months at all
    #[arg(long, conflicts_with = "months", global = true)]
    no_months: bool,

    /// Store location for the location chart (repeatable; default: all)
    #[arg(long = "location", value_name = "LOCATION", global = true)]
    locations: Vec<String>,

    /// Config file (default: dashboard.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-render after each command read from stdin
    Interactive {
        /// CSV file to analyse
        file: Option<PathBuf>,
    },

    /// Print the filter control options for the current source
    Options {
        /// CSV file to analyse
        file: Option<PathBuf>,
    },
}

impl Args {
    fn selection(&self) -> FilterSelection {
        let months = if self.no_months {
            MonthSelection::Only(Vec::new())
        } else if self.months.is_empty() {
            MonthSelection::All
        } else {
            MonthSelection::Only(self.months.clone())
        };

        FilterSelection {
            year: self.year,
            months,
            locations: self.locations.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::load(args.config.as_deref())?;
    tracing::debug!("config: {:?}", config);

    let file = match &args.command {
        Some(Command::Interactive { file }) | Some(Command::Options { file }) => {
            file.as_ref().or(args.file.as_ref())
        }
        None => args.file.as_ref(),
    };
    let upload = match file {
        Some(path) => Some(
            DataSource::from_path(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => None,
    };
    let session = Session::new(args.sample, upload, args.selection());

    match args.command {
        None => render_once(&session, &config),
        Some(Command::Options { .. }) => print_options(&session, &config),
        Some(Command::Interactive { .. }) => run_interactive(session, &config),
    }
}

/// Render a single cycle to stdout
fn render_once(session: &Session, config: &Config) -> Result<()> {
    let mut surface = ConsoleSurface::new(config);
    let result = session.render(config, &mut surface);
    print!("{}", surface.finish());
    result.context("Dashboard could not be rendered")?;
    Ok(())
}

fn print_options(session: &Session, config: &Config) -> Result<()> {
    let dataset = match loader::load(&session.source(), config)? {
        LoadOutcome::Loaded(dataset) => normalize(dataset),
        LoadOutcome::AwaitingInput => {
            anyhow::bail!("No data source. Pass a CSV file or --sample.");
        }
    };
    let outcome = filter::apply(&dataset, &session.selection);

    let years: Vec<String> = outcome.year_options.iter().map(|y| y.to_string()).collect();
    println!("Rows:      {} ({})", dataset.len(), dataset.layout);
    println!("Year:      {}", outcome.year);
    println!("Years:     {}", years.join(", "));
    println!("Months:    {}", outcome.month_options.join(", "));
    println!("Locations: {}", filter::location_options(&outcome.view).join(", "));
    Ok(())
}

/// Read commands from stdin; every accepted command re-runs the whole cycle
fn run_interactive(mut session: Session, config: &Config) -> Result<()> {
    render_interactive(&session, config);

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("dashboard> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        input.clear();
        if stdin.lock().read_line(&mut input).context("Failed to read stdin")? == 0 {
            break;
        }

        let command = match input.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match session.apply(command) {
            Ok(Flow::Render) => render_interactive(&session, config),
            Ok(Flow::Help) => println!("{}", HELP),
            Ok(Flow::Quit) => break,
            Err(e) => println!("Error: {}", e),
        }
    }
    Ok(())
}

fn render_interactive(session: &Session, config: &Config) {
    let mut surface = ConsoleSurface::new(config);
    if let Err(e) = session.render(config, &mut surface) {
        tracing::warn!("render failed: {}", e);
    }
    print!("{}", surface.finish());
}
