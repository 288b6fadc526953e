mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{PlayPolicy, SimulationSummary, resolve_seed_inputs, run_simulations, split_csv};
use teahouse_game::{CatalogLoader, EmbeddedCatalog};

#[derive(Debug, Parser)]
#[command(name = "teahouse-tester", version = "0.1.0")]
#[command(about = "Automated shift simulation for the Teahouse game core")]
struct Args {
    /// Seeds to run (comma-separated numbers or shift codes such as TS-SENCHA42)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of shifts (days) to play per seed
    #[arg(long, default_value_t = 5)]
    shifts: u32,

    /// Customers served in each shift
    #[arg(long, default_value_t = 12)]
    customers: u32,

    /// How the simulated player brews
    #[arg(long, value_enum, default_value_t = PlayPolicy::Precise)]
    policy: PlayPolicy,

    /// Skip foraging trips and vessel purchases between shifts
    #[arg(long)]
    no_economy: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("{}", "🍵 Teahouse Automated Tester".bright_cyan().bold());
    println!("{}", "=".repeat(30).cyan());

    let start_time = Instant::now();
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    if args.verbose {
        for info in &seeds {
            println!("🌱 seed {} -> {}", info.label().bright_green(), info.seed);
        }
    }

    let catalog = EmbeddedCatalog
        .load_catalog()
        .context("loading embedded catalog")?;
    debug!(
        "catalog loaded: {} teas, {} vessels",
        catalog.teas().len(),
        catalog.vessels().len()
    );

    let results = run_simulations(
        &catalog,
        &seeds,
        args.policy,
        args.shifts,
        args.customers,
        !args.no_economy,
    )?;

    write_reports(&args, &results, start_time)
}

fn write_reports(args: &Args, results: &[SimulationSummary], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, results)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, results)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                results,
                start_time.elapsed(),
            )?;
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
