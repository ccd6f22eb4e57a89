//! Cache simulator CLI.
//!
//! This binary is the command-line entry point. It performs:
//! 1. **Run:** Load a JSON config and a memory trace, replay the trace, and print statistics.
//! 2. **Check:** Validate a config and print the geometry it derives.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::{Config, InvalidRecordPolicy};
use cachesim_core::sim::{RunSummary, Simulator, TraceReader};
use cachesim_core::stats::Statistics;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory trace against a configurable set-associative cache and report hit/miss/writeback statistics and AMAT.\n\nExamples:\n  cachesim run -c config.json -t memory_trace.txt\n  cachesim run -c config.json -t memory_trace.txt --format json\n  cachesim check -c config.json"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Defaults to RUST_LOG or warn.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print statistics.
    Run(RunArgs),

    /// Validate a configuration and print the derived geometry.
    Check {
        /// JSON configuration file.
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Memory trace (one "R|W <hex-address>" per line).
    #[arg(short, long)]
    trace: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip malformed trace lines instead of aborting.
    #[arg(long)]
    skip_invalid: bool,

    /// Log a progress report every N accesses.
    #[arg(long, value_name = "N")]
    report_every: Option<u64>,

    /// Text sections to print (summary, breakdown, timing). Default: all.
    #[arg(long, num_args = 1..)]
    sections: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Check { config } => cmd_check(&config),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prints `err` and its source chain to stderr and exits with code 1.
fn fail(err: &dyn Error) -> ! {
    eprintln!("[!] error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("    caused by: {cause}");
        source = cause.source();
    }
    process::exit(1);
}

/// Replays the trace named in `args` and prints the resulting statistics.
fn cmd_run(args: &RunArgs) {
    let mut config = Config::load(&args.config).unwrap_or_else(|e| fail(&e));
    if args.skip_invalid {
        config.simulation.on_invalid_record = InvalidRecordPolicy::Skip;
    }
    if let Some(every) = args.report_every {
        config.simulation.report_interval = every;
    }

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| fail(&e));
    let trace = TraceReader::open(&args.trace).unwrap_or_else(|e| fail(&e));
    let summary = sim.run(trace).unwrap_or_else(|e| fail(&e));
    let stats = sim.report();

    match args.format {
        OutputFormat::Text => print_text(&sim, &summary, &stats, &args.sections),
        OutputFormat::Json => print_json(&summary, &stats),
    }
}

fn print_text(sim: &Simulator, summary: &RunSummary, stats: &Statistics, sections: &[String]) {
    let geometry = sim.cache().geometry();
    println!(
        "Configuration: {} B, {}-byte blocks, {}-way, {} sets, {}",
        geometry.total_bytes(),
        geometry.block_size_bytes(),
        geometry.associativity(),
        geometry.num_sets(),
        geometry.replacement_policy()
    );
    if summary.skipped > 0 {
        println!("Skipped {} invalid trace record(s)", summary.skipped);
    }
    stats.print_sections(sections);
}

fn print_json(summary: &RunSummary, stats: &Statistics) {
    let doc = serde_json::json!({
        "statistics": stats,
        "processed": summary.processed,
        "skipped": summary.skipped,
    });
    match serde_json::to_string_pretty(&doc) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(&e),
    }
}

/// Validates the configuration and prints the derived geometry.
fn cmd_check(path: &Path) {
    let config = Config::load(path).unwrap_or_else(|e| fail(&e));
    let geometry = config.cache.geometry().unwrap_or_else(|e| fail(&e));
    let decoder = geometry.decoder();

    println!("config OK: {}", path.display());
    println!("  total_bytes        {}", geometry.total_bytes());
    println!("  block_size_bytes   {}", geometry.block_size_bytes());
    println!("  associativity      {}", geometry.associativity());
    println!("  num_blocks         {}", geometry.num_blocks());
    println!("  num_sets           {}", geometry.num_sets());
    println!("  offset_bits        {}", decoder.offset_bits());
    println!("  index_bits         {}", decoder.index_bits());
    println!("  tag_bits           {}", decoder.tag_bits());
    println!("  policy             {}", geometry.replacement_policy());
    match config.timing {
        Some(t) => println!(
            "  timing             hit {} / miss penalty {} cycles",
            t.hit_time(),
            t.miss_penalty()
        ),
        None => println!("  timing             none (AMAT not reported)"),
    }
}
