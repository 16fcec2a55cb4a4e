use core::ops::ControlFlow;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use crc_collider::{
    parse_concurrency, parse_target, parse_variant, save_results, Collider, RunConfig,
    StatPrinter, StopSignal, DEFAULT_RESULTS_PATH,
};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// Brute-forces strings over an alphabet, shortest first, until one of them
/// has the given CRC-32. Runs until interrupted with Ctrl+C, then saves every
/// match found.
#[derive(Debug, StructOpt)]
struct Cli {
    /// Target checksum, e.g. 0x86a072c0. Asked for when omitted
    #[structopt(long)]
    hash: Option<String>,
    /// CRC-32 table: 1 - IEEE, 2 - Castagnoli, 3 - Koopman. Asked for when omitted
    #[structopt(long)]
    table: Option<String>,
    /// Simultaneous workers, 0 or less means one per cpu. Asked for when omitted
    #[structopt(long, allow_hyphen_values = true)]
    threads: Option<String>,
    /// Symbols to build candidates from, printable ASCII by default
    #[structopt(long)]
    alphabet: Option<String>,
    /// Where to save matches on exit, results.txt by default
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// Stop after exhausting this length
    #[structopt(long)]
    max_length: Option<usize>,
    /// Seconds between progress lines on stderr, 0 to disable
    #[structopt(long, default_value = "10")]
    stats_interval: u64,
    /// Stop at the first match
    #[structopt(long)]
    first: bool,
}

fn prompt(question: &str) -> String {
    print!("{}", question);
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line
}

fn read_config(cli: &Cli) -> RunConfig {
    let cpus = num_cpus::get();

    let hash = match &cli.hash {
        Some(hash) => hash.clone(),
        None => prompt("Enter hash: "),
    };
    let table = match &cli.table {
        Some(table) => table.clone(),
        None => prompt("Choose CRC32 table (1 - IEEE, 2 - Castagnoli, 3 - Koopman): "),
    };
    let threads = match &cli.threads {
        Some(threads) => threads.clone(),
        None => prompt(&format!("Enter count of simultaneous workers (optimal: {}): ", cpus)),
    };

    let concurrency = parse_concurrency(&threads, cpus);
    match threads.trim().parse::<i64>() {
        Ok(requested) if requested > 0 && requested as usize > concurrency => {
            println!("Too many workers, setting to: {}", concurrency);
        }
        Ok(requested) if requested > 0 => {}
        _ => println!("Invalid count, setting to: {}", concurrency),
    }

    let mut config = RunConfig::new(parse_target(&hash), parse_variant(&table))
        .with_alphabet(cli.alphabet.clone().unwrap_or_default())
        .with_max_length(cli.max_length);
    config.concurrency = concurrency;
    config
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::from_args();
    let config = read_config(&cli);

    println!("Hash: 0x{:08x}", config.target);
    println!("Table: {}", config.variant.name());
    println!("Alphabet: {}", String::from_utf8_lossy(&config.alphabet));
    println!("Alphabet length: {}", config.alphabet.len());
    println!("Workers: {}", config.concurrency);
    println!("Starting brute force...");

    let collider = Collider::new(config);
    let stopper = collider.stopper();
    if let Err(err) = ctrlc::set_handler(move || {
        println!("Caught interrupt, waiting for workers to finish...");
        stopper.stop();
    }) {
        eprintln!("Error installing interrupt handler: {}", err);
        process::exit(1);
    }

    let on_found = if cli.first {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    };
    let mut printer = StatPrinter::new(cli.stats_interval, collider.config().alphabet.len(), on_found);
    let records = collider.run(&mut printer);

    let output = cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_PATH));
    println!("Total results: {}", records.len());
    println!("Saving results to {}...", output.display());
    if let Err(err) = save_results(&output, &records) {
        eprintln!("{}", err);
        process::exit(1);
    }
    println!("Done, check {}!", output.display());
}
