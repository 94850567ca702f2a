//! Supermarket CLI - front door to the live coding grocery store

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use supermarket::autocomplete;
use supermarket::catalog::ProductCatalog;
use supermarket::config::StoreConfig;
use supermarket::engine::{Engine, StdoutSink};
use supermarket::improvise;
use supermarket::repl::Repl;
use supermarket::synth::SilentBank;

#[derive(Parser)]
#[command(name = "supermarket")]
#[command(about = "Live coding grocery store", long_about = None)]
struct Cli {
    /// Optional TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive store prompt (default)
    Repl,

    /// Run a script of commands, one per line
    Exec {
        /// Script file; blank lines and //-comments are skipped
        script: PathBuf,

        /// Start the bar clock and play one line per bar
        #[arg(short, long)]
        live: bool,
    },

    /// Show completions for a half-typed line
    Suggest {
        /// The line as typed so far
        line: String,

        /// Cursor byte position (default: end of line)
        #[arg(short = 'p', long)]
        cursor: Option<usize>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate random commands and optionally play them
    Improvise {
        /// How many commands to draw
        #[arg(short = 'n', long, default_value = "8")]
        count: usize,

        /// Seed for a repeatable set
        #[arg(short, long)]
        seed: Option<u64>,

        /// Execute the commands instead of just printing them
        #[arg(long)]
        run: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => Repl::new(config).run(),
        Commands::Exec { script, live } => run_script(config, &script, live),
        Commands::Suggest { line, cursor, json } => run_suggest(config, &line, cursor, json),
        Commands::Improvise { count, seed, run } => run_improvise(config, count, seed, run),
    }
}

fn load_config(path: Option<&Path>) -> Result<StoreConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(StoreConfig::load(path)?),
        None => Ok(StoreConfig::default()),
    }
}

fn run_script(
    config: StoreConfig,
    script: &Path,
    live: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(script)?;
    let mut engine = Engine::new(config, Box::new(SilentBank::new()), Box::new(StdoutSink));
    if live {
        engine.state_mut().transport.start();
    }
    let mut next_bar = Instant::now() + engine.state().transport.bar_duration();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        println!("🛒 {line}");
        engine.execute_command(line);
        if live {
            wait_for_bar(&mut engine, &mut next_bar);
        } else {
            drain(&mut engine);
        }
    }

    // Bar-synced swaps still waiting at end of script get their bar.
    if live && engine.state().transport.armed_count() > 0 {
        engine.on_bar();
    }
    drain(&mut engine);
    Ok(())
}

/// Sleep out the rest of the current bar, then fire the boundary.
fn wait_for_bar(engine: &mut Engine, next_bar: &mut Instant) {
    while Instant::now() < *next_bar {
        thread::sleep(Duration::from_millis(10));
        engine.pump();
    }
    engine.on_bar();
    *next_bar += engine.state().transport.bar_duration();
}

/// Pump until nothing is scheduled.
fn drain(engine: &mut Engine) {
    while !engine.state().scheduler.is_empty() {
        thread::sleep(Duration::from_millis(10));
        engine.pump();
    }
}

fn run_suggest(
    config: StoreConfig,
    line: &str,
    cursor: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ProductCatalog::stocked();
    let cursor = cursor.unwrap_or(line.len());
    let items = autocomplete::suggest(line, cursor, &config.autocomplete, &catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("(no suggestions)");
    } else {
        for item in &items {
            println!("{:<18} {}", item.text, item.desc);
        }
    }
    Ok(())
}

fn run_improvise(
    config: StoreConfig,
    count: usize,
    seed: Option<u64>,
    run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ProductCatalog::stocked();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let lines: Vec<String> = (0..count)
        .map(|_| improvise::random_command(&mut rng, &catalog))
        .collect();

    if run {
        let mut engine = Engine::new(config, Box::new(SilentBank::new()), Box::new(StdoutSink));
        for line in &lines {
            println!("🛒 {line}");
            engine.execute_command(line);
            drain(&mut engine);
        }
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
    Ok(())
}
