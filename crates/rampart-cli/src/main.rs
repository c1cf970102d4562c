//! Rampart CLI - Command-line interface for the injection defense

use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing::warn;

use rampart_core::{GuardPipeline, RampartConfig};
use rampart_tracker::{AttackRecord, LogAnalyzer};

#[derive(Parser)]
#[command(name = "rampart")]
#[command(about = "Rampart - Prompt Injection Defense for Agent Pipelines")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Classify input text and print the decision (exit code 2 on block)
    Scan {
        /// Text to classify; stdin when neither text nor --file is given
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Drop leaking lines from agent output
    Sanitize {
        /// Output to sanitize; stdin when neither text nor --file is given
        text: Option<String>,
        /// Read the output from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Categorize recorded attacks from a JSONL export
    Analyze {
        /// Attack record export, one JSON record per line
        #[arg(short, long)]
        log: PathBuf,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "config/rampart.json")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Some(Commands::Scan { text, file, config }) => scan(text, file, config.as_deref())?,
        Some(Commands::Sanitize { text, file, config }) => {
            sanitize(text, file, config.as_deref())?;
        }
        Some(Commands::Analyze { log }) => analyze(&log)?,
        Some(Commands::Check { config }) => check(&config)?,
        None => {
            println!("Rampart v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}

fn scan(text: Option<String>, file: Option<PathBuf>, config: Option<&Path>) -> anyhow::Result<()> {
    let input = read_input(text, file)?;
    let pipeline = build_pipeline(config)?;
    let decision = pipeline.guard().classify(&input);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    if decision.is_blocked() {
        std::process::exit(2);
    }
    Ok(())
}

fn sanitize(
    text: Option<String>,
    file: Option<PathBuf>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let output = read_input(text, file)?;
    let pipeline = build_pipeline(config)?;
    println!("{}", pipeline.sanitize_output(&output));
    Ok(())
}

fn analyze(log: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(log).with_context(|| format!("cannot read {}", log.display()))?;

    let mut records = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AttackRecord>(line) {
            Ok(record) => records.push(record),
            Err(error) => warn!(line = number + 1, %error, "skipping unparseable record"),
        }
    }

    let counts = LogAnalyzer::new().analyze(&records);
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}

fn check(config: &Path) -> anyhow::Result<()> {
    let config = RampartConfig::from_file(config)?;
    let pipeline = GuardPipeline::new(config)?;
    let patterns = pipeline.guard().patterns();

    println!("config OK");
    println!("  pattern fingerprint: {}", patterns.fingerprint());
    println!("  blocked patterns:    {}", patterns.blocked().len());
    println!("  suspicious patterns: {}", patterns.suspicious().len());
    println!(
        "  output anchors:      {}",
        pipeline.output_validator().anchor_count()
    );
    Ok(())
}

fn build_pipeline(config: Option<&Path>) -> anyhow::Result<GuardPipeline> {
    let config = match config {
        Some(path) => RampartConfig::from_file(path)?,
        None => RampartConfig::default(),
    };
    Ok(GuardPipeline::new(config)?)
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(path) = file {
        return fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()));
    }
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
