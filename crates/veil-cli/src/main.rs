//! Veil CLI
//!
//! CLI tool for checking and cleaning URLs and compiling pattern lists.

mod files;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use veil_core::{Engine, PageContext};
use veil_lists::{compile_lists, optimize_store, parse_pattern_list};

#[derive(Parser)]
#[command(name = "veil-cli")]
#[command(about = "Veil tracker blocking and URL cleaning tools")]
struct Cli {
    /// Engine configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// URL of the page the engine runs in
    #[arg(short, long, global = true)]
    page: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the block decision for each URL (reads stdin when none given)
    Check {
        urls: Vec<String>,

        /// Show which check decided
        #[arg(short, long)]
        reason: bool,
    },

    /// Print the cleaned form of each URL (reads stdin when none given)
    Clean {
        urls: Vec<String>,

        /// Base URL for relative hrefs, resolved against the page
        #[arg(short, long)]
        base: Option<String>,

        /// List the pipeline stages that fired
        #[arg(short, long)]
        explain: bool,
    },

    /// Compile pattern lists into an engine configuration
    Compile {
        /// Input pattern list files
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Output configuration file
        #[arg(short, long, default_value = "veil-config.json")]
        output: PathBuf,
    },

    /// Validate an engine configuration file
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Check { ref urls, reason } => {
            build_engine(&cli).and_then(|engine| cmd_check(&engine, urls, reason))
        }
        Commands::Clean {
            ref urls,
            ref base,
            explain,
        } => build_engine(&cli).and_then(|engine| cmd_clean(&engine, urls, base.as_deref(), explain)),
        Commands::Compile {
            ref input,
            ref output,
        } => cmd_compile(cli.config.as_deref(), input, output, cli.verbose > 0),
        Commands::Validate { ref input } => cmd_validate(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_engine(cli: &Cli) -> Result<Engine, String> {
    let config = files::load_config(cli.config.as_deref())?;
    let page = match &cli.page {
        Some(page) => PageContext::from_location(page).map_err(|e| e.to_string())?,
        None => PageContext::detached(),
    };
    Ok(Engine::new(config, page))
}

/// The given URLs, or stdin lines when there are none.
fn url_inputs(urls: &[String]) -> Result<Vec<String>, String> {
    if !urls.is_empty() {
        return Ok(urls.to_vec());
    }
    std::io::stdin()
        .lock()
        .lines()
        .map(|line| line.map_err(|e| format!("Failed to read stdin: {}", e)))
        .filter(|line| !matches!(line, Ok(text) if text.trim().is_empty()))
        .collect()
}

fn cmd_check(engine: &Engine, urls: &[String], reason: bool) -> Result<(), String> {
    for url in url_inputs(urls)? {
        let result = engine.match_url(Some(&url));
        let verdict = if result.is_block() { "block" } else { "allow" };
        if reason {
            println!("{verdict}\t{:?}\t{url}", result.reason);
        } else {
            println!("{verdict}\t{url}");
        }
    }
    Ok(())
}

fn cmd_clean(engine: &Engine, urls: &[String], base: Option<&str>, explain: bool) -> Result<(), String> {
    for url in url_inputs(urls)? {
        let cleaned = engine.clean(&url, base);
        println!("{}", cleaned.href);
        if explain {
            let steps: Vec<&str> = cleaned.steps.iter_names().map(|(name, _)| name).collect();
            println!("  from:   {url}");
            println!("  stages: {}", steps.join(", "));
        }
    }
    Ok(())
}

fn cmd_compile(base_config: Option<&Path>, inputs: &[PathBuf], output: &Path, verbose: bool) -> Result<(), String> {
    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    let start = Instant::now();
    let mut texts = Vec::with_capacity(inputs.len());
    for (list_id, path) in inputs.iter().enumerate() {
        let text = files::read_text(path)?;
        if verbose {
            let parsed = parse_pattern_list(&text);
            println!(
                "  [{}] {} - {} lines, {} entries, {} skipped",
                list_id,
                path.file_name().unwrap_or_default().to_string_lossy(),
                parsed.stats.lines,
                parsed.stats.entries,
                parsed.stats.skipped
            );
        }
        texts.push(text);
    }

    let (store, parse_stats, optimize_stats) = compile_lists(texts.iter().map(String::as_str));

    let mut config = files::load_config(base_config)?;
    config.patterns = store;
    files::write_config(output, &config)?;

    println!("Compiled {} pattern lists to '{}'", inputs.len(), output.display());
    println!("  Lines:    {}", parse_stats.lines);
    println!(
        "  Entries:  {} -> {} (dedupe removed {}, inert {})",
        optimize_stats.before, optimize_stats.after, optimize_stats.deduped, optimize_stats.inert
    );
    println!("  Skipped:  {} invalid lines", parse_stats.skipped);
    println!("  Time:     {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), String> {
    let config = files::load_config(Some(input))?;

    let mut patterns = config.patterns.clone();
    let stats = optimize_store(&mut patterns);

    println!("Config '{}' is valid", input.display());
    println!("  Same-origin allow:     {}", config.allow_same_origin);
    println!("  Fail closed:           {}", config.fail_closed);
    println!("  Extended redirectors:  {}", config.extended_redirectors);
    println!("  Blocked hosts:         {}", config.patterns.blocked_hosts.len());
    println!("  Blocked rules:         {}", config.patterns.blocked_rules.len());
    println!("  Allowed hosts:         {}", config.patterns.allowed_hosts.len());
    println!("  Allowed rules:         {}", config.patterns.allowed_rules.len());

    if stats.inert > 0 || stats.deduped > 0 {
        println!("  Warnings:              {} inert, {} duplicate patterns", stats.inert, stats.deduped);
    }

    Ok(())
}
