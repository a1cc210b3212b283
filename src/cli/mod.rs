//! ES-013: CLI subcommands: init, validate, translate, show, sample.

use crate::batch::{self, sample, BatchConfig};
use crate::config::{self, EpiseqConfig, FailurePolicy};
use crate::core::assembler;
use crate::logging;
use clap::{Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a template episeq.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate episeq.yaml
    Validate {
        /// Path to episeq.yaml
        #[arg(short, long, default_value = config::CONFIG_FILE)]
        file: PathBuf,
    },

    /// Translate every episode log in a directory into one JSON array
    Translate {
        /// Path to episeq.yaml (default: ./episeq.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of *.game.json files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record malformed files and keep going
        #[arg(long)]
        continue_on_error: bool,

        /// Keep completion order instead of sorting by file
        #[arg(long)]
        no_sort: bool,

        /// Concurrent workers (0 = available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Translate one episode log and print its instructions
    Show {
        /// Path to a *.game.json file
        file: PathBuf,

        /// Also print drop counters
        #[arg(long)]
        stats: bool,
    },

    /// Write a random or shortest subset of a translated batch
    Sample {
        /// Batch file written by `translate`
        #[arg(short, long, default_value = "seq_all.json")]
        input: PathBuf,

        /// Output JSON path
        #[arg(short, long)]
        output: PathBuf,

        /// Selection strategy
        #[arg(long, value_enum, default_value_t = Strategy::Random)]
        strategy: Strategy,

        /// Number of records (default: 50 random, 100 shortest)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Seed for reproducible random picks
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Subset selection strategy.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Random,
    Shortest,
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands, verbose: bool) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => {
            init_logging(None, verbose);
            cmd_init(&path)
        }
        Commands::Validate { file } => {
            init_logging(None, verbose);
            cmd_validate(&file)
        }
        Commands::Translate {
            config,
            input,
            output,
            continue_on_error,
            no_sort,
            jobs,
        } => {
            let cfg = load_config(config.as_deref())?;
            init_logging(Some(&cfg), verbose);
            let overrides = TranslateOverrides {
                input,
                output,
                continue_on_error,
                no_sort,
                jobs,
            };
            cmd_translate(cfg, overrides)
        }
        Commands::Show { file, stats } => {
            init_logging(None, verbose);
            cmd_show(&file, stats)
        }
        Commands::Sample {
            input,
            output,
            strategy,
            count,
            seed,
        } => {
            init_logging(None, verbose);
            cmd_sample(&input, &output, strategy, count, seed)
        }
    }
}

fn init_logging(cfg: Option<&EpiseqConfig>, verbose: bool) {
    let level = match (verbose, cfg) {
        (true, _) => "debug",
        (false, Some(c)) => c.logging.level.as_str(),
        (false, None) => "info",
    };
    logging::init(level);
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let config_path = path.join(config::CONFIG_FILE);
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()));
    }
    std::fs::create_dir_all(path)
        .map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&config_path, config::template())
        .map_err(|e| format!("cannot write {}: {}", config_path.display(), e))?;

    println!("Initialized episeq project at {}", path.display());
    println!("  Created: {}", config_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let cfg = parse_and_validate(file)?;
    println!(
        "OK: {} → {} (failure: {}, sort: {})",
        cfg.input_dir.join(&cfg.pattern).display(),
        cfg.output.display(),
        cfg.policy.failure,
        cfg.policy.sort_by_file
    );
    Ok(())
}

/// Parse and validate a config file, returning errors if invalid.
fn parse_and_validate(file: &Path) -> Result<EpiseqConfig, String> {
    let cfg = config::parse_config_file(file)?;
    let errors = config::validate_config(&cfg);
    if errors.is_empty() {
        return Ok(cfg);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err(format!("{} validation error(s)", errors.len()))
}

/// Explicit path must exist; otherwise fall back to ./episeq.yaml, then defaults.
fn load_config(explicit: Option<&Path>) -> Result<EpiseqConfig, String> {
    match explicit {
        Some(path) => parse_and_validate(path),
        None => {
            let default_path = Path::new(config::CONFIG_FILE);
            if default_path.exists() {
                parse_and_validate(default_path)
            } else {
                Ok(EpiseqConfig::default())
            }
        }
    }
}

/// Command-line values that win over the config file.
#[derive(Debug, Default)]
struct TranslateOverrides {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    continue_on_error: bool,
    no_sort: bool,
    jobs: Option<usize>,
}

fn batch_settings(cfg: &EpiseqConfig, overrides: &TranslateOverrides) -> BatchConfig {
    BatchConfig {
        input_dir: overrides
            .input
            .clone()
            .unwrap_or_else(|| cfg.input_dir.clone()),
        pattern: cfg.pattern.clone(),
        failure: if overrides.continue_on_error {
            FailurePolicy::ContinueIndependent
        } else {
            cfg.policy.failure
        },
        sort_by_file: cfg.policy.sort_by_file && !overrides.no_sort,
        jobs: overrides.jobs.unwrap_or(cfg.policy.jobs),
    }
}

fn cmd_translate(cfg: EpiseqConfig, overrides: TranslateOverrides) -> Result<(), String> {
    let settings = batch_settings(&cfg, &overrides);
    let output = overrides.output.unwrap_or(cfg.output);

    let report = batch::run(&settings)?;
    batch::write_records(&output, &report.records())?;

    for f in &report.failures {
        eprintln!("  SKIPPED: {}", f.error);
    }
    println!(
        "Wrote {} results to {} ({} actions, {} skipped)",
        report.translations.len(),
        output.display(),
        report.total_actions(),
        report.failures.len()
    );
    Ok(())
}

fn cmd_show(file: &Path, show_stats: bool) -> Result<(), String> {
    let translation = assembler::translate_file(file).map_err(|e| e.to_string())?;
    for line in &translation.record.actions {
        println!("{}", line);
    }
    if show_stats {
        let json = serde_json::to_string_pretty(&translation.stats)
            .map_err(|e| format!("JSON serialize error: {}", e))?;
        println!();
        println!("{}", json);
    }
    Ok(())
}

fn cmd_sample(
    input: &Path,
    output: &Path,
    strategy: Strategy,
    count: Option<usize>,
    seed: Option<u64>,
) -> Result<(), String> {
    let records = sample::load_records(input)?;
    let picked = match strategy {
        Strategy::Random => {
            sample::sample_random(&records, count.unwrap_or(sample::DEFAULT_RANDOM_COUNT), seed)
        }
        Strategy::Shortest => {
            sample::sample_shortest(&records, count.unwrap_or(sample::DEFAULT_SHORTEST_COUNT))
        }
    };
    batch::write_records(output, &picked)?;
    println!(
        "Filtered {} of {} sequences into {}",
        picked.len(),
        records.len(),
        output.display()
    );
    Ok(())
}
