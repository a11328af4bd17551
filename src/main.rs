use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};

use wasmbench::config::{Overrides, Settings};
use wasmbench::discover;
use wasmbench::display;
use wasmbench::launcher::SystemLauncher;
use wasmbench::runner::{self, Runner};
use wasmbench::types::{Mode, OutputFormat};

#[derive(Parser)]
#[command(
    name = "wasmbench",
    version,
    about = "Time an external Wasm analysis tool across a directory of sample binaries"
)]
struct Cli {
    /// Sample set to benchmark: e (emcc), b (emcc-binaryen) or o (emcc-O3)
    mode: String,

    /// Directory holding one subdirectory per sample set
    #[arg(long)]
    root: Option<PathBuf>,

    /// Analysis tool to invoke for each sample
    #[arg(long)]
    tool: Option<String>,

    /// Launch the tool through this program (e.g. /usr/bin/python3)
    #[arg(long)]
    interpreter: Option<String>,

    /// Artifact file extension
    #[arg(long)]
    extension: Option<String>,

    /// Timed runs per sample (at least 1)
    #[arg(short = 'n', long)]
    repeat: Option<u32>,

    /// TOML config file (defaults to ./wasmbench.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: csv or json
    #[arg(long, default_value = "csv")]
    format: String,

    #[arg(long)]
    json: bool,

    /// Print the commands that would run, without running them
    #[arg(long)]
    dry_run: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Validated before anything touches the filesystem, and before the
    // value checks on other flags.
    let mode = Mode::from_code(&cli.mode)?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        <OutputFormat as ValueEnum>::from_str(&cli.format, true).map_err(|_| {
            anyhow::anyhow!("Unknown format '{}'. Supported: csv, json", cli.format)
        })?
    };

    let overrides = Overrides {
        root: cli.root,
        tool: cli.tool,
        interpreter: cli.interpreter,
        extension: cli.extension,
        repeat: cli.repeat,
    };
    let cwd = std::env::current_dir()?;
    let settings = Settings::resolve(cli.config.as_deref(), &cwd, &overrides)?;
    log::debug!("settings: {:?}", settings);
    log::info!("benchmarking {} samples with {}", mode, settings.tool);

    let testcase_dir = settings.root.join(mode.dir_name());
    let candidates = discover::discover_candidates(&testcase_dir, &settings.extension)?;
    let invocations =
        runner::plan(&candidates, &settings.tool, settings.interpreter.as_deref());

    if cli.dry_run {
        print!("{}", display::format_plan(&invocations));
        return Ok(());
    }

    let started_at = Utc::now();

    let bench = Runner::new(SystemLauncher, settings.repetitions);
    let outcome = bench.run(&invocations, |invocation| {
        if format == OutputFormat::Csv {
            println!("{}", display::format_case_line(invocation));
        }
    });

    match format {
        OutputFormat::Csv => print!("{}", display::format_table(&outcome.table)),
        OutputFormat::Json => {
            let meta = display::ReportMeta {
                mode,
                directory: &testcase_dir,
                repetitions: settings.repetitions,
                started_at,
            };
            println!(
                "{}",
                display::format_json(&meta, &outcome.table, outcome.failed_case())
            );
        }
    }

    if let Some(failure) = outcome.failure {
        return Err(failure.into());
    }

    if format == OutputFormat::Csv {
        print!("{}", display::format_banner());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
