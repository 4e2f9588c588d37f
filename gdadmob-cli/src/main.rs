//! Godot AdMob plugin build tool
//!
//! Generates the plugin's GDScript and iOS config from templates, assembles
//! the plugin tree from compiled binaries and packages release archives.
//!
//! Usage:
//!   gdadmob generate
//!   gdadmob build --variant all
//!   gdadmob archive --platform multi
//!
//! Paths come from `gdadmob.toml` in the working directory, or the file
//! named by `--config`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gdadmob_assembler::{Pipeline, PipelineConfig, RunReport, TaskId, TaskOutcome};
use gdadmob_props::Platform;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "gdadmob")]
#[command(about = "Build and package the Godot AdMob plugin")]
struct Args {
    /// Pipeline config file (defaults to ./gdadmob.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate GDScript, mediation and iOS config files from templates
    Generate,
    /// Assemble the plugin tree
    Build {
        #[arg(long, value_enum, default_value_t = Variant::All)]
        variant: Variant,
    },
    /// Install the debug build into the demo project
    Install,
    /// Remove generated output, the plugin tree and the demo install
    Clean,
    /// Package release archives
    Archive {
        #[arg(long, value_enum, default_value_t = ArchivePlatform::All)]
        platform: ArchivePlatform,
    },
    /// Scan the plugin tree for unresolved tokens
    Validate {
        /// Fail instead of warning when tokens remain
        #[arg(long)]
        strict: bool,
    },
    /// Print the execution order of tasks without running them
    Plan {
        #[arg(required = true)]
        tasks: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    Debug,
    Release,
    Ios,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ArchivePlatform {
    Android,
    Ios,
    Multi,
    All,
}

impl Command {
    fn targets(&self) -> Result<Vec<TaskId>> {
        Ok(match self {
            Command::Generate => vec![
                TaskId::GenerateGdScript,
                TaskId::ReplaceMediationTokens,
                TaskId::GenerateIosConfig,
            ],
            Command::Build { variant } => match variant {
                Variant::Debug => vec![TaskId::BuildDebug],
                Variant::Release => vec![TaskId::BuildRelease],
                Variant::Ios => vec![TaskId::BuildIos],
                Variant::All => vec![TaskId::Build],
            },
            Command::Install => vec![TaskId::InstallToDemo],
            Command::Clean => vec![TaskId::Clean],
            Command::Archive { platform } => match platform {
                ArchivePlatform::Android => vec![TaskId::CreateAndroidArchive],
                ArchivePlatform::Ios => vec![TaskId::CreateIosArchive],
                ArchivePlatform::Multi => vec![TaskId::CreateMultiArchive],
                ArchivePlatform::All => vec![TaskId::Archive],
            },
            Command::Validate { .. } => vec![TaskId::ValidateOutput],
            Command::Plan { tasks } => tasks
                .iter()
                .map(|t| t.parse::<TaskId>().with_context(|| format!("Bad task name `{t}`")))
                .collect::<Result<_>>()?,
        })
    }

    /// Archives a command writes, for the closing summary.
    fn archives(&self) -> &'static [Platform] {
        match self {
            Command::Archive { platform } => match platform {
                ArchivePlatform::Android => &[Platform::Android],
                ArchivePlatform::Ios => &[Platform::Ios],
                ArchivePlatform::Multi | ArchivePlatform::All => &Platform::ALL,
            },
            _ => &[],
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            PipelineConfig::discover(&cwd).context("Failed to load pipeline config")?
        }
    };
    if let Command::Validate { strict: true } = args.command {
        config.strict_tokens = true;
    }

    let pipeline = Pipeline::load(config).context("Failed to load plugin properties")?;
    let targets = args.command.targets()?;

    if let Command::Plan { .. } = args.command {
        for (i, task) in pipeline.plan(&targets)?.iter().enumerate() {
            println!("{:>3}. {task}", i + 1);
        }
        return Ok(());
    }

    info!(
        plugin = %pipeline.plugin().name,
        version = %pipeline.plugin().version,
        "Running {} target(s)",
        targets.len()
    );
    let report = pipeline
        .run(&targets)
        .with_context(|| format!("{:?} failed", args.command))?;
    print_summary(&report);
    for platform in args.command.archives() {
        println!("{platform}: {}", pipeline.archive_path(*platform).display());
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    for (task, outcome) in &report.tasks {
        match outcome {
            TaskOutcome::Done(detail) => println!("  done     {task}: {detail}"),
            TaskOutcome::Skipped(reason) => println!("  skipped  {task}: {reason}"),
        }
    }
    println!(
        "{} task(s), {} skipped",
        report.tasks.len(),
        report.skipped()
    );
}
