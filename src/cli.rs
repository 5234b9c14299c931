use crate::{
    config::Config,
    engine::LocalEngine,
    pipeline::Pipeline,
    probe::probe_document_converter,
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_CONFIG: &str = "pdf-everything.toml";

#[derive(Parser, Debug)]
#[command(name = "pdf-everything")]
#[command(about = "Convert the text, image and word processor files in the current directory to PDF")]
pub struct Args {
    /// Defaults to `run`.
    #[command(subcommand)]
    pub cmd: Option<Command>,

    /// Path to config TOML. If omitted, uses ./pdf-everything.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Command {
    /// Convert every supported file in the current directory.
    Run {},
    /// Check whether the document converter is installed.
    Doctor {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let work_dir = std::env::current_dir().with_context(|| "current_dir")?;

    let log_path = resolve_log_path(&cfg, &work_dir);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    match args.cmd.unwrap_or(Command::Run {}) {
        Command::Run {} => run(&cfg, &work_dir),
        Command::Doctor {} => doctor(&cfg),
    }
}

fn load_config(user: Option<&Path>) -> Result<Config> {
    if let Some(p) = user {
        return Config::load(p);
    }
    let default = PathBuf::from(DEFAULT_CONFIG);
    if default.exists() {
        Config::load(&default)
    } else {
        Ok(Config::default())
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config, work_dir: &Path) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(
        work_dir
            .join(&cfg.paths.output_dir)
            .join("pdf-everything.log"),
    )
}

fn doctor(cfg: &Config) -> Result<()> {
    let probe = probe_document_converter(cfg);
    println!("{}", serde_json::to_string_pretty(&probe)?);
    Ok(())
}

fn run(cfg: &Config, work_dir: &Path) -> Result<()> {
    probe_document_converter(cfg);

    let pipeline = Pipeline::new(cfg, LocalEngine::new(cfg));
    let report = pipeline.run_batch(work_dir)?;
    info!(
        "batch done processed={} succeeded={} failed={}",
        report.total_processed, report.succeeded_count, report.failed_count
    );

    if cfg.output.write_report_json {
        let path = report.output_dir.join(&cfg.output.report_filename);
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report: {}", path.display()))?;
    }

    if cfg.output.print_summary {
        println!();
        print!("{}", report.summary());
    }

    Ok(())
}
