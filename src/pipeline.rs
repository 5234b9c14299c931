use crate::{
    config::Config,
    dispatch,
    engine::{Engine, FormatKind},
    report::{BatchReport, ConversionResult},
    util::{ensure_dir, now_rfc3339, same_file},
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub struct Pipeline<E: Engine> {
    cfg: Config,
    engine: E,
    self_exe: Option<PathBuf>,
}

impl<E: Engine> Pipeline<E> {
    pub fn new(cfg: &Config, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            engine,
            self_exe: std::env::current_exe().ok(),
        }
    }

    pub fn output_dir(&self, work_dir: &Path) -> PathBuf {
        work_dir.join(&self.cfg.paths.output_dir)
    }

    /// Converts every supported file directly inside `work_dir`.
    ///
    /// Per-file failures are recorded in the report; only problems that stop
    /// the batch as a whole (output directory, directory listing) are errors.
    pub fn run_batch(&self, work_dir: &Path) -> Result<BatchReport> {
        let started = now_rfc3339();
        let out_dir = self.output_dir(work_dir);
        if !out_dir.exists() {
            ensure_dir(&out_dir)?;
            info!("Created output directory: {}", out_dir.display());
        }

        let entries = std::fs::read_dir(work_dir)
            .with_context(|| format!("listing {}", work_dir.display()))?;

        let mut results = Vec::new();
        for path in readable_paths(entries.map(|e| e.map(|e| e.path())), work_dir) {
            if path.is_dir() || self.is_self(&path) {
                continue;
            }
            if FormatKind::from_path(&path).is_none() {
                debug!("skipping {}", path.display());
                continue;
            }

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let result = match dispatch::convert_to_pdf(&self.engine, &path, &out_dir) {
                Ok(output) if output.exists() => {
                    info!("✓ Successfully converted: {file_name}");
                    ConversionResult::converted(file_name, output)
                }
                Ok(output) => {
                    error!(
                        "✗ Failed to convert: {file_name}: {} does not exist",
                        output.display()
                    );
                    ConversionResult::failed(file_name, format!("missing {}", output.display()))
                }
                Err(err) => {
                    error!("✗ Failed to convert: {file_name}: {err}");
                    ConversionResult::failed(file_name, err.to_string())
                }
            };
            results.push(result);
        }

        Ok(BatchReport::new(out_dir, started, now_rfc3339(), results))
    }

    fn is_self(&self, path: &Path) -> bool {
        self.self_exe
            .as_deref()
            .map(|exe| same_file(exe, path))
            .unwrap_or(false)
    }
}

/// Entries that cannot be read are logged and left out.
fn readable_paths(
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
    work_dir: &Path,
) -> Vec<PathBuf> {
    entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("skipping unreadable entry in {}: {err}", work_dir.display());
                None
            }
        })
        .collect()
}
