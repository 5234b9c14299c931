use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub program: String,
    pub path: Option<PathBuf>,
    pub available: bool,
}

/// Looks for the document converter on `PATH`.
///
/// Never fails: a missing tool is only a warning, since text and image
/// conversion do not need it.
pub fn probe_document_converter(cfg: &Config) -> ProbeResult {
    let program = cfg.document.binary.clone();
    match which::which(&program) {
        Ok(path) => {
            info!("{program} is installed at {}", path.display());
            ProbeResult {
                program,
                path: Some(path),
                available: true,
            }
        }
        Err(err) => {
            warn!("WARNING: {program} is not installed ({err}). DOC/DOCX conversion will not work.");
            warn!("Install with: {}", cfg.document.install_hint);
            ProbeResult {
                program,
                path: None,
                available: false,
            }
        }
    }
}
