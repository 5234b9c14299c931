use crate::{
    engine::{ConversionJob, Engine, FormatKind},
    error::ConvertError,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// `<out_dir>/<input stem>.pdf`
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{stem}.pdf"))
}

pub fn plan_job(input: &Path, out_dir: &Path) -> Result<ConversionJob, ConvertError> {
    let kind = FormatKind::from_path(input).ok_or_else(|| ConvertError::Unsupported {
        extension: extension_of(input),
    })?;
    Ok(ConversionJob {
        input: input.to_path_buf(),
        output: output_path_for(input, out_dir),
        kind,
    })
}

/// Converts one file and returns where the PDF was written.
pub fn convert_to_pdf(
    engine: &dyn Engine,
    input: &Path,
    out_dir: &Path,
) -> Result<PathBuf, ConvertError> {
    let file_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = output_path_for(input, out_dir);
    info!("Converting {file_name} to {}...", output.display());

    let job = match plan_job(input, out_dir) {
        Ok(job) => job,
        Err(err) => {
            warn!("{err}");
            return Err(err);
        }
    };

    match job.kind {
        FormatKind::Text => engine.convert_text(&job)?,
        FormatKind::Image => engine.convert_image(&job)?,
        FormatKind::Document => engine.convert_document(&job)?,
    }
    Ok(job.output)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}
