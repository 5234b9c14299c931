use std::path::PathBuf;
use thiserror::Error;

/// Why a single file could not be converted.
///
/// These never abort a batch: the driver logs them and records the file as
/// failed. Setup problems (config, output directory) go through `anyhow` instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported file format: {extension}")]
    Unsupported { extension: String },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read image '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("writing PDF failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("running '{program}' failed: {source}")]
    Process {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}\nSTDERR: {stderr}")]
    ExternalProcess {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("'{program}' exceeded timeout of {secs}s; stderr: {stderr}")]
    Timeout {
        program: String,
        secs: u64,
        stderr: String,
    },

    #[error("expected output was not produced: '{}'", .path.display())]
    MissingOutput { path: PathBuf },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConvertError::Io { path, source }
    }
}
