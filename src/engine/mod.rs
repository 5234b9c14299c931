pub mod document;
pub mod pdf;
pub mod raster;
pub mod text;
pub mod types;

use crate::{config::Config, error::ConvertError};

pub use types::{ConversionJob, FormatKind};

/// One method per format. Each call either leaves a complete PDF at
/// `job.output` or returns an error.
pub trait Engine {
    fn convert_text(&self, job: &ConversionJob) -> Result<(), ConvertError>;
    fn convert_image(&self, job: &ConversionJob) -> Result<(), ConvertError>;
    fn convert_document(&self, job: &ConversionJob) -> Result<(), ConvertError>;
}

/// Text and images are rendered in-process; documents go through the
/// configured external converter.
pub struct LocalEngine {
    cfg: Config,
}

impl LocalEngine {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl Engine for LocalEngine {
    fn convert_text(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        text::convert(&self.cfg.text, &job.input, &job.output)
    }

    fn convert_image(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        raster::convert(&self.cfg.image, &job.input, &job.output)
    }

    fn convert_document(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        document::convert(&self.cfg.document, &job.input, &job.output)
    }
}
