use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub file_name: String,
    pub succeeded: bool,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn converted(file_name: impl Into<String>, output: PathBuf) -> Self {
        Self {
            file_name: file_name.into(),
            succeeded: true,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            succeeded: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started: String,
    pub finished: String,
    pub output_dir: PathBuf,
    pub total_processed: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
    pub converted: Vec<ConversionResult>,
    pub failed: Vec<ConversionResult>,
}

impl BatchReport {
    /// Splits results into converted and failed, keeping processing order.
    pub fn new(
        output_dir: PathBuf,
        started: String,
        finished: String,
        results: Vec<ConversionResult>,
    ) -> Self {
        let (converted, failed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|r| r.succeeded);
        Self {
            started,
            finished,
            output_dir,
            total_processed: converted.len() + failed.len(),
            succeeded_count: converted.len(),
            failed_count: failed.len(),
            converted,
            failed,
        }
    }

    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "=== Conversion Summary ===");
        let _ = writeln!(s, "Total files processed: {}", self.total_processed);
        let _ = writeln!(s, "Successfully converted: {}", self.succeeded_count);
        let _ = writeln!(s, "Failed conversions: {}", self.failed_count);
        if self.succeeded_count > 0 {
            let dir = self
                .output_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.output_dir.display().to_string());
            let _ = writeln!(s);
            let _ = writeln!(s, "Converted files can be found in the '{dir}' directory");
        }
        s
    }
}
