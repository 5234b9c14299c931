use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub text: Text,
    #[serde(default)]
    pub image: Image,
    #[serde(default)]
    pub document: Document,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Created under the working directory.
    pub output_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            output_dir: "pdf_output".into(),
        }
    }
}

/// Page layout for text files. Lengths are millimetres, font size is points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub bottom_margin_mm: f32,
    pub line_height_mm: f32,
    pub cell_padding_mm: f32,
    pub font: String,
    pub font_size_pt: f32,
}
impl Default for Text {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            bottom_margin_mm: 20.0,
            line_height_mm: 10.0,
            cell_padding_mm: 1.0,
            font: "Helvetica".into(),
            font_size_pt: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub jpeg_quality: u8,
}
impl Default for Image {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub binary: String,
    pub format_arg: String,
    pub install_hint: String,
    /// 0 waits forever.
    pub timeout_seconds: u64,
}
impl Default for Document {
    fn default() -> Self {
        Self {
            binary: "abiword".into(),
            format_arg: "--to=pdf".into(),
            install_hint: "sudo apt-get install abiword".into(),
            timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub print_summary: bool,
    pub write_report_json: bool,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            print_summary: true,
            write_report_json: false,
            report_filename: "conversion-report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
