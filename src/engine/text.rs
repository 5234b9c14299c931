use super::pdf::{media_box_pt, PdfBuilder, PT_PER_MM};
use crate::{config, error::ConvertError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object};
use std::path::Path;
use tracing::debug;

/// Renders a text file as one cell per line on auto-paginated pages.
///
/// Decoding is lossy and non-ASCII characters are dropped, so any input
/// produces a PDF; only I/O and PDF write failures are errors.
pub fn convert(cfg: &config::Text, input: &Path, output: &Path) -> Result<(), ConvertError> {
    let bytes = std::fs::read(input).map_err(ConvertError::io(input))?;
    let decoded = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = split_lines(&decoded).into_iter().map(ascii_line).collect();
    debug!("text {} lines={}", input.display(), lines.len());

    let mut pdf = PdfBuilder::new();
    let font_id = pdf.add_builtin_font(&cfg.font);
    let layout = Layout::from_config(cfg);

    for page in layout.paginate(&lines) {
        let mut ops = Vec::with_capacity(page.len() * 5);
        for (slot, line) in page.iter().enumerate() {
            let (x, y) = layout.baseline(slot);
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec!["F1".into(), cfg.font_size_pt.into()]));
            ops.push(Operation::new("Td", vec![x.into(), y.into()]));
            ops.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
            ops.push(Operation::new("ET", vec![]));
        }
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        pdf.add_page(
            media_box_pt(layout.page_width, layout.page_height),
            resources,
            Content { operations: ops },
        )?;
    }

    debug!("text {} pages={}", input.display(), pdf.page_count());
    pdf.save(output)
}

/// Splits on `\r\n`, `\n` and a lone `\r`. A trailing terminator does not
/// start an extra line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(&['\r', '\n'][..]) {
            Some(i) => {
                lines.push(&rest[..i]);
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

/// Keeps 7-bit ASCII only and trims surrounding whitespace.
pub fn ascii_line(line: &str) -> String {
    let kept: String = line.chars().filter(|c| c.is_ascii()).collect();
    kept.trim().to_string()
}

/// Cell geometry in points, PDF coordinates (origin bottom-left).
struct Layout {
    page_width: f32,
    page_height: f32,
    left: f32,
    top: f32,
    line_height: f32,
    font_size: f32,
    lines_per_page: usize,
}

impl Layout {
    fn from_config(cfg: &config::Text) -> Self {
        let page_height = cfg.page_height_mm * PT_PER_MM;
        let top = cfg.margin_mm * PT_PER_MM;
        let line_height = cfg.line_height_mm.max(0.1) * PT_PER_MM;
        let limit = page_height - cfg.bottom_margin_mm * PT_PER_MM;

        // A cell fits while its bottom edge stays above the bottom margin.
        let mut lines_per_page = 0usize;
        while top + (lines_per_page as f32 + 1.0) * line_height <= limit {
            lines_per_page += 1;
        }

        Self {
            page_width: cfg.page_width_mm * PT_PER_MM,
            page_height,
            left: (cfg.margin_mm + cfg.cell_padding_mm) * PT_PER_MM,
            top,
            line_height,
            font_size: cfg.font_size_pt,
            lines_per_page: lines_per_page.max(1),
        }
    }

    /// Always yields at least one (possibly empty) page.
    fn paginate<'a>(&self, lines: &'a [String]) -> Vec<&'a [String]> {
        if lines.is_empty() {
            return vec![lines];
        }
        lines.chunks(self.lines_per_page).collect()
    }

    /// Text vertically centred in the cell.
    fn baseline(&self, slot: usize) -> (f32, f32) {
        let cell_top = self.top + slot as f32 * self.line_height;
        let y = self.page_height - cell_top - 0.5 * self.line_height - 0.3 * self.font_size;
        (self.left, y)
    }
}
