use super::pdf::PdfBuilder;
use crate::{config, error::ConvertError};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::dictionary;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Places a raster image on a single page of exactly `width x height` points.
///
/// The image is flattened to RGB and re-encoded to a temporary JPEG that is
/// embedded as-is. The temporary file lives next to the output and is removed
/// when this function returns, whatever the outcome.
pub fn convert(cfg: &config::Image, input: &Path, output: &Path) -> Result<(), ConvertError> {
    let img = image::open(input).map_err(|source| ConvertError::Image {
        path: input.to_path_buf(),
        source,
    })?;
    let (width, height) = (img.width(), img.height());
    debug!("image {} {}x{} {:?}", input.display(), width, height, img.color());

    let rgb = match img {
        DynamicImage::ImageRgb8(buf) => buf,
        other => other.to_rgb8(),
    };

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = tempfile::Builder::new()
        .prefix(".pdf-everything-")
        .suffix(".jpg")
        .tempfile_in(dir)
        .map_err(ConvertError::io(dir))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let encoder = JpegEncoder::new_with_quality(&mut writer, cfg.jpeg_quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|source| ConvertError::Image {
                path: tmp.path().to_path_buf(),
                source,
            })?;
        writer.flush().map_err(ConvertError::io(tmp.path()))?;
    }
    let jpeg = std::fs::read(tmp.path()).map_err(ConvertError::io(tmp.path()))?;

    let mut pdf = PdfBuilder::new();
    let image_id = pdf.add_jpeg(width, height, jpeg);
    let (w, h) = (i64::from(width), i64::from(height));
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("cm", vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()]),
            Operation::new("Do", vec!["Im1".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let resources = dictionary! {
        "XObject" => dictionary! { "Im1" => image_id },
    };
    pdf.add_page([0.into(), 0.into(), w.into(), h.into()], resources, content)?;
    pdf.save(output)
}
