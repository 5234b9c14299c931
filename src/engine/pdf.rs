//! Minimal PDF assembly on top of `lopdf`.
//!
//! Only what the converters need: pages with an explicit MediaBox, the
//! standard Type1 fonts, and pre-encoded JPEG images. Output is written to a
//! temporary sibling and renamed into place, so a failed save never leaves a
//! truncated PDF at the destination.

use crate::error::ConvertError;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const PT_PER_MM: f32 = 72.0 / 25.4;

pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Registers one of the 14 standard fonts (`Helvetica`, `Courier`, ...).
    pub fn add_builtin_font(&mut self, base_font: &str) -> ObjectId {
        self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        })
    }

    /// `data` must already be a baseline JPEG in 8-bit RGB.
    pub fn add_jpeg(&mut self, width: u32, height: u32, data: Vec<u8>) -> ObjectId {
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            data,
        )
        .with_compression(false);
        self.doc.add_object(stream)
    }

    pub fn add_page(
        &mut self,
        media_box: [Object; 4],
        resources: Dictionary,
        content: Content,
    ) -> Result<ObjectId, ConvertError> {
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box.to_vec(),
            "Resources" => resources,
            "Contents" => content_id,
        });
        self.kids.push(page_id.into());
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    pub fn save(mut self, path: &Path) -> Result<(), ConvertError> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = tempfile::Builder::new()
            .prefix(".pdf-everything-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(ConvertError::io(dir))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            self.doc
                .save_to(&mut writer)
                .map_err(ConvertError::io(tmp.path()))?;
            writer.flush().map_err(ConvertError::io(tmp.path()))?;
        }
        tmp.persist(path)
            .map_err(|e| ConvertError::io(path)(e.error))?;
        Ok(())
    }
}

pub fn media_box_pt(width: f32, height: f32) -> [Object; 4] {
    [0.into(), 0.into(), width.into(), height.into()]
}
