use pdf_everything::{
    dispatch::{convert_to_pdf, output_path_for, plan_job},
    engine::{ConversionJob, Engine, FormatKind},
    error::ConvertError,
};
use std::cell::RefCell;
use std::path::Path;

#[derive(Default)]
struct RecordingEngine {
    calls: RefCell<Vec<(FormatKind, String)>>,
}

impl RecordingEngine {
    fn record(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        let name = job.output.file_name().unwrap().to_string_lossy().into_owned();
        self.calls.borrow_mut().push((job.kind, name));
        Ok(())
    }
}

impl Engine for RecordingEngine {
    fn convert_text(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        self.record(job)
    }
    fn convert_image(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        self.record(job)
    }
    fn convert_document(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        self.record(job)
    }
}

#[test]
fn classifies_extensions_case_insensitively() {
    for (ext, kind) in [
        ("txt", FormatKind::Text),
        ("MD", FormatKind::Text),
        ("Csv", FormatKind::Text),
        ("jpg", FormatKind::Image),
        ("JPEG", FormatKind::Image),
        ("png", FormatKind::Image),
        ("bmp", FormatKind::Image),
        ("GIF", FormatKind::Image),
        ("docx", FormatKind::Document),
        ("DOC", FormatKind::Document),
    ] {
        assert_eq!(FormatKind::from_extension(ext), Some(kind), "{ext}");
    }
    for ext in ["zip", "pdf", "odt", "", "txt.bak"] {
        assert_eq!(FormatKind::from_extension(ext), None, "{ext}");
    }
    assert_eq!(FormatKind::from_path(Path::new("Makefile")), None);
}

#[test]
fn output_keeps_base_name() {
    let out = Path::new("/work/pdf_output");
    assert_eq!(
        output_path_for(Path::new("/work/notes.final.TXT"), out),
        out.join("notes.final.pdf")
    );
    let job = plan_job(Path::new("/work/photo.PNG"), out).unwrap();
    assert_eq!(job.kind, FormatKind::Image);
    assert_eq!(job.output, out.join("photo.pdf"));
}

#[test]
fn routes_to_matching_converter() {
    let engine = RecordingEngine::default();
    let out = Path::new("/work/pdf_output");
    for name in ["a.md", "b.gif", "c.docx"] {
        let path = convert_to_pdf(&engine, &Path::new("/work").join(name), out).unwrap();
        assert_eq!(path.extension().unwrap(), "pdf");
    }
    assert_eq!(
        *engine.calls.borrow(),
        vec![
            (FormatKind::Text, "a.pdf".to_string()),
            (FormatKind::Image, "b.pdf".to_string()),
            (FormatKind::Document, "c.pdf".to_string()),
        ]
    );
}

#[test]
fn unsupported_is_rejected_without_calling_engine() {
    let engine = RecordingEngine::default();
    let err = convert_to_pdf(&engine, Path::new("/work/archive.ZIP"), Path::new("/out")).unwrap_err();
    match err {
        ConvertError::Unsupported { extension } => assert_eq!(extension, ".zip"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(engine.calls.borrow().is_empty());
}
