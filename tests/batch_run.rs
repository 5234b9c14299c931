mod common;

use image::{Rgb, RgbImage};
use pdf_everything::{config::Config, engine::LocalEngine, pipeline::Pipeline};
use serial_test::serial;
use std::path::Path;

/// report.docx, photo.png (800x600), notes.txt (with an emoji line),
/// archive.zip and a subdirectory.
fn populate(dir: &Path) {
    std::fs::write(dir.join("report.docx"), b"PK fake docx").unwrap();
    RgbImage::from_pixel(800, 600, Rgb([12, 34, 56]))
        .save(dir.join("photo.png"))
        .unwrap();
    std::fs::write(dir.join("notes.txt"), "first line\n\u{1F680}\nlast line\n").unwrap();
    std::fs::write(dir.join("archive.zip"), b"PK\x03\x04").unwrap();
    std::fs::create_dir(dir.join("nested.txt")).unwrap();
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
#[serial]
fn mixed_directory_without_document_tool() {
    let work = tempfile::tempdir().unwrap();
    populate(work.path());

    let mut cfg = Config::default();
    cfg.document.binary = "pdf-everything-no-such-tool".into();
    let pipeline = Pipeline::new(&cfg, LocalEngine::new(&cfg));
    let report = pipeline.run_batch(work.path()).unwrap();

    assert_eq!(report.total_processed, 3);
    assert_eq!(report.succeeded_count, 2);
    assert_eq!(report.failed_count, 1);
    assert_eq!(report.failed[0].file_name, "report.docx");
    assert!(report.failed[0].error.is_some());

    let out = work.path().join("pdf_output");
    assert_eq!(report.output_dir, out);
    assert_eq!(output_names(&out), vec!["notes.pdf", "photo.pdf"]);
    assert_eq!(common::page_sizes(&out.join("photo.pdf")), vec![(800.0, 600.0)]);
    assert_eq!(
        common::pdf_text_lines(&out.join("notes.pdf")),
        vec!["first line", "", "last line"]
    );

    let summary = report.summary();
    assert!(summary.contains("Total files processed: 3"));
    assert!(summary.contains("Successfully converted: 2"));
    assert!(summary.contains("Failed conversions: 1"));
}

#[test]
#[serial]
fn empty_directory_creates_output_dir_only() {
    let work = tempfile::tempdir().unwrap();
    let cfg = Config::default();
    let pipeline = Pipeline::new(&cfg, LocalEngine::new(&cfg));

    let report = pipeline.run_batch(work.path()).unwrap();

    assert_eq!(report.total_processed, 0);
    assert!(work.path().join("pdf_output").is_dir());
    assert!(!report.summary().contains("can be found"));
}

#[test]
#[serial]
fn rerun_reuses_output_dir() {
    let work = tempfile::tempdir().unwrap();
    std::fs::write(work.path().join("a.md"), "# title\n").unwrap();
    let cfg = Config::default();
    let pipeline = Pipeline::new(&cfg, LocalEngine::new(&cfg));

    pipeline.run_batch(work.path()).unwrap();
    let report = pipeline.run_batch(work.path()).unwrap();

    assert_eq!(report.succeeded_count, 1);
    assert_eq!(output_names(&work.path().join("pdf_output")), vec!["a.pdf"]);
}

#[cfg(unix)]
#[test]
#[serial]
fn mixed_directory_with_document_tool() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempfile::tempdir().unwrap();
    populate(work.path());

    let tools = tempfile::tempdir().unwrap();
    let tool = tools.path().join("fake-abiword");
    std::fs::write(
        &tool,
        "#!/bin/sh\nname=$(basename \"$2\")\nprintf '%%PDF-1.4 fake' > \"${name%.*}.pdf\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut cfg = Config::default();
    cfg.document.binary = tool.to_string_lossy().into_owned();
    let pipeline = Pipeline::new(&cfg, LocalEngine::new(&cfg));
    let report = pipeline.run_batch(work.path()).unwrap();

    assert_eq!(report.total_processed, 3);
    assert_eq!(report.succeeded_count, 3);
    assert_eq!(
        output_names(&work.path().join("pdf_output")),
        vec!["notes.pdf", "photo.pdf", "report.pdf"]
    );
    assert!(report.summary().contains("'pdf_output' directory"));
}

#[cfg(unix)]
#[test]
#[serial]
fn failed_document_keeps_text_pdf_with_same_name() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempfile::tempdir().unwrap();
    std::fs::write(work.path().join("report.txt"), "from text\n").unwrap();
    std::fs::write(work.path().join("report.docx"), b"PK fake docx").unwrap();

    let tools = tempfile::tempdir().unwrap();
    let tool = tools.path().join("broken-abiword");
    std::fs::write(&tool, "#!/bin/sh\necho boom >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut cfg = Config::default();
    cfg.document.binary = tool.to_string_lossy().into_owned();
    let pipeline = Pipeline::new(&cfg, LocalEngine::new(&cfg));
    let report = pipeline.run_batch(work.path()).unwrap();

    assert_eq!(report.succeeded_count, 1);
    assert_eq!(report.failed[0].file_name, "report.docx");
    let out = work.path().join("pdf_output");
    assert_eq!(output_names(&out), vec!["report.pdf"]);
    assert_eq!(common::pdf_text_lines(&out.join("report.pdf")), vec!["from text"]);
}
