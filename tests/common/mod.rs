#![allow(dead_code)]

use lopdf::content::Content;
use lopdf::{Document, Object};
use std::path::Path;

/// Every `Tj` string in page order.
pub fn pdf_text_lines(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("load pdf");
    let mut lines = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let raw = doc.get_page_content(page_id).expect("page content");
        let content = Content::decode(&raw).expect("decode content");
        for op in content.operations {
            if op.operator == "Tj" {
                let bytes = op.operands[0].as_str().expect("string operand");
                lines.push(String::from_utf8_lossy(bytes).into_owned());
            }
        }
    }
    lines
}

pub fn page_count(path: &Path) -> usize {
    Document::load(path).expect("load pdf").get_pages().len()
}

/// MediaBox of every page as `(width, height)`.
pub fn page_sizes(path: &Path) -> Vec<(f64, f64)> {
    let doc = Document::load(path).expect("load pdf");
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).expect("page dict");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("media box");
            (number(&media_box[2]), number(&media_box[3]))
        })
        .collect()
}

fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => f64::from(*r),
        other => panic!("not a number: {other:?}"),
    }
}
