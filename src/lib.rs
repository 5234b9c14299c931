//! Batch conversion of text, image and word processor files to PDF.
//!
//! [`pipeline::Pipeline`] walks a directory and hands each supported file to
//! [`dispatch::convert_to_pdf`], which picks a converter from [`engine`] by
//! extension. Per-file failures end up in the [`report::BatchReport`].

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod util;
