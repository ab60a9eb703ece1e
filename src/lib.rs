pub mod docx;
pub mod error;
pub mod model;
pub mod numbering;
pub mod package;
pub mod writer;

pub use docx::{ElementKind, ParserOptions, StyleManager, XmlParser};
pub use error::{Error, Result};
pub use model::{Body, Document, Model, Paragraph, Run, Table, TextContainer};
pub use numbering::{NumberingDefinitions, NumberingFormatter};
pub use package::{MemoryPackage, PackageReader, ZipPackage};

use std::path::Path;
use std::time::Instant;

/// Parse a `.docx` file with default options.
pub fn parse(input: &Path) -> Result<Document> {
    parse_with_options(input, ParserOptions::default())
}

pub fn parse_with_options(input: &Path, options: ParserOptions) -> Result<Document> {
    let t0 = Instant::now();
    let package = ZipPackage::open(input)?;
    let t_open = t0.elapsed();

    let doc = XmlParser::with_options(&package, options).parse_document()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: open={:.1}ms, parse={:.1}ms, total={:.1}ms ({} blocks)",
        t_open.as_secs_f64() * 1000.0,
        (t_total - t_open).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.body.len(),
    );
    Ok(doc)
}

/// Parse a `.docx` held in memory.
pub fn parse_bytes(input: &[u8]) -> Result<Document> {
    parse_bytes_with_options(input, ParserOptions::default())
}

pub fn parse_bytes_with_options(input: &[u8], options: ParserOptions) -> Result<Document> {
    let t0 = Instant::now();
    let package = ZipPackage::from_bytes(input)?;
    let doc = XmlParser::with_options(&package, options).parse_document()?;
    log::info!(
        "Timing: parse={:.1}ms ({} bytes in, {} blocks)",
        t0.elapsed().as_secs_f64() * 1000.0,
        input.len(),
        doc.body.len(),
    );
    Ok(doc)
}
