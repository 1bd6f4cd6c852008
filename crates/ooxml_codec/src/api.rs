//! Public entry points
//!
//! File-path and in-memory variants of the two conversion directions. All
//! of them return a [`Conversion`] so callers see fidelity diagnostics
//! alongside the result.

use crate::error::{CodecResult, Conversion};
use crate::package::{read_docx, write_docx};
use doc_model::DocNode;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;

/// Import a DOCX file into the internal document tree
pub fn import_docx<P: AsRef<Path>>(path: P) -> CodecResult<Conversion<DocNode>> {
    let file = File::open(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "importing docx");
    read_docx(BufReader::new(file))
}

/// Import a DOCX from a byte buffer
pub fn import_docx_bytes(bytes: &[u8]) -> CodecResult<Conversion<DocNode>> {
    read_docx(Cursor::new(bytes))
}

/// Export the internal document tree to a DOCX file
pub fn export_docx<P: AsRef<Path>>(doc: &DocNode, path: P) -> CodecResult<Conversion<()>> {
    let file = File::create(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "exporting docx");
    write_docx(BufWriter::new(file), doc)
}

/// Export the internal document tree to an in-memory DOCX
pub fn export_docx_bytes(doc: &DocNode) -> CodecResult<Conversion<Vec<u8>>> {
    let mut buffer = Cursor::new(Vec::new());
    let conversion = write_docx(&mut buffer, doc)?;
    Ok(conversion.map(|_| buffer.into_inner()))
}
