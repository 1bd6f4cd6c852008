//! DOCX container reading and writing
//!
//! A DOCX file is a ZIP archive of XML parts. This layer owns the archive
//! and part plumbing so the conversion core only ever sees parsed element
//! trees:
//! - `[Content_Types].xml` - content type definitions
//! - `_rels/.rels` - root relationships
//! - `word/document.xml` - main document content
//! - `word/styles.xml` - style definitions
//! - `word/numbering.xml` - list/numbering definitions
//! - `word/_rels/document.xml.rels` - document relationships

use crate::assembler::{decode_document, encode_document, DocxParts, ParsedParts};
use crate::error::{CodecError, CodecResult, Conversion};
use crate::relationships::Relationships;
use crate::xml::parse_document;
use doc_model::DocNode;
use std::io::{Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const ROOT_RELS_PART: &str = "_rels/.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// A wrapper around a ZIP archive for reading DOCX parts
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Open an archive from any seekable source
    pub fn new(reader: R) -> CodecResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a part as a string; missing parts become `MissingPart`
    pub fn read_part(&mut self, path: &str) -> CodecResult<String> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                CodecError::MissingPart(path.to_string())
            } else {
                CodecError::from(e)
            }
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Read a part as a string, or `None` when the part is absent
    pub fn read_optional_part(&mut self, path: &str) -> CodecResult<Option<String>> {
        match self.read_part(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(CodecError::MissingPart(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check if a part exists in the archive
    pub fn part_exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// A valid DOCX must carry content types and a document part
    pub fn is_valid_docx(&self) -> bool {
        self.part_exists(CONTENT_TYPES_PART) && self.part_exists(DOCUMENT_PART)
    }
}

/// Read a DOCX container and convert it to the internal document tree
pub fn read_docx<R: Read + Seek>(reader: R) -> CodecResult<Conversion<DocNode>> {
    let mut docx = DocxReader::new(reader)?;
    if !docx.is_valid_docx() {
        return Err(CodecError::InvalidStructure(
            "archive is missing [Content_Types].xml or word/document.xml".into(),
        ));
    }

    let document = parse_document(&docx.read_part(DOCUMENT_PART)?)?;
    let numbering = docx
        .read_optional_part(NUMBERING_PART)?
        .map(|s| parse_document(&s))
        .transpose()?;
    let styles = docx
        .read_optional_part(STYLES_PART)?
        .map(|s| parse_document(&s))
        .transpose()?;
    let relationships = match docx.read_optional_part(DOCUMENT_RELS_PART)? {
        Some(s) => Relationships::parse(&s)?,
        None => Relationships::new(),
    };

    encode_document(&ParsedParts {
        document,
        numbering,
        styles,
        relationships,
    })
}

/// Convert the internal document tree and write a DOCX container
pub fn write_docx<W: Write + Seek>(writer: W, doc: &DocNode) -> CodecResult<Conversion<()>> {
    let conversion = decode_document(doc)?;
    let parts = &conversion.value;

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    write_part(&mut zip, options, CONTENT_TYPES_PART, &content_types_xml(parts))?;
    write_part(&mut zip, options, ROOT_RELS_PART, &parts.root_rels_xml)?;
    write_part(&mut zip, options, DOCUMENT_PART, &parts.document_xml)?;
    write_part(&mut zip, options, DOCUMENT_RELS_PART, &parts.document_rels_xml)?;
    write_part(&mut zip, options, STYLES_PART, &parts.styles_xml)?;
    if let Some(ref numbering_xml) = parts.numbering_xml {
        write_part(&mut zip, options, NUMBERING_PART, numbering_xml)?;
    }
    zip.finish()?;

    Ok(conversion.map(|_| ()))
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    path: &str,
    contents: &str,
) -> CodecResult<()> {
    zip.start_file(path, options)?;
    zip.write_all(contents.as_bytes())?;
    Ok(())
}

fn content_types_xml(parts: &DocxParts) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    if parts.numbering_xml.is_some() {
        xml.push_str(r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#);
    }
    xml.push_str("</Types>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn minimal_doc() -> DocNode {
        DocNode::new("doc")
            .with_attr("version", crate::migrate::CURRENT_DOC_VERSION)
            .with_content(vec![DocNode::new("paragraph").with_content(vec![
                DocNode::new("run").with_content(vec![DocNode::text("Hello")]),
            ])])
    }

    #[test]
    fn test_write_then_read_container() {
        let mut buffer = Cursor::new(Vec::new());
        write_docx(&mut buffer, &minimal_doc()).unwrap();

        buffer.set_position(0);
        let mut reader = DocxReader::new(buffer).unwrap();
        assert!(reader.is_valid_docx());
        assert!(reader.part_exists("word/styles.xml"));
        assert!(!reader.part_exists("word/numbering.xml"));
        let doc_xml = reader.read_part("word/document.xml").unwrap();
        assert!(doc_xml.contains("Hello"));
    }

    #[test]
    fn test_read_round_trip_text_survives() {
        let mut buffer = Cursor::new(Vec::new());
        write_docx(&mut buffer, &minimal_doc()).unwrap();

        buffer.set_position(0);
        let conv = read_docx(buffer).unwrap();
        assert_eq!(conv.value.text_content(), "Hello");
        assert!(conv.is_clean());
    }

    #[test]
    fn test_missing_document_part_is_rejected() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            zip.start_file("other.txt", SimpleFileOptions::default()).unwrap();
            zip.write_all(b"not a docx").unwrap();
            zip.finish().unwrap();
        }
        buffer.set_position(0);
        assert!(matches!(
            read_docx(buffer),
            Err(CodecError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_are_a_zip_error() {
        let buffer = Cursor::new(b"this is not a zip archive".to_vec());
        assert!(matches!(read_docx(buffer), Err(CodecError::Zip(_))));
    }
}
