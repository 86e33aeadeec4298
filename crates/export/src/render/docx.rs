//! Word-processor (OOXML) renderer.
//!
//! A `.docx` file is a ZIP package of XML parts. Only the parts a reader
//! needs are written: content types, package relationships, core
//! properties, styles and the main document.

use std::fmt::Write as _;
use std::io::{Cursor, Write as _};

use propledger_core::report::{Block, KeyValue, ReportDocument, Section, SectionKind, Table};
use propledger_shared::config::DocumentFormat;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{DocumentRenderer, RenderedDocument};
use crate::error::ExportError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="21"/><w:lang w:val="fr-CA"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="80"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="40"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="360" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#;

/// Renders reports as `.docx` packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer;

impl DocumentRenderer for DocxRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn render(&self, doc: &ReportDocument) -> Result<RenderedDocument, ExportError> {
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("docProps/core.xml", core_properties(doc)),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/styles.xml", STYLES.to_string()),
            ("word/document.xml", document_xml(doc)),
        ];

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in parts {
            writer.start_file(name, options)?;
            writer.write_all(content.as_bytes())?;
        }
        let bytes = writer.finish()?.into_inner();

        Ok(RenderedDocument {
            bytes,
            extension: "docx",
        })
    }
}

fn core_properties(doc: &ReportDocument) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:subject>{}</dc:subject><dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created></cp:coreProperties>"#,
        escape(&doc.title),
        escape(&doc.subject),
        doc.generated_at.format("%Y-%m-%dT%H:%M:%S"),
    )
}

fn document_xml(doc: &ReportDocument) -> String {
    let mut body = String::new();
    for section in &doc.sections {
        write_section(&mut body, section);
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{WORD_NS}"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

fn write_section(out: &mut String, section: &Section) {
    let style = match section.kind {
        SectionKind::Title => "Title",
        _ => "Heading1",
    };
    paragraph(out, Some(style), &[Run::plain(&section.title)]);

    for block in &section.blocks {
        match block {
            Block::Paragraph(text) => paragraph(out, None, &[Run::plain(text)]),
            Block::KeyValues(pairs) => key_values(out, pairs),
            Block::Table(table) => write_table(out, table),
            Block::Notice(text) => paragraph(out, None, &[Run::notice(text)]),
        }
    }
}

struct Run<'a> {
    text: &'a str,
    bold: bool,
    color: Option<&'static str>,
}

impl<'a> Run<'a> {
    const fn plain(text: &'a str) -> Self {
        Self {
            text,
            bold: false,
            color: None,
        }
    }

    const fn bold(text: &'a str) -> Self {
        Self {
            text,
            bold: true,
            color: None,
        }
    }

    const fn notice(text: &'a str) -> Self {
        Self {
            text,
            bold: true,
            color: Some("C00000"),
        }
    }
}

fn paragraph(out: &mut String, style: Option<&str>, runs: &[Run<'_>]) {
    out.push_str("<w:p>");
    if let Some(style) = style {
        let _ = write!(out, r#"<w:pPr><w:pStyle w:val="{style}"/></w:pPr>"#);
    }
    for run in runs {
        out.push_str("<w:r>");
        if run.bold || run.color.is_some() {
            out.push_str("<w:rPr>");
            if run.bold {
                out.push_str("<w:b/>");
            }
            if let Some(color) = run.color {
                let _ = write!(out, r#"<w:color w:val="{color}"/>"#);
            }
            out.push_str("</w:rPr>");
        }
        let _ = write!(
            out,
            r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
            escape(run.text)
        );
    }
    out.push_str("</w:p>");
}

fn key_values(out: &mut String, pairs: &[KeyValue]) {
    for pair in pairs {
        let label = format!("{} : ", pair.key);
        paragraph(out, None, &[Run::bold(&label), Run::plain(&pair.value)]);
    }
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str(
        r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="5000" w:type="pct"/></w:tblPr><w:tblGrid>"#,
    );
    for _ in 0..table.width() {
        out.push_str("<w:gridCol/>");
    }
    out.push_str("</w:tblGrid>");

    table_row(out, &table.headers, true);
    for row in &table.rows {
        table_row(out, row, false);
    }
    if let Some(footer) = &table.footer {
        table_row(out, footer, true);
    }
    out.push_str("</w:tbl>");
    // Word merges adjacent tables without a paragraph between them.
    out.push_str("<w:p/>");
}

fn table_row(out: &mut String, cells: &[String], bold: bool) {
    out.push_str("<w:tr>");
    for cell in cells {
        out.push_str("<w:tc>");
        let run = if bold { Run::bold(cell) } else { Run::plain(cell) };
        paragraph(out, None, &[run]);
        out.push_str("</w:tc>");
    }
    out.push_str("</w:tr>");
}

/// Escapes XML special characters and drops characters XML 1.0 forbids.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}
