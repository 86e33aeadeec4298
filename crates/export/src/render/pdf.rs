//! PDF renderer built on `genpdf`.

use std::path::PathBuf;

use genpdf::{Alignment, Element as _, elements, style};
use propledger_core::report::{Block, KeyValue, ReportDocument, Section, SectionKind, Table};
use propledger_shared::config::DocumentFormat;

use super::{DocumentRenderer, RenderedDocument};
use crate::error::ExportError;

/// Renders reports as PDF with a TTF family loaded from disk.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    font_dir: PathBuf,
    font_family: String,
}

impl PdfRenderer {
    /// Creates a renderer loading `{font_dir}/{font_family}-Regular.ttf` and
    /// its bold/italic variants.
    #[must_use]
    pub fn new(font_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_family: font_family.into(),
        }
    }

    fn load_fonts(
        &self,
    ) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, ExportError> {
        genpdf::fonts::from_files(&self.font_dir, &self.font_family, None).map_err(|_| {
            ExportError::FontNotFound {
                family: self.font_family.clone(),
                dir: self.font_dir.display().to_string(),
            }
        })
    }
}

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn render(&self, doc: &ReportDocument) -> Result<RenderedDocument, ExportError> {
        let font_family = self.load_fonts()?;

        let mut pdf = genpdf::Document::new(font_family);
        pdf.set_title(format!("{} - {}", doc.title, doc.subject));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        pdf.set_page_decorator(decorator);

        for section in &doc.sections {
            push_section(&mut pdf, section)?;
        }

        let mut buffer = Vec::new();
        pdf.render(&mut buffer)
            .map_err(|e| ExportError::rendering(e.to_string()))?;

        Ok(RenderedDocument {
            bytes: buffer,
            extension: "pdf",
        })
    }
}

fn push_section(pdf: &mut genpdf::Document, section: &Section) -> Result<(), ExportError> {
    let heading_size = match section.kind {
        SectionKind::Title => 18,
        _ => 14,
    };
    if section.kind != SectionKind::Title {
        pdf.push(elements::Break::new(1));
    }
    pdf.push(
        elements::Paragraph::new(section.title.as_str())
            .styled(style::Style::new().bold().with_font_size(heading_size)),
    );

    for block in &section.blocks {
        match block {
            Block::Paragraph(text) => pdf.push(elements::Paragraph::new(text.as_str())),
            Block::KeyValues(pairs) => pdf.push(key_value_table(pairs)?),
            Block::Table(table) => {
                pdf.push(elements::Break::new(1));
                pdf.push(table_layout(table)?);
            }
            Block::Notice(text) => pdf.push(
                elements::Paragraph::new(text.as_str()).styled(
                    style::Style::new()
                        .bold()
                        .with_color(style::Color::Rgb(192, 0, 0)),
                ),
            ),
        }
    }
    Ok(())
}

fn key_value_table(pairs: &[KeyValue]) -> Result<elements::TableLayout, ExportError> {
    let mut table = elements::TableLayout::new(vec![3, 2]);
    let bold = style::Style::new().bold();
    for pair in pairs {
        let mut value = elements::Paragraph::new(pair.value.as_str());
        value.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new(pair.key.as_str()).styled(bold))
            .element(value)
            .push()
            .map_err(|e| ExportError::rendering(e.to_string()))?;
    }
    Ok(table)
}

fn table_layout(table: &Table) -> Result<elements::TableLayout, ExportError> {
    // First column holds labels and gets twice the width of amount columns.
    let mut weights = vec![1; table.width()];
    if let Some(first) = weights.first_mut() {
        *first = 2;
    }
    let mut layout = elements::TableLayout::new(weights);
    layout.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    push_row(&mut layout, &table.headers, true)?;
    for row in &table.rows {
        push_row(&mut layout, row, false)?;
    }
    if let Some(footer) = &table.footer {
        push_row(&mut layout, footer, true)?;
    }
    Ok(layout)
}

fn push_row(
    layout: &mut elements::TableLayout,
    cells: &[String],
    bold: bool,
) -> Result<(), ExportError> {
    let cell_style = if bold {
        style::Style::new().bold()
    } else {
        style::Style::new()
    };
    cells
        .iter()
        .enumerate()
        .fold(layout.row(), |row, (index, cell)| {
            let mut paragraph = elements::Paragraph::new(cell.as_str());
            if index > 0 {
                paragraph.set_alignment(Alignment::Right);
            }
            row.element(paragraph.styled(cell_style))
        })
        .push()
        .map_err(|e| ExportError::rendering(e.to_string()))
}
