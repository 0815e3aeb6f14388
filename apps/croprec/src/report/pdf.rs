//! Single-page PDF summary (A4, standard Type1 Helvetica fonts).

use super::Report;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use thiserror::Error;

/// A4 in PDF points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_OBLIQUE: &str = "F3";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode text for a WinAnsi-encoded Type1 font.
///
/// Latin-1 maps straight through, the bullet gets its WinAnsi slot, and
/// anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '•' => 0x95,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Accumulates content-stream operations for one page.
struct PageWriter {
    ops: Vec<Operation>,
}

impl PageWriter {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn text(&mut self, font: &str, size: i64, x: i64, y: i64, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn fill_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.ops.push(Operation::new(
            "rg",
            vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        ));
    }

    fn hline(&mut self, x1: i64, x2: i64, y: i64) {
        self.ops.push(Operation::new("m", vec![x1.into(), y.into()]));
        self.ops.push(Operation::new("l", vec![x2.into(), y.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn encode(self) -> Result<Vec<u8>, lopdf::Error> {
        Content {
            operations: self.ops,
        }
        .encode()
    }
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Render the report as PDF bytes.
pub fn render_pdf(report: &Report) -> Result<Vec<u8>, RenderError> {
    let mut page = PageWriter::new();

    page.text(FONT_BOLD, 20, MARGIN, PAGE_HEIGHT - 60, "Crop Recommendation Report");
    page.text(
        FONT_REGULAR,
        11,
        MARGIN,
        PAGE_HEIGHT - 85,
        &format!(
            "Generated on: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
    );
    page.hline(MARGIN, PAGE_WIDTH - MARGIN, PAGE_HEIGHT - 100);

    page.text(FONT_BOLD, 14, MARGIN, PAGE_HEIGHT - 130, "Input Parameters:");
    let mut y = PAGE_HEIGHT - 155;
    for (label, value) in report.parameter_lines() {
        page.text(FONT_REGULAR, 12, 70, y, &format!("• {label}: {value}"));
        y -= 20;
    }

    y -= 15;
    page.text(FONT_BOLD, 14, MARGIN, y, "Recommendation Result:");
    y -= 25;
    page.fill_rgb(0.2, 0.6, 0.2);
    page.text(
        FONT_BOLD,
        16,
        70,
        y,
        &format!("Recommended Crop: {}", report.crop.to_uppercase()),
    );

    page.fill_rgb(0.0, 0.0, 0.0);
    page.text(
        FONT_OBLIQUE,
        10,
        MARGIN,
        50,
        "Generated by AgriTech Crop Recommendation System",
    );
    page.text(
        FONT_OBLIQUE,
        10,
        MARGIN,
        35,
        "For agricultural guidance and optimal crop selection",
    );

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let oblique_id = doc.add_object(font("Helvetica-Oblique"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
            FONT_OBLIQUE => oblique_id,
        },
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, page.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Crop Recommendation Report"),
        "Producer" => Object::string_literal(concat!("croprec ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

// =============================================================================
// TESTS
// =============================================================================
