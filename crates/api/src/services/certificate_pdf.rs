//! PDF certificate rendering with `printpdf`.
//!
//! One landscape A4 page using the builtin Helvetica faces, so no font
//! files have to ship with the binary.

use domain::ports::{CertificateData, CertificateGenerator, RenderError};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;

/// Average glyph advance of Helvetica as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn primary() -> Color {
    rgb(26, 26, 46)
}

fn gold() -> Color {
    rgb(201, 162, 39)
}

fn gray() -> Color {
    rgb(102, 102, 102)
}

fn render_error(err: printpdf::Error) -> RenderError {
    RenderError::Render(err.to_string())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfCertificateGenerator;

impl PdfCertificateGenerator {
    pub fn new() -> Self {
        Self
    }
}

struct Page<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
}

impl Page<'_> {
    fn centered(&self, text: &str, size: f32, y: f32, bold: bool, color: Color) {
        self.text_at(text, size, PAGE_WIDTH / 2.0, y, bold, color);
    }

    /// Writes `text` horizontally centred on `center_x`.
    fn text_at(&self, text: &str, size: f32, center_x: f32, y: f32, bold: bool, color: Color) {
        let width = text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM;
        let x = (center_x - width / 2.0).max(10.0);
        let font = if bold { self.bold } else { self.regular };

        self.layer.set_fill_color(color);
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn rule(&self, from_x: f32, to_x: f32, y: f32, thickness: f32, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from_x), Mm(y)), false),
                (Point::new(Mm(to_x), Mm(y)), false),
            ],
            is_closed: false,
        });
    }
}

impl CertificateGenerator for PdfCertificateGenerator {
    fn generate(&self, data: &CertificateData) -> Result<Vec<u8>, RenderError> {
        let (doc, page_index, layer_index) = PdfDocument::new(
            format!("Certificate - {}", data.event_name),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "certificate",
        );

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;

        let page = Page {
            layer: doc.get_page(page_index).get_layer(layer_index),
            regular: &regular,
            bold: &bold,
        };

        // Header
        page.rule(50.0, 247.0, 185.0, 1.0, gold());
        page.centered("CERTIFICATE", 36.0, 165.0, true, primary());
        page.rule(75.0, 222.0, 157.0, 0.5, gold());

        // Body
        page.centered("This certifies that", 12.0, 145.0, false, gray());
        page.centered(&data.recipient_name, 24.0, 130.0, true, primary());
        page.centered("participated in the event", 11.0, 118.0, false, gray());
        page.centered(&data.event_name, 18.0, 106.0, true, primary());
        page.centered(
            &format!("activity \"{}\", held on {}", data.activity_name, data.event_date),
            11.0,
            94.0,
            false,
            gray(),
        );
        page.centered(
            &format!("with a workload of {}.", data.workload),
            11.0,
            86.0,
            false,
            gray(),
        );

        // Signatures
        let left = PAGE_WIDTH * 0.3;
        let right = PAGE_WIDTH * 0.7;
        page.rule(left - 40.0, left + 40.0, 50.0, 0.5, primary());
        page.rule(right - 40.0, right + 40.0, 50.0, 0.5, primary());
        page.text_at(&data.director_name, 11.0, left, 43.0, true, primary());
        page.text_at("Director", 9.0, left, 37.0, false, gray());
        page.text_at(&data.coordinator_name, 11.0, right, 43.0, true, primary());
        page.text_at("Coordinator", 9.0, right, 37.0, false, gray());

        // Footer
        page.centered(
            &format!("Issued on {}", data.issue_date),
            9.0,
            20.0,
            false,
            gray(),
        );

        doc.save_to_bytes().map_err(render_error)
    }
}
