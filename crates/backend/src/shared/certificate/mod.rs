//! Fixed-layout certificate rendering.
//!
//! One US Letter page assembled from literal draw calls: a header
//! band, a body of wrapped and inline-flowed text with the holder's
//! details in bold, and up to three signature slots in the footer.
//! Missing image assets degrade the layout instead of failing it.

pub mod layout;
pub mod metrics;

use std::io::Cursor;
use std::path::Path;

use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt,
};
use thiserror::Error;

use crate::shared::config::CertificateConfig;
use layout::{centered_x, flow_paragraph, flow_runs, PlacedText, Run};
use metrics::FontStyle;

pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;

const LEFT_MARGIN: f64 = 20.0;
const RIGHT_MARGIN: f64 = 20.0;
const LINE_HEIGHT: f64 = 18.0;
const BODY_SIZE: f64 = 12.0;
const TITLE_SIZE: f64 = 16.0;
const CAPTION_SIZE: f64 = 10.0;
const WRAP_CHARS: usize = 100;

const HEADER_HEIGHT: f64 = 150.0;
const HEADER_TOP_INSET: f64 = 20.0;

const FOOTER_Y: f64 = 110.0;
const FOOTER_MARGIN: f64 = 50.0;
const SIGNATURE_WIDTH: f64 = 100.0;
const SIGNATURE_HEIGHT: f64 = 60.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

/// Layout math runs in f64; printpdf 0.7 takes f32 units. Narrow only
/// at the draw calls.
fn pt(v: f64) -> Mm {
    Mm::from(Pt(v as f32))
}

pub struct CertificateRenderer {
    config: CertificateConfig,
}

impl CertificateRenderer {
    pub fn new(config: CertificateConfig) -> Self {
        Self { config }
    }

    /// Renders the single-page certificate for one holder and returns
    /// the finished document bytes.
    pub fn render(&self, holder_name: &str, holder_id: &str) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new("Certificate", pt(PAGE_WIDTH), pt(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);

        let normal = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let fonts = Fonts { normal, bold };

        let max_x = PAGE_WIDTH - RIGHT_MARGIN;
        let mut y = self.draw_header(&layer, &fonts);

        // Acknowledgement line, then the holder identity in bold.
        let (placed, next_y) = flow_paragraph(
            "This is to acknowledge that ",
            FontStyle::Normal,
            WRAP_CHARS,
            LEFT_MARGIN,
            y,
            BODY_SIZE,
            LINE_HEIGHT,
        );
        draw_placed(&layer, &fonts, &placed);
        y = next_y;

        let identity = format!("{} ({})", holder_name, holder_id);
        let (placed, next_y) = flow_paragraph(
            &identity,
            FontStyle::Bold,
            WRAP_CHARS,
            LEFT_MARGIN,
            y,
            BODY_SIZE,
            LINE_HEIGHT,
        );
        draw_placed(&layer, &fonts, &placed);
        y = next_y;

        // Role sentence with the fixed phrases in bold, flowed inline.
        let runs = vec![
            Run::normal("served as a "),
            Run::bold(&self.config.role),
            Run::normal(" in the "),
            Run::bold(&self.config.program),
            Run::normal(" conducted by "),
            Run::bold(&self.config.organization),
            Run::normal(" during the academic year "),
            Run::bold(&self.config.academic_year),
            Run::normal("."),
        ];
        let (placed, last_baseline) =
            flow_runs(&runs, LEFT_MARGIN, y, max_x, BODY_SIZE, LINE_HEIGHT);
        draw_placed(&layer, &fonts, &placed);
        y = last_baseline - LINE_HEIGHT;

        for paragraph in &self.config.body_paragraphs {
            let (placed, next_y) = flow_paragraph(
                paragraph,
                FontStyle::Normal,
                WRAP_CHARS,
                LEFT_MARGIN,
                y,
                BODY_SIZE,
                LINE_HEIGHT,
            );
            draw_placed(&layer, &fonts, &placed);
            y = next_y - LINE_HEIGHT; // blank line between paragraphs
        }

        for (text, style) in [
            (&self.config.issuer_heading, FontStyle::Bold),
            (&self.config.issuer_name, FontStyle::Bold),
            (&self.config.issuer_parent, FontStyle::Normal),
        ] {
            let (placed, next_y) = flow_paragraph(
                text,
                style,
                WRAP_CHARS,
                LEFT_MARGIN,
                y,
                BODY_SIZE,
                LINE_HEIGHT,
            );
            draw_placed(&layer, &fonts, &placed);
            y = next_y;
        }

        self.draw_footer(&layer, &fonts);

        doc.save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }

    /// Draws the header band and returns the baseline for body text.
    fn draw_header(&self, layer: &PdfLayerReference, fonts: &Fonts) -> f64 {
        let band_y = PAGE_HEIGHT - HEADER_HEIGHT - HEADER_TOP_INSET;
        if let Some(image) = load_image(&self.config.header_image) {
            draw_image_in_box(layer, image, 0.0, band_y, PAGE_WIDTH, HEADER_HEIGHT);
            return PAGE_HEIGHT - HEADER_HEIGHT - 60.0;
        }

        // No header asset: centered bold title instead.
        let title = &self.config.fallback_title;
        let x = centered_x(title, FontStyle::Bold, TITLE_SIZE, PAGE_WIDTH / 2.0);
        layer.use_text(
            title,
            TITLE_SIZE as f32,
            pt(x),
            pt(PAGE_HEIGHT - 80.0),
            &fonts.bold,
        );
        PAGE_HEIGHT - 130.0
    }

    /// Signature images and captions at fixed thirds of the printable
    /// width. A missing image skips the slot's picture only.
    fn draw_footer(&self, layer: &PdfLayerReference, fonts: &Fonts) {
        let available = PAGE_WIDTH - 2.0 * FOOTER_MARGIN;
        let centers = [
            FOOTER_MARGIN + available / 6.0,
            FOOTER_MARGIN + available / 2.0,
            FOOTER_MARGIN + 5.0 * available / 6.0,
        ];

        for (signatory, center) in self.config.signatories.iter().zip(centers) {
            if let Some(image) = load_image(&signatory.image) {
                draw_image_in_box(
                    layer,
                    image,
                    center - SIGNATURE_WIDTH / 2.0,
                    FOOTER_Y,
                    SIGNATURE_WIDTH,
                    SIGNATURE_HEIGHT,
                );
            }
            layer.use_text(
                &signatory.name,
                CAPTION_SIZE as f32,
                pt(centered_x(
                    &signatory.name,
                    FontStyle::Bold,
                    CAPTION_SIZE,
                    center,
                )),
                pt(FOOTER_Y - 15.0),
                &fonts.bold,
            );
            layer.use_text(
                &signatory.role,
                CAPTION_SIZE as f32,
                pt(centered_x(
                    &signatory.role,
                    FontStyle::Normal,
                    CAPTION_SIZE,
                    center,
                )),
                pt(FOOTER_Y - 30.0),
                &fonts.normal,
            );
        }
    }
}

struct Fonts {
    normal: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw_placed(layer: &PdfLayerReference, fonts: &Fonts, placed: &[PlacedText]) {
    for item in placed {
        let font = match item.style {
            FontStyle::Normal => &fonts.normal,
            FontStyle::Bold => &fonts.bold,
        };
        layer.use_text(&item.text, item.size as f32, pt(item.x), pt(item.y), font);
    }
}

/// Scales the image to fit the box preserving aspect ratio and centers
/// it. Coordinates are points, origin bottom-left of the box.
fn draw_image_in_box(
    layer: &PdfLayerReference,
    image: Image,
    box_x: f64,
    box_y: f64,
    box_width: f64,
    box_height: f64,
) {
    const DPI: f32 = 300.0;
    let natural_width = f64::from(image.image.width.into_pt(DPI).0);
    let natural_height = f64::from(image.image.height.into_pt(DPI).0);
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return;
    }
    let scale = (box_width / natural_width).min(box_height / natural_height);
    let x = box_x + (box_width - natural_width * scale) / 2.0;
    let y = box_y + (box_height - natural_height * scale) / 2.0;
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pt(x)),
            translate_y: Some(pt(y)),
            scale_x: Some(scale as f32),
            scale_y: Some(scale as f32),
            dpi: Some(DPI),
            ..Default::default()
        },
    );
}

/// Reads and decodes an image asset. `None` means the slot is skipped;
/// that is the expected outcome for absent optional assets.
fn load_image(path: &str) -> Option<Image> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("image asset {path} not available: {e}");
            return None;
        }
    };
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let image = match ext.as_str() {
        "png" => PngDecoder::new(Cursor::new(data))
            .ok()
            .and_then(|d| Image::try_from(d).ok()),
        "jpg" | "jpeg" => JpegDecoder::new(Cursor::new(data))
            .ok()
            .and_then(|d| Image::try_from(d).ok()),
        _ => None,
    };
    if image.is_none() {
        tracing::warn!("could not decode image asset {path}");
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::Signatory;

    fn test_config(dir: &Path) -> CertificateConfig {
        CertificateConfig {
            header_image: dir.join("header.png").to_string_lossy().into_owned(),
            fallback_title: "Certificate of Acknowledgement".into(),
            role: "Mentor".into(),
            program: "MentorLink Programme".into(),
            organization: "STEP DTU".into(),
            academic_year: "2024-2025".into(),
            body_paragraphs: vec![
                "Their consistent efforts, guidance, and valuable contributions towards \
                 supporting and mentoring juniors are truly appreciated."
                    .into(),
            ],
            issuer_heading: "Issued by:".into(),
            issuer_name: "STEP DTU Society".into(),
            issuer_parent: "Delhi Technological University".into(),
            signatories: vec![Signatory {
                name: "Divyansh Khandelwal".into(),
                role: "(President)".into(),
                image: dir.join("sign1.png").to_string_lossy().into_owned(),
            }],
        }
    }

    fn write_png(path: &Path) {
        use printpdf::image_crate::codecs::png::PngEncoder;
        use printpdf::image_crate::{ColorType, ImageEncoder};

        let pixels = [200u8; 4 * 4 * 3];
        let file = std::fs::File::create(path).unwrap();
        PngEncoder::new(file)
            .write_image(&pixels, 4, 4, ColorType::Rgb8)
            .unwrap();
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn renders_pdf_without_any_assets() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CertificateRenderer::new(test_config(dir.path()));
        let bytes = renderer.render("Asha Rao", "2021CS01").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn embeds_header_and_signature_images_when_present() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("header.png"));
        write_png(&dir.path().join("sign1.png"));
        let renderer = CertificateRenderer::new(test_config(dir.path()));
        let bytes = renderer.render("Asha Rao", "2021CS01").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains(&bytes, b"/XObject"));
        assert!(contains(&bytes, b"/Image"));
    }

    #[test]
    fn decodes_png_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header.png");
        write_png(&path);
        assert!(load_image(path.to_str().unwrap()).is_some());
    }

    #[test]
    fn renders_long_holder_name() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CertificateRenderer::new(test_config(dir.path()));
        let long_name = "A".repeat(200);
        let bytes = renderer.render(&long_name, "2021CS01").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_asset_yields_none() {
        assert!(load_image("/definitely/not/there.png").is_none());
    }

    #[test]
    fn undecodable_asset_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(load_image(path.to_str().unwrap()).is_none());
    }
}
