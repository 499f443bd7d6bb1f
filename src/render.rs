//! PDF rendering of receipt lines.
//!
//! Lays the lines out on a single A4 page in Courier, one line per row with a
//! blank row between them, and draws the signature image beside the signature
//! line. Uses the standard Type1 fonts so nothing needs embedding.

use crate::core::{LineStyle, ReceiptLine};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Courier glyphs are all 600/1000 em wide.
const COURIER_ADVANCE: f32 = 0.6;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const SIGNATURE_IMAGE: &str = "Im1";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read signature image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to build pdf: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write pdf: {0}")]
    Io(#[from] std::io::Error),
}

/// Page size, margins and font used for the receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
}

impl PageGeometry {
    /// A4 portrait, 10mm margins, 12pt.
    pub fn a4() -> Self {
        PageGeometry {
            width: 210.0 * PT_PER_MM,
            height: 297.0 * PT_PER_MM,
            margin: 10.0 * PT_PER_MM,
            font_size: 12.0,
        }
    }

    fn line_height(&self) -> f32 {
        self.font_size
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * COURIER_ADVANCE
    }

    /// Characters that fit between the margins.
    fn columns(&self) -> usize {
        ((self.width - 2.0 * self.margin) / (self.font_size * COURIER_ADVANCE)).floor() as usize
    }
}

/// Where the signature goes relative to the signature line, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureBox {
    pub x: f32,
    pub raise: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SignatureBox {
    fn default() -> Self {
        SignatureBox {
            x: 42.0,
            raise: 6.0,
            width: 40.0,
            height: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    geometry: PageGeometry,
    signature_box: SignatureBox,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        PdfRenderer::new(PageGeometry::a4())
    }
}

impl PdfRenderer {
    pub fn new(geometry: PageGeometry) -> Self {
        PdfRenderer {
            geometry,
            signature_box: SignatureBox::default(),
        }
    }

    /// Render the lines to PDF bytes.
    pub fn render(
        &self,
        lines: &[ReceiptLine],
        signature: Option<&Path>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut doc = self.build_document(lines, signature)?;
        doc.compress();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Render and write to `path`, replacing any existing file.
    pub fn write(
        &self,
        lines: &[ReceiptLine],
        signature: Option<&Path>,
        path: &Path,
    ) -> Result<(), RenderError> {
        let bytes = self.render(lines, signature)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Build the uncompressed document.
    pub fn build_document(
        &self,
        lines: &[ReceiptLine],
        signature: Option<&Path>,
    ) -> Result<Document, RenderError> {
        let geometry = self.geometry;
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let signature_id = match signature {
            Some(path) => Some(add_signature_image(&mut doc, path)?),
            None => None,
        };

        let operations = self.layout(lines, signature_id.is_some());
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let mut resources = dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => font("Courier"),
                FONT_BOLD => font("Courier-Bold"),
            },
        };
        if let Some(id) = signature_id {
            resources.set("XObject", dictionary! { SIGNATURE_IMAGE => id });
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                geometry.width.into(),
                geometry.height.into(),
            ],
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1_i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    fn layout(&self, lines: &[ReceiptLine], with_signature: bool) -> Vec<Operation> {
        let geometry = self.geometry;
        let mut operations = Vec::new();
        let mut baseline = geometry.height - geometry.margin - geometry.line_height();

        for line in lines {
            for (row_index, text) in line.wrap(geometry.columns()).iter().enumerate() {
                if row_index > 0 {
                    baseline -= geometry.line_height();
                }
                let (font_name, x) = match line.style {
                    LineStyle::Title => {
                        let centered = (geometry.width - geometry.text_width(text)) / 2.0;
                        (FONT_BOLD, centered.max(geometry.margin))
                    }
                    LineStyle::Field | LineStyle::Signature => (FONT_REGULAR, geometry.margin),
                };

                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![font_name.into(), geometry.font_size.into()],
                ));
                operations.push(Operation::new("Td", vec![x.into(), baseline.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                operations.push(Operation::new("ET", vec![]));

                if row_index == 0 && line.style == LineStyle::Signature && with_signature {
                    operations.extend(self.signature_operations(baseline));
                }
            }

            let rows = if line.style == LineStyle::Title { 3.0 } else { 2.0 };
            baseline -= geometry.line_height() * rows;
        }

        operations
    }

    fn signature_operations(&self, baseline: f32) -> Vec<Operation> {
        let sig = self.signature_box;
        let width = sig.width * PT_PER_MM;
        let height = sig.height * PT_PER_MM;
        let line_top = baseline + self.geometry.line_height() * 0.8;
        let bottom = line_top + sig.raise * PT_PER_MM - height;

        vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    Object::Integer(0),
                    Object::Integer(0),
                    height.into(),
                    (sig.x * PT_PER_MM).into(),
                    bottom.into(),
                ],
            ),
            Operation::new("Do", vec![SIGNATURE_IMAGE.into()]),
            Operation::new("Q", vec![]),
        ]
    }
}

fn font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Add the signature as an RGB image with its alpha channel as a soft mask.
fn add_signature_image(doc: &mut Document, path: &Path) -> Result<ObjectId, RenderError> {
    let rgba = image::open(path)
        .map_err(|source| RenderError::Image {
            path: path.display().to_string(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Signature image {}x{}", width, height);

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let mask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8_i64,
        },
        alpha,
    ));

    Ok(doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "SMask" => mask_id,
        },
        rgb,
    )))
}

/// Encode text for a WinAnsi font. Characters it cannot show become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{0}'..='\u{7f}' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        // C1 controls share these bytes but not their glyphs
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{build, PaymentConfig, RentalDirectory, Rollover};
    use chrono::NaiveDate;

    fn receipt_lines() -> Vec<ReceiptLine> {
        let directory = RentalDirectory::builtin();
        let config = PaymentConfig {
            address_key: "723".to_string(),
            ..Default::default()
        };
        let record = config.validate(&directory).unwrap();
        build(
            &config,
            record,
            &directory.landlord,
            NaiveDate::from_ymd_opt(2026, 3, 25).unwrap(),
            Rollover::default(),
        )
    }

    fn shown_text(doc: &Document) -> Vec<String> {
        let pages = doc.get_pages();
        let page_id = *pages.get(&1).unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned())
            .collect()
    }

    #[test]
    fn renders_single_page_pdf() {
        let bytes = PdfRenderer::new(PageGeometry::a4())
            .render(&receipt_lines(), None)
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_shows_every_line_in_order() {
        let lines = receipt_lines();
        let doc = PdfRenderer::default().build_document(&lines, None).unwrap();
        let text = shown_text(&doc);
        // the purpose row takes two rows on A4
        assert_eq!(text.len(), lines.len() + 1);
        assert_eq!(text[0], "RECEIPT");
        assert_eq!(
            text[4],
            "Payment For:  [x] Rent [ ] Rent Deposit [ ] Key Deposit [ ] Utility"
        );
        assert_eq!(text[5], "              [ ] Other");
        assert_eq!(text[6], "Payment Note: Rent for Apr, 2026");
        assert_eq!(
            text[7],
            "Payment Type: [x] E-transfer [ ] Cheque [ ] Bank Draft [ ] Cash [ ] Other"
        );
        assert_eq!(text[10], "Signature:");
    }

    #[test]
    fn long_note_stays_inside_right_margin() {
        let directory = RentalDirectory::builtin();
        let config = PaymentConfig {
            address_key: "723".to_string(),
            purpose: crate::core::PaymentPurpose::Utility,
            note: Some(
                "Hydro, water and gas for January through March 2026, split evenly between \
                 all four tenants as set out in the lease"
                    .to_string(),
            ),
            amount: Some(crate::core::Amount::dollars(310)),
            ..Default::default()
        };
        let record = config.validate(&directory).unwrap();
        let lines = build(
            &config,
            record,
            &directory.landlord,
            NaiveDate::from_ymd_opt(2026, 3, 25).unwrap(),
            Rollover::default(),
        );
        assert!(config.note.as_ref().unwrap().len() > 100);

        let geometry = PageGeometry::a4();
        let operations = PdfRenderer::new(geometry).layout(&lines, false);
        let right_margin = geometry.width - geometry.margin;
        let mut x = 0.0;
        let mut baselines = Vec::new();
        let mut shown = Vec::new();
        for op in &operations {
            match op.operator.as_str() {
                "Td" => {
                    x = op.operands[0].as_float().unwrap();
                    baselines.push(op.operands[1].as_float().unwrap());
                }
                "Tj" => {
                    let text = op.operands[0].as_str().unwrap();
                    let end = x + text.len() as f32 * geometry.font_size * COURIER_ADVANCE;
                    let text = String::from_utf8_lossy(text).into_owned();
                    assert!(end <= right_margin, "overflows: {} ({})", text, end);
                    shown.push(text);
                }
                _ => {}
            }
        }

        let note_rows: Vec<_> = shown
            .iter()
            .skip_while(|t| !t.starts_with("Payment Note:"))
            .take_while(|t| !t.starts_with("Payment Type:"))
            .collect();
        assert_eq!(note_rows.len(), 2);
        assert!(note_rows[1].starts_with("              "));
        assert!(note_rows[1].ends_with("as set out in the lease"));

        // every row is drawn below the previous one
        assert!(baselines.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Café"), b"Caf\xe9");
        assert_eq!(encode_win_ansi("O’Brien – €5"), b"O\x92Brien \x96 \x805");
        assert_eq!(encode_win_ansi("\u{85}漢"), b"??");
    }

    #[test]
    fn embeds_signature_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signature.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 0, 128]))
            .save(&path)
            .unwrap();

        let doc = PdfRenderer::default()
            .build_document(&receipt_lines(), Some(&path))
            .unwrap();
        let images: Vec<_> = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .filter(|stream| {
                stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name())
                    .map_or(false, |name| name == b"Image")
            })
            .collect();
        // colour image plus its soft mask
        assert_eq!(images.len(), 2);
        assert!(images.iter().any(|s| s.content.len() == 4 * 2 * 3));
        assert!(images.iter().any(|s| s.content.len() == 4 * 2));
    }

    #[test]
    fn missing_signature_is_an_error() {
        let err = PdfRenderer::default()
            .build_document(&receipt_lines(), Some(Path::new("/nonexistent/sig.png")))
            .unwrap_err();
        assert!(matches!(err, RenderError::Image { .. }));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.pdf");
        PdfRenderer::default()
            .write(&receipt_lines(), None, &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
