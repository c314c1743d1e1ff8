use std::io::Cursor;

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};

use super::ScoutingReport;

// ---------------------------------------------------------------------------
// Page geometry (A4 portrait, millimetres)
// ---------------------------------------------------------------------------

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 18.0;
const BODY_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
/// Label column width of the fact rows.
const LABEL_WIDTH: f64 = 52.0;
const PHOTO_WIDTH: f64 = 60.0;
const PHOTO_HEIGHT: f64 = 80.0;

const PT_TO_MM: f64 = 0.3528;

/// Greedy character budget per body line. Helvetica averages roughly
/// half an em per glyph.
fn chars_per_line(font_size: f64) -> usize {
    (BODY_WIDTH / (font_size * 0.5 * PT_TO_MM)) as usize
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a scouting report to PDF bytes. `photo` carries the raw PNG
/// or JPEG bytes of the optional player photo; decode failures skip the
/// photo rather than losing the report.
pub fn render_pdf(report: &ScoutingReport, photo: Option<&[u8]>) -> Result<Vec<u8>> {
    let title = format!("Informe de scouting - {}", report.player_name);
    let mut page = PageWriter::new(&title)?;

    page.title(&format!("INFORME DE SCOUTING - {}", report.player_name));
    page.rule();
    page.space(5.0);

    page.heading("Datos del partido");
    page.fact("Fecha del informe", &format_date(report.report_date));
    page.fact("Fecha del partido", &format_date(report.match_date));
    page.fact("Equipo local", &report.local_team);
    page.fact("Equipo visitante", &report.visitor_team);
    page.fact("Resultado", &report.result);
    page.space(4.0);

    page.heading("Datos del jugador");
    page.fact("Jugador", &report.player_name);
    page.fact("Club", &report.player_club);
    page.fact("Posición", &report.position);
    page.fact("Valoración general", &format!("{}/10", report.overall_rating));
    page.fact("Titular", if report.is_starter { "Sí" } else { "No" });
    page.fact("Minutos jugados", &report.minutes_played.to_string());
    page.space(4.0);

    if let Some(bytes) = photo {
        if let Err(e) = page.photo(bytes) {
            log::warn!("omitting report photo: {e:#}");
        }
    }

    for (section, content) in report.sections() {
        page.heading(section);
        let text = content.trim();
        page.paragraph(if text.is_empty() { "-" } else { text });
        page.space(3.0);
    }

    page.space(6.0);
    page.footer(&format!(
        "Informe generado el {}",
        format_date(report.report_date)
    ));

    page.finish()
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Cursor over a growing document: tracks the current layer and the y
/// position, starting a fresh page when content runs past the margin.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f64,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "contenido");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("loading Helvetica")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("loading Helvetica-Bold")?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(PageWriter {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    /// Start a new page when fewer than `needed` millimetres remain.
    fn ensure_room(&mut self, needed: f64) {
        if self.y - needed < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "contenido");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn write_line(&mut self, text: &str, size: f64, bold: bool, x: f64) {
        let leading = size * PT_TO_MM * 1.3;
        self.ensure_room(leading);
        self.y -= leading;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn title(&mut self, text: &str) {
        // Approximate centering from the average glyph width.
        let width = text.chars().count() as f64 * 16.0 * 0.5 * PT_TO_MM;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.write_line(text, 16.0, true, x);
        self.space(2.0);
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(12.0);
        self.space(2.0);
        self.write_line(text, 13.0, true, MARGIN);
        self.space(1.0);
    }

    /// One "label: value" fact row with an aligned value column.
    fn fact(&mut self, label: &str, value: &str) {
        let size = 11.0;
        let leading = size * PT_TO_MM * 1.3;
        self.ensure_room(leading);
        self.y -= leading;
        self.layer
            .use_text(format!("{label}:"), size, Mm(MARGIN), Mm(self.y), &self.bold);
        self.layer.use_text(
            value,
            size,
            Mm(MARGIN + LABEL_WIDTH),
            Mm(self.y),
            &self.regular,
        );
    }

    fn paragraph(&mut self, text: &str) {
        let size = 11.0;
        for line in wrap_text(text, chars_per_line(size)) {
            self.write_line(&line, size, false, MARGIN);
        }
    }

    fn footer(&mut self, text: &str) {
        self.write_line(text, 9.0, false, MARGIN);
    }

    fn rule(&mut self) {
        self.ensure_room(3.0);
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        };
        self.layer.set_outline_thickness(0.6);
        self.layer.add_line(line);
        self.y -= 3.0;
    }

    fn space(&mut self, mm: f64) {
        self.y -= mm;
    }

    /// Embed a PNG or JPEG photo, scaled into a fixed box at the cursor.
    fn photo(&mut self, bytes: &[u8]) -> Result<()> {
        let image = decode_image(bytes)?;
        // printpdf places images at 300 dpi when unscaled.
        let native_w = image.image.width.0 as f64 * 25.4 / 300.0;
        let native_h = image.image.height.0 as f64 * 25.4 / 300.0;
        if native_w <= 0.0 || native_h <= 0.0 {
            anyhow::bail!("photo has no pixels");
        }
        let scale = (PHOTO_WIDTH / native_w).min(PHOTO_HEIGHT / native_h);
        let height = native_h * scale;

        self.ensure_room(height + 4.0);
        self.y -= height;
        let transform = ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(self.y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            ..Default::default()
        };
        image.add_to_layer(self.layer.clone(), transform);
        self.y -= 4.0;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().context("serializing PDF")
    }
}

fn decode_image(bytes: &[u8]) -> Result<Image> {
    use printpdf::image_crate::codecs::{jpeg::JpegDecoder, png::PngDecoder};

    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        let decoder = PngDecoder::new(Cursor::new(bytes)).context("decoding PNG photo")?;
        Image::try_from(decoder).context("embedding PNG photo")
    } else {
        let decoder = JpegDecoder::new(Cursor::new(bytes)).context("decoding JPEG photo")?;
        Image::try_from(decoder).context("embedding JPEG photo")
    }
}

/// Greedy word wrap. Hard line breaks are preserved; a single word
/// longer than the budget overflows its line rather than being split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_report() -> ScoutingReport {
        ScoutingReport {
            report_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            match_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            local_team: "CA Cimarrón".into(),
            visitor_team: "Deportivo Alba".into(),
            result: "2-1".into(),
            player_name: "Mateo Luna".into(),
            player_club: "CA Cimarrón".into(),
            position: "DEL".into(),
            overall_rating: 7,
            is_starter: true,
            minutes_played: 83,
            technical: "Buen primer toque bajo presión.".into(),
            tactical: "Cae a banda para recibir.".into(),
            physical: String::new(),
            psychological: "Pide el balón tras fallar.".into(),
            observations: "Volver a verlo contra un bloque bajo.".into(),
            photo_path: None,
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_pdf(&sample_report(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1_000);
    }

    #[test]
    fn long_sections_spill_onto_more_pages() {
        fn page_objects(bytes: &[u8]) -> usize {
            // Every page is one "/Type /Page" dictionary; the page tree
            // adds a single "/Type /Pages" that both documents share.
            String::from_utf8_lossy(bytes).matches("/Type /Page").count()
        }

        let short = render_pdf(&sample_report(), None).unwrap();
        let mut report = sample_report();
        report.observations = "Observación repetida para forzar el salto de página. ".repeat(120);
        let long = render_pdf(&report, None).unwrap();
        assert!(page_objects(&long) > page_objects(&short));
    }

    #[test]
    fn invalid_photo_bytes_error_cleanly() {
        assert!(decode_image(&[0x00, 0x01, 0x02]).is_err());
        // The report itself still renders when the photo cannot be decoded.
        assert!(render_pdf(&sample_report(), Some(&[0x00, 0x01])).is_ok());
    }

    #[test]
    fn wrapping_respects_word_boundaries() {
        let lines = wrap_text("uno dos tres cuatro cinco", 9);
        assert_eq!(lines, vec!["uno dos", "tres", "cuatro", "cinco"]);

        let lines = wrap_text("palabra_interminable corta", 5);
        assert_eq!(lines, vec!["palabra_interminable", "corta"]);

        assert!(wrap_text("", 10).is_empty());
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }
}
