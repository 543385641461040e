use std::path::Path;
use anyhow::Context;
use printpdf::image_crate::GenericImageView;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use crate::report::summary::ReportSummary;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const TABLE_X: f32 = 50.0;
const TABLE_TOP: f32 = 610.0;
const ROW_HEIGHT: f32 = 18.0;
const COLUMN_WIDTHS: [f32; 3] = [250.0, 100.0, 100.0];
const LOGO_DPI: f32 = 300.0;

const BRAND_BLUE: (f32, f32, f32) = (0.0, 0.2, 0.6);
const TABLE_BLUE: (f32, f32, f32) = (0.0, 0.0, 1.0);
const LIGHT_GREY: (f32, f32, f32) = (0.827, 0.827, 0.827);
const GREEN: (f32, f32, f32) = (0.0, 0.502, 0.0);
const RED: (f32, f32, f32) = (1.0, 0.0, 0.0);
const YELLOW: (f32, f32, f32) = (1.0, 1.0, 0.0);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Drawing surface for one page, addressed in PDF points from the bottom-left corner.
struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
}

impl<'a> Canvas<'a> {
    fn fill_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn stroke_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn shape(&self, points: &[(f32, f32)], mode: PaintMode) {
        let ring = points
            .iter()
            .map(|&(x, y)| (Point::new(pt(x), pt(y)), false))
            .collect();
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32, mode: PaintMode) {
        self.shape(
            &[(x, y), (x + width, y), (x + width, y + height), (x, y + height)],
            mode,
        );
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.use_text(text, size, pt(x), pt(y), font);
    }
}

fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

/// Render the two-page restaurant report as PDF bytes.
pub fn render_report(summary: &ReportSummary, logo: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Restaurant report",
        pt(PAGE_WIDTH),
        pt(PAGE_HEIGHT),
        "Overview",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).context("Failed to load Helvetica")?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).context("Failed to load Helvetica-Bold")?,
    };

    let logo = match logo {
        Some(path) => Some(
            printpdf::image_crate::open(path)
                .with_context(|| format!("Failed to open logo {}", path.display()))?,
        ),
        None => None,
    };

    let overview = Canvas {
        layer: doc.get_page(first_page).get_layer(first_layer),
        fonts: &fonts,
    };
    draw_header(&overview, "General Overview", logo.as_ref());
    draw_overview_page(&overview, summary);
    draw_footer(&overview, 1);

    let (second_page, second_layer) = doc.add_page(pt(PAGE_WIDTH), pt(PAGE_HEIGHT), "Comments");
    let comments = Canvas {
        layer: doc.get_page(second_page).get_layer(second_layer),
        fonts: &fonts,
    };
    draw_header(&comments, "Review Classification", logo.as_ref());
    draw_comments_page(&comments, summary);
    draw_footer(&comments, 2);

    doc.save_to_bytes().context("Failed to serialize the PDF document")
}

fn draw_header(canvas: &Canvas, title: &str, logo: Option<&printpdf::image_crate::DynamicImage>) {
    canvas.fill_color(BRAND_BLUE);
    canvas.rect(0.0, 750.0, PAGE_WIDTH, 70.0, PaintMode::Fill);

    // Slanted band running from the top-left corner down to the right edge.
    canvas.stroke_color(BRAND_BLUE);
    canvas.shape(
        &[(0.0, 800.0), (40.0, 800.0), (PAGE_WIDTH, 730.0), (PAGE_WIDTH, 800.0)],
        PaintMode::Fill,
    );

    if let Some(logo) = logo {
        let (width_px, height_px) = logo.dimensions();
        let native_width = width_px.max(1) as f32 * 72.0 / LOGO_DPI;
        let native_height = height_px.max(1) as f32 * 72.0 / LOGO_DPI;
        Image::from_dynamic_image(logo).add_to_layer(
            canvas.layer.clone(),
            ImageTransform {
                translate_x: Some(pt(30.0)),
                translate_y: Some(pt(765.0)),
                scale_x: Some(60.0 / native_width),
                scale_y: Some(40.0 / native_height),
                dpi: Some(LOGO_DPI),
                ..Default::default()
            },
        );
    }

    canvas.fill_color(WHITE);
    canvas.text(title, 18.0, 220.0, 765.0, true);
}

fn draw_footer(canvas: &Canvas, page: usize) {
    canvas.fill_color(BLACK);
    canvas.text(&format!("Page {}", page), 10.0, 270.0, 50.0, false);
}

fn draw_overview_page(canvas: &Canvas, summary: &ReportSummary) {
    canvas.fill_color(LIGHT_GREY);
    canvas.rect(50.0, 660.0, 230.0, 60.0, PaintMode::Fill);
    canvas.fill_color(BLACK);
    canvas.text("General Overview", 12.0, 60.0, 695.0, false);
    canvas.text(
        &format!("{} restaurants found nearby", summary.restaurant_count),
        10.0,
        60.0,
        677.0,
        false,
    );

    canvas.text("Ratings of Nearest Businesses", 12.0, 50.0, 630.0, true);
    draw_table(canvas, summary);
}

fn draw_table(canvas: &Canvas, summary: &ReportSummary) {
    let header = ["Name", "Rating", "Distance"];
    canvas.stroke_color(BLACK);
    canvas.layer.set_outline_thickness(1.0);

    draw_table_row(canvas, 0, &header, TABLE_BLUE, WHITE, true);
    for (index, row) in summary.rows.iter().enumerate() {
        let cells = [row.name.as_str(), row.rating.as_str(), row.distance.as_str()];
        draw_table_row(canvas, index + 1, &cells, LIGHT_GREY, BLACK, false);
    }
}

fn draw_table_row(
    canvas: &Canvas,
    index: usize,
    cells: &[&str; 3],
    background: (f32, f32, f32),
    foreground: (f32, f32, f32),
    bold: bool,
) {
    let bottom = TABLE_TOP - (index as f32 + 1.0) * ROW_HEIGHT;
    let mut x = TABLE_X;

    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        canvas.fill_color(background);
        canvas.rect(x, bottom, width, ROW_HEIGHT, PaintMode::FillStroke);
        canvas.fill_color(foreground);
        canvas.text(cell, 10.0, x + 6.0, bottom + 5.0, bold);
        x += width;
    }
}

fn draw_comments_page(canvas: &Canvas, summary: &ReportSummary) {
    canvas.fill_color(GREEN);
    canvas.rect(50.0, 600.0, 200.0, 30.0, PaintMode::Fill);
    canvas.fill_color(WHITE);
    canvas.text("Positive Comments", 12.0, 60.0, 610.0, false);
    canvas.fill_color(BLACK);
    canvas.text(
        &format!("{} positive reviews", summary.positive_review_total),
        11.0,
        60.0,
        582.0,
        false,
    );

    canvas.fill_color(RED);
    canvas.rect(300.0, 600.0, 200.0, 30.0, PaintMode::Fill);
    canvas.fill_color(WHITE);
    canvas.text("Negative Comments", 12.0, 310.0, 610.0, false);
    canvas.fill_color(BLACK);
    canvas.text(
        &format!("{} negative reviews", summary.negative_review_total),
        11.0,
        310.0,
        582.0,
        false,
    );

    canvas.fill_color(LIGHT_GREY);
    canvas.rect(50.0, 400.0, 400.0, 80.0, PaintMode::Fill);
    canvas.fill_color(BLACK);
    canvas.text("Analysis", 12.0, 60.0, 460.0, false);
    canvas.text(&summary.keyword_line(), 10.0, 60.0, 440.0, false);
    canvas.text(
        &format!("Based on {} restaurants", summary.restaurant_count),
        10.0,
        60.0,
        422.0,
        false,
    );

    canvas.fill_color(YELLOW);
    canvas.rect(400.0, 200.0, 100.0, 50.0, PaintMode::Fill);
    canvas.fill_color(BLACK);
    canvas.text(&summary.average_rating_label(), 20.0, 410.0, 220.0, true);
    canvas.text("Average Rating", 12.0, 390.0, 190.0, false);
}
