use crate::{error::AppError, models::ProductResult};
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_H: f32 = 6.0;
const WRAP_AT: usize = 90;

/// Single-sheet (or more, for long descriptions) text rendering of a listing.
pub fn render_listing(result: &ProductResult, generated_at: DateTime<Utc>) -> Result<Vec<u8>, AppError> {
    let info = &result.product_info;
    let (doc, page, layer) = PdfDocument::new(
        format!("Listing: {}", truncate(&info.title, 48)),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Export(format!("{e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Export(format!("{e:?}")))?;

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(truncate(&info.title, 60), 20.0, Mm(MARGIN), Mm(275.0), &bold);
    current.use_text(format!("Category: {}", info.category), 11.0, Mm(MARGIN), Mm(262.0), &font);
    current.use_text(
        format!(
            "Price: {} {}",
            format_price(info.pricing.amount, info.pricing.currency.minor_units()),
            info.pricing.currency
        ),
        11.0,
        Mm(MARGIN),
        Mm(255.0),
        &font,
    );
    current.use_text(format!("Company: {}", info.company_name), 11.0, Mm(MARGIN), Mm(248.0), &font);
    current.use_text(format!("Made in: {}", info.manufacturing_country), 11.0, Mm(MARGIN), Mm(241.0), &font);
    if !result.keywords.is_empty() {
        current.use_text(
            truncate(&format!("Keywords: {}", result.keywords.join(", ")), 120),
            10.0,
            Mm(MARGIN),
            Mm(234.0),
            &font,
        );
    }
    current.use_text("Description", 13.0, Mm(MARGIN), Mm(222.0), &bold);

    let mut y = 214.0;
    for line in wrap(&info.description, WRAP_AT) {
        if y < MARGIN + LINE_H {
            let (p, l) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Description");
            current = doc.get_page(p).get_layer(l);
            y = PAGE_H - MARGIN - LINE_H;
        }
        current.use_text(line, 10.0, Mm(MARGIN), Mm(y), &font);
        y -= LINE_H;
    }

    current.use_text(
        format!("Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        8.0,
        Mm(MARGIN),
        Mm(MARGIN / 2.0),
        &font,
    );

    let mut buf: Vec<u8> = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buf);
        doc.save(&mut writer).map_err(|e| AppError::Export(format!("{e:?}")))?;
    }
    Ok(buf)
}

/// `listing_<slug>.pdf`, where the slug keeps ASCII letters and digits from the title.
pub fn file_name(result: &ProductResult) -> String {
    let mut slug = String::new();
    for c in result.product_info.title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() { "listing.pdf".to_string() } else { format!("listing_{slug}.pdf") }
}

fn format_price(amount: f64, decimals: usize) -> String {
    format!("{amount:.decimals$}")
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_string() } else { format!("{}...", s.chars().take(max).collect::<String>()) }
}
