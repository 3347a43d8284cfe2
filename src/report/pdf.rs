use crate::error::AppError;
use crate::report::layout::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Table, TextStyle, layout};
use printpdf::{BuiltinFont, Mm, PdfDocument};

fn report_err(e: impl std::fmt::Display) -> AppError {
    AppError::Report(e.to_string())
}

/// Draws the laid-out table into an in-memory A4 PDF.
pub fn render(table: &Table) -> Result<Vec<u8>, AppError> {
    let pages = layout(table);

    let (doc, first_page, first_layer) = PdfDocument::new(
        table.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(report_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(report_err)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", index + 1),
            );
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for item in &page.items {
            let (font, size) = match item.style {
                TextStyle::Title => (&bold, 16.0),
                TextStyle::Subtitle => (&regular, 9.0),
                TextStyle::Header => (&bold, 11.0),
                TextStyle::Body => (&regular, 10.0),
                TextStyle::Footer => (&regular, 8.0),
            };
            layer.use_text(item.text.as_str(), size, Mm(item.x_mm), Mm(item.y_mm), font);
        }
    }

    doc.save_to_bytes().map_err(report_err)
}
