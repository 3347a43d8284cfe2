//! Page layout for tabular reports, independent of the PDF backend.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const TOP_MM: f32 = 280.0;
pub const BOTTOM_MARGIN_MM: f32 = 20.0;
pub const FOOTER_MM: f32 = 10.0;
pub const TITLE_GAP_MM: f32 = 12.0;
pub const ROW_HEIGHT_MM: f32 = 8.0;
pub const LEFT_MM: f32 = 15.0;

pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
    pub x_mm: f32,
    /// longest value printed before truncation
    pub max_chars: usize,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub title: String,
    pub subtitle: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Subtitle,
    Header,
    Body,
    Footer,
}

#[derive(Debug, Clone)]
pub struct PlacedText {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub style: TextStyle,
}

#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<PlacedText>,
}

impl Page {
    fn place(&mut self, text: impl Into<String>, x_mm: f32, y_mm: f32, style: TextStyle) {
        self.items.push(PlacedText {
            text: text.into(),
            x_mm,
            y_mm,
            style,
        });
    }
}

/// Cuts `value` to at most `max_chars` characters, marking the cut with "...".
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return value.chars().take(max_chars).collect();
    }

    let mut cut: String = value.chars().take(max_chars - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}

// Title block on the first page, column headers on every page.
// Returns the y of the first body row.
fn start_page(page: &mut Page, table: &Table, first: bool) -> f32 {
    let mut y = TOP_MM;

    if first {
        page.place(table.title.clone(), LEFT_MM, y, TextStyle::Title);
        if let Some(subtitle) = &table.subtitle {
            page.place(subtitle.clone(), LEFT_MM, y - TITLE_GAP_MM / 2.0, TextStyle::Subtitle);
        }
        y -= TITLE_GAP_MM;
    }

    for column in &table.columns {
        page.place(column.header, column.x_mm, y, TextStyle::Header);
    }
    y - ROW_HEIGHT_MM
}

pub fn layout(table: &Table) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut page = Page::default();
    let mut y = start_page(&mut page, table, true);

    if table.rows.is_empty() {
        page.place("No records found.", LEFT_MM, y, TextStyle::Body);
    }

    for row in &table.rows {
        if y < BOTTOM_MARGIN_MM {
            pages.push(std::mem::take(&mut page));
            y = start_page(&mut page, table, false);
        }

        for (column, value) in table.columns.iter().zip(row) {
            page.place(truncate(value, column.max_chars), column.x_mm, y, TextStyle::Body);
        }
        y -= ROW_HEIGHT_MM;
    }
    pages.push(page);

    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        page.place(
            format!("Page {} of {}", index + 1, total),
            LEFT_MM,
            FOOTER_MM,
            TextStyle::Footer,
        );
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Page {
        fn body_rows(&self) -> usize {
            let mut ys: Vec<f32> = self
                .items
                .iter()
                .filter(|i| i.style == TextStyle::Body)
                .map(|i| i.y_mm)
                .collect();
            ys.dedup();
            ys.len()
        }
    }

    fn table(rows: usize) -> Table {
        Table {
            title: "Attendance".into(),
            subtitle: Some("Generated 2026-01-01 00:00 UTC".into()),
            columns: vec![
                Column {
                    header: "ID",
                    x_mm: LEFT_MM,
                    max_chars: 6,
                },
                Column {
                    header: "Name",
                    x_mm: 40.0,
                    max_chars: 10,
                },
            ],
            rows: (0..rows)
                .map(|i| vec![i.to_string(), format!("Student {i}")])
                .collect(),
        }
    }

    #[test]
    fn truncation_marks_cut_values() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a very long student name", 10), "a very ...");
        assert_eq!(truncate("ünïcödé-nämé", 8), "ünïcö...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn small_table_fits_one_page() {
        let pages = layout(&table(5));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].body_rows(), 5);
        assert!(pages[0].items.iter().any(|i| i.style == TextStyle::Title));
        assert!(pages[0].items.iter().any(|i| i.text == "Page 1 of 1"));
    }

    #[test]
    fn rows_break_onto_new_pages_with_repeated_headers() {
        // first page holds 31 rows below the title, later pages 32
        assert_eq!(layout(&table(31)).len(), 1);
        assert_eq!(layout(&table(32)).len(), 2);

        let pages = layout(&table(95));
        assert_eq!(pages.len(), 3);
        assert_eq!(
            pages.iter().map(Page::body_rows).collect::<Vec<_>>(),
            vec![31, 32, 32]
        );
        assert_eq!(layout(&table(96)).len(), 4);

        for page in &pages {
            let headers = page.items.iter().filter(|i| i.style == TextStyle::Header).count();
            assert_eq!(headers, 2);
            assert!(page
                .items
                .iter()
                .filter(|i| i.style == TextStyle::Body)
                .all(|i| i.y_mm >= BOTTOM_MARGIN_MM));
        }
        let titles = pages
            .iter()
            .flat_map(|p| &p.items)
            .filter(|i| i.style == TextStyle::Title)
            .count();
        assert_eq!(titles, 1);
        assert!(pages[2].items.iter().any(|i| i.text == "Page 3 of 3"));
    }

    #[test]
    fn long_cells_are_truncated_in_place() {
        let mut t = table(0);
        t.rows.push(vec!["1".into(), "Bartholomew Featherstonehaugh".into()]);
        let pages = layout(&t);
        let name = pages[0]
            .items
            .iter()
            .find(|i| i.style == TextStyle::Body && i.x_mm == 40.0)
            .unwrap();
        assert_eq!(name.text, "Barthol...");
    }

    #[test]
    fn empty_table_says_so() {
        let pages = layout(&table(0));
        assert_eq!(pages.len(), 1);
        assert!(pages[0].items.iter().any(|i| i.text == "No records found."));
    }
}
