//! Page layout with a vertical cursor.
//!
//! The document is laid out against a fixed page geometry: a cursor in
//! layout units moves down the page, and once it passes [`PAGE_BREAK_Y`]
//! the writer opens a fresh page and resets the cursor to [`TOP_MARGIN_Y`].
//! The break check runs after each written line, so a line is never split
//! across pages.

/// Cursor position past which the current page is full.
pub const PAGE_BREAK_Y: f64 = 270.0;
/// Cursor position at the top of a fresh page.
pub const TOP_MARGIN_Y: f64 = 30.0;
/// Vertical advance of one table row.
pub const LINE_HEIGHT: f64 = 8.0;

/// Text pages with a vertical layout cursor.
#[derive(Debug)]
pub struct PageWriter {
    finished: Vec<String>,
    current: String,
    cursor: f64,
}

impl PageWriter {
    pub fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: String::new(),
            cursor: TOP_MARGIN_Y,
        }
    }

    /// Write one line advancing the cursor by [`LINE_HEIGHT`].
    pub fn line(&mut self, text: &str) {
        self.line_with(text, LINE_HEIGHT);
    }

    /// Write one line with an explicit vertical advance, then break the
    /// page if the cursor has passed the bottom.
    pub fn line_with(&mut self, text: &str, advance: f64) {
        self.current.push_str(text);
        self.current.push('\n');
        self.cursor += advance;
        if self.cursor > PAGE_BREAK_Y {
            self.finished.push(core::mem::take(&mut self.current));
            self.cursor = TOP_MARGIN_Y;
        }
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.line("");
    }

    /// Move the cursor down to `y` if it is not already past it.
    pub fn advance_to(&mut self, y: f64) {
        if y > self.cursor {
            self.cursor = y;
        }
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// Finished document bytes: pages joined with a form feed.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut pages = self.finished;
        pages.push(self.current);
        pages.join("\u{c}").into_bytes()
    }
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}
