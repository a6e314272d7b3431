//! Editable multi-line text buffer backing each output pane.
//!
//! The cursor is a char index, never a byte index, so editing multi-byte text
//! can't split a code point. Long lines are hard-wrapped at the pane width,
//! measured in terminal columns, and `scroll` counts wrapped rows.

use unicode_width::UnicodeWidthChar;

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Terminal columns taken by `c`. Control characters take none.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// One screen row of wrapped text: first char index plus its byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    start: usize,
    start_byte: usize,
    end_byte: usize,
}

impl Row {
    fn at(start: usize, start_byte: usize) -> Self {
        Row { start, start_byte, end_byte: start_byte }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pane {
    text: String,
    cursor: usize,
    pub scroll: u16,
}

impl Pane {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the whole content, resetting cursor and scroll.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor. CRLF and lone CR become LF.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert_str(byte_pos, &text);
        self.cursor += text.chars().count();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Char index where each line starts. Always at least one entry.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in self.text.chars().enumerate() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    fn line_len(starts: &[usize], line: usize, total: usize) -> usize {
        match starts.get(line + 1) {
            Some(next) => next - 1 - starts[line],
            None => total - starts[line],
        }
    }

    /// Zero-based (line, column) of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let line = starts.iter().rposition(|&s| s <= self.cursor).unwrap_or(0);
        (line, self.cursor - starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    pub fn move_home(&mut self) {
        let (_, col) = self.cursor_line_col();
        self.cursor -= col;
    }

    pub fn move_end(&mut self) {
        let starts = self.line_starts();
        let (line, _) = self.cursor_line_col();
        self.cursor = starts[line] + Self::line_len(&starts, line, self.char_count());
    }

    pub fn move_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.move_to_line(line - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.line_count() {
            self.move_to_line(line + 1, col);
        }
    }

    fn move_to_line(&mut self, line: usize, col: usize) {
        let starts = self.line_starts();
        let len = Self::line_len(&starts, line, self.char_count());
        self.cursor = starts[line] + col.min(len);
    }

    /// Visible slice of a single-line input `width` columns wide, scrolled just
    /// far enough to keep the cursor on screen, plus the cursor column inside it.
    pub fn line_window(&self, width: usize) -> (&str, usize) {
        let chars: Vec<(usize, char)> = self.text.char_indices().collect();
        let cursor = self.cursor.min(chars.len());

        // One cell stays free for the cursor itself
        let budget = width.saturating_sub(1);
        let mut start = cursor;
        let mut cursor_col = 0;
        while start > 0 {
            let w = char_width(chars[start - 1].1);
            if cursor_col + w > budget {
                break;
            }
            cursor_col += w;
            start -= 1;
        }

        let start_byte = chars.get(start).map_or(self.text.len(), |(b, _)| *b);
        let mut end_byte = start_byte;
        let mut cols = 0;
        for &(byte, c) in &chars[start..] {
            let w = char_width(c);
            if cols + w > width {
                break;
            }
            cols += w;
            end_byte = byte + c.len_utf8();
        }

        (&self.text[start_byte..end_byte], cursor_col)
    }

    /// Split the text into screen rows at most `width` columns wide.
    /// A character wider than the row still gets a row of its own.
    fn rows(&self, width: usize) -> Vec<Row> {
        let width = width.max(1);
        let mut rows = Vec::new();
        let mut row = Row::at(0, 0);
        let mut col = 0;

        for (i, (byte, c)) in self.text.char_indices().enumerate() {
            if c == '\n' {
                rows.push(Row { end_byte: byte, ..row });
                row = Row::at(i + 1, byte + 1);
                col = 0;
                continue;
            }

            let w = char_width(c);
            if col > 0 && col + w > width {
                rows.push(Row { end_byte: byte, ..row });
                row = Row::at(i, byte);
                col = 0;
            }
            col += w;
        }

        rows.push(Row { end_byte: self.text.len(), ..row });
        rows
    }

    /// The text as it appears on screen, one entry per wrapped row.
    pub fn wrapped_lines(&self, width: usize) -> Vec<&str> {
        self.rows(width)
            .into_iter()
            .map(|row| &self.text[row.start_byte..row.end_byte])
            .collect()
    }

    pub fn row_count(&self, width: usize) -> usize {
        self.rows(width).len()
    }

    /// Zero-based (row, column) of the cursor on screen, columns in terminal cells.
    /// At a wrap point the cursor belongs to the start of the next row.
    pub fn cursor_row_col(&self, width: usize) -> (usize, usize) {
        let rows = self.rows(width);
        let index = rows.iter().rposition(|row| row.start <= self.cursor).unwrap_or(0);
        let row = rows[index];
        let col = self.text[row.start_byte..]
            .chars()
            .take(self.cursor - row.start)
            .map(char_width)
            .sum();
        (index, col)
    }

    pub fn scroll_down(&mut self, lines: u16, width: usize) {
        let max = self.row_count(width).saturating_sub(1).min(u16::MAX as usize) as u16;
        self.scroll = self.scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Adjust scroll so the cursor row sits inside a `height` x `width` viewport.
    pub fn ensure_cursor_visible(&mut self, height: u16, width: usize) {
        if height == 0 {
            return;
        }
        let row = self.cursor_row_col(width).0.min(u16::MAX as usize) as u16;
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll.saturating_add(height) {
            self.scroll = row - height + 1;
        }
    }
}
