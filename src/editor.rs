//! Multi-line text buffer behind the composer and reply boxes.

/// Editable text with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    /// Lines of text (always at least one)
    pub lines: Vec<String>,
    /// Cursor row (0-indexed into lines)
    pub cursor_row: usize,
    /// Cursor column (character position in the current line)
    pub cursor_col: usize,
    /// Vertical scroll offset for the text area
    pub scroll: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TextArea {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
        }
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.insert_str(text);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Raw text, lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Text to submit: trimmed.
    #[must_use]
    pub fn body(&self) -> String {
        self.text().trim().to_string()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        line.insert(byte_idx, c);
        self.cursor_col += 1;
    }

    /// Insert text at the cursor, honouring embedded newlines.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.newline(),
                '\r' => {}
                c => self.insert_char(c),
            }
        }
    }

    /// Insert a newline, splitting the current line.
    pub fn newline(&mut self) {
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let rest = self.lines[self.cursor_row][byte_idx..].to_string();
        self.lines[self.cursor_row].truncate(byte_idx);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, rest);
        self.cursor_col = 0;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let byte_idx = char_to_byte_index(line, self.cursor_col - 1);
            let end_byte = char_to_byte_index(line, self.cursor_col);
            line.drain(byte_idx..end_byte);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&current);
        }
    }

    pub fn cursor_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_col();
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_col();
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
        }
    }

    pub fn cursor_right(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_len {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub const fn home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn end(&mut self) {
        self.cursor_col = self.lines[self.cursor_row].chars().count();
    }

    /// Move one word to the left (Alt+B).
    pub fn word_left(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let before = &line[..byte_idx];
        let word_start = before
            .trim_end()
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1);
        self.cursor_col = before[..word_start].chars().count();
    }

    /// Move one word to the right (Alt+F).
    pub fn word_right(&mut self) {
        let line = &self.lines[self.cursor_row];
        if self.cursor_col >= line.chars().count() {
            return;
        }
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let after = &line[byte_idx..];
        let skip_word = after.find(char::is_whitespace).unwrap_or(after.len());
        let rest = &after[skip_word..];
        let skip_space = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        self.cursor_col += after[..skip_word + skip_space].chars().count();
    }

    /// Delete the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let before = &line[..byte_idx];
        let word_start = before
            .trim_end()
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1);
        let new_col = before[..word_start].chars().count();
        self.lines[self.cursor_row].drain(word_start..byte_idx);
        self.cursor_col = new_col;
    }

    /// Clear from cursor to start of line (Ctrl+U).
    pub fn clear_line(&mut self) {
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        self.lines[self.cursor_row].drain(..byte_idx);
        self.cursor_col = 0;
    }

    /// Keep the cursor row inside a viewport of `viewport_height` rows.
    pub const fn ensure_visible(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + viewport_height {
            self.scroll = self.cursor_row - viewport_height + 1;
        }
    }

    fn clamp_col(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col > line_len {
            self.cursor_col = line_len;
        }
    }
}

fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte_idx, _)| byte_idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextArea {
        let mut area = TextArea::new();
        area.insert_str(text);
        area
    }

    #[test]
    fn typing_and_newlines() {
        let area = typed("hello\nworld");
        assert_eq!(area.lines, vec!["hello", "world"]);
        assert_eq!((area.cursor_row, area.cursor_col), (1, 5));
        assert_eq!(area.text(), "hello\nworld");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut area = typed("ab\ncd");
        area.home();
        area.backspace();
        assert_eq!(area.lines, vec!["abcd"]);
        assert_eq!(area.cursor_col, 2);
    }

    #[test]
    fn multibyte_editing() {
        let mut area = typed("héllo");
        area.cursor_left();
        area.cursor_left();
        area.cursor_left();
        area.backspace();
        assert_eq!(area.text(), "hllo");
    }

    #[test]
    fn word_motions_and_delete() {
        let mut area = typed("one two  three");
        area.word_left();
        assert_eq!(area.cursor_col, 9);
        area.word_left();
        assert_eq!(area.cursor_col, 4);
        area.word_right();
        assert_eq!(area.cursor_col, 9);
        area.end();
        area.delete_word();
        assert_eq!(area.text(), "one two  ");
        area.clear_line();
        assert_eq!(area.text(), "");
    }

    #[test]
    fn set_text_moves_cursor_to_end() {
        let mut area = TextArea::new();
        area.set_text("> quoted\n");
        assert_eq!(area.lines, vec!["> quoted", ""]);
        assert_eq!((area.cursor_row, area.cursor_col), (1, 0));
        area.insert_str("reply");
        assert_eq!(area.body(), "> quoted\nreply");
    }

    #[test]
    fn blank_detection() {
        assert!(TextArea::new().is_blank());
        assert!(typed("  \n\t").is_blank());
        assert!(!typed(" x ").is_blank());
    }

    #[test]
    fn ensure_visible_scrolls() {
        let mut area = typed("1\n2\n3\n4\n5");
        area.ensure_visible(2);
        assert_eq!(area.scroll, 3);
        area.cursor_up();
        area.cursor_up();
        area.cursor_up();
        area.ensure_visible(2);
        assert_eq!(area.scroll, 1);
    }
}
