//! Single-line text input with a cursor, used by the search bar.
//!
//! Editing methods report whether the text changed so callers only restart
//! their debounce when there is something new to search for.

/// Text buffer with a byte-offset cursor that always sits on a char boundary.
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.content[..self.cursor].chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace the whole text and move the cursor to the end.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.content == text {
            return false;
        }
        self.content = text.to_string();
        self.cursor = self.content.len();
        true
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    pub fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.content.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.content.drain(self.cursor..next);
                true
            }
            None => false,
        }
    }

    /// Delete the word before the cursor (Ctrl+W).
    pub fn delete_word_back(&mut self) -> bool {
        let before = &self.content[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        if start == self.cursor {
            return false;
        }
        self.content.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Clear everything (Ctrl+U).
    pub fn clear(&mut self) -> bool {
        if self.content.is_empty() {
            return false;
        }
        self.content.clear();
        self.cursor = 0;
        true
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}
