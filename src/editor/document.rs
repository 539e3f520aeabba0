use super::{Buffer, EditorMode};

/// Cursor position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Line number (0-based)
    pub line: usize,
    /// Column number (0-based, in characters)
    pub col: usize,
    /// Column to return to when moving through shorter lines
    pub wanted_col: usize,
}

impl Cursor {
    pub fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            wanted_col: col,
        }
    }

    fn set(&mut self, line: usize, col: usize) {
        *self = Self::at(line, col);
    }
}

/// The editor behind an open text tab
#[derive(Debug, Clone)]
pub struct Document {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub mode: EditorMode,
    /// First visible line
    pub scroll_y: usize,
    /// First visible column
    pub scroll_x: usize,
    pub tab_width: usize,
    pub use_spaces: bool,
}

impl Document {
    /// Create a document holding `contents`, with its mode taken from `ext`
    pub fn from_content(contents: &str, ext: &str) -> Self {
        Self {
            buffer: Buffer::from_str(contents),
            cursor: Cursor::default(),
            mode: EditorMode::from_extension(ext),
            scroll_y: 0,
            scroll_x: 0,
            tab_width: 4,
            use_spaces: true,
        }
    }

    pub fn with_indent(mut self, tab_width: usize, use_spaces: bool) -> Self {
        self.tab_width = tab_width.max(1);
        self.use_spaces = use_spaces;
        self
    }

    /// Full text of the document
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn line_len(&self, line: usize) -> usize {
        self.buffer.line_len(line)
    }

    /// Swap in content reloaded from the store, keeping the cursor in range
    pub fn replace_content(&mut self, contents: &str) {
        self.buffer.replace_all(contents);
        self.clamp_cursor();
    }

    fn cursor_char(&self) -> usize {
        self.buffer.line_col_to_char(self.cursor.line, self.cursor.col)
    }

    fn place_cursor_at_char(&mut self, char_idx: usize) {
        let (line, col) = self.buffer.char_to_line_col(char_idx);
        self.cursor.set(line, col);
    }

    fn clamp_cursor(&mut self) {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        let col = self.cursor.col.min(self.line_len(line));
        self.cursor.set(line, col);
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut tmp));
    }

    /// Insert text at the cursor and move past it
    pub fn insert_str(&mut self, text: &str) {
        let idx = self.cursor_char();
        self.buffer.insert(idx, text);
        self.place_cursor_at_char(idx + text.chars().count());
    }

    pub fn insert_newline(&mut self) {
        self.insert_str("\n");
    }

    /// Insert one level of indentation
    pub fn insert_tab(&mut self) {
        if self.use_spaces {
            let pad = self.tab_width - self.cursor.col % self.tab_width;
            self.insert_str(&" ".repeat(pad));
        } else {
            self.insert_str("\t");
        }
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        let idx = self.cursor_char();
        if idx == 0 {
            return;
        }
        // A line break may be two characters wide
        let (line, col) = (self.cursor.line, self.cursor.col);
        let start = if col == 0 && line > 0 {
            self.buffer.line_col_to_char(line - 1, self.line_len(line - 1))
        } else {
            idx - 1
        };
        self.buffer.remove(start, idx);
        self.place_cursor_at_char(start);
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        let idx = self.cursor_char();
        let line = self.cursor.line;
        let end = if self.cursor.col >= self.line_len(line) && line + 1 < self.line_count() {
            self.buffer.line_col_to_char(line + 1, 0)
        } else {
            idx + 1
        };
        self.buffer.remove(idx, end);
    }

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set(self.cursor.line, self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            let line = self.cursor.line - 1;
            self.cursor.set(line, self.line_len(line));
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set(self.cursor.line, self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.set(self.cursor.line + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.move_to_line(self.cursor.line - 1);
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.move_to_line(self.cursor.line + 1);
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.set(self.cursor.line, 0);
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor.set(self.cursor.line, self.line_len(self.cursor.line));
    }

    pub fn move_to_start(&mut self) {
        self.cursor.set(0, 0);
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor.set(last, self.line_len(last));
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.move_to_line(self.cursor.line.saturating_sub(page_size));
    }

    pub fn page_down(&mut self, page_size: usize) {
        let last = self.line_count().saturating_sub(1);
        self.move_to_line((self.cursor.line + page_size).min(last));
    }

    /// Vertical move that keeps the wanted column
    fn move_to_line(&mut self, line: usize) {
        self.cursor.line = line;
        self.cursor.col = self.cursor.wanted_col.min(self.line_len(line));
    }

    /// Scroll so the cursor lies inside a viewport of the given size
    pub fn ensure_cursor_visible(&mut self, visible_lines: usize, visible_cols: usize) {
        let visible_lines = visible_lines.max(1);
        let visible_cols = visible_cols.max(1);

        if self.cursor.line < self.scroll_y {
            self.scroll_y = self.cursor.line;
        } else if self.cursor.line >= self.scroll_y + visible_lines {
            self.scroll_y = self.cursor.line + 1 - visible_lines;
        }

        if self.cursor.col < self.scroll_x {
            self.scroll_x = self.cursor.col;
        } else if self.cursor.col >= self.scroll_x + visible_cols {
            self.scroll_x = self.cursor.col + 1 - visible_cols;
        }
    }
}
