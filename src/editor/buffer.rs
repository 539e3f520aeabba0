use ropey::{Rope, RopeSlice};
use std::fmt;

/// A text buffer backed by a rope data structure.
///
/// Every mutation bumps `revision`, which is how edits are detected from
/// outside without diffing text.
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    revision: u64,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::from_str("")
    }

    /// Create a buffer from a string
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            revision: 0,
        }
    }

    /// Number of mutations applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the total number of lines
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the total number of characters
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a line by index (0-based), including its line break
    pub fn line(&self, line_idx: usize) -> Option<RopeSlice<'_>> {
        (line_idx < self.rope.len_lines()).then(|| self.rope.line(line_idx))
    }

    /// Line content without its trailing line break
    pub fn line_text(&self, line_idx: usize) -> String {
        self.line(line_idx)
            .map(|l| l.slice(..l.len_chars() - break_len(&l)).to_string())
            .unwrap_or_default()
    }

    /// Get the length of a line (in characters, excluding the line break)
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line(line_idx)
            .map(|l| l.len_chars() - break_len(&l))
            .unwrap_or(0)
    }

    /// Convert a (line, column) position to a character index
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.len_lines() {
            return self.len_chars();
        }
        self.rope.line_to_char(line) + col.min(self.line_len(line))
    }

    /// Convert a character index to (line, column)
    pub fn char_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let char_idx = char_idx.min(self.len_chars());
        let line = self.rope.char_to_line(char_idx);
        (line, char_idx - self.rope.line_to_char(line))
    }

    /// Insert a string at the given character index
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let idx = char_idx.min(self.len_chars());
        self.rope.insert(idx, text);
        self.revision += 1;
    }

    /// Delete a range of characters
    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
            self.revision += 1;
        }
    }

    /// Swap in entirely new content
    pub fn replace_all(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.revision += 1;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// Characters ropey ends a line on; `\r\n` counts as a single break
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Width in chars of the break that ends `line`, zero for the last line
fn break_len(line: &RopeSlice) -> usize {
    let len = line.len_chars();
    if len == 0 || !is_line_break(line.char(len - 1)) {
        return 0;
    }
    if len >= 2 && line.char(len - 1) == '\n' && line.char(len - 2) == '\r' {
        2
    } else {
        1
    }
}
