//! Line indexing and position conversions for a text snapshot.

use text_size::TextSize;

/// A position expressed as (line, UTF-8 byte column).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// LSP-compatible position (UTF-16 code units).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Pre-computed line start/end offsets for a particular text snapshot.
///
/// CRLF is a single line boundary: the line ends at the `\r` and the next line
/// starts after the `\n`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        let mut line_ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 2) as u32));
                    i += 2;
                }
                b'\r' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                _ => i += 1,
            }
        }

        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    /// End of the line excluding its terminator.
    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.line_ends.get(line as usize).copied()
    }

    /// The text of line `line` without its terminator.
    ///
    /// `text` must be the same snapshot used to construct this [`LineIndex`].
    pub fn line_text<'t>(&self, text: &'t str, line: u32) -> Option<&'t str> {
        let start = u32::from(self.line_start(line)?) as usize;
        let end = u32::from(self.line_end(line)?) as usize;
        text.get(start..end)
    }

    fn line_index(&self, offset: TextSize) -> usize {
        // Offsets past the end refer to EOF.
        let offset = offset.min(self.text_len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Convert a byte offset to a UTF-8 (byte) line/column pair.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = self.line_index(offset);
        let line_start = self.line_starts[line];
        let line_end = self.line_ends[line];
        let col = offset.min(line_end) - line_start;
        LineCol {
            line: line as u32,
            col: u32::from(col),
        }
    }

    /// Convert a byte offset to an LSP-compatible UTF-16 position.
    ///
    /// `text` must be the same snapshot used to construct this [`LineIndex`].
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        debug_assert_eq!(TextSize::from(text.len() as u32), self.text_len);
        let offset = offset.min(self.text_len);
        let line = self.line_index(offset);
        let line_start = u32::from(self.line_starts[line]) as usize;
        let offset = u32::from(offset.min(self.line_ends[line])) as usize;
        let character: u32 = text[line_start..offset]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum();

        Position {
            line: line as u32,
            character,
        }
    }

    /// Convert an LSP-compatible UTF-16 position into a byte offset.
    ///
    /// Returns `None` if the line is out of bounds, the `character` is past the
    /// end of the line, or it points inside a surrogate pair.
    pub fn offset_of_position(&self, text: &str, position: Position) -> Option<TextSize> {
        debug_assert_eq!(TextSize::from(text.len() as u32), self.text_len);
        let line_start = self.line_start(position.line)?;
        let line_end = self.line_end(position.line)?;
        let line_text = &text[u32::from(line_start) as usize..u32::from(line_end) as usize];

        let mut utf16 = 0u32;
        for (byte_idx, ch) in line_text.char_indices() {
            if utf16 == position.character {
                return Some(line_start + TextSize::from(byte_idx as u32));
            }
            let ch_utf16 = ch.len_utf16() as u32;
            if utf16 + ch_utf16 > position.character {
                return None;
            }
            utf16 += ch_utf16;
        }

        (utf16 == position.character).then_some(line_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_boundaries_lf_and_crlf() {
        let text = "ab\ncd\r\nef";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_text(text, 0), Some("ab"));
        assert_eq!(index.line_text(text, 1), Some("cd"));
        assert_eq!(index.line_text(text, 2), Some("ef"));
        assert_eq!(index.line_text(text, 3), None);

        assert_eq!(index.line_start(1), Some(TextSize::from(3)));
        assert_eq!(index.line_end(1), Some(TextSize::from(5)));
        assert_eq!(index.line_start(2), Some(TextSize::from(7)));
    }

    #[test]
    fn line_col_round_trip() {
        let text = "one\ntwo\nthree";
        let index = LineIndex::new(text);

        let lc = index.line_col(TextSize::from(5));
        assert_eq!(lc, LineCol { line: 1, col: 1 });

        // EOF maps to the last line.
        let lc = index.line_col(TextSize::from(text.len() as u32));
        assert_eq!(lc.line, 2);
    }

    #[test]
    fn utf16_positions_count_code_units() {
        // 😀 is a surrogate pair in UTF-16 (2 code units, 4 bytes in UTF-8).
        let text = "a😀b\nx";
        let index = LineIndex::new(text);

        assert_eq!(index.position(text, TextSize::from(5)), Position::new(0, 3));
        assert_eq!(index.position(text, TextSize::from(6)), Position::new(0, 4));
        assert_eq!(index.position(text, TextSize::from(7)), Position::new(1, 0));

        assert_eq!(
            index.offset_of_position(text, Position::new(0, 3)),
            Some(TextSize::from(5))
        );
        assert_eq!(
            index.offset_of_position(text, Position::new(1, 0)),
            Some(TextSize::from(7))
        );
        // Inside the surrogate pair is invalid.
        assert_eq!(index.offset_of_position(text, Position::new(0, 2)), None);
        // Past the end of the line is invalid.
        assert_eq!(index.offset_of_position(text, Position::new(1, 2)), None);
    }
}
