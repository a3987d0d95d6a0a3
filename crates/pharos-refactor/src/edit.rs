use thiserror::Error;

/// Identifier for a document known to the host editor.
///
/// Hosts typically use a URI here; the engine only needs equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A half-open text range `[start, end)` in UTF-8 byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "invalid range: {start}..{end}");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// A single file edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub file: FileId,
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(file: FileId, offset: usize, text: impl Into<String>) -> Self {
        Self {
            file,
            range: TextRange::new(offset, offset),
            replacement: text.into(),
        }
    }

    pub fn replace(file: FileId, range: TextRange, text: impl Into<String>) -> Self {
        Self {
            file,
            range,
            replacement: text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("overlapping edits in {file:?}: {first:?} overlaps {second:?}")]
    OverlappingEdits {
        file: FileId,
        first: TextRange,
        second: TextRange,
    },
    #[error("text edit range {range:?} is outside the file bounds (len={len}) in {file:?}")]
    OutOfBounds {
        file: FileId,
        range: TextRange,
        len: usize,
    },
}

/// The edit batch produced by a refactoring.
///
/// The whole batch is atomic from the host's perspective: it must be applied
/// in full or not at all. [`WorkspaceEdit::normalize`] establishes the
/// invariants (sorted, deduplicated, non-overlapping) that make that safe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceEdit {
    pub edits: Vec<TextEdit>,
}

impl WorkspaceEdit {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    /// Sort, deduplicate, and validate non-overlap.
    ///
    /// Multiple inserts at the same position are merged in order so the edit
    /// set stays deterministic.
    pub fn normalize(&mut self) -> Result<(), EditError> {
        self.edits.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.range.cmp(&b.range))
                .then_with(|| a.replacement.cmp(&b.replacement))
        });
        self.edits.dedup();

        let mut merged: Vec<TextEdit> = Vec::with_capacity(self.edits.len());
        for edit in self.edits.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.file == edit.file && last.range == edit.range {
                    if last.range.is_empty() {
                        last.replacement.push_str(&edit.replacement);
                        continue;
                    }
                    // Two distinct replacements of the same range cannot both win.
                    return Err(EditError::OverlappingEdits {
                        file: edit.file,
                        first: last.range,
                        second: edit.range,
                    });
                }
            }
            merged.push(edit);
        }
        self.edits = merged;

        let mut prev: Option<(&FileId, TextRange)> = None;
        for edit in &self.edits {
            if let Some((prev_file, prev_range)) = prev {
                if prev_file == &edit.file && edit.range.start < prev_range.end {
                    return Err(EditError::OverlappingEdits {
                        file: edit.file.clone(),
                        first: prev_range,
                        second: edit.range,
                    });
                }
            }
            prev = Some((&edit.file, edit.range));
        }

        Ok(())
    }
}

/// Apply a set of edits to `original` and return the modified text.
///
/// The edits must be non-overlapping; they are applied back-to-front so
/// earlier ranges stay valid.
pub fn apply_text_edits(original: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| b.range.cmp(&a.range));

    let mut out = original.to_string();
    for edit in sorted {
        if edit.range.end > out.len() {
            return Err(EditError::OutOfBounds {
                file: edit.file,
                range: edit.range,
                len: out.len(),
            });
        }
        out.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }

    Ok(out)
}
