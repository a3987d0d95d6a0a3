//! LSP boundary: engine edits to `lsp_types` structures, selection
//! conversion, and the quick-fix offering surface.

use std::collections::{BTreeMap, HashMap};

use lsp_types::{
    CodeAction, CodeActionKind, Command, Position as LspPosition, Range as LspRange,
    TextEdit as LspTextEdit, Uri, WorkspaceEdit as LspWorkspaceEdit,
};
use pharos_core::{LineIndex, Position, TextSize};
use thiserror::Error;

use crate::edit::{FileId, TextRange, WorkspaceEdit};
use crate::extract_variable::is_refactor_candidate;

/// The single command the quick-fix is bound to. The host invokes it with no
/// arguments beyond the ambient active-editor state.
pub const EXTRACT_VARIABLE_COMMAND: &str = "pharos.extractVariable";

/// User-facing label of the quick-fix.
pub const EXTRACT_VARIABLE_TITLE: &str = "Refactor as variable";

#[derive(Debug, Error)]
pub enum LspConversionError {
    #[error("unknown file {0:?}")]
    UnknownFile(FileId),
    #[error("invalid uri for {0:?}")]
    InvalidUri(FileId),
}

/// Read-only text access the LSP conversion needs to compute UTF-16
/// positions.
pub trait TextSource {
    fn file_text(&self, file: &FileId) -> Option<&str>;
}

/// A trivial in-memory [`TextSource`].
#[derive(Clone, Debug, Default)]
pub struct TextStore {
    files: BTreeMap<FileId, String>,
}

impl TextStore {
    pub fn new(files: impl IntoIterator<Item = (FileId, String)>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }
}

impl TextSource for TextStore {
    fn file_text(&self, file: &FileId) -> Option<&str> {
        self.files.get(file).map(String::as_str)
    }
}

/// Convert an engine [`WorkspaceEdit`] into an LSP `WorkspaceEdit`.
pub fn workspace_edit_to_lsp(
    source: &dyn TextSource,
    edit: &WorkspaceEdit,
) -> Result<LspWorkspaceEdit, LspConversionError> {
    let mut changes: HashMap<Uri, Vec<LspTextEdit>> = HashMap::new();
    let mut indexes: BTreeMap<FileId, LineIndex> = BTreeMap::new();

    for e in &edit.edits {
        let text = source
            .file_text(&e.file)
            .ok_or_else(|| LspConversionError::UnknownFile(e.file.clone()))?;
        let index = indexes
            .entry(e.file.clone())
            .or_insert_with(|| LineIndex::new(text));
        let uri = file_id_to_uri(&e.file)?;

        changes.entry(uri).or_default().push(LspTextEdit {
            range: byte_range_to_lsp(text, index, e.range),
            new_text: e.replacement.clone(),
        });
    }

    // LSP clients tend to apply edits sequentially. Provide them in reverse
    // document order so offsets stay valid even for clients that ignore the
    // spec and shift as they go.
    for edits in changes.values_mut() {
        edits.sort_by(|a, b| {
            (b.range.start.line, b.range.start.character, b.range.end.line)
                .cmp(&(a.range.start.line, a.range.start.character, a.range.end.line))
        });
    }

    Ok(LspWorkspaceEdit {
        changes: Some(changes),
        document_changes: None,
        change_annotations: None,
    })
}

/// Convert an engine byte range into an LSP range (UTF-16 positions).
pub fn byte_range_to_lsp(text: &str, index: &LineIndex, range: TextRange) -> LspRange {
    LspRange {
        start: to_lsp_position(index.position(text, TextSize::from(range.start as u32))),
        end: to_lsp_position(index.position(text, TextSize::from(range.end as u32))),
    }
}

/// Convert a host selection range into engine byte offsets.
///
/// Returns `None` when the range does not land on valid positions in `text`
/// (out-of-bounds line, column past line end, or inside a surrogate pair).
pub fn selection_from_lsp(text: &str, index: &LineIndex, range: LspRange) -> Option<TextRange> {
    let start = index.offset_of_position(
        text,
        Position::new(range.start.line, range.start.character),
    )?;
    let end = index.offset_of_position(text, Position::new(range.end.line, range.end.character))?;
    let (start, end) = (u32::from(start) as usize, u32::from(end) as usize);
    (start <= end).then(|| TextRange::new(start, end))
}

/// The action-offering surface: a "Refactor as variable" quick-fix bound to
/// [`EXTRACT_VARIABLE_COMMAND`], offered whenever the eligibility predicate
/// passes over the current selection.
pub fn refactor_variable_action(selection_text: &str) -> Option<CodeAction> {
    if !is_refactor_candidate(selection_text) {
        return None;
    }

    Some(CodeAction {
        title: EXTRACT_VARIABLE_TITLE.to_string(),
        kind: Some(CodeActionKind::QUICKFIX),
        command: Some(Command {
            title: EXTRACT_VARIABLE_TITLE.to_string(),
            command: EXTRACT_VARIABLE_COMMAND.to_string(),
            arguments: None,
        }),
        diagnostics: None,
        edit: None,
        is_preferred: Some(true),
        disabled: None,
        data: None,
    })
}

fn to_lsp_position(position: Position) -> LspPosition {
    LspPosition {
        line: position.line,
        character: position.character,
    }
}

fn file_id_to_uri(file: &FileId) -> Result<Uri, LspConversionError> {
    file.0
        .parse::<Uri>()
        .map_err(|_| LspConversionError::InvalidUri(file.clone()))
}
