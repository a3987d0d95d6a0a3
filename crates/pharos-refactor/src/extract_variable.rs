//! Extract-variable orchestration.
//!
//! The pure edit builder ([`extract_variable`]) and the full quick-fix flow
//! ([`run_extract_variable`]) that infers a name, asks the host to confirm
//! it, and assembles the edit batch.

use pharos_config::RefactorConfig;
use pharos_core::{LineIndex, NewlineStyle, TextSize};
use thiserror::Error;

use crate::casing::format_variable_name;
use crate::edit::{EditError, FileId, TextEdit, TextRange, WorkspaceEdit};
use crate::infer::{infer_fragments, DEFAULT_NAME};
use crate::insertion::declaration_insertion_point;

#[derive(Debug, Error)]
pub enum RefactorError {
    #[error("selection does not cover a refactorable expression")]
    InvalidSelection,
    #[error("cursors select different text; extract variable needs identical occurrences")]
    SelectionMismatch,
    #[error("invalid variable name `{name}`: {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Host-supplied confirmation prompt for the suggested variable name.
///
/// This is the engine's only suspension point; hosts typically implement it
/// with an asynchronous input box and block the calling task on the reply.
/// `None` means the user cancelled.
pub trait NamePrompt {
    fn confirm_name(&self, suggestion: &str) -> Option<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractVariableParams {
    /// The confirmed variable name, without the `$` sigil (a pasted leading
    /// `$` is tolerated and stripped).
    pub name: String,
    /// Primary selection; its start line decides where the declaration goes.
    pub selection: TextRange,
    /// Additional cursor selections, replaced together with the primary one.
    /// Every cursor must select the same text as the primary selection.
    pub extra_selections: Vec<TextRange>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// Declaration insert plus one replacement per cursor, normalized into a
    /// single atomic batch.
    pub edit: WorkspaceEdit,
    /// The validated variable name, without the `$` sigil.
    pub name: String,
}

/// Whether the quick-fix should be offered for `selection` at all.
///
/// Stateless and independent of inference: the selection must be non-empty,
/// must not contain `=` (assignments are not expressions worth extracting),
/// and a one-character selection must be a numeric literal rather than a
/// stray identifier character.
pub fn is_refactor_candidate(selection: &str) -> bool {
    if selection.is_empty() || selection.contains('=') {
        return false;
    }

    let mut chars = selection.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => only.is_ascii_digit(),
        _ => true,
    }
}

/// Builds the extract-variable edit for an already-confirmed name.
///
/// The returned batch inserts `<indent>$name = <expr>;<newline>` above the
/// enclosing statement (walking out of multi-line argument lists, see
/// [`declaration_insertion_point`]) and replaces every cursor selection with
/// `$name`.
pub fn extract_variable(
    file: &FileId,
    text: &str,
    config: &RefactorConfig,
    params: ExtractVariableParams,
) -> Result<ExtractOutcome, RefactorError> {
    let name = validate_php_identifier(&params.name)?;

    // A trailing `;` (and surrounding whitespace) is part of the statement,
    // not of the expression being extracted: it stays in place while the
    // expression moves into the declaration.
    let selection = trim_selection(text, params.selection)?;
    let expr_text = &text[selection.start..selection.end];

    let mut replaced = vec![selection];
    for extra in &params.extra_selections {
        let extra = trim_selection(text, *extra)?;
        if &text[extra.start..extra.end] != expr_text {
            return Err(RefactorError::SelectionMismatch);
        }
        replaced.push(extra);
    }

    let index = LineIndex::new(text);
    let newline = match config.editor.newline.as_deref() {
        Some(newline) => newline.to_string(),
        None => NewlineStyle::detect(text).as_str().to_string(),
    };
    let selection_line = index.line_col(TextSize::from(selection.start as u32)).line;
    let point = declaration_insertion_point(text, &index, selection_line, &newline);

    let declaration = format!(
        "{indent}${name} = {expr_text};{newline}",
        indent = point.indent,
        newline = point.newline,
    );

    let replacement = format!("${name}");
    let mut edits = vec![TextEdit::insert(file.clone(), point.offset, declaration)];
    for range in replaced {
        edits.push(TextEdit::replace(file.clone(), range, replacement.clone()));
    }

    // The insert and the replacements are one refactoring; normalization
    // guarantees the host can apply them as one atomic batch.
    let mut edit = WorkspaceEdit::new(edits);
    edit.normalize()?;

    tracing::debug!(%name, line = point.line, "built extract-variable edit");
    Ok(ExtractOutcome { edit, name })
}

/// The full quick-fix flow: infer a suggestion, confirm it through `prompt`,
/// then build the edit.
///
/// Returns `Ok(None)` when the prompt is cancelled or answered with an empty
/// string; cancellation is a clean no-op, not an error.
pub fn run_extract_variable(
    file: &FileId,
    text: &str,
    config: &RefactorConfig,
    selections: &[TextRange],
    prompt: &dyn NamePrompt,
) -> Result<Option<ExtractOutcome>, RefactorError> {
    let (primary, extra) = selections.split_first().ok_or(RefactorError::InvalidSelection)?;

    let trimmed = trim_selection(text, *primary)?;
    let expr_text = &text[trimmed.start..trimmed.end];
    let fragments = infer_fragments(expr_text);
    let suggestion = if fragments.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        format_variable_name(&fragments, &config.naming)
    };
    tracing::debug!(expr = expr_text, %suggestion, "inferred variable name");

    let Some(answer) = prompt.confirm_name(&suggestion) else {
        return Ok(None);
    };
    if answer.trim().is_empty() {
        return Ok(None);
    }

    extract_variable(
        file,
        text,
        config,
        ExtractVariableParams {
            name: answer,
            selection: *primary,
            extra_selections: extra.to_vec(),
        },
    )
    .map(Some)
}

fn selected_text(text: &str, selection: TextRange) -> Result<&str, RefactorError> {
    if selection.start > selection.end {
        return Err(RefactorError::InvalidSelection);
    }
    let selected = text
        .get(selection.start..selection.end)
        .ok_or(RefactorError::InvalidSelection)?;
    if selected.is_empty() {
        return Err(RefactorError::InvalidSelection);
    }
    Ok(selected)
}

/// Shrinks `selection` to the expression it covers: surrounding whitespace
/// and any trailing semicolons are excluded.
fn trim_selection(text: &str, selection: TextRange) -> Result<TextRange, RefactorError> {
    let selected = selected_text(text, selection)?;

    let trimmed = selected.trim_start();
    let start = selection.start + (selected.len() - trimmed.len());
    let trimmed = trimmed.trim_end_matches(|c: char| c.is_whitespace() || c == ';');
    if trimmed.is_empty() {
        return Err(RefactorError::InvalidSelection);
    }

    Ok(TextRange::new(start, start + trimmed.len()))
}

fn validate_php_identifier(name: &str) -> Result<String, RefactorError> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);

    let invalid = |reason| RefactorError::InvalidIdentifier {
        name: name.trim().to_string(),
        reason,
    };

    let mut chars = trimmed.chars();
    let first = chars.next().ok_or_else(|| invalid("name is empty"))?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid("must start with a letter or underscore"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("may only contain letters, digits, and underscores"));
    }

    Ok(trimmed.to_string())
}
