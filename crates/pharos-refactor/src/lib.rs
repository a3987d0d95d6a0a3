//! Extract-variable refactoring engine for PHP documents.
//!
//! The engine is deliberately surface-level: it pattern-matches the selected
//! expression's text instead of parsing PHP. This crate exposes:
//! - name inference over raw expression text (`infer_fragments`)
//! - naming-policy formatting (`format_variable_name`)
//! - declaration placement (`declaration_insertion_point`)
//! - the quick-fix flow and eligibility predicate (`extract_variable`,
//!   `run_extract_variable`, `is_refactor_candidate`)
//! - the LSP boundary and action-offering surface (`lsp`)

mod casing;
mod edit;
mod extract_variable;
mod infer;
mod insertion;
pub mod lsp;

pub use casing::format_variable_name;
pub use edit::{apply_text_edits, EditError, FileId, TextEdit, TextRange, WorkspaceEdit};
pub use extract_variable::{
    extract_variable, is_refactor_candidate, run_extract_variable, ExtractOutcome,
    ExtractVariableParams, NamePrompt, RefactorError,
};
pub use infer::{infer_fragments, DEFAULT_NAME};
pub use insertion::{declaration_insertion_point, InsertionPoint};
