//! Core text-model types shared across Pharos crates.
//!
//! This crate is intentionally small: byte-offset line indexing, UTF-16
//! position conversions for the LSP boundary, and newline-style detection.

mod newline;
mod text;

pub use newline::NewlineStyle;
pub use text::{LineCol, LineIndex, Position};
pub use text_size::TextSize;
