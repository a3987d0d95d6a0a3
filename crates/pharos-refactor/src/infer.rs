//! Name inference over raw expression text.
//!
//! The rules are deliberately surface-level: anchored regular expressions over
//! the selected text, looking at the shape of the final chain segment, then a
//! global getter scan. No attempt is made to parse PHP; argument lists are
//! skipped with a no-close-paren character class, never understood.

use std::sync::OnceLock;

use regex::Regex;

/// Identifier suggested when no inference rule matches.
pub const DEFAULT_NAME: &str = "variable";

/// `$base->getRest(...)`, anchored at the end of the selection.
///
/// The `get` prefix is matched case-insensitively and stripped, together with
/// any underscores that follow it. Argument contents and a trailing `;` are
/// ignored.
fn getter_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\$(\w*)->get_*(\w*)\([^)]*\);*$").expect("valid regex"))
}

/// `$base->property`, anchored at the end of the selection. A leading run of
/// underscores on the property is stripped.
fn property_access_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$(\w*)->_*(\w*);*$").expect("valid regex"))
}

/// Every `get<Name>(...)` occurrence anywhere in the selection, case-sensitive.
fn chained_getter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"get(\w*)\([^)]*\)").expect("valid regex"))
}

/// Proposes name fragments for a variable holding `expression`.
///
/// Rules are tried in order, first match wins:
/// 1. a getter call ending the expression (`[base, rest]`),
/// 2. a property access ending the expression (`[base, property]`),
/// 3. all chained getter calls anywhere in the expression, left to right.
///
/// An empty vector means no rule matched; callers fall back to
/// [`DEFAULT_NAME`].
pub fn infer_fragments(expression: &str) -> Vec<String> {
    if let Some(caps) = getter_call_re().captures(expression) {
        return vec![caps[1].to_string(), caps[2].to_string()];
    }

    if let Some(caps) = property_access_re().captures(expression) {
        return vec![caps[1].to_string(), caps[2].to_string()];
    }

    chained_getter_re()
        .captures_iter(expression)
        .map(|caps| caps[1].to_string())
        .collect()
}
