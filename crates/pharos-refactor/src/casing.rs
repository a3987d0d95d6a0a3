//! Naming-policy formatting for inferred name fragments.

use pharos_config::{NamingConfig, NamingStyle};

/// Joins inferred name fragments into a single identifier according to the
/// naming policy.
///
/// Only the last `naming.pieces` fragments participate, so long getter chains
/// are bounded to a configured number of segments. A single surviving fragment
/// is returned unchanged whatever the configured style.
///
/// Callers must not pass an empty slice; inference reports "no match" with an
/// empty vector and the caller substitutes the default name before formatting.
pub fn format_variable_name(fragments: &[String], naming: &NamingConfig) -> String {
    debug_assert!(!fragments.is_empty(), "fragments must be non-empty");

    let pieces = naming.pieces.max(1);
    let kept = &fragments[fragments.len().saturating_sub(pieces)..];

    match kept {
        [] => String::new(),
        [single] => single.clone(),
        _ => join_fragments(kept, naming.style),
    }
}

fn join_fragments(fragments: &[String], style: NamingStyle) -> String {
    match style {
        NamingStyle::LowerCamelCase => {
            let mut out = fragments[0].to_lowercase();
            for fragment in &fragments[1..] {
                out.push_str(&capitalize(fragment));
            }
            out
        }
        NamingStyle::CamelCase => fragments.iter().map(|f| capitalize(f)).collect(),
        NamingStyle::SnakeCase => joined_lowercase(fragments, "_"),
        NamingStyle::KebabCase => joined_lowercase(fragments, "-"),
    }
}

/// Uppercases the first character only; the rest of the fragment is preserved
/// verbatim so interior casing like `productsAndTaxes` survives.
fn capitalize(fragment: &str) -> String {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn joined_lowercase(fragments: &[String], separator: &str) -> String {
    fragments
        .iter()
        .map(|f| f.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}
