//! Placement of the new declaration line.

use pharos_core::LineIndex;

/// Where a new declaration line goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Line the declaration is inserted above. The column is always 0.
    pub line: u32,
    /// Byte offset of the start of that line.
    pub offset: usize,
    /// Leading whitespace of that line, reused for the declaration.
    pub indent: String,
    /// Line ending appended to the declaration.
    pub newline: String,
}

/// Finds the line a new declaration should be inserted above.
///
/// Starting from `selection_line`, while the right-trimmed candidate line ends
/// with `,` the candidate moves one line up. This walks backward out of a
/// multi-line call-argument or array-literal context, so the declaration lands
/// above the whole statement instead of mid-argument-list. The walk clamps at
/// line 0.
///
/// `text` must be the same snapshot used to construct `index`.
pub fn declaration_insertion_point(
    text: &str,
    index: &LineIndex,
    selection_line: u32,
    newline: &str,
) -> InsertionPoint {
    let last_line = index.line_count() - 1;
    let mut line = selection_line.min(last_line);

    while line > 0 && ends_with_comma(index.line_text(text, line).unwrap_or("")) {
        line -= 1;
    }

    let line_text = index.line_text(text, line).unwrap_or("");
    let indent: String = line_text
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    InsertionPoint {
        line,
        offset: index
            .line_start(line)
            .map(|offset| u32::from(offset) as usize)
            .unwrap_or(0),
        indent,
        newline: newline.to_string(),
    }
}

fn ends_with_comma(line: &str) -> bool {
    line.trim_end().ends_with(',')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn point(text: &str, selection_line: u32) -> InsertionPoint {
        let index = LineIndex::new(text);
        declaration_insertion_point(text, &index, selection_line, "\n")
    }

    #[test]
    fn stays_on_a_plain_statement_line() {
        let text = "<?php\n    $sum = 1;\n    echo $order->getTotal();\n";
        let found = point(text, 2);
        assert_eq!(found.line, 2);
        assert_eq!(found.indent, "    ");
        assert_eq!(found.offset, text.find("    echo").unwrap());
    }

    #[test]
    fn walks_out_of_a_multi_line_argument_list() {
        let text = "<?php\n$total = compute(\n    $base,\n    $order->getTax(),\n);\n";
        let found = point(text, 3);
        // Line 3 and line 2 both end with a comma; line 1 opens the call.
        assert_eq!(found.line, 1);
        assert_eq!(found.indent, "");
        assert_eq!(found.offset, text.find("$total").unwrap());
    }

    #[test]
    fn trailing_whitespace_does_not_hide_the_comma() {
        let text = "call(\n    $a,   \n    $b\n);\n";
        let found = point(text, 1);
        assert_eq!(found.line, 0);
    }

    #[test]
    fn walk_clamps_at_the_first_line() {
        let text = "$a,\n$b,\n$c\n";
        let found = point(text, 1);
        assert_eq!(found.line, 0);
        assert_eq!(found.offset, 0);
    }

    #[test]
    fn indentation_includes_tabs() {
        let text = "fn()\n\t\t$x->getY();\n";
        let found = point(text, 1);
        assert_eq!(found.indent, "\t\t");
    }

    #[test]
    fn selection_line_past_eof_is_clamped() {
        let text = "only line";
        let found = point(text, 9);
        assert_eq!(found.line, 0);
        assert_eq!(found.offset, 0);
    }
}
