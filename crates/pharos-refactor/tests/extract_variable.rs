use std::cell::RefCell;

use pharos_config::{NamingStyle, RefactorConfig};
use pharos_refactor::{
    apply_text_edits, extract_variable, run_extract_variable, ExtractVariableParams, FileId,
    NamePrompt, RefactorError, TextRange,
};
use pretty_assertions::assert_eq;

fn file() -> FileId {
    FileId::new("file:///order.php")
}

/// Removes `/*select*/ ... /*end*/` markers from a fixture and returns the
/// cleaned source plus the marked selection range.
fn strip_selection_markers(src: &str) -> (String, TextRange) {
    let start_marker = "/*select*/";
    let end_marker = "/*end*/";
    let start = src.find(start_marker).expect("start marker");
    let end = src.find(end_marker).expect("end marker");
    assert!(start < end, "expected start marker before end marker");

    let selection_start = start;
    let selection_end = selection_start + (end - (start + start_marker.len()));

    let mut cleaned = String::new();
    cleaned.push_str(&src[..start]);
    cleaned.push_str(&src[start + start_marker.len()..end]);
    cleaned.push_str(&src[end + end_marker.len()..]);

    (cleaned, TextRange::new(selection_start, selection_end))
}

/// Accepts whatever suggestion the engine proposes, recording it.
#[derive(Default)]
struct AcceptSuggestion {
    seen: RefCell<Option<String>>,
}

impl NamePrompt for AcceptSuggestion {
    fn confirm_name(&self, suggestion: &str) -> Option<String> {
        *self.seen.borrow_mut() = Some(suggestion.to_string());
        Some(suggestion.to_string())
    }
}

struct RenameTo(&'static str);

impl NamePrompt for RenameTo {
    fn confirm_name(&self, _suggestion: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

struct Cancel;

impl NamePrompt for Cancel {
    fn confirm_name(&self, _suggestion: &str) -> Option<String> {
        None
    }
}

struct AnswerEmpty;

impl NamePrompt for AnswerEmpty {
    fn confirm_name(&self, _suggestion: &str) -> Option<String> {
        Some("   ".to_string())
    }
}

#[test]
fn extracts_a_getter_call_into_a_declaration_above_the_statement() {
    let (src, selection) = strip_selection_markers(
        "<?php\nfunction handle($order) {\n    echo /*select*/$order->getTotal();/*end*/\n}\n",
    );

    let outcome = run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &RenameTo("total"),
    )
    .unwrap()
    .expect("prompt confirmed");

    assert_eq!(outcome.name, "total");
    let after = apply_text_edits(&src, &outcome.edit.edits).unwrap();
    assert_eq!(
        after,
        "<?php\nfunction handle($order) {\n    $total = $order->getTotal();\n    echo $total;\n}\n"
    );
}

#[test]
fn suggestion_follows_the_naming_policy() {
    let (src, selection) =
        strip_selection_markers("<?php\necho /*select*/$order->getTotal()/*end*/;\n");

    let prompt = AcceptSuggestion::default();
    let outcome = run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &prompt,
    )
    .unwrap()
    .expect("prompt confirmed");

    assert_eq!(prompt.seen.borrow().as_deref(), Some("orderTotal"));
    assert_eq!(outcome.name, "orderTotal");

    let mut snake = RefactorConfig::default();
    snake.naming.style = NamingStyle::SnakeCase;
    let prompt = AcceptSuggestion::default();
    run_extract_variable(&file(), &src, &snake, &[selection], &prompt)
        .unwrap()
        .expect("prompt confirmed");
    assert_eq!(prompt.seen.borrow().as_deref(), Some("order_total"));
}

#[test]
fn chained_getters_are_truncated_by_the_pieces_setting() {
    let (src, selection) = strip_selection_markers(
        "<?php\n$v = /*select*/$x->get2('a')->getId('b')->getAnotherProperty(f())->getB([1,'x'])/*end*/;\n",
    );

    let prompt = AcceptSuggestion::default();
    run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &prompt,
    )
    .unwrap()
    .expect("prompt confirmed");

    // Four fragments are inferred; the default policy keeps the last two.
    assert_eq!(prompt.seen.borrow().as_deref(), Some("anotherpropertyB"));
}

#[test]
fn unmatched_expressions_suggest_the_default_name() {
    let (src, selection) = strip_selection_markers("<?php\necho /*select*/1 + 2/*end*/;\n");

    let prompt = AcceptSuggestion::default();
    run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &prompt,
    )
    .unwrap()
    .expect("prompt confirmed");

    assert_eq!(prompt.seen.borrow().as_deref(), Some("variable"));
}

#[test]
fn declaration_is_hoisted_out_of_a_multi_line_argument_list() {
    let (src, selection) = strip_selection_markers(
        "<?php\n$sum = add(\n    $base,\n    /*select*/$order->getTax()/*end*/,\n);\n",
    );

    let outcome = run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &RenameTo("tax"),
    )
    .unwrap()
    .expect("prompt confirmed");

    let after = apply_text_edits(&src, &outcome.edit.edits).unwrap();
    assert_eq!(
        after,
        "<?php\n$tax = $order->getTax();\n$sum = add(\n    $base,\n    $tax,\n);\n"
    );
}

#[test]
fn every_cursor_is_replaced() {
    let src = "<?php\n$a = $o->getFee() + 1;\n$b = $o->getFee() + 2;\n";
    let first = src.find("$o->getFee()").unwrap();
    let second = src.rfind("$o->getFee()").unwrap();
    let len = "$o->getFee()".len();

    let outcome = run_extract_variable(
        &file(),
        src,
        &RefactorConfig::default(),
        &[
            TextRange::new(first, first + len),
            TextRange::new(second, second + len),
        ],
        &RenameTo("fee"),
    )
    .unwrap()
    .expect("prompt confirmed");

    let after = apply_text_edits(src, &outcome.edit.edits).unwrap();
    assert_eq!(
        after,
        "<?php\n$fee = $o->getFee();\n$a = $fee + 1;\n$b = $fee + 2;\n"
    );
}

#[test]
fn cursors_selecting_different_text_are_rejected() {
    let src = "<?php\n$a = $o->getFee();\n$b = $o->getTax();\n";
    let first = src.find("$o->getFee()").unwrap();
    let second = src.find("$o->getTax()").unwrap();
    let len = "$o->getFee()".len();

    let err = run_extract_variable(
        &file(),
        src,
        &RefactorConfig::default(),
        &[
            TextRange::new(first, first + len),
            TextRange::new(second, second + len),
        ],
        &RenameTo("fee"),
    )
    .unwrap_err();

    assert!(matches!(err, RefactorError::SelectionMismatch));
}

#[test]
fn cancelled_prompt_is_a_clean_no_op() {
    let (src, selection) =
        strip_selection_markers("<?php\necho /*select*/$order->getTotal()/*end*/;\n");
    let config = RefactorConfig::default();

    let cancelled = run_extract_variable(&file(), &src, &config, &[selection], &Cancel).unwrap();
    assert_eq!(cancelled, None);

    let empty = run_extract_variable(&file(), &src, &config, &[selection], &AnswerEmpty).unwrap();
    assert_eq!(empty, None);
}

#[test]
fn crlf_documents_keep_their_line_endings() {
    // Convert the fixture to CRLF before computing the selection offsets.
    let fixture = "<?php\necho /*select*/$order->getTotal()/*end*/;\n".replace('\n', "\r\n");
    let (src, selection) = strip_selection_markers(&fixture);

    let outcome = run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &RenameTo("total"),
    )
    .unwrap()
    .expect("prompt confirmed");

    let after = apply_text_edits(&src, &outcome.edit.edits).unwrap();
    assert_eq!(
        after,
        "<?php\r\n$total = $order->getTotal();\r\necho $total;\r\n"
    );
}

#[test]
fn configured_newline_overrides_detection() {
    let (src, selection) =
        strip_selection_markers("<?php\necho /*select*/$order->getTotal()/*end*/;\n");

    let mut config = RefactorConfig::default();
    config.editor.newline = Some("\r\n".to_string());

    let outcome = run_extract_variable(&file(), &src, &config, &[selection], &RenameTo("total"))
        .unwrap()
        .expect("prompt confirmed");

    let after = apply_text_edits(&src, &outcome.edit.edits).unwrap();
    assert_eq!(
        after,
        "<?php\n$total = $order->getTotal();\r\necho $total;\n"
    );
}

#[test]
fn first_line_selection_inserts_at_document_start() {
    let src = "$order->getTotal() + 1;\n";
    let selection = TextRange::new(0, "$order->getTotal()".len());

    let outcome = extract_variable(
        &file(),
        src,
        &RefactorConfig::default(),
        ExtractVariableParams {
            name: "total".to_string(),
            selection,
            extra_selections: Vec::new(),
        },
    )
    .unwrap();

    let after = apply_text_edits(src, &outcome.edit.edits).unwrap();
    assert_eq!(after, "$total = $order->getTotal();\n$total + 1;\n");
}

#[test]
fn confirmed_name_may_carry_the_sigil() {
    let (src, selection) =
        strip_selection_markers("<?php\necho /*select*/$order->getTotal()/*end*/;\n");

    let outcome = run_extract_variable(
        &file(),
        &src,
        &RefactorConfig::default(),
        &[selection],
        &RenameTo("$total"),
    )
    .unwrap()
    .expect("prompt confirmed");

    assert_eq!(outcome.name, "total");
    let after = apply_text_edits(&src, &outcome.edit.edits).unwrap();
    assert!(after.contains("$total = $order->getTotal();"));
}

#[test]
fn malformed_confirmed_names_are_rejected() {
    let (src, selection) =
        strip_selection_markers("<?php\necho /*select*/$order->getTotal()/*end*/;\n");

    for bad in ["2fast", "with space", "a-b"] {
        let err = run_extract_variable(
            &file(),
            &src,
            &RefactorConfig::default(),
            &[selection],
            &RenameTo(bad),
        )
        .unwrap_err();
        assert!(
            matches!(err, RefactorError::InvalidIdentifier { .. }),
            "expected InvalidIdentifier for {bad:?}"
        );
    }
}

#[test]
fn empty_selection_list_is_invalid() {
    let err = run_extract_variable(
        &file(),
        "<?php\n",
        &RefactorConfig::default(),
        &[],
        &RenameTo("x"),
    )
    .unwrap_err();
    assert!(matches!(err, RefactorError::InvalidSelection));
}
