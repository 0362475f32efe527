use cardify::lint::{Problem, check};
use cardify::{Separator, SeparatorPreset};
use codespan_reporting::diagnostic::Severity;

fn empty_line() -> Separator {
    Separator::preset(SeparatorPreset::EmptyLine)
}

#[test]
fn anchored_note_is_clean() {
    assert!(check("A\n^a\n\nB\n^b", &empty_line()).is_empty());
}

#[test]
fn missing_anchor_is_a_warning_on_the_card_text() {
    let text = "---\na: 1\n---\nCard\n\n";
    let findings = check(text, &empty_line());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].problem, Problem::MissingAnchor);
    assert_eq!(findings[0].severity(), Severity::Warning);
    assert_eq!(&text[findings[0].span.clone()], "Card");
    assert!(!findings[0].is_error());
}

#[test]
fn duplicate_anchor_is_an_error() {
    let text = "A\n^dup\n\nB\n^dup\n\nC\n^c";
    let findings = check(text, &empty_line());
    assert_eq!(findings.len(), 1);
    assert!(findings[0].is_error());
    assert_eq!(findings[0].card, 1);
    assert_eq!(findings[0].message(), "anchor `^dup` is already used by card 0");
    assert_eq!(&text[findings[0].span.clone()], "^dup");

    let diagnostic = findings[0].to_diagnostic(0);
    assert_eq!(diagnostic.labels.len(), 2);
    assert_eq!(diagnostic.labels[1].range, 2..6);
}

#[test]
fn second_anchor_line_is_flagged() {
    let text = "A\n^one\n^two";
    let findings = check(text, &empty_line());
    assert_eq!(findings.len(), 1);
    assert_eq!(&text[findings[0].span.clone()], "^two");
    assert_eq!(
        findings[0].problem,
        Problem::ExtraAnchor {
            token: "two".to_string(),
            kept: "one".to_string()
        }
    );
    assert_eq!(
        findings[0].to_diagnostic(0).notes,
        vec!["only `^one` is used when linking".to_string()]
    );
}

#[test]
fn findings_convert_to_diagnostics() {
    let findings = check("A", &empty_line());
    let diagnostic = findings[0].to_diagnostic(3);
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.labels[0].file_id, 3);
    assert_eq!(diagnostic.labels[0].range, 0..1);
}
