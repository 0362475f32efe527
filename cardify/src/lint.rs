use std::collections::HashMap;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::block::{Block, anchor_lines, segment};
use crate::document::split;
use crate::separator::Separator;

/// What is wrong with a card's anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// No `^token` line; export would append one.
    MissingAnchor,
    /// A further anchor line after the one that is used.
    ExtraAnchor { token: String, kept: String },
    /// The card's anchor already belongs to an earlier card.
    DuplicateAnchor {
        token: String,
        first_card: usize,
        first_span: Range<usize>,
    },
}

/// One problem on one card. Spans are offsets into the full note text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Position of the card among the non-empty blocks.
    pub card: usize,
    pub problem: Problem,
    pub span: Range<usize>,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self.problem {
            Problem::DuplicateAnchor { .. } => Severity::Error,
            Problem::MissingAnchor | Problem::ExtraAnchor { .. } => Severity::Warning,
        }
    }

    /// Duplicates break links; the rest are fixed up by an export.
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn message(&self) -> String {
        match &self.problem {
            Problem::MissingAnchor => format!("card {} has no anchor", self.card),
            Problem::ExtraAnchor { token, .. } => {
                format!("card {} has a second anchor `^{}`", self.card, token)
            }
            Problem::DuplicateAnchor {
                token, first_card, ..
            } => format!("anchor `^{}` is already used by card {}", token, first_card),
        }
    }

    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let primary = Label::primary(file_id, self.span.clone());
        let diagnostic = Diagnostic::new(self.severity()).with_message(self.message());
        match &self.problem {
            Problem::MissingAnchor => diagnostic
                .with_labels(vec![primary.with_message("card without anchor")])
                .with_notes(vec!["`cardify export` will append one".to_string()]),
            Problem::ExtraAnchor { kept, .. } => diagnostic
                .with_labels(vec![primary.with_message("ignored")])
                .with_notes(vec![format!("only `^{}` is used when linking", kept)]),
            Problem::DuplicateAnchor { first_span, .. } => diagnostic.with_labels(vec![
                primary.with_message("duplicate"),
                Label::secondary(file_id, first_span.clone()).with_message("first used here"),
            ]),
        }
    }
}

/// Check every card of a note for missing, extra and shared anchors.
pub fn check(text: &str, separator: &Separator) -> Vec<Finding> {
    let document = split(text);
    let offset = document.body_offset();
    let segmentation = segment(&document.body, separator);

    let mut findings = Vec::new();
    let mut seen: HashMap<&str, (usize, Range<usize>)> = HashMap::new();

    for (card, block) in segmentation.non_empty().enumerate() {
        let anchors = anchor_lines(&block.text);
        let Some((first, first_span)) = anchors.first().cloned() else {
            findings.push(Finding {
                card,
                problem: Problem::MissingAnchor,
                span: shift(&trimmed_span(block), offset),
            });
            continue;
        };

        let base = block.span.start + offset;
        for (token, span) in anchors.iter().skip(1) {
            findings.push(Finding {
                card,
                problem: Problem::ExtraAnchor {
                    token: token.to_string(),
                    kept: first.to_string(),
                },
                span: shift(span, base),
            });
        }

        let first_span = shift(&first_span, base);
        match seen.get(first) {
            Some((first_card, earlier)) => findings.push(Finding {
                card,
                problem: Problem::DuplicateAnchor {
                    token: first.to_string(),
                    first_card: *first_card,
                    first_span: earlier.clone(),
                },
                span: first_span,
            }),
            None => {
                seen.insert(first, (card, first_span));
            }
        }
    }

    findings
}

fn shift(span: &Range<usize>, by: usize) -> Range<usize> {
    span.start + by..span.end + by
}

// Span of the block without surrounding blank lines, so the label lands on
// the card text rather than the separator.
fn trimmed_span(block: &Block) -> Range<usize> {
    let start = block.text.len() - block.text.trim_start().len();
    let end = block.text.trim_end().len();
    block.span.start + start..block.span.start + end.max(start)
}
