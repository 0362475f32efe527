use std::ops::Range;

/// Problems caused by what the user handed us: a bad separator, a document
/// that cannot be split into cards.
#[derive(Debug, thiserror::Error)]
pub enum UserInputError {
    #[error("invalid separator pattern `{pattern}`: {reason}")]
    InvalidSeparator { pattern: String, reason: String },

    #[error("unknown separator preset `{0}` (expected `empty line` or `---`)")]
    UnknownPreset(String),

    #[error("document not found: {0}")]
    DocumentMissing(String),

    #[error("not a markdown document: {0}")]
    NotMarkdown(String),
}

/// Internal invariant violations raised by segmentation and link building.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    /// The separator list does not line up with the block list. A single
    /// split-with-matches pass never produces this.
    #[error(
        "segmentation consistency error: {separators} separator(s) for {blocks} block(s)"
    )]
    Consistency { blocks: usize, separators: usize },

    #[error("block {index} has no anchor (bytes {span:?}); reconcile before linking")]
    MissingAnchor { index: usize, span: Range<usize> },
}
