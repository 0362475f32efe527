use std::path::MAIN_SEPARATOR;

use crate::ANCHOR_SIGIL;
use crate::block::{Block, segment};
use crate::error::SegmentError;
use crate::separator::Separator;

/// Extension of generated card files.
pub const ARTIFACT_EXTENSION: &str = "md";

/// One card to materialize: an embed of the source block plus a title used
/// to name the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedBlock {
    /// Position among the non-empty blocks of the note.
    pub index: usize,
    /// Card title from the comment marker, empty when there is none.
    pub title: String,
    pub anchor: String,
    /// Embed reference, `![[<source>#^<anchor>]]`.
    pub link: String,
}

impl LinkedBlock {
    pub fn file_name(&self) -> String {
        artifact_file_name(self.index, &self.title)
    }
}

/// Build the card for a block that has already been reconciled.
pub fn build_linked_block(
    index: usize,
    block: &Block,
    source_name: &str,
) -> Result<LinkedBlock, SegmentError> {
    let anchor = block.anchor().ok_or_else(|| SegmentError::MissingAnchor {
        index,
        span: block.span.clone(),
    })?;
    Ok(LinkedBlock {
        index,
        title: block.comment().unwrap_or_default().to_string(),
        anchor: anchor.to_string(),
        link: format!("![[{}#{}{}]]", source_name, ANCHOR_SIGIL, anchor),
    })
}

/// Segment a reconciled body and build one card per non-empty block.
pub fn linked_blocks(
    body: &str,
    separator: &Separator,
    source_name: &str,
) -> Result<Vec<LinkedBlock>, SegmentError> {
    segment(body, separator)
        .non_empty()
        .enumerate()
        .map(|(index, block)| build_linked_block(index, block, source_name))
        .collect()
}

/// `<index>.md`, or `<index>-<title>.md` when the card has a title,
/// stripped of characters unsuitable for a file name.
pub fn artifact_file_name(index: usize, title: &str) -> String {
    let stem = if title.is_empty() {
        index.to_string()
    } else {
        format!("{}-{}", index, title)
    };
    sanitize(&format!("{}.{}", stem, ARTIFACT_EXTENSION))
}

/// Drop every character that is not a letter, digit, `_`, `.`, `-`,
/// whitespace or a path separator.
pub fn sanitize(name: &str) -> String {
    name.chars().filter(|&c| is_permitted(c)).collect()
}

fn is_permitted(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '_' | '.' | '-' | '/')
        || c == MAIN_SEPARATOR
}
