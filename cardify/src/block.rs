use std::ops::Range;

use crate::ANCHOR_SIGIL;
use crate::error::SegmentError;
use crate::separator::Separator;

/// Marker line that announces a card title on the following quoted line.
const COMMENT_MARKER: &str = "%%COMMENT%%";

/// The text between two separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub text: String,
    /// Byte span within the segmented body.
    pub span: Range<usize>,
}

impl Block {
    pub fn new(text: impl Into<String>, span: Range<usize>) -> Self {
        Block {
            text: text.into(),
            span,
        }
    }

    /// True when the block is all whitespace. Empty blocks never get
    /// anchors and never become artifacts.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The first anchor token in the block, if any.
    pub fn anchor(&self) -> Option<&str> {
        extract_anchor(&self.text)
    }

    /// The card title from a `> %%COMMENT%%` / `> <title>` pair, if any.
    pub fn comment(&self) -> Option<&str> {
        extract_comment(&self.text)
    }
}

/// A body cut into blocks, with the literal separator text that sat between
/// each consecutive pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub blocks: Vec<Block>,
    pub separators: Vec<String>,
}

impl Segmentation {
    /// Assemble a segmentation from externally produced parts, checking that
    /// there is exactly one separator between each pair of blocks.
    pub fn from_parts(blocks: Vec<Block>, separators: Vec<String>) -> Result<Self, SegmentError> {
        check_alignment(&blocks, &separators)?;
        Ok(Segmentation { blocks, separators })
    }

    /// Blocks with card content, in document order.
    pub fn non_empty(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !b.is_empty())
    }
}

pub(crate) fn check_alignment(blocks: &[Block], separators: &[String]) -> Result<(), SegmentError> {
    if blocks.len() != separators.len() + 1 {
        return Err(SegmentError::Consistency {
            blocks: blocks.len(),
            separators: separators.len(),
        });
    }
    Ok(())
}

/// Split `body` on every non-overlapping match of the separator. Empty blocks
/// are kept so block `i` and block `i + 1` are always joined by separator `i`.
pub fn segment(body: &str, separator: &Separator) -> Segmentation {
    let mut blocks = Vec::new();
    let mut separators = Vec::new();
    let mut start = 0;

    for m in separator.regex().find_iter(body) {
        blocks.push(Block::new(&body[start..m.start()], start..m.start()));
        separators.push(m.as_str().to_string());
        start = m.end();
    }
    blocks.push(Block::new(&body[start..], start..body.len()));

    Segmentation { blocks, separators }
}

/// Number of blocks with card content.
pub fn count_blocks(body: &str, separator: &Separator) -> usize {
    segment(body, separator).non_empty().count()
}

/// Title from the first `> %%COMMENT%%` line immediately followed by a
/// quoted `> <title>` line.
pub fn extract_comment(text: &str) -> Option<&str> {
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if unquote(line) != Some(COMMENT_MARKER) {
            continue;
        }
        if let Some(title) = lines.peek().copied().and_then(unquote) {
            if !title.is_empty() {
                return Some(title);
            }
        }
    }
    None
}

fn unquote(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix('>').map(str::trim)
}

/// Token of the first `^<token>` line.
pub fn extract_anchor(text: &str) -> Option<&str> {
    text.lines().find_map(parse_anchor_line)
}

/// Every anchor marker in the block with its byte span relative to `text`.
pub fn anchor_lines(text: &str) -> Vec<(&str, Range<usize>)> {
    let mut found = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if let Some(token) = parse_anchor_line(line) {
            found.push((token, offset..offset + 1 + token.len()));
        }
        offset += line.len();
    }
    found
}

fn parse_anchor_line(line: &str) -> Option<&str> {
    let token = line.strip_prefix(ANCHOR_SIGIL)?.trim_end();
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}
