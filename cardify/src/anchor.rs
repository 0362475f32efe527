use std::collections::HashSet;

use rand::Rng;

use crate::ANCHOR_SIGIL;
use crate::block::{Block, check_alignment, segment};
use crate::error::SegmentError;
use crate::separator::Separator;

/// Length of generated anchor tokens.
pub const ANCHOR_LEN: usize = 10;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Output of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The body with every non-empty block carrying an anchor.
    pub text: String,
    /// Tokens generated during this pass, in block order.
    pub added: Vec<String>,
}

impl Reconciled {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// A random base-36 token of `len` characters.
pub fn generate_anchor<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// A ready-to-paste `^<token>` marker.
pub fn insert_anchor<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}{}", ANCHOR_SIGIL, generate_anchor(rng, ANCHOR_LEN))
}

/// Give every non-empty block an anchor, keeping the ones already there,
/// and stitch the blocks back together with the separators they were split
/// on. Running this on its own output changes nothing.
pub fn reconcile<R: Rng + ?Sized>(
    blocks: &[Block],
    separators: &[String],
    rng: &mut R,
) -> Result<Reconciled, SegmentError> {
    check_alignment(blocks, separators)?;

    let mut used: HashSet<String> = blocks
        .iter()
        .filter_map(Block::anchor)
        .map(str::to_string)
        .collect();
    let mut text = String::with_capacity(
        blocks.iter().map(|b| b.text.len() + ANCHOR_LEN + 2).sum::<usize>()
            + separators.iter().map(String::len).sum::<usize>(),
    );
    let mut added = Vec::new();

    for (idx, block) in blocks.iter().enumerate() {
        text.push_str(&block.text);

        if !block.is_empty() && block.anchor().is_none() {
            let token = fresh_anchor(rng, &mut used);
            if !block.text.ends_with('\n') {
                text.push('\n');
            }
            text.push(ANCHOR_SIGIL);
            text.push_str(&token);
            added.push(token);
        }

        if let Some(sep) = separators.get(idx) {
            text.push_str(sep);
        }
    }

    Ok(Reconciled { text, added })
}

/// Segment `body` and reconcile the result.
pub fn reconcile_body<R: Rng + ?Sized>(
    body: &str,
    separator: &Separator,
    rng: &mut R,
) -> Result<Reconciled, SegmentError> {
    let segmentation = segment(body, separator);
    reconcile(&segmentation.blocks, &segmentation.separators, rng)
}

// Resample until the token is unused within this document.
fn fresh_anchor<R: Rng + ?Sized>(rng: &mut R, used: &mut HashSet<String>) -> String {
    loop {
        let token = generate_anchor(rng, ANCHOR_LEN);
        if used.insert(token.clone()) {
            return token;
        }
    }
}
