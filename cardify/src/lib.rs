pub mod anchor;
pub mod block;
pub mod document;
pub mod error;
pub mod link;
pub mod lint;
pub mod separator;

pub use anchor::{ANCHOR_LEN, Reconciled, generate_anchor, reconcile, reconcile_body};
pub use block::{Block, Segmentation, count_blocks, segment};
pub use document::{Document, split};
pub use error::{SegmentError, UserInputError};
pub use link::{LinkedBlock, artifact_file_name, build_linked_block, linked_blocks, sanitize};
pub use separator::{Separator, SeparatorPreset};

/// Sigil that opens an anchor marker line (`^<token>`).
pub const ANCHOR_SIGIL: char = '^';
