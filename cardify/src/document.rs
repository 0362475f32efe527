use std::sync::LazyLock;

use regex::Regex;

/// Front matter fence at the very start of a note: `---`, content, `---`.
/// The closing fence is the first `---` after the opening line.
static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\s*\n[\s\S]*?\n?---").unwrap());

/// A note split into its metadata header and the card body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Front matter including both fences, kept verbatim.
    pub header: Option<String>,
    /// Everything after the header.
    pub body: String,
}

impl Document {
    /// Byte offset of the body within the original text.
    pub fn body_offset(&self) -> usize {
        self.header.as_ref().map_or(0, String::len)
    }

    /// Reassemble the note from its header and the given body.
    pub fn with_body(&self, body: &str) -> String {
        let mut text = String::with_capacity(self.body_offset() + body.len());
        if let Some(header) = &self.header {
            text.push_str(header);
        }
        text.push_str(body);
        text
    }

    pub fn to_text(&self) -> String {
        self.with_body(&self.body)
    }
}

/// Split raw note text into header and body. A missing header is the common
/// case, not an error.
pub fn split(raw: &str) -> Document {
    match FRONT_MATTER_RE.find(raw) {
        Some(m) => Document {
            header: Some(m.as_str().to_string()),
            body: raw[m.end()..].to_string(),
        },
        None => Document {
            header: None,
            body: raw.to_string(),
        },
    }
}
