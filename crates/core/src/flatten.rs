//! Flattening of slide body blocks into one text buffer plus style ranges.
//!
//! Offsets are counted in UTF-16 code units, the unit the remote document
//! API uses for text indices. The bullet glyphs are one unit each, but the
//! statistics marker lies outside the Basic Multilingual Plane and takes two,
//! so counting `char`s or bytes here would shift every later range.
//!
//! # Example output
//! ```text
//! Opening paragraph
//!
//! • Main point
//!     ◦ Detail
//!
//! Key Statistics:
//! 📊 42% adoption
//!
//!
//! Closing remark
//! ```

use crate::types::{ContentBlock, StyleKind, StyleRange};
use serde::{Deserialize, Serialize};

/// Prefix for a main bullet.
pub const BULLET_PREFIX: &str = "• ";

/// Prefix for a sub-bullet.
pub const SUBBULLET_PREFIX: &str = "    ◦ ";

/// Header line introducing a statistics block.
pub const STATS_HEADING: &str = "Key Statistics:\n";

/// Prefix for each statistic.
pub const STATS_PREFIX: &str = "📊 ";

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Flattened body text and the style ranges covering it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedText {
    pub text: String,
    pub ranges: Vec<StyleRange>,
}

impl FlattenedText {
    /// Length of the text in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        utf16_len(&self.text)
    }

    /// Whether there is no body text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check that ranges are sorted, disjoint and inside the text.
    pub fn ranges_are_consistent(&self) -> bool {
        let len = self.len_utf16();
        let mut previous_end = 0;

        for range in &self.ranges {
            if range.start < previous_end || range.end < range.start || range.end > len {
                return false;
            }
            previous_end = range.end;
        }

        true
    }
}

/// Running buffer that records a range for each tagged emission.
#[derive(Debug, Default)]
struct Emitter {
    text: String,
    offset: usize,
    ranges: Vec<StyleRange>,
}

impl Emitter {
    fn emit(&mut self, chunk: &str, kind: Option<StyleKind>) {
        let start = self.offset;
        self.text.push_str(chunk);
        self.offset += utf16_len(chunk);

        if let Some(kind) = kind {
            self.ranges.push(StyleRange::new(start, self.offset, kind));
        }
    }

    /// Trim surrounding whitespace, shifting and clamping ranges to match.
    fn finish(self) -> FlattenedText {
        let trimmed = self.text.trim();
        let lead_bytes = self.text.len() - self.text.trim_start().len();
        let lead = utf16_len(&self.text[..lead_bytes]);
        let text = trimmed.to_string();
        let len = utf16_len(&text);

        let ranges = self
            .ranges
            .into_iter()
            .filter_map(|mut range| {
                range.start = range.start.saturating_sub(lead);
                range.end = range.end.saturating_sub(lead).min(len);
                (range.start < range.end).then_some(range)
            })
            .collect();

        FlattenedText { text, ranges,
        }
    }
}

/// Converts ordered content blocks into slide body text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFlattener;

impl TextFlattener {
    /// Create a new flattener.
    pub fn new() -> Self {
        Self
    }

    /// Flatten blocks into text plus sorted, non-overlapping style ranges.
    ///
    /// The output depends only on `blocks`, so repeated calls yield
    /// identical results.
    pub fn flatten(&self, blocks: &[ContentBlock]) -> FlattenedText {
        let mut out = Emitter::default();

        for block in blocks {
            match block {
                ContentBlock::Paragraph { text } => {
                    out.emit(&format!("{}\n\n", text), Some(StyleKind::Paragraph));
                }
                ContentBlock::BulletList { items } => {
                    for item in items {
                        out.emit(
                            &format!("{}{}\n", BULLET_PREFIX, item.text),
                            Some(StyleKind::Bullet),
                        );
                        for subitem in &item.subitems {
                            out.emit(
                                &format!("{}{}\n", SUBBULLET_PREFIX, subitem),
                                Some(StyleKind::Subbullet),
                            );
                        }
                    }
                    out.emit("\n", None);
                }
                ContentBlock::Stats { items } => {
                    out.emit(STATS_HEADING, Some(StyleKind::Heading));
                    for stat in items {
                        out.emit(&format!("{}{}\n", STATS_PREFIX, stat), Some(StyleKind::Stats));
                    }
                    out.emit("\n", None);
                }
                ContentBlock::Conclusion { text } => {
                    out.emit(&format!("\n{}\n", text), None);
                }
            }
        }

        out.finish()
    }
}
