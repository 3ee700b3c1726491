//! Validation and size limiting for generated slide content.
//!
//! Generated outlines are untrusted: slides may lack a title, bullet lists
//! may run far past what fits on a slide, and paragraphs may be essays.
//! The normalizer rejects the first and trims the others.

use crate::error::{Error, Result};
use crate::types::{BulletItem, ContentBlock, PresentationContent, SlideContent};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, LazyLock};

/// Regex matching the end of a sentence: terminal punctuation followed by
/// whitespace or end of text.
static SENTENCE_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").unwrap());

/// Suffix appended to truncated bullet and statistic text.
const ELLIPSIS: &str = "...";

/// Block type names accepted in generated content.
const KNOWN_BLOCK_TYPES: &[&str] = &["paragraph", "bullets", "stats", "conclusion"];

/// Size limits applied to every slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerLimits {
    /// Maximum bullets (or statistics) kept per block.
    pub max_points: usize,

    /// Maximum characters per bullet, sub-bullet or statistic.
    pub max_point_length: usize,

    /// Sentences kept when a free-text block is summarized.
    pub max_sentences: usize,

    /// Free-text blocks longer than this many characters are summarized.
    pub summarize_threshold: usize,
}

impl Default for NormalizerLimits {
    fn default() -> Self {
        Self {
            max_points: 10,
            max_point_length: 200,
            max_sentences: 3,
            summarize_threshold: 200,
        }
    }
}

/// Shortens long free text to its leading sentences.
pub trait Summarizer: Send + Sync {
    /// Return `text` reduced to at most `max_sentences` sentences.
    fn summarize(&self, text: &str, max_sentences: usize) -> Result<String>;
}

/// Keeps the first sentences of a text, split on terminal punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSummarizer;

impl SentenceSummarizer {
    /// Split text into trimmed, non-empty sentences.
    fn sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in SENTENCE_END_REGEX.find_iter(text) {
            let sentence = text[start..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = m.end();
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }

        sentences
    }
}

impl Summarizer for SentenceSummarizer {
    fn summarize(&self, text: &str, max_sentences: usize) -> Result<String> {
        if max_sentences == 0 {
            return Err(Error::Summarize(
                "at least one sentence must be kept".to_string(),
            ));
        }

        let sentences = Self::sentences(text);
        if sentences.len() <= max_sentences {
            return Ok(text.to_string());
        }

        Ok(sentences[..max_sentences].join(" "))
    }
}

/// Validates slides and enforces the configured size limits.
#[derive(Clone)]
pub struct ContentNormalizer {
    limits: NormalizerLimits,
    summarizer: Arc<dyn Summarizer>,
}

impl std::fmt::Debug for ContentNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentNormalizer")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentNormalizer {
    /// Create a normalizer with default limits and the sentence summarizer.
    pub fn new() -> Self {
        Self {
            limits: NormalizerLimits::default(),
            summarizer: Arc::new(SentenceSummarizer),
        }
    }

    /// Set the maximum number of bullets per list.
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.limits.max_points = max_points.max(1);
        self
    }

    /// Set the maximum characters per bullet before truncation.
    pub fn with_max_point_length(mut self, max_point_length: usize) -> Self {
        self.limits.max_point_length = max_point_length.max(1);
        self
    }

    /// Set how many sentences a summarized block keeps.
    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.limits.max_sentences = max_sentences.max(1);
        self
    }

    /// Set the length in characters above which free text is summarized.
    pub fn with_summarize_threshold(mut self, threshold: usize) -> Self {
        self.limits.summarize_threshold = threshold;
        self
    }

    /// Use a different summarizer for long free-text blocks.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Parse the raw text returned by a content generator.
    ///
    /// Fails with [`Error::UpstreamContent`] when the text is not JSON or lacks
    /// the `title`/`slides` keys. A slide that fails validation keeps its
    /// position and carries the failure, so building skips only that slide.
    pub fn parse_presentation(&self, raw: &str) -> Result<PresentationContent> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| Error::UpstreamContent(format!("not valid JSON: {}", e)))?;

        let object = value
            .as_object()
            .ok_or_else(|| Error::UpstreamContent("expected a JSON object".to_string()))?;

        let title = object
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::UpstreamContent("missing \"title\"".to_string()))?;

        let slides = object
            .get("slides")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::UpstreamContent("missing \"slides\" list".to_string()))?;

        let mut presentation = PresentationContent::new(title.trim());
        for (idx, raw_slide) in slides.iter().enumerate() {
            match self.normalize_raw_slide(raw_slide) {
                Ok(slide) => presentation.add_slide(slide),
                Err(e) => {
                    log::warn!("Generated slide {} is invalid: {}", idx + 1, e);
                    let title = raw_slide.get("title").and_then(Value::as_str).unwrap_or("");
                    let reason = match e {
                        Error::Validation(msg) => msg,
                        other => other.to_string(),
                    };
                    presentation.add_slide(SlideContent::rejected(title, reason));
                }
            }
        }

        log::debug!(
            "Parsed generated presentation \"{}\" with {} slides",
            presentation.title,
            presentation.slides.len()
        );

        Ok(presentation)
    }

    /// Validate and normalize one slide from its raw JSON form.
    pub fn normalize_raw_slide(&self, raw: &Value) -> Result<SlideContent> {
        let object = raw
            .as_object()
            .ok_or_else(|| Error::Validation("Slide content must be an object".to_string()))?;

        let title = object
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Validation("Slide must have a title".to_string()))?;

        let raw_blocks = object
            .get("content")
            .ok_or_else(|| Error::Validation("Slide must have content".to_string()))?
            .as_array()
            .ok_or_else(|| Error::Validation("Slide content must be a list".to_string()))?;

        let mut blocks = Vec::with_capacity(raw_blocks.len());
        for raw_block in raw_blocks {
            let block_type = raw_block.get("type").and_then(Value::as_str).unwrap_or("");
            if !KNOWN_BLOCK_TYPES.contains(&block_type) {
                log::warn!("Skipping content block of unknown type {:?}", block_type);
                continue;
            }

            let block: ContentBlock = serde_json::from_value(raw_block.clone()).map_err(|e| {
                Error::Validation(format!("malformed {} block: {}", block_type, e))
            })?;
            blocks.push(block);
        }

        let diagram_prompt = object
            .get("diagram_prompt")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut slide = SlideContent::new(title);
        slide.blocks = blocks;
        slide.diagram_prompt = diagram_prompt;
        self.normalize_slide(&slide)
    }

    /// Validate a typed slide and apply the size limits.
    pub fn normalize_slide(&self, slide: &SlideContent) -> Result<SlideContent> {
        if let Some(reason) = slide.rejection() {
            return Err(Error::Validation(reason.to_string()));
        }

        let title = slide.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Slide must have a title".to_string()));
        }

        let diagram_prompt = slide
            .diagram_prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let mut normalized = SlideContent::new(title);
        normalized.blocks = slide.blocks.iter().map(|b| self.normalize_block(b)).collect();
        normalized.diagram_prompt = diagram_prompt;
        Ok(normalized)
    }

    fn normalize_block(&self, block: &ContentBlock) -> ContentBlock {
        match block {
            ContentBlock::Paragraph { text } => ContentBlock::Paragraph {
                text: self.shorten_free_text(text),
            },
            ContentBlock::BulletList { items } => {
                if items.len() > self.limits.max_points {
                    log::debug!(
                        "Truncating bullet list from {} to {} items",
                        items.len(),
                        self.limits.max_points
                    );
                }
                ContentBlock::BulletList {
                    items: items
                        .iter()
                        .take(self.limits.max_points)
                        .map(|item| BulletItem {
                            text: self.truncate_point(&item.text),
                            subitems: item
                                .subitems
                                .iter()
                                .map(|s| self.truncate_point(s))
                                .collect(),
                        })
                        .collect(),
                }
            }
            ContentBlock::Stats { items } => ContentBlock::Stats {
                items: items
                    .iter()
                    .take(self.limits.max_points)
                    .map(|s| self.truncate_point(s))
                    .collect(),
            },
            ContentBlock::Conclusion { text } => ContentBlock::Conclusion {
                text: self.shorten_free_text(text),
            },
        }
    }

    /// Truncate point text to the configured length, marking the cut.
    fn truncate_point(&self, text: &str) -> String {
        if text.chars().count() <= self.limits.max_point_length {
            return text.to_string();
        }

        let mut truncated: String = text.chars().take(self.limits.max_point_length).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    }

    /// Summarize long free text; on failure the text is kept as-is.
    fn shorten_free_text(&self, text: &str) -> String {
        if text.chars().count() <= self.limits.summarize_threshold {
            return text.to_string();
        }

        match self.summarizer.summarize(text, self.limits.max_sentences) {
            Ok(summary) => summary,
            Err(e) => {
                log::warn!("Keeping unsummarized text: {}", e);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSummarizer;

    impl Summarizer for FailingSummarizer {
        fn summarize(&self, _text: &str, _max_sentences: usize) -> Result<String> {
            Err(Error::Summarize("tokenizer unavailable".to_string()))
        }
    }

    fn long_paragraph() -> String {
        let sentence = "Rust gives memory safety without garbage collection. ";
        sentence.repeat(6)
    }

    #[test]
    fn test_bullet_list_truncated_to_max_points() {
        let normalizer = ContentNormalizer::new();
        let items = (0..15).map(|i| BulletItem::new(format!("Point {}", i))).collect();
        let slide = SlideContent::new("Title").with_block(ContentBlock::BulletList { items });

        let normalized = normalizer.normalize_slide(&slide).unwrap();

        match &normalized.blocks[0] {
            ContentBlock::BulletList { items } => {
                assert_eq!(items.len(), 10);
                assert_eq!(items[9].text, "Point 9");
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_long_point_truncated_with_ellipsis() {
        let normalizer = ContentNormalizer::new();
        let slide = SlideContent::new("Title").with_block(ContentBlock::BulletList {
            items: vec![BulletItem::with_subitems("x".repeat(250), ["y".repeat(201)])],
        });

        let normalized = normalizer.normalize_slide(&slide).unwrap();

        let ContentBlock::BulletList { items } = &normalized.blocks[0] else {
            panic!("expected bullet list");
        };
        assert_eq!(items[0].text.chars().count(), 203);
        assert!(items[0].text.ends_with("..."));
        assert_eq!(&items[0].text[..200], "x".repeat(200));
        assert_eq!(items[0].subitems[0].chars().count(), 203);
    }

    #[test]
    fn test_point_at_limit_untouched() {
        let normalizer = ContentNormalizer::new();
        let text = "s".repeat(200);
        let slide = SlideContent::new("Title").with_block(ContentBlock::Stats {
            items: vec![text.clone()],
        });

        let normalized = normalizer.normalize_slide(&slide).unwrap();
        assert_eq!(normalized.blocks[0], ContentBlock::Stats { items: vec![text] });
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let normalizer = ContentNormalizer::new().with_max_point_length(3);
        assert_eq!(normalizer.truncate_point("héllo"), "hél...");
        assert_eq!(normalizer.truncate_point("hé"), "hé");
    }

    #[test]
    fn test_long_paragraph_is_summarized() {
        let normalizer = ContentNormalizer::new();
        let slide = SlideContent::new("Title").with_block(ContentBlock::Paragraph {
            text: long_paragraph(),
        });

        let normalized = normalizer.normalize_slide(&slide).unwrap();

        let expected = ["Rust gives memory safety without garbage collection."; 3].join(" ");
        assert_eq!(normalized.blocks[0], ContentBlock::Paragraph { text: expected });
    }

    #[test]
    fn test_summarizer_failure_keeps_original() {
        let normalizer = ContentNormalizer::new().with_summarizer(Arc::new(FailingSummarizer));
        let text = long_paragraph();
        let slide = SlideContent::new("Title").with_block(ContentBlock::Conclusion {
            text: text.clone(),
        });

        let normalized = normalizer.normalize_slide(&slide).unwrap();
        assert_eq!(normalized.blocks[0], ContentBlock::Conclusion { text });
    }

    #[test]
    fn test_sentence_summarizer_short_text_unchanged() {
        let text = "One. Two!  Three?";
        assert_eq!(SentenceSummarizer.summarize(text, 3).unwrap(), text);
    }

    #[test]
    fn test_sentence_summarizer_keeps_decimals() {
        let text = "Growth was 3.5 percent. Second. Third. Fourth";
        assert_eq!(
            SentenceSummarizer.summarize(text, 2).unwrap(),
            "Growth was 3.5 percent. Second."
        );
    }

    #[test]
    fn test_sentence_summarizer_rejects_zero() {
        assert!(matches!(
            SentenceSummarizer.summarize("One.", 0),
            Err(Error::Summarize(_))
        ));
    }

    #[test]
    fn test_blank_title_rejected() {
        let normalizer = ContentNormalizer::new();
        let result = normalizer.normalize_slide(&SlideContent::new("   "));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_raw_slide_missing_title() {
        let normalizer = ContentNormalizer::new();
        let result = normalizer.normalize_raw_slide(&json!({"content": []}));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_raw_slide_content_not_list() {
        let normalizer = ContentNormalizer::new();
        let result = normalizer.normalize_raw_slide(&json!({"title": "T", "content": "text"}));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_raw_slide_skips_unknown_blocks() {
        let normalizer = ContentNormalizer::new();
        let slide = normalizer
            .normalize_raw_slide(&json!({
                "title": " Overview ",
                "content": [
                    {"type": "quote", "text": "ignored"},
                    {"type": "paragraph", "text": "kept"}
                ],
                "diagram_prompt": "  "
            }))
            .unwrap();

        assert_eq!(slide.title, "Overview");
        assert_eq!(
            slide.blocks,
            vec![ContentBlock::Paragraph {
                text: "kept".to_string()
            }]
        );
        assert_eq!(slide.diagram_prompt, None);
    }

    #[test]
    fn test_raw_slide_malformed_block() {
        let normalizer = ContentNormalizer::new();
        let result = normalizer
            .normalize_raw_slide(&json!({"title": "T", "content": [{"type": "bullets"}]}));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_presentation_not_json() {
        let normalizer = ContentNormalizer::new();
        let result = normalizer.parse_presentation("Sure! Here is your outline:");
        assert!(matches!(result, Err(Error::UpstreamContent(_))));
    }

    #[test]
    fn test_parse_presentation_missing_keys() {
        let normalizer = ContentNormalizer::new();
        assert!(matches!(
            normalizer.parse_presentation(r#"{"title": "Deck"}"#),
            Err(Error::UpstreamContent(_))
        ));
        assert!(matches!(
            normalizer.parse_presentation(r#"{"slides": []}"#),
            Err(Error::UpstreamContent(_))
        ));
        assert!(matches!(
            normalizer.parse_presentation("[1, 2]"),
            Err(Error::UpstreamContent(_))
        ));
    }

    #[test]
    fn test_parse_presentation_keeps_invalid_slide_in_place() {
        let normalizer = ContentNormalizer::new();
        let raw = r#"{
            "title": "Deck",
            "slides": [
                {"title": "One", "content": []},
                {"content": []},
                {"title": "Three", "content": "not a list"},
                {"title": "Four", "content": [{"type": "bullets"}]}
            ]
        }"#;

        let presentation = normalizer.parse_presentation(raw).unwrap();

        assert_eq!(presentation.slides.len(), 4);
        assert_eq!(presentation.slides[0].rejection(), None);
        assert_eq!(presentation.slides[1].rejection(), Some("Slide must have a title"));
        assert_eq!(presentation.slides[2].title, "Three");
        assert_eq!(presentation.slides[2].rejection(), Some("Slide content must be a list"));
        assert!(presentation.slides[3].rejection().is_some());

        for slide in &presentation.slides[1..] {
            assert!(matches!(
                normalizer.normalize_slide(slide),
                Err(Error::Validation(_))
            ));
        }
    }

    #[test]
    fn test_typed_slide_without_title_rejected() {
        let normalizer = ContentNormalizer::new();
        let slide: SlideContent = serde_json::from_value(json!({"content": []})).unwrap();
        assert_eq!(slide.title, "");
        assert!(matches!(
            normalizer.normalize_slide(&slide),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_limit_setters_clamp_to_one() {
        let normalizer = ContentNormalizer::new()
            .with_max_points(0)
            .with_max_point_length(0)
            .with_max_sentences(0);
        assert_eq!(normalizer.limits.max_points, 1);
        assert_eq!(normalizer.limits.max_point_length, 1);
        assert_eq!(normalizer.limits.max_sentences, 1);

        let slide = SlideContent::new("Title").with_block(ContentBlock::BulletList {
            items: vec![BulletItem::new("a"), BulletItem::new("b")],
        });
        let normalized = normalizer.normalize_slide(&slide).unwrap();
        assert_eq!(
            normalized.blocks[0],
            ContentBlock::BulletList {
                items: vec![BulletItem::new("a")]
            }
        );
    }

    #[test]
    fn test_summarize_threshold_and_sentences_configurable() {
        let normalizer = ContentNormalizer::new()
            .with_summarize_threshold(10)
            .with_max_sentences(1);
        let slide = SlideContent::new("Title").with_block(ContentBlock::Paragraph {
            text: "First point here. Second point here.".to_string(),
        });

        let normalized = normalizer.normalize_slide(&slide).unwrap();
        assert_eq!(
            normalized.blocks[0],
            ContentBlock::Paragraph {
                text: "First point here.".to_string()
            }
        );
    }

    #[test]
    fn test_parse_presentation() {
        let normalizer = ContentNormalizer::new();
        let raw = r#"{
            "title": "Rust in Production",
            "slides": [
                {"title": "Intro", "content": [{"type": "paragraph", "text": "Hello"}]},
                {"title": "Memory", "content": [], "diagram_prompt": "borrow checker flow"}
            ]
        }"#;

        let presentation = normalizer.parse_presentation(raw).unwrap();

        assert_eq!(presentation.title, "Rust in Production");
        assert_eq!(presentation.slides.len(), 2);
        assert_eq!(presentation.slides[1].diagram_prompt(), Some("borrow checker flow"));
    }

    #[test]
    fn test_limits_deserialize_with_defaults() {
        let limits: NormalizerLimits = serde_json::from_str(r#"{"max_points": 5}"#).unwrap();
        assert_eq!(limits.max_points, 5);
        assert_eq!(limits.max_point_length, 200);
        assert_eq!(limits.max_sentences, 3);
    }
}
