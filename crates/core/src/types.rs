//! Domain types for representing generated presentation content.

use serde::{Deserialize, Serialize};

/// An entire generated presentation, in slide order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationContent {
    /// Presentation title, used when creating the remote document.
    pub title: String,

    /// Slides in presentation order.
    pub slides: Vec<SlideContent>,
}

impl PresentationContent {
    /// Create an empty presentation with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: SlideContent) {
        self.slides.push(slide);
    }

    /// Number of slides that ask for a diagram.
    pub fn diagram_count(&self) -> usize {
        self.slides.iter().filter(|s| s.has_diagram()).count()
    }
}

/// A single slide: title, ordered body blocks and an optional diagram prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default)]
    pub title: String,

    /// Body blocks in reading order.
    #[serde(rename = "content", default)]
    pub blocks: Vec<ContentBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_prompt: Option<String>,

    /// Why the slide failed validation while its raw form was parsed.
    #[serde(skip)]
    pub(crate) rejection: Option<String>,
}

impl SlideContent {
    /// Create a slide with the given title and no body.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
            diagram_prompt: None,
            rejection: None,
        }
    }

    /// A slide kept in place of raw content that failed validation.
    pub(crate) fn rejected(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            ..Self::new(title)
        }
    }

    /// Append a body block.
    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Set the diagram prompt.
    pub fn with_diagram_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.diagram_prompt = Some(prompt.into());
        self
    }

    /// The diagram prompt, if present and non-empty.
    pub fn diagram_prompt(&self) -> Option<&str> {
        self.diagram_prompt.as_deref().filter(|p| !p.is_empty())
    }

    /// Validation failure recorded when the slide was parsed, if any.
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    /// Whether this slide asks for a diagram.
    pub fn has_diagram(&self) -> bool {
        self.diagram_prompt().is_some()
    }
}

/// One typed unit of slide body content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Free-running paragraph text.
    Paragraph { text: String },

    /// Bullet points, each with optional sub-bullets.
    #[serde(rename = "bullets")]
    BulletList { items: Vec<BulletItem> },

    /// Key statistics, one per line.
    Stats { items: Vec<String> },

    /// Closing remark or transition text.
    Conclusion { text: String },
}

/// A main bullet point with its sub-bullets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BulletItemRepr")]
pub struct BulletItem {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subitems: Vec<String>,
}

impl BulletItem {
    /// Create a bullet without sub-bullets.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subitems: Vec::new(),
        }
    }

    /// Create a bullet with sub-bullets.
    pub fn with_subitems<I, S>(text: impl Into<String>, subitems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            subitems: subitems.into_iter().map(Into::into).collect(),
        }
    }
}

/// Generated bullets are either a bare string or an object with sub-bullets.
#[derive(Deserialize)]
#[serde(untagged)]
enum BulletItemRepr {
    Plain(String),
    Nested {
        text: String,
        #[serde(default)]
        subitems: Vec<String>,
    },
}

impl From<BulletItemRepr> for BulletItem {
    fn from(repr: BulletItemRepr) -> Self {
        match repr {
            BulletItemRepr::Plain(text) => BulletItem::new(text),
            BulletItemRepr::Nested { text, subitems } => BulletItem { text, subitems },
        }
    }
}

/// Formatting intent attached to a span of flattened body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    Heading,
    Stats,
    Bullet,
    Subbullet,
    Paragraph,
}

/// A `[start, end)` span over flattened text, in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    pub kind: StyleKind,
}

impl StyleRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize, kind: StyleKind) -> Self {
        Self { start, end, kind }
    }

    /// Length in code units.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
