//! Operation batch construction for one slide.
//!
//! A slide is written in three batches:
//!
//! 1. [`slide_creation_batch`] creates the slide. Its reply carries the slide
//!    id, from which the backend resolves the title and body placeholders.
//! 2. [`BatchBuilder::content_batch`] inserts title and body text, then
//!    styles them. It can only be built once placeholders are known.
//! 3. [`diagram_batch`] places a diagram, after the content batch was
//!    accepted.

use crate::error::{Error, PlaceholderKind, Result};
use crate::flatten::FlattenedText;
use crate::layout::LayoutDecision;
use crate::operation::{Operation, OperationBatch, Phase, TextRange};
use crate::placement::{DiagramPlacement, PageGeometry};
use crate::style::StyleResolver;
use crate::types::SlideContent;

/// Resolved title and body element ids of a created slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub title_id: String,
    pub body_id: String,
}

/// Placeholder ids as reported by the document API; either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderLookup {
    pub title_id: Option<String>,
    pub body_id: Option<String>,
}

impl PlaceholderLookup {
    /// Require both placeholders.
    pub fn resolve(self, slide_id: &str) -> Result<Placeholders> {
        let missing = |kind| Error::PlaceholderResolution {
            slide_id: slide_id.to_string(),
            missing: kind,
        };

        let title_id = self.title_id.ok_or_else(|| missing(PlaceholderKind::Title))?;
        let body_id = self.body_id.ok_or_else(|| missing(PlaceholderKind::Body))?;

        Ok(Placeholders { title_id, body_id })
    }
}

/// Batch creating one slide at `insertion_index`.
pub fn slide_creation_batch(layout: LayoutDecision, insertion_index: usize) -> OperationBatch {
    let mut batch = OperationBatch::new(Phase::SlideCreation);
    batch.push(Operation::create_slide(layout, insertion_index));
    batch
}

/// Batch placing a hosted diagram image on a slide.
pub fn diagram_batch(slide_id: &str, url: &str, placement: DiagramPlacement) -> OperationBatch {
    let mut batch = OperationBatch::new(Phase::Diagram);
    batch.push(Operation::CreateImage {
        page_id: slide_id.to_string(),
        url: url.to_string(),
        placement,
    });
    batch
}

/// Builds content batches for a single theme and page geometry.
#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder<'a> {
    resolver: StyleResolver<'a>,
    geometry: PageGeometry,
}

impl<'a> BatchBuilder<'a> {
    pub fn new(resolver: StyleResolver<'a>, geometry: PageGeometry) -> Self {
        Self { resolver, geometry }
    }

    /// Text insertion and styling for a created slide.
    ///
    /// All insertions come before any styling. Body operations are omitted
    /// when the body text is empty, since the document API rejects empty
    /// inserts and ranges.
    pub fn content_batch(
        &self,
        slide: &SlideContent,
        layout: LayoutDecision,
        body: &FlattenedText,
        slide_id: &str,
        placeholders: &Placeholders,
    ) -> Result<OperationBatch> {
        let Placeholders { title_id, body_id } = placeholders;
        let has_body = !body.is_empty();
        let mut batch = OperationBatch::new(Phase::Content);

        batch.push(Operation::InsertText {
            object_id: title_id.clone(),
            text: slide.title.clone(),
        });
        if has_body {
            batch.push(Operation::InsertText {
                object_id: body_id.clone(),
                text: body.text.clone(),
            });
        }

        batch.push(Operation::text_style(
            title_id.as_str(),
            None,
            self.resolver.title_style(),
        ));

        if has_body {
            batch.push(Operation::text_style(
                body_id.as_str(),
                None,
                self.resolver.body_style(),
            ));

            for range in body.ranges.iter().filter(|r| !r.is_empty()) {
                let span = TextRange {
                    start: range.start,
                    end: range.end,
                };
                batch.push(Operation::text_style(
                    body_id.as_str(),
                    Some(span),
                    self.resolver.resolve(range.kind),
                ));
            }

            batch.push(Operation::paragraph_style(
                body_id.as_str(),
                self.resolver.body_paragraph_style(),
            ));
        }

        if layout == LayoutDecision::TwoColumn {
            batch.push(Operation::UpdateElementTransform {
                object_id: body_id.clone(),
                translate_x: self.geometry.body_left,
                translate_y: self.geometry.body_top,
            });
        }

        batch.push(Operation::page_background(slide_id, self.resolver.background()));

        batch.validate()?;
        Ok(batch)
    }
}
