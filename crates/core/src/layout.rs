//! Slide layout selection.

use crate::types::SlideContent;
use serde::{Deserialize, Serialize};

/// Predefined layout used when creating a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDecision {
    /// Title plus a single full-width body.
    SingleBody,
    /// Title plus body on the left, diagram on the right.
    TwoColumn,
}

impl LayoutDecision {
    /// Name of the matching predefined layout in the document API.
    pub fn predefined_layout(self) -> &'static str {
        match self {
            LayoutDecision::SingleBody => "TITLE_AND_BODY",
            LayoutDecision::TwoColumn => "TITLE_AND_TWO_COLUMNS",
        }
    }
}

/// Two columns if and only if the slide has a non-empty diagram prompt.
pub fn select(slide: &SlideContent) -> LayoutDecision {
    if slide.has_diagram() {
        LayoutDecision::TwoColumn
    } else {
        LayoutDecision::SingleBody
    }
}
