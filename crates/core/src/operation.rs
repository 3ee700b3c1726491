//! Abstract write operations for the remote document API.
//!
//! Operations are grouped into [`OperationBatch`]es, each belonging to one
//! [`Phase`]. A backend submits a batch as a single all-or-nothing call.

use crate::error::{Error, Result};
use crate::layout::LayoutDecision;
use crate::placement::DiagramPlacement;
use crate::style::{BackgroundFill, ParagraphStyle, TextStyle};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A `[start, end)` span in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// A single write operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateSlide {
        layout: LayoutDecision,
        /// Layout name understood by the document API.
        predefined_layout: String,
        insertion_index: usize,
    },
    InsertText {
        object_id: String,
        text: String,
    },
    /// Style the whole element when `range` is `None`.
    UpdateTextStyle {
        object_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<TextRange>,
        style: TextStyle,
        /// Field mask of the properties `style` sets.
        fields: String,
    },
    UpdateParagraphStyle {
        object_id: String,
        style: ParagraphStyle,
        fields: String,
    },
    /// Move an element to an absolute position, in points.
    UpdateElementTransform {
        object_id: String,
        translate_x: f64,
        translate_y: f64,
    },
    UpdatePageBackground {
        page_id: String,
        fill: BackgroundFill,
        fields: String,
    },
    CreateImage {
        page_id: String,
        url: String,
        placement: DiagramPlacement,
    },
}

impl Operation {
    pub fn create_slide(layout: LayoutDecision, insertion_index: usize) -> Self {
        Operation::CreateSlide {
            layout,
            predefined_layout: layout.predefined_layout().to_string(),
            insertion_index,
        }
    }

    /// Restyle an element, or only `range` of its text when given.
    pub fn text_style(
        object_id: impl Into<String>,
        range: Option<TextRange>,
        style: TextStyle,
    ) -> Self {
        Operation::UpdateTextStyle {
            object_id: object_id.into(),
            range,
            fields: style.fields(),
            style,
        }
    }

    pub fn paragraph_style(object_id: impl Into<String>, style: ParagraphStyle) -> Self {
        Operation::UpdateParagraphStyle {
            object_id: object_id.into(),
            fields: style.fields().to_string(),
            style,
        }
    }

    pub fn page_background(page_id: impl Into<String>, fill: BackgroundFill) -> Self {
        Operation::UpdatePageBackground {
            page_id: page_id.into(),
            fields: fill.fields().to_string(),
            fill,
        }
    }

    /// The element or page this operation writes to, if it already exists.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Operation::CreateSlide { .. } => None,
            Operation::InsertText { object_id, .. }
            | Operation::UpdateTextStyle { object_id, .. }
            | Operation::UpdateParagraphStyle { object_id, .. }
            | Operation::UpdateElementTransform { object_id, .. } => Some(object_id),
            Operation::UpdatePageBackground { page_id, .. }
            | Operation::CreateImage { page_id, .. } => Some(page_id),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateSlide { .. } => "create_slide",
            Operation::InsertText { .. } => "insert_text",
            Operation::UpdateTextStyle { .. } => "update_text_style",
            Operation::UpdateParagraphStyle { .. } => "update_paragraph_style",
            Operation::UpdateElementTransform { .. } => "update_element_transform",
            Operation::UpdatePageBackground { .. } => "update_page_background",
            Operation::CreateImage { .. } => "create_image",
        }
    }
}

/// Stage of slide assembly a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Creates the slide; its reply carries the new slide id.
    SlideCreation,
    /// Inserts and styles title and body text on resolved placeholders.
    Content,
    /// Places a diagram once the slide's content batch was accepted.
    Diagram,
}

/// An ordered list of operations submitted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationBatch {
    pub phase: Phase,
    pub operations: Vec<Operation>,
}

impl OperationBatch {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            operations: Vec::new(),
        }
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Check the ordering rules for this batch's phase.
    ///
    /// - slide creation batches hold exactly one `CreateSlide`
    /// - content batches never create anything, and no text is inserted
    ///   into an element after that element has been styled
    /// - diagram batches hold only `CreateImage`
    pub fn validate(&self) -> Result<()> {
        match self.phase {
            Phase::SlideCreation => {
                if self.operations.len() != 1
                    || !matches!(self.operations[0], Operation::CreateSlide { .. })
                {
                    return Err(Error::OperationBatch(
                        "slide creation batch must hold exactly one create_slide".to_string(),
                    ));
                }
            }
            Phase::Content => {
                let mut styled: HashSet<&str> = HashSet::new();
                for op in &self.operations {
                    match op {
                        Operation::CreateSlide { .. } | Operation::CreateImage { .. } => {
                            return Err(Error::OperationBatch(format!(
                                "{} is not allowed in a content batch",
                                op.name()
                            )));
                        }
                        Operation::InsertText { object_id, .. } => {
                            if styled.contains(object_id.as_str()) {
                                return Err(Error::OperationBatch(format!(
                                    "text inserted into {} after it was styled",
                                    object_id
                                )));
                            }
                        }
                        _ => {
                            if let Some(id) = op.target_id() {
                                styled.insert(id);
                            }
                        }
                    }
                }
            }
            Phase::Diagram => {
                if let Some(op) = self
                    .operations
                    .iter()
                    .find(|op| !matches!(op, Operation::CreateImage { .. }))
                {
                    return Err(Error::OperationBatch(format!(
                        "{} is not allowed in a diagram batch",
                        op.name()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a OperationBatch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(id: &str) -> Operation {
        Operation::InsertText {
            object_id: id.to_string(),
            text: "x".to_string(),
        }
    }

    fn style(id: &str) -> Operation {
        Operation::text_style(id, None, TextStyle::default().bold())
    }

    #[test]
    fn test_content_insert_after_style_rejected() {
        let mut batch = OperationBatch::new(Phase::Content);
        batch.push(insert("title"));
        batch.push(style("title"));
        batch.push(insert("title"));

        assert!(matches!(batch.validate(), Err(Error::OperationBatch(_))));
    }

    #[test]
    fn test_content_styles_on_other_element_allowed() {
        let mut batch = OperationBatch::new(Phase::Content);
        batch.push(insert("title"));
        batch.push(style("title"));
        batch.push(insert("body"));
        batch.push(style("body"));

        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_content_rejects_create() {
        let mut batch = OperationBatch::new(Phase::Content);
        batch.push(Operation::create_slide(LayoutDecision::SingleBody, 0));
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_slide_creation_shape() {
        let empty = OperationBatch::new(Phase::SlideCreation);
        assert!(empty.validate().is_err());

        let mut batch = OperationBatch::new(Phase::SlideCreation);
        batch.push(Operation::create_slide(LayoutDecision::TwoColumn, 2));
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_diagram_batch_rejects_text() {
        let mut batch = OperationBatch::new(Phase::Diagram);
        batch.push(insert("body"));
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_operation_serializes_with_tag() {
        let value = serde_json::to_value(insert("t1")).unwrap();
        assert_eq!(value["op"], "insert_text");
        assert_eq!(value["object_id"], "t1");

        let styled = serde_json::to_value(style("t1")).unwrap();
        assert!(styled.get("range").is_none());
        assert_eq!(styled["fields"], "bold");
    }

    #[test]
    fn test_create_slide_names_predefined_layout() {
        let value =
            serde_json::to_value(Operation::create_slide(LayoutDecision::TwoColumn, 1)).unwrap();
        assert_eq!(value["op"], "create_slide");
        assert_eq!(value["layout"], "two_column");
        assert_eq!(value["predefined_layout"], "TITLE_AND_TWO_COLUMNS");
        assert_eq!(value["insertion_index"], 1);
    }

    #[test]
    fn test_style_operations_carry_field_masks() {
        let paragraph = Operation::paragraph_style(
            "body",
            ParagraphStyle {
                line_spacing: 150.0,
                space_above: 10.0,
                space_below: 10.0,
                indent_start: 20.0,
            },
        );
        let value = serde_json::to_value(&paragraph).unwrap();
        assert_eq!(value["fields"], "lineSpacing,spaceAbove,spaceBelow,indentStart");

        let background = Operation::page_background(
            "slide_1",
            BackgroundFill::Solid {
                color: crate::theme::Rgb::new(1.0, 1.0, 1.0),
            },
        );
        let value = serde_json::to_value(&background).unwrap();
        assert_eq!(value["fields"], "pageBackgroundFill.solidFill");
        assert_eq!(value["fill"]["type"], "solid");
    }
}
