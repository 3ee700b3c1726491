//! Diagram placement geometry. All values are in points.

use serde::{Deserialize, Serialize};

/// Vertical anchor for diagrams, below the title.
pub const DIAGRAM_TOP: f64 = 150.0;

/// Position and size of a diagram image on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Anchor an image at the top right of the page.
///
/// The result does not depend on how much text the slide carries.
pub fn place(
    page_width: f64,
    image_width: f64,
    image_height: f64,
    right_margin: f64,
) -> DiagramPlacement {
    DiagramPlacement {
        x: page_width - image_width - right_margin,
        y: DIAGRAM_TOP,
        width: image_width,
        height: image_height,
    }
}

/// Page and diagram dimensions used when laying out slides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f64,
    pub diagram_width: f64,
    pub diagram_height: f64,
    pub right_margin: f64,

    /// Body position on two-column slides.
    pub body_left: f64,
    pub body_top: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 720.0,
            diagram_width: 350.0,
            diagram_height: 250.0,
            right_margin: 30.0,
            body_left: 30.0,
            body_top: 100.0,
        }
    }
}

impl PageGeometry {
    /// Where a diagram goes on a page of this geometry.
    pub fn diagram_placement(&self) -> DiagramPlacement {
        place(
            self.page_width,
            self.diagram_width,
            self.diagram_height,
            self.right_margin,
        )
    }
}
