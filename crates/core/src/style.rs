//! Concrete text, paragraph and background styles derived from a theme.

use crate::theme::{Rgb, Theme};
use crate::types::StyleKind;
use serde::{Deserialize, Serialize};

/// Fixed highlight used for statistics regardless of theme.
pub const STATS_COLOR: Rgb = Rgb::new(0.2, 0.4, 0.7);

/// Character-level style. Unset fields leave the document's value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    /// Font size in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Rgb>,
}

impl TextStyle {
    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn size(mut self, points: f32) -> Self {
        self.font_size = Some(points);
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Field mask naming the properties this style sets.
    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.foreground.is_some() {
            fields.push("foregroundColor");
        }
        fields.join(",")
    }
}

/// Paragraph-level spacing, in points except for `line_spacing` (percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub line_spacing: f32,
    pub space_above: f32,
    pub space_below: f32,
    pub indent_start: f32,
}

impl ParagraphStyle {
    pub fn fields(&self) -> &'static str {
        "lineSpacing,spaceAbove,spaceBelow,indentStart"
    }
}

/// One stop of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, 0 to 1.
    pub position: f32,
    pub color: Rgb,
}

/// Page background fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundFill {
    Solid { color: Rgb },
    LinearGradient { stops: [GradientStop; 2] },
}

impl BackgroundFill {
    /// Field mask for the page property being replaced.
    pub fn fields(&self) -> &'static str {
        match self {
            BackgroundFill::Solid { .. } => "pageBackgroundFill.solidFill",
            BackgroundFill::LinearGradient { .. } => "pageBackgroundFill.gradientFill",
        }
    }
}

/// Derives styles for one theme. Holds no mutable state.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    theme: &'a Theme,
}

impl<'a> StyleResolver<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Style for a range of body text.
    pub fn resolve(&self, kind: StyleKind) -> TextStyle {
        match kind {
            StyleKind::Heading => TextStyle::default().bold().size(16.0),
            StyleKind::Stats => TextStyle::default().bold().color(STATS_COLOR),
            StyleKind::Bullet => TextStyle::default().size(14.0),
            StyleKind::Subbullet => TextStyle::default().size(12.0),
            StyleKind::Paragraph => TextStyle::default().size(14.0),
        }
    }

    /// Base style for the whole title element.
    pub fn title_style(&self) -> TextStyle {
        TextStyle::default()
            .size(24.0)
            .bold()
            .color(self.theme.primary_color)
    }

    /// Base style for the whole body element.
    pub fn body_style(&self) -> TextStyle {
        TextStyle::default().size(14.0).color(self.theme.body_color())
    }

    /// Spacing applied to every body paragraph.
    pub fn body_paragraph_style(&self) -> ParagraphStyle {
        ParagraphStyle {
            line_spacing: 150.0,
            space_above: 10.0,
            space_below: 10.0,
            indent_start: 20.0,
        }
    }

    /// Solid fill, or a two-stop gradient when the theme has a gradient color.
    pub fn background(&self) -> BackgroundFill {
        match self.theme.gradient_color {
            Some(end) => BackgroundFill::LinearGradient {
                stops: [
                    GradientStop {
                        position: 0.0,
                        color: self.theme.background_color,
                    },
                    GradientStop {
                        position: 1.0,
                        color: end,
                    },
                ],
            },
            None => BackgroundFill::Solid {
                color: self.theme.background_color,
            },
        }
    }
}
