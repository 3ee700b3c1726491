//! Named color palettes applied to generated slides.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme used when a requested name is not registered.
pub const DEFAULT_THEME: &str = "modern";

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Whether every channel is a finite value in `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

/// A named palette. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,

    pub background_color: Rgb,
    pub primary_color: Rgb,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<Rgb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<Rgb>,

    /// When present, backgrounds fade from `background_color` to this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_color: Option<Rgb>,
}

impl Theme {
    /// Body text color: the secondary color, or the primary one.
    pub fn body_color(&self) -> Rgb {
        self.secondary_color.unwrap_or(self.primary_color)
    }

    fn validate(&self, key: &str) -> Result<()> {
        let colors = [
            ("background_color", Some(self.background_color)),
            ("primary_color", Some(self.primary_color)),
            ("secondary_color", self.secondary_color),
            ("accent_color", self.accent_color),
            ("gradient_color", self.gradient_color),
        ];

        for (field, color) in colors {
            if let Some(color) = color {
                if !color.is_normalized() {
                    return Err(Error::Validation(format!(
                        "theme {}: {} channels must be within [0, 1]",
                        key, field
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Lookup table of themes by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

impl ThemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of built-in themes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.insert(
            "modern",
            Theme {
                name: "Modern Professional".to_string(),
                background_color: Rgb::new(0.95, 0.95, 0.95),
                primary_color: Rgb::new(0.2, 0.4, 0.8),
                secondary_color: Some(Rgb::new(0.8, 0.3, 0.3)),
                accent_color: Some(Rgb::new(0.3, 0.7, 0.4)),
                gradient_color: None,
            },
        );
        registry.insert(
            "dark",
            Theme {
                name: "Dark Elegance".to_string(),
                background_color: Rgb::new(0.1, 0.1, 0.15),
                primary_color: Rgb::new(0.9, 0.9, 0.9),
                secondary_color: Some(Rgb::new(0.3, 0.8, 0.3)),
                accent_color: Some(Rgb::new(0.8, 0.5, 0.2)),
                gradient_color: None,
            },
        );
        registry.insert(
            "gradient_blue",
            Theme {
                name: "Ocean Gradient".to_string(),
                background_color: Rgb::new(0.95, 0.95, 1.0),
                primary_color: Rgb::new(0.2, 0.3, 0.8),
                secondary_color: None,
                accent_color: Some(Rgb::new(0.3, 0.6, 0.9)),
                gradient_color: Some(Rgb::new(0.8, 0.9, 1.0)),
            },
        );
        registry.insert(
            "minimal",
            Theme {
                name: "Minimal Clean".to_string(),
                background_color: Rgb::new(1.0, 1.0, 1.0),
                primary_color: Rgb::new(0.2, 0.2, 0.2),
                secondary_color: Some(Rgb::new(0.5, 0.5, 0.5)),
                accent_color: Some(Rgb::new(0.8, 0.2, 0.2)),
                gradient_color: None,
            },
        );
        registry.insert(
            "nature",
            Theme {
                name: "Nature Fresh".to_string(),
                background_color: Rgb::new(0.95, 0.98, 0.95),
                primary_color: Rgb::new(0.2, 0.5, 0.3),
                secondary_color: Some(Rgb::new(0.4, 0.7, 0.4)),
                accent_color: Some(Rgb::new(0.8, 0.6, 0.2)),
                gradient_color: None,
            },
        );
        registry.insert(
            "tech",
            Theme {
                name: "Tech Vibes".to_string(),
                background_color: Rgb::new(0.05, 0.05, 0.1),
                primary_color: Rgb::new(0.0, 0.8, 0.8),
                secondary_color: None,
                accent_color: Some(Rgb::new(0.8, 0.2, 0.8)),
                gradient_color: Some(Rgb::new(0.1, 0.1, 0.2)),
            },
        );

        registry
    }

    /// Load a registry from a JSON object keyed by theme name.
    pub fn from_json(json: &str) -> Result<Self> {
        let themes: BTreeMap<String, Theme> = serde_json::from_str(json)?;

        for (key, theme) in &themes {
            theme.validate(key)?;
        }

        Ok(Self { themes })
    }

    /// Register a theme, replacing any theme with the same key.
    pub fn insert(&mut self, key: impl Into<String>, theme: Theme) {
        self.themes.insert(key.into(), theme);
    }

    /// Look up a theme by key.
    pub fn get(&self, key: &str) -> Option<&Theme> {
        self.themes.get(key)
    }

    /// Look up a theme, falling back to [`DEFAULT_THEME`].
    pub fn resolve(&self, key: &str) -> Result<&Theme> {
        if let Some(theme) = self.get(key) {
            return Ok(theme);
        }

        log::warn!("Unknown theme {:?}, falling back to {:?}", key, DEFAULT_THEME);
        self.get(DEFAULT_THEME).ok_or_else(|| {
            Error::Validation(format!(
                "theme {:?} not found and no {:?} theme registered",
                key, DEFAULT_THEME
            ))
        })
    }

    /// Registered keys, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes() {
        let registry = ThemeRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["dark", "gradient_blue", "minimal", "modern", "nature", "tech"]
        );
        assert!(registry.get("tech").unwrap().gradient_color.is_some());
        assert!(registry.get("modern").unwrap().gradient_color.is_none());
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let registry = ThemeRegistry::builtin();
        let theme = registry.resolve("neon").unwrap();
        assert_eq!(theme.name, "Modern Professional");
    }

    #[test]
    fn test_resolve_without_default_fails() {
        let registry = ThemeRegistry::new();
        assert!(matches!(registry.resolve("neon"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_body_color_fallback() {
        let registry = ThemeRegistry::builtin();
        let ocean = registry.get("gradient_blue").unwrap();
        assert_eq!(ocean.body_color(), ocean.primary_color);

        let modern = registry.get("modern").unwrap();
        assert_eq!(modern.body_color(), Rgb::new(0.8, 0.3, 0.3));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "sunset": {
                "name": "Sunset",
                "background_color": {"red": 1.0, "green": 0.9, "blue": 0.8},
                "primary_color": {"red": 0.6, "green": 0.2, "blue": 0.1},
                "gradient_color": {"red": 1.0, "green": 0.6, "blue": 0.4}
            }
        }"#;

        let registry = ThemeRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 1);
        let sunset = registry.get("sunset").unwrap();
        assert_eq!(sunset.secondary_color, None);
        assert_eq!(sunset.gradient_color, Some(Rgb::new(1.0, 0.6, 0.4)));
    }

    #[test]
    fn test_from_json_rejects_out_of_range() {
        let json = r#"{
            "bad": {
                "background_color": {"red": 255, "green": 0, "blue": 0},
                "primary_color": {"red": 0, "green": 0, "blue": 0}
            }
        }"#;
        assert!(matches!(
            ThemeRegistry::from_json(json),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            ThemeRegistry::from_json(r#"{"x": {"primary_color": 1}}"#),
            Err(Error::Json(_))
        ));
    }
}
