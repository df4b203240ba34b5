//! The page document being edited.

use crate::color::SerializableColor;
use crate::store::ElementStore;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Device preview the canvas is laid out for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl ViewMode {
    /// Viewport width used when previewing this mode.
    pub fn viewport_width(self) -> f64 {
        match self {
            ViewMode::Desktop => 1200.0,
            ViewMode::Tablet => 768.0,
            ViewMode::Mobile => 375.0,
        }
    }
}

/// Canvas dimensions and preview mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasSettings {
    pub canvas_size: Size,
    pub view_mode: ViewMode,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(1200.0, 800.0),
            view_mode: ViewMode::Desktop,
        }
    }
}

/// Brand colors shared by every element of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: SerializableColor,
    pub secondary: SerializableColor,
    pub accent: SerializableColor,
    pub background: SerializableColor,
    pub text: SerializableColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: SerializableColor::rgb(0x3b, 0x82, 0xf6),
            secondary: SerializableColor::rgb(0x64, 0x74, 0x8b),
            accent: SerializableColor::rgb(0xf5, 0x9e, 0x0b),
            background: SerializableColor::white(),
            text: SerializableColor::rgb(0x1f, 0x29, 0x37),
        }
    }
}

/// Base typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseFont {
    pub family: String,
    /// Size in logical pixels.
    pub size: f64,
    pub line_height: f64,
}

impl Default for BaseFont {
    fn default() -> Self {
        Self {
            family: "Inter, sans-serif".to_string(),
            size: 16.0,
            line_height: 1.5,
        }
    }
}

/// Page-wide style configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalStyles {
    pub palette: Palette,
    pub font: BaseFont,
    /// Spacing scale in logical pixels, smallest first.
    pub spacing: Vec<f64>,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            font: BaseFont::default(),
            spacing: vec![4.0, 8.0, 16.0, 24.0, 32.0, 48.0],
        }
    }
}

/// A page template: elements plus page-wide configuration and identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Page type this template is for ("home", "contact", ...).
    pub page_type: String,
    /// Whether this is the default template for its page type.
    pub active: bool,
    pub elements: ElementStore,
    pub styles: GlobalStyles,
    pub settings: CanvasSettings,
}

impl PageDocument {
    /// Create an empty document for a page type.
    pub fn new(page_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            page_type: page_type.into(),
            active: false,
            elements: ElementStore::new(),
            styles: GlobalStyles::default(),
            settings: CanvasSettings::default(),
        }
    }
}
