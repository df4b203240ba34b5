//! Page element definitions.

mod content;
mod defaults;
mod style;

pub use content::{
    ButtonContent, ContainerContent, ContainerLayout, DividerContent, ElementContent, FieldKind,
    FooterContent, FormContent, FormField, HeaderContent, ImageContent, NavLink, SpacerContent,
    TextContent, VideoContent,
};
pub use defaults::{ElementDefault, ElementDefaults};
pub use style::ElementStyles;

use crate::error::EditorError;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for page elements.
///
/// Stored as a string so that ids written by older editors load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh, never reused identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of placeable element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Button,
    Container,
    Header,
    Footer,
    Video,
    Form,
    Divider,
    Spacer,
}

impl ElementType {
    pub const ALL: [ElementType; 10] = [
        ElementType::Text,
        ElementType::Image,
        ElementType::Button,
        ElementType::Container,
        ElementType::Header,
        ElementType::Footer,
        ElementType::Video,
        ElementType::Form,
        ElementType::Divider,
        ElementType::Spacer,
    ];

    /// Wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Button => "button",
            ElementType::Container => "container",
            ElementType::Header => "header",
            ElementType::Footer => "footer",
            ElementType::Video => "video",
            ElementType::Form => "form",
            ElementType::Divider => "divider",
            ElementType::Spacer => "spacer",
        }
    }

    /// Whether elements of this type may hold children.
    pub fn accepts_children(self) -> bool {
        matches!(
            self,
            ElementType::Container | ElementType::Header | ElementType::Footer | ElementType::Form
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EditorError::UnknownElementType(s.to_string()))
    }
}

/// A single placeable unit on the canvas.
///
/// The element type is carried by `content`, so a type/content mismatch
/// cannot be represented. Tree links are ids only and are maintained by
/// [`ElementStore`](crate::store::ElementStore).
#[derive(Debug, Clone, PartialEq)]
pub struct PageElement {
    pub(crate) id: ElementId,
    /// Type-specific payload.
    pub content: ElementContent,
    /// Presentational properties.
    pub styles: ElementStyles,
    /// Top-left corner in canvas units.
    pub position: Point,
    /// Size in canvas units.
    pub size: Size,
    /// Paint and hit-test order (higher is on top).
    pub z_index: i64,
    /// Locked elements can be selected but not dragged or resized.
    pub locked: bool,
    /// Hidden elements are neither painted nor hit.
    pub visible: bool,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
}

impl PageElement {
    /// Create an element with a fresh id from a content payload.
    pub fn new(content: ElementContent, styles: ElementStyles, position: Point, size: Size) -> Self {
        Self {
            id: ElementId::generate(),
            content,
            styles,
            position,
            size,
            z_index: 0,
            locked: false,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn element_type(&self) -> ElementType {
        self.content.element_type()
    }

    pub fn parent(&self) -> Option<&ElementId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if a canvas point falls inside this element.
    pub fn contains(&self, point: Point) -> bool {
        let bounds = self.bounds();
        point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
    }

    /// Whether pointer interaction (drag/resize) is allowed.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

/// Partial update merged into an existing element.
///
/// `None` leaves the field untouched. `styles` is merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    pub content: Option<ElementContent>,
    pub styles: Option<ElementStyles>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub z_index: Option<i64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

impl ElementUpdate {
    pub fn with_content(mut self, content: ElementContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_styles(mut self, styles: ElementStyles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn default_visible() -> bool {
    true
}

/// Borrowed wire form of an element.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementWireRef<'a> {
    id: &'a ElementId,
    #[serde(rename = "type")]
    element_type: ElementType,
    content: &'a ElementContent,
    styles: &'a ElementStyles,
    position: Point,
    size: Size,
    z_index: i64,
    locked: bool,
    visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a ElementId>,
    #[serde(skip_serializing_if = "is_leaf")]
    children: &'a [ElementId],
}

fn is_leaf(children: &&[ElementId]) -> bool {
    children.is_empty()
}

/// Owned wire form of an element. Content stays raw until the type is known.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementWire {
    id: ElementId,
    #[serde(rename = "type")]
    element_type: ElementType,
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    styles: ElementStyles,
    position: Point,
    size: Size,
    #[serde(default)]
    z_index: i64,
    #[serde(default)]
    locked: bool,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    parent: Option<ElementId>,
    #[serde(default)]
    children: Vec<ElementId>,
}

impl Serialize for PageElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ElementWireRef {
            id: &self.id,
            element_type: self.element_type(),
            content: &self.content,
            styles: &self.styles,
            position: self.position,
            size: self.size,
            z_index: self.z_index,
            locked: self.locked,
            visible: self.visible,
            parent: self.parent.as_ref(),
            children: &self.children,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PageElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ElementWire::deserialize(deserializer)?;
        let content = ElementContent::from_value(wire.element_type, wire.content)
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            id: wire.id,
            content,
            styles: wire.styles,
            position: wire.position,
            size: wire.size,
            z_index: wire.z_index,
            locked: wire.locked,
            visible: wire.visible,
            parent: wire.parent,
            children: wire.children,
        })
    }
}
