//! Type-specific element payloads.

use super::ElementType;
use serde::{Deserialize, Serialize, Serializer};

/// A navigation entry in headers and footers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonContent {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// How a container arranges its children when published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerLayout {
    #[default]
    Free,
    Row,
    Column,
    Grid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerContent {
    pub layout: ContainerLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderContent {
    /// Reference to the logo asset (URL or asset id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub title: String,
    pub nav_links: Vec<NavLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterContent {
    pub text: String,
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoContent {
    pub src: String,
    pub autoplay: bool,
    pub controls: bool,
}

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Phone,
    Textarea,
    Select,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormContent {
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerContent {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacerContent {}

/// Element payload, one variant per [`ElementType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    Text(TextContent),
    Image(ImageContent),
    Button(ButtonContent),
    Container(ContainerContent),
    Header(HeaderContent),
    Footer(FooterContent),
    Video(VideoContent),
    Form(FormContent),
    Divider(DividerContent),
    Spacer(SpacerContent),
}

impl ElementContent {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementContent::Text(_) => ElementType::Text,
            ElementContent::Image(_) => ElementType::Image,
            ElementContent::Button(_) => ElementType::Button,
            ElementContent::Container(_) => ElementType::Container,
            ElementContent::Header(_) => ElementType::Header,
            ElementContent::Footer(_) => ElementType::Footer,
            ElementContent::Video(_) => ElementType::Video,
            ElementContent::Form(_) => ElementType::Form,
            ElementContent::Divider(_) => ElementType::Divider,
            ElementContent::Spacer(_) => ElementType::Spacer,
        }
    }

    /// Empty payload of the given type.
    pub fn default_for(ty: ElementType) -> Self {
        match ty {
            ElementType::Text => ElementContent::Text(TextContent::default()),
            ElementType::Image => ElementContent::Image(ImageContent::default()),
            ElementType::Button => ElementContent::Button(ButtonContent::default()),
            ElementType::Container => ElementContent::Container(ContainerContent::default()),
            ElementType::Header => ElementContent::Header(HeaderContent::default()),
            ElementType::Footer => ElementContent::Footer(FooterContent::default()),
            ElementType::Video => ElementContent::Video(VideoContent::default()),
            ElementType::Form => ElementContent::Form(FormContent::default()),
            ElementType::Divider => ElementContent::Divider(DividerContent::default()),
            ElementType::Spacer => ElementContent::Spacer(SpacerContent::default()),
        }
    }

    /// Decode a raw payload for a known type.
    ///
    /// A missing (`null`) payload yields the empty payload; missing fields
    /// inside an object take their defaults. Text-bearing types also accept
    /// a bare string as their text.
    pub fn from_value(ty: ElementType, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            serde_json::Value::Null => return Ok(Self::default_for(ty)),
            serde_json::Value::String(text) => match Self::from_text(ty, text) {
                Ok(content) => return Ok(content),
                Err(text) => serde_json::Value::String(text),
            },
            other => other,
        };
        Ok(match ty {
            ElementType::Text => ElementContent::Text(serde_json::from_value(value)?),
            ElementType::Image => ElementContent::Image(serde_json::from_value(value)?),
            ElementType::Button => ElementContent::Button(serde_json::from_value(value)?),
            ElementType::Container => ElementContent::Container(serde_json::from_value(value)?),
            ElementType::Header => ElementContent::Header(serde_json::from_value(value)?),
            ElementType::Footer => ElementContent::Footer(serde_json::from_value(value)?),
            ElementType::Video => ElementContent::Video(serde_json::from_value(value)?),
            ElementType::Form => ElementContent::Form(serde_json::from_value(value)?),
            ElementType::Divider => ElementContent::Divider(serde_json::from_value(value)?),
            ElementType::Spacer => ElementContent::Spacer(serde_json::from_value(value)?),
        })
    }

    /// Payload of a text-bearing type built from its plain text. Other
    /// types hand the string back.
    fn from_text(ty: ElementType, text: String) -> Result<Self, String> {
        match ty {
            ElementType::Text => Ok(ElementContent::Text(TextContent { text })),
            ElementType::Button => Ok(ElementContent::Button(ButtonContent {
                label: text,
                href: None,
            })),
            ElementType::Header => Ok(ElementContent::Header(HeaderContent {
                title: text,
                ..Default::default()
            })),
            ElementType::Footer => Ok(ElementContent::Footer(FooterContent {
                text,
                ..Default::default()
            })),
            _ => Err(text),
        }
    }
}

impl Serialize for ElementContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ElementContent::Text(c) => c.serialize(serializer),
            ElementContent::Image(c) => c.serialize(serializer),
            ElementContent::Button(c) => c.serialize(serializer),
            ElementContent::Container(c) => c.serialize(serializer),
            ElementContent::Header(c) => c.serialize(serializer),
            ElementContent::Footer(c) => c.serialize(serializer),
            ElementContent::Video(c) => c.serialize(serializer),
            ElementContent::Form(c) => c.serialize(serializer),
            ElementContent::Divider(c) => c.serialize(serializer),
            ElementContent::Spacer(c) => c.serialize(serializer),
        }
    }
}
