//! Template (de)serialization.
//!
//! Encoding is plain serde. Decoding raw JSON is lenient: a field that is
//! missing or has the wrong shape falls back to its default on its own,
//! and the rest of the record still loads.

use crate::color::SerializableColor;
use crate::document::{BaseFont, CanvasSettings, GlobalStyles, PageDocument, Palette, ViewMode};
use crate::element::{ElementContent, ElementDefaults, ElementId, ElementStyles, ElementType, PageElement};
use crate::store::ElementStore;
use kurbo::{Point, Size};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

/// Page type assumed when a record does not name one.
pub const DEFAULT_PAGE_TYPE: &str = "home";

/// Persisted form of a page template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub page_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub elements: Vec<PageElement>,
    #[serde(default)]
    pub styles: GlobalStyles,
    #[serde(default)]
    pub settings: CanvasSettings,
}

impl TemplateRecord {
    /// An empty record with a fresh id.
    pub fn empty(page_type: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            page_type: page_type.to_string(),
            active: false,
            elements: Vec::new(),
            styles: GlobalStyles::default(),
            settings: CanvasSettings::default(),
        }
    }
}

/// Deserialize `obj[key]`, or return `fallback` (with a warning if the key
/// was present but malformed).
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str, fallback: impl FnOnce() -> T) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => fallback(),
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Ignoring malformed field '{}': {}", key, e);
                fallback()
            }
        },
    }
}

fn object<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    match obj.get(key) {
        Some(Value::Object(inner)) => Some(inner),
        None | Some(Value::Null) => None,
        Some(_) => {
            log::warn!("Ignoring malformed field '{}': expected an object", key);
            None
        }
    }
}

fn positive_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Converts between documents, records and JSON.
#[derive(Debug, Clone, Default)]
pub struct TemplateCodec {
    defaults: ElementDefaults,
}

impl TemplateCodec {
    pub fn new(defaults: ElementDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ElementDefaults {
        &self.defaults
    }

    /// Snapshot a document as a record. Elements keep document order.
    pub fn serialize(&self, document: &PageDocument) -> TemplateRecord {
        TemplateRecord {
            id: document.id.clone(),
            name: document.name.clone(),
            page_type: document.page_type.clone(),
            active: document.active,
            elements: document.elements.iter().cloned().collect(),
            styles: document.styles.clone(),
            settings: document.settings.clone(),
        }
    }

    /// Rebuild a document from a record.
    ///
    /// Duplicate ids keep their first occurrence and dangling tree
    /// references are dropped, so the result always satisfies the store's
    /// invariants.
    pub fn deserialize(&self, record: TemplateRecord) -> PageDocument {
        let mut elements = ElementStore::new();
        let mut seen = HashSet::new();
        for element in record.elements {
            if !seen.insert(element.id().clone()) {
                log::warn!("Dropping duplicate element id {}", element.id());
                continue;
            }
            elements.insert(element);
        }
        let repaired = elements.repair_tree();
        if repaired > 0 {
            log::warn!("Repaired {} element tree references in template {}", repaired, record.id);
        }

        PageDocument {
            id: record.id,
            name: record.name,
            page_type: record.page_type,
            active: record.active,
            elements,
            styles: record.styles,
            settings: record.settings,
        }
    }

    /// Encode a record as JSON.
    pub fn encode_str(&self, record: &TemplateRecord) -> serde_json::Result<String> {
        serde_json::to_string_pretty(record)
    }

    /// Decode a record from JSON text. Never fails: unparseable input
    /// yields an empty record.
    pub fn decode_str(&self, json: &str) -> TemplateRecord {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => self.decode(&value),
            Err(e) => {
                log::warn!("Template is not valid JSON ({}), using an empty template", e);
                TemplateRecord::empty(DEFAULT_PAGE_TYPE)
            }
        }
    }

    /// Decode a record from a JSON value, field by field.
    pub fn decode(&self, value: &Value) -> TemplateRecord {
        let Value::Object(root) = value else {
            log::warn!("Template is not a JSON object, using an empty template");
            return TemplateRecord::empty(DEFAULT_PAGE_TYPE);
        };

        let elements = match root.get("elements") {
            Some(Value::Array(items)) => items.iter().filter_map(|item| self.decode_element(item)).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                log::warn!("Ignoring malformed field 'elements': expected an array");
                Vec::new()
            }
        };

        TemplateRecord {
            id: field(root, "id", || Uuid::new_v4().to_string()),
            name: field(root, "name", || "Untitled".to_string()),
            page_type: field(root, "pageType", || DEFAULT_PAGE_TYPE.to_string()),
            active: field(root, "active", || false),
            elements,
            styles: object(root, "styles").map(decode_styles).unwrap_or_default(),
            settings: object(root, "settings").map(decode_settings).unwrap_or_default(),
        }
    }

    /// Decode one element. Only an unusable `type` drops the element.
    fn decode_element(&self, value: &Value) -> Option<PageElement> {
        let Value::Object(obj) = value else {
            log::warn!("Skipping element that is not an object");
            return None;
        };
        let ty = match obj.get("type").and_then(Value::as_str).map(str::parse::<ElementType>) {
            Some(Ok(ty)) => ty,
            Some(Err(e)) => {
                log::warn!("Skipping element: {}", e);
                return None;
            }
            None => {
                log::warn!("Skipping element without a type");
                return None;
            }
        };
        let entry = self.defaults.get(ty);

        let content = match obj.get("content") {
            None | Some(Value::Null) => entry.content.clone(),
            Some(raw) => ElementContent::from_value(ty, raw.clone()).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed {} content: {}", ty, e);
                entry.content.clone()
            }),
        };
        let mut size: Size = field(obj, "size", || entry.size);
        if !positive_size(size) {
            log::warn!("Ignoring degenerate element size {}x{}", size.width, size.height);
            size = entry.size;
        }
        let mut styles: ElementStyles = field(obj, "styles", || entry.styles.clone());
        if !styles.has_valid_opacity() {
            log::warn!("Ignoring out of range opacity {:?}", styles.opacity);
            styles.opacity = None;
        }

        let mut element = PageElement::new(content, styles, field(obj, "position", || Point::ZERO), size);
        element.id = field(obj, "id", ElementId::generate);
        element.z_index = field(obj, "zIndex", || 0);
        element.locked = field(obj, "locked", || false);
        element.visible = field(obj, "visible", || true);
        element.parent = field(obj, "parent", || None);
        element.children = field(obj, "children", Vec::new);
        Some(element)
    }
}

fn decode_styles(obj: &Map<String, Value>) -> GlobalStyles {
    let fallback = GlobalStyles::default();
    let palette = object(obj, "palette")
        .map(|p| Palette {
            primary: field(p, "primary", || fallback.palette.primary),
            secondary: field(p, "secondary", || fallback.palette.secondary),
            accent: field(p, "accent", || fallback.palette.accent),
            background: field(p, "background", || fallback.palette.background),
            text: field::<SerializableColor>(p, "text", || fallback.palette.text),
        })
        .unwrap_or_else(|| fallback.palette.clone());
    let font = object(obj, "font")
        .map(|f| BaseFont {
            family: field(f, "family", || fallback.font.family.clone()),
            size: field(f, "size", || fallback.font.size),
            line_height: field(f, "lineHeight", || fallback.font.line_height),
        })
        .unwrap_or_else(|| fallback.font.clone());

    GlobalStyles {
        palette,
        font,
        spacing: field(obj, "spacing", || fallback.spacing.clone()),
    }
}

fn decode_settings(obj: &Map<String, Value>) -> CanvasSettings {
    let fallback = CanvasSettings::default();
    let mut canvas_size: Size = field(obj, "canvasSize", || fallback.canvas_size);
    if !positive_size(canvas_size) {
        log::warn!("Ignoring degenerate canvas size {}x{}", canvas_size.width, canvas_size.height);
        canvas_size = fallback.canvas_size;
    }
    CanvasSettings {
        canvas_size,
        view_mode: field::<ViewMode>(obj, "viewMode", || fallback.view_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document(codec: &TemplateCodec) -> PageDocument {
        let mut doc = PageDocument::new("contact");
        let container = doc
            .elements
            .add_element(codec.defaults(), ElementType::Container, None)
            .id;
        let form = doc
            .elements
            .add_element(codec.defaults(), ElementType::Form, Some(Point::new(60.0, 80.0)))
            .id;
        doc.elements.set_parent(&form, Some(&container)).unwrap();
        doc.settings.view_mode = ViewMode::Tablet;
        doc
    }

    #[test]
    fn test_serialize_roundtrip() {
        let codec = TemplateCodec::default();
        let doc = sample_document(&codec);
        let record = codec.serialize(&doc);
        assert_eq!(codec.deserialize(record.clone()), doc);

        let json = codec.encode_str(&record).unwrap();
        assert_eq!(codec.decode_str(&json), record);
    }

    #[test]
    fn test_wire_shape() {
        let codec = TemplateCodec::default();
        let record = codec.serialize(&sample_document(&codec));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["pageType"], "contact");
        assert_eq!(value["settings"]["viewMode"], "tablet");
        assert_eq!(value["settings"]["canvasSize"]["width"], 1200.0);
        assert_eq!(value["elements"][1]["type"], "form");
        assert_eq!(value["styles"]["palette"]["primary"], "#3b82f6");
    }

    #[test]
    fn test_decode_missing_view_mode() {
        let codec = TemplateCodec::default();
        let record = codec.decode(&json!({
            "id": "t1",
            "name": "Home",
            "pageType": "home",
            "settings": { "canvasSize": { "width": 1000, "height": 700 } }
        }));
        assert_eq!(record.settings.view_mode, ViewMode::Desktop);
        assert_eq!(record.settings.canvas_size, Size::new(1000.0, 700.0));
        assert_eq!(record.id, "t1");
    }

    #[test]
    fn test_decode_per_field_fallback() {
        let codec = TemplateCodec::default();
        let record = codec.decode(&json!({
            "id": 42,
            "pageType": "about",
            "active": "yes",
            "styles": { "palette": { "primary": "not-a-color", "accent": "#ff0000" }, "spacing": "big" },
            "settings": { "viewMode": "watch", "canvasSize": { "width": -1, "height": 10 } },
            "elements": [
                { "id": "a", "type": "text", "content": { "text": "Hi" }, "position": { "x": 5, "y": 6 } },
                { "id": "b", "type": "carousel" },
                { "id": "c", "type": "button", "content": 17, "size": "huge", "zIndex": "top" },
                7
            ]
        }));

        let fallback = GlobalStyles::default();
        assert_eq!(record.page_type, "about");
        assert!(!record.active);
        assert_ne!(record.id, "42");
        assert_eq!(record.styles.palette.primary, fallback.palette.primary);
        assert_eq!(record.styles.palette.accent, SerializableColor::rgb(255, 0, 0));
        assert_eq!(record.styles.spacing, fallback.spacing);
        assert_eq!(record.settings, CanvasSettings::default());

        assert_eq!(record.elements.len(), 2);
        let text = &record.elements[0];
        assert_eq!(text.position, Point::new(5.0, 6.0));
        assert_eq!(text.size, codec.defaults().get(ElementType::Text).size);
        assert!(text.visible);

        let button = &record.elements[1];
        let entry = codec.defaults().get(ElementType::Button);
        assert_eq!(button.content, entry.content);
        assert_eq!(button.size, entry.size);
        assert_eq!(button.z_index, 0);
    }

    #[test]
    fn test_decode_plain_string_text() {
        let codec = TemplateCodec::default();
        let record = codec.decode(&json!({
            "id": "shop",
            "name": "Shop",
            "pageType": "home",
            "elements": [
                { "id": "t", "type": "text", "content": "Welcome to our shop",
                  "position": { "x": 0, "y": 0 }, "size": { "width": 300, "height": 40 } }
            ]
        }));

        assert_eq!(record.elements.len(), 1);
        assert_eq!(
            record.elements[0].content,
            ElementContent::Text(crate::element::TextContent {
                text: "Welcome to our shop".to_string()
            })
        );
    }

    #[test]
    fn test_decode_garbage() {
        let codec = TemplateCodec::default();
        let record = codec.decode_str("{ not json");
        assert!(record.elements.is_empty());
        assert_eq!(record.page_type, DEFAULT_PAGE_TYPE);

        let record = codec.decode(&json!([1, 2, 3]));
        assert!(record.elements.is_empty());
    }

    #[test]
    fn test_deserialize_repairs_references() {
        let codec = TemplateCodec::default();
        let record = codec.decode(&json!({
            "id": "t",
            "name": "n",
            "pageType": "home",
            "elements": [
                { "id": "a", "type": "container", "children": ["ghost", "b"] },
                { "id": "b", "type": "text", "parent": "a" },
                { "id": "b", "type": "image" },
                { "id": "c", "type": "text", "parent": "missing" }
            ]
        }));
        let doc = codec.deserialize(record);

        assert_eq!(doc.elements.len(), 3);
        let a = doc.elements.get(&ElementId::from("a")).unwrap();
        assert_eq!(a.children(), &[ElementId::from("b")]);
        let b = doc.elements.get(&ElementId::from("b")).unwrap();
        assert_eq!(b.element_type(), ElementType::Text);
        assert!(doc.elements.get(&ElementId::from("c")).unwrap().parent().is_none());
    }
}
