//! Default-factory table for new elements.

use super::{
    ButtonContent, ContainerContent, ContainerLayout, DividerContent, ElementContent, ElementStyles,
    ElementType, FieldKind, FooterContent, FormContent, FormField, HeaderContent, ImageContent,
    NavLink, SpacerContent, TextContent, VideoContent,
};
use kurbo::Size;
use serde_json::Value;
use std::collections::HashMap;

/// Content, style and size given to a freshly added element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDefault {
    pub content: ElementContent,
    pub styles: ElementStyles,
    pub size: Size,
}

/// Per-type defaults, keyed by element type.
///
/// Every type always has an entry: overrides replace the built-in ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDefaults {
    entries: HashMap<ElementType, ElementDefault>,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

fn css(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn builtin_entry(ty: ElementType) -> ElementDefault {
    match ty {
        ElementType::Text => ElementDefault {
            content: ElementContent::Text(TextContent {
                text: "Click to edit text".to_string(),
            }),
            styles: ElementStyles {
                font_size: css("16px"),
                color: css("#333333"),
                ..Default::default()
            },
            size: Size::new(300.0, 50.0),
        },
        ElementType::Image => ElementDefault {
            content: ElementContent::Image(ImageContent {
                src: String::new(),
                alt: "Image".to_string(),
            }),
            styles: ElementStyles {
                border_radius: css("0px"),
                ..Default::default()
            },
            size: Size::new(300.0, 200.0),
        },
        ElementType::Button => ElementDefault {
            content: ElementContent::Button(ButtonContent {
                label: "Click me".to_string(),
                href: None,
            }),
            styles: ElementStyles {
                background_color: css("#3b82f6"),
                color: css("#ffffff"),
                padding: css("10px 20px"),
                border_radius: css("6px"),
                ..Default::default()
            },
            size: Size::new(120.0, 40.0),
        },
        ElementType::Container => ElementDefault {
            content: ElementContent::Container(ContainerContent {
                layout: ContainerLayout::Free,
            }),
            styles: ElementStyles {
                background_color: css("#f9fafb"),
                padding: css("20px"),
                border_width: css("1px"),
                border_style: css("dashed"),
                border_color: css("#d1d5db"),
                ..Default::default()
            },
            size: Size::new(400.0, 300.0),
        },
        ElementType::Header => ElementDefault {
            content: ElementContent::Header(HeaderContent {
                logo: None,
                title: "My Business".to_string(),
                nav_links: vec![
                    NavLink::new("Home", "#home"),
                    NavLink::new("Services", "#services"),
                    NavLink::new("Contact", "#contact"),
                ],
            }),
            styles: ElementStyles {
                background_color: css("#ffffff"),
                padding: css("0 40px"),
                box_shadow: css("0 1px 3px rgba(0,0,0,0.1)"),
                ..Default::default()
            },
            size: Size::new(1200.0, 80.0),
        },
        ElementType::Footer => ElementDefault {
            content: ElementContent::Footer(FooterContent {
                text: "All rights reserved.".to_string(),
                links: Vec::new(),
            }),
            styles: ElementStyles {
                background_color: css("#111827"),
                color: css("#ffffff"),
                padding: css("40px"),
                ..Default::default()
            },
            size: Size::new(1200.0, 120.0),
        },
        ElementType::Video => ElementDefault {
            content: ElementContent::Video(VideoContent {
                src: String::new(),
                autoplay: false,
                controls: true,
            }),
            styles: ElementStyles::default(),
            size: Size::new(560.0, 315.0),
        },
        ElementType::Form => ElementDefault {
            content: ElementContent::Form(FormContent {
                fields: vec![
                    FormField {
                        name: "name".to_string(),
                        label: "Name".to_string(),
                        kind: FieldKind::Text,
                        required: true,
                        options: Vec::new(),
                    },
                    FormField {
                        name: "email".to_string(),
                        label: "Email".to_string(),
                        kind: FieldKind::Email,
                        required: true,
                        options: Vec::new(),
                    },
                    FormField {
                        name: "message".to_string(),
                        label: "Message".to_string(),
                        kind: FieldKind::Textarea,
                        required: false,
                        options: Vec::new(),
                    },
                ],
                submit_label: "Send".to_string(),
            }),
            styles: ElementStyles {
                background_color: css("#ffffff"),
                padding: css("24px"),
                border_radius: css("8px"),
                ..Default::default()
            },
            size: Size::new(400.0, 360.0),
        },
        ElementType::Divider => ElementDefault {
            content: ElementContent::Divider(DividerContent {}),
            styles: ElementStyles {
                background_color: css("#e5e7eb"),
                ..Default::default()
            },
            size: Size::new(400.0, 2.0),
        },
        ElementType::Spacer => ElementDefault {
            content: ElementContent::Spacer(SpacerContent {}),
            styles: ElementStyles::default(),
            size: Size::new(400.0, 40.0),
        },
    }
}

impl ElementDefaults {
    /// The built-in table.
    pub fn builtin() -> Self {
        Self {
            entries: ElementType::ALL
                .into_iter()
                .map(|ty| (ty, builtin_entry(ty)))
                .collect(),
        }
    }

    /// Defaults for a type.
    pub fn get(&self, ty: ElementType) -> &ElementDefault {
        // Entries are seeded for every type and only ever replaced.
        &self.entries[&ty]
    }

    /// Replace the defaults of one type.
    ///
    /// Returns `false` (and leaves the table unchanged) if the content does
    /// not belong to `ty` or the size is not strictly positive.
    pub fn set(&mut self, ty: ElementType, entry: ElementDefault) -> bool {
        let valid_size = entry.size.width > 0.0 && entry.size.height > 0.0;
        if entry.content.element_type() != ty || !valid_size {
            log::warn!("Rejected defaults override for {}", ty);
            return false;
        }
        self.entries.insert(ty, entry);
        true
    }

    /// Load overrides from a JSON object keyed by type name:
    ///
    /// ```json
    /// { "button": { "content": { "label": "Book" }, "size": { "width": 140, "height": 44 } } }
    /// ```
    ///
    /// Unknown types and malformed fields are skipped; whatever is missing
    /// keeps the built-in value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: HashMap<String, Value> = serde_json::from_str(json)?;
        let mut table = Self::builtin();

        for (name, entry) in overrides {
            let Ok(ty) = name.parse::<ElementType>() else {
                log::warn!("Ignoring defaults for unknown element type '{}'", name);
                continue;
            };
            let mut merged = table.get(ty).clone();

            if let Some(content) = entry.get("content") {
                match ElementContent::from_value(ty, content.clone()) {
                    Ok(content) => merged.content = content,
                    Err(e) => log::warn!("Invalid default content for {}: {}", ty, e),
                }
            }
            if let Some(styles) = entry.get("styles") {
                match serde_json::from_value::<ElementStyles>(styles.clone()) {
                    Ok(styles) => merged.styles = styles,
                    Err(e) => log::warn!("Invalid default styles for {}: {}", ty, e),
                }
            }
            if let Some(size) = entry.get("size") {
                match serde_json::from_value::<Size>(size.clone()) {
                    Ok(size) => merged.size = size,
                    Err(e) => log::warn!("Invalid default size for {}: {}", ty, e),
                }
            }

            table.set(ty, merged);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_type() {
        let table = ElementDefaults::builtin();
        for ty in ElementType::ALL {
            let entry = table.get(ty);
            assert_eq!(entry.content.element_type(), ty);
            assert!(entry.size.width > 0.0 && entry.size.height > 0.0);
        }
    }

    #[test]
    fn test_from_json_overrides() {
        let table = ElementDefaults::from_json(
            r#"{
                "button": { "content": { "label": "Book" }, "size": { "width": 140, "height": 44 } },
                "carousel": { "size": { "width": 1, "height": 1 } }
            }"#,
        )
        .unwrap();

        let button = table.get(ElementType::Button);
        assert_eq!(
            button.content,
            ElementContent::Button(ButtonContent {
                label: "Book".to_string(),
                href: None,
            })
        );
        assert_eq!(button.size, Size::new(140.0, 44.0));
        // Styles were not overridden.
        assert_eq!(button.styles, builtin_entry(ElementType::Button).styles);
    }

    #[test]
    fn test_set_rejects_mismatched_content() {
        let mut table = ElementDefaults::builtin();
        let entry = ElementDefault {
            content: ElementContent::default_for(ElementType::Text),
            styles: ElementStyles::default(),
            size: Size::new(10.0, 10.0),
        };
        assert!(!table.set(ElementType::Image, entry));
        assert_eq!(table.get(ElementType::Image), &builtin_entry(ElementType::Image));
    }

    #[test]
    fn test_set_rejects_degenerate_size() {
        let mut table = ElementDefaults::builtin();
        let entry = ElementDefault {
            content: ElementContent::default_for(ElementType::Spacer),
            styles: ElementStyles::default(),
            size: Size::new(0.0, 10.0),
        };
        assert!(!table.set(ElementType::Spacer, entry));
    }
}
