//! Per-element presentational properties.

use serde::{Deserialize, Serialize};

/// Style record of an element. Every property is optional; absent
/// properties inherit from the global style configuration at render time.
///
/// Lengths and colors are kept as CSS strings (`"16px"`, `"#1f2937"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    /// 0.0 = fully transparent, 1.0 = fully opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

fn merge_field<T: Clone>(target: &mut Option<T>, patch: &Option<T>) {
    if patch.is_some() {
        target.clone_from(patch);
    }
}

impl ElementStyles {
    /// Merge `patch` into `self` key by key. Properties absent from the
    /// patch keep their current value.
    pub fn merge(&mut self, patch: &ElementStyles) {
        merge_field(&mut self.background_color, &patch.background_color);
        merge_field(&mut self.color, &patch.color);
        merge_field(&mut self.font_family, &patch.font_family);
        merge_field(&mut self.font_size, &patch.font_size);
        merge_field(&mut self.font_weight, &patch.font_weight);
        merge_field(&mut self.line_height, &patch.line_height);
        merge_field(&mut self.text_align, &patch.text_align);
        merge_field(&mut self.padding, &patch.padding);
        merge_field(&mut self.margin, &patch.margin);
        merge_field(&mut self.border_width, &patch.border_width);
        merge_field(&mut self.border_style, &patch.border_style);
        merge_field(&mut self.border_color, &patch.border_color);
        merge_field(&mut self.border_radius, &patch.border_radius);
        merge_field(&mut self.box_shadow, &patch.box_shadow);
        merge_field(&mut self.opacity, &patch.opacity);
        merge_field(&mut self.transform, &patch.transform);
        merge_field(&mut self.animation, &patch.animation);
    }

    /// Check if no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Opacity is only meaningful in `0.0..=1.0`.
    pub(crate) fn has_valid_opacity(&self) -> bool {
        self.opacity.is_none_or(|o| (0.0..=1.0).contains(&o))
    }
}
