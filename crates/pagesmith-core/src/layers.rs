//! Layer (z-index) ordering.

use crate::element::{ElementId, PageElement};
use crate::error::EditorResult;
use crate::store::ElementStore;
use serde::{Deserialize, Serialize};

/// Layer movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMove {
    /// One step towards the front.
    Up,
    /// One step towards the back.
    Down,
    /// In front of everything.
    Top,
    /// Behind everything.
    Bottom,
}

/// Renumber z-indices densely as `1..=n`, keeping the current paint order.
///
/// Returns `true` if any value changed.
pub fn normalize(store: &mut ElementStore) -> bool {
    let order: Vec<ElementId> = store.paint_order().iter().map(|e| e.id().clone()).collect();
    apply_order(store, &order)
}

fn apply_order(store: &mut ElementStore, order: &[ElementId]) -> bool {
    let mut changed = false;
    for (rank, id) in order.iter().enumerate() {
        let z = rank as i64 + 1;
        if let Some(element) = store.get_mut(id) {
            if element.z_index != z {
                element.z_index = z;
                changed = true;
            }
        }
    }
    changed
}

/// Move an element in the paint order.
///
/// Up/down swap places with the adjacent element; top/bottom move it to
/// the end of the order. Afterwards z-indices are dense `1..=n` with no
/// duplicates. Returns `Ok(false)` and leaves the store untouched if the
/// element is already at that end.
pub fn move_layer(store: &mut ElementStore, id: &ElementId, direction: LayerMove) -> EditorResult<bool> {
    store.require(id)?;
    let mut order: Vec<ElementId> = store.paint_order().iter().map(|e| e.id().clone()).collect();
    let Some(pos) = order.iter().position(|other| other == id) else {
        return Ok(false);
    };
    let last = order.len() - 1;

    match direction {
        LayerMove::Up if pos < last => order.swap(pos, pos + 1),
        LayerMove::Down if pos > 0 => order.swap(pos, pos - 1),
        LayerMove::Top if pos < last => {
            let moved = order.remove(pos);
            order.push(moved);
        }
        LayerMove::Bottom if pos > 0 => {
            let moved = order.remove(pos);
            order.insert(0, moved);
        }
        _ => {
            log::debug!("Layer move {:?} of {} is a no-op", direction, id);
            return Ok(false);
        }
    }

    apply_order(store, &order);
    log::debug!("Moved layer {} {:?}", id, direction);
    Ok(true)
}

/// Elements front to back, as shown in a layers panel.
pub fn layers_top_down(store: &ElementStore) -> Vec<&PageElement> {
    let mut layers = store.paint_order();
    layers.reverse();
    layers
}
