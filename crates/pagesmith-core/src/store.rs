//! Canonical element collection and its mutations.

use crate::element::{ElementDefaults, ElementId, ElementType, ElementUpdate, PageElement};
use crate::error::{EditorError, EditorResult};
use kurbo::{Point, Rect, Vec2};
use std::collections::{HashMap, HashSet};

/// Where `add_element` places an element when no position is given.
/// On the default grid, so selecting a fresh element never snaps it.
pub const DEFAULT_PLACEMENT: Point = Point::new(60.0, 60.0);

/// Offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Flat id → element arena.
///
/// Parent/child relations are id references kept consistent on both sides,
/// so a clone of the store is a complete deep copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStore {
    /// All elements, keyed by ID.
    elements: HashMap<ElementId, PageElement>,
    /// Document order (insertion order), used for serialization and as the
    /// tie-break between equal z-indices.
    order: Vec<ElementId>,
}

fn check_finite_point(point: Point) -> EditorResult<()> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(())
    } else {
        Err(EditorError::InvalidGeometry(format!(
            "position ({}, {}) is not finite",
            point.x, point.y
        )))
    }
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&PageElement> {
        self.elements.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &ElementId) -> Option<&mut PageElement> {
        self.elements.get_mut(id)
    }

    /// Get an element or a `NotFound` error.
    pub fn require(&self, id: &ElementId) -> EditorResult<&PageElement> {
        self.elements
            .get(id)
            .ok_or_else(|| EditorError::NotFound(id.clone()))
    }

    /// Elements in document order.
    pub fn iter(&self) -> impl Iterator<Item = &PageElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Element ids in document order.
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Position of an element in document order.
    pub(crate) fn order_index(&self, id: &ElementId) -> Option<usize> {
        self.order.iter().position(|other| other == id)
    }

    pub fn max_z(&self) -> Option<i64> {
        self.elements.values().map(|e| e.z_index).max()
    }

    pub fn min_z(&self) -> Option<i64> {
        self.elements.values().map(|e| e.z_index).min()
    }

    /// Elements sorted back to front: by z-index, then document order.
    pub fn paint_order(&self) -> Vec<&PageElement> {
        let mut ordered: Vec<(usize, &PageElement)> = self.iter().enumerate().collect();
        ordered.sort_by_key(|(index, element)| (element.z_index, *index));
        ordered.into_iter().map(|(_, element)| element).collect()
    }

    /// Insert an element as-is, appending it to document order.
    ///
    /// Callers are responsible for id uniqueness and tree consistency.
    pub(crate) fn insert(&mut self, element: PageElement) {
        let id = element.id.clone();
        if self.elements.insert(id.clone(), element).is_none() {
            self.order.push(id);
        }
    }

    /// Create an element of `ty` from the default-factory table.
    ///
    /// The element gets a fresh id and is placed on top of every other
    /// element (`z_index = max + 1`).
    pub fn add_element(
        &mut self,
        defaults: &ElementDefaults,
        ty: ElementType,
        position: Option<Point>,
    ) -> PageElement {
        let entry = defaults.get(ty);
        let mut element = PageElement::new(
            entry.content.clone(),
            entry.styles.clone(),
            position.unwrap_or(DEFAULT_PLACEMENT),
            entry.size,
        );
        element.z_index = self.max_z().map_or(1, |z| z + 1);
        log::debug!("Added {} element {}", ty, element.id);
        self.insert(element.clone());
        element
    }

    /// Merge a partial update into an element.
    ///
    /// Shallow fields are replaced; `styles` is merged key by key. The
    /// update is validated before anything is written, so a failed update
    /// leaves the store unchanged.
    pub fn update_element(&mut self, id: &ElementId, update: ElementUpdate) -> EditorResult<()> {
        let element = self.require(id)?;

        if let Some(content) = &update.content {
            if content.element_type() != element.element_type() {
                return Err(EditorError::ContentMismatch {
                    expected: element.element_type(),
                    found: content.element_type(),
                });
            }
        }
        if let Some(position) = update.position {
            check_finite_point(position)?;
        }
        if let Some(size) = update.size {
            if !(size.width.is_finite() && size.height.is_finite())
                || size.width <= 0.0
                || size.height <= 0.0
            {
                return Err(EditorError::InvalidGeometry(format!(
                    "size {}x{} must be finite and positive",
                    size.width, size.height
                )));
            }
        }
        if let Some(styles) = &update.styles {
            if !styles.has_valid_opacity() {
                return Err(EditorError::InvalidGeometry(format!(
                    "opacity {:?} is outside 0..=1",
                    styles.opacity
                )));
            }
        }

        let Some(element) = self.elements.get_mut(id) else {
            return Err(EditorError::NotFound(id.clone()));
        };
        if let Some(content) = update.content {
            element.content = content;
        }
        if let Some(styles) = &update.styles {
            element.styles.merge(styles);
        }
        if let Some(position) = update.position {
            element.position = position;
        }
        if let Some(size) = update.size {
            element.size = size;
        }
        if let Some(z_index) = update.z_index {
            element.z_index = z_index;
        }
        if let Some(locked) = update.locked {
            element.locked = locked;
        }
        if let Some(visible) = update.visible {
            element.visible = visible;
        }
        log::debug!("Updated element {}", id);
        Ok(())
    }

    /// Ids of every descendant of `id`, depth first.
    pub fn descendants(&self, id: &ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack: Vec<ElementId> = self
            .elements
            .get(id)
            .map(|e| e.children.iter().rev().cloned().collect())
            .unwrap_or_default();
        let mut seen = HashSet::new();

        while let Some(next) = stack.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(element) = self.elements.get(&next) {
                stack.extend(element.children.iter().rev().cloned());
            }
            result.push(next);
        }
        result
    }

    /// Remove an element together with all of its descendants.
    ///
    /// The element is detached from its parent's `children`. Returns the
    /// removed elements, root first.
    pub fn delete_element(&mut self, id: &ElementId) -> EditorResult<Vec<PageElement>> {
        let parent = self.require(id)?.parent.clone();

        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|child| child != id);
        }

        let mut doomed = vec![id.clone()];
        doomed.extend(self.descendants(id));

        let removed: Vec<PageElement> = doomed
            .iter()
            .filter_map(|doomed_id| self.elements.remove(doomed_id))
            .collect();
        let doomed: HashSet<&ElementId> = doomed.iter().collect();
        self.order.retain(|other| !doomed.contains(other));

        log::debug!("Deleted element {} ({} removed)", id, removed.len());
        Ok(removed)
    }

    /// Clone an element (and its subtree) with fresh ids.
    ///
    /// The copy is offset by `offset`, keeps the source's parent and is
    /// painted above every existing element. Returns the new root.
    pub fn duplicate_element(&mut self, id: &ElementId, offset: Vec2) -> EditorResult<PageElement> {
        let source = self.require(id)?;
        let parent = source.parent.clone();

        let mut subtree = vec![id.clone()];
        subtree.extend(self.descendants(id));

        let remap: HashMap<ElementId, ElementId> = subtree
            .iter()
            .map(|old| (old.clone(), ElementId::generate()))
            .collect();

        // Copies keep their relative paint order, all above the current top.
        let mut by_z: Vec<&ElementId> = subtree.iter().collect();
        by_z.sort_by_key(|old| {
            let z = self.elements.get(*old).map_or(0, |e| e.z_index);
            (z, self.order_index(old).unwrap_or(usize::MAX))
        });
        let base_z = self.max_z().unwrap_or(0);
        let new_z: HashMap<&ElementId, i64> = by_z
            .into_iter()
            .enumerate()
            .map(|(rank, old)| (old, base_z + 1 + rank as i64))
            .collect();

        let mut copies = Vec::with_capacity(subtree.len());
        for old in &subtree {
            let Some(original) = self.elements.get(old) else {
                continue;
            };
            let mut copy = original.clone();
            copy.id = remap[old].clone();
            copy.translate(offset);
            copy.z_index = new_z[old];
            copy.children = original
                .children
                .iter()
                .filter_map(|child| remap.get(child).cloned())
                .collect();
            copy.parent = if old == id {
                parent.clone()
            } else {
                original.parent.as_ref().and_then(|p| remap.get(p).cloned())
            };
            copies.push(copy);
        }

        let root_id = remap[id].clone();
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.push(root_id.clone());
        }
        for copy in copies {
            self.insert(copy);
        }

        log::debug!("Duplicated element {} as {}", id, root_id);
        self.require(&root_id).cloned()
    }

    /// Re-parent an element, or detach it with `None`.
    ///
    /// Both sides of the relation are updated. Making an element its own
    /// ancestor, or the child of a type that holds no children, is rejected.
    pub fn set_parent(&mut self, child: &ElementId, parent: Option<&ElementId>) -> EditorResult<()> {
        let old_parent = self.require(child)?.parent.clone();
        if let Some(parent) = parent {
            let parent_type = self.require(parent)?.element_type();
            if !parent_type.accepts_children()
                || parent == child
                || self.descendants(child).contains(parent)
            {
                return Err(EditorError::InvalidParent {
                    child: child.clone(),
                    parent: parent.clone(),
                });
            }
        }
        if old_parent.as_ref() == parent {
            return Ok(());
        }

        if let Some(old) = old_parent.and_then(|p| self.elements.get_mut(&p)) {
            old.children.retain(|c| c != child);
        }
        if let Some(new_parent) = parent.and_then(|p| self.elements.get_mut(p)) {
            new_parent.children.push(child.clone());
        }
        if let Some(element) = self.elements.get_mut(child) {
            element.parent = parent.cloned();
        }
        Ok(())
    }

    /// Move an element to `position`, carrying its descendants along.
    pub fn move_element(&mut self, id: &ElementId, position: Point) -> EditorResult<()> {
        check_finite_point(position)?;
        let current = self.require(id)?.position;
        let delta = position - current;
        self.update_element(id, ElementUpdate::default().with_position(position))?;
        for descendant in self.descendants(id) {
            if let Some(element) = self.elements.get_mut(&descendant) {
                element.translate(delta);
            }
        }
        Ok(())
    }

    /// Visible elements containing a canvas point, topmost first.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .filter(|element| element.visible && element.contains(point))
            .map(|element| element.id.clone())
            .collect()
    }

    /// Union of all visible element bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .values()
            .filter(|e| e.visible)
            .map(|e| e.bounds())
            .reduce(|acc, b| acc.union(b))
    }

    /// Drop dangling tree references and re-link one-sided ones.
    ///
    /// Returns the number of references that were repaired.
    pub(crate) fn repair_tree(&mut self) -> usize {
        // Only elements that may hold children count as parents.
        let parents: HashSet<ElementId> = self
            .elements
            .values()
            .filter(|e| e.element_type().accepts_children())
            .map(|e| e.id.clone())
            .collect();
        let ids: HashSet<ElementId> = self.elements.keys().cloned().collect();
        let mut repaired = 0;

        for element in self.elements.values_mut() {
            if element.parent.as_ref().is_some_and(|p| !parents.contains(p) || *p == element.id) {
                element.parent = None;
                repaired += 1;
            }
            let before = element.children.len();
            if !parents.contains(&element.id) {
                element.children.clear();
            }
            let own_id = element.id.clone();
            let mut seen = HashSet::new();
            element
                .children
                .retain(|c| ids.contains(c) && *c != own_id && seen.insert(c.clone()));
            repaired += before - element.children.len();
        }

        // A child listed by one parent but pointing elsewhere follows its own `parent`.
        let links: Vec<(ElementId, ElementId)> = self
            .elements
            .values()
            .flat_map(|parent| {
                parent
                    .children
                    .iter()
                    .map(move |child| (parent.id.clone(), child.clone()))
            })
            .collect();
        for (parent_id, child_id) in links {
            let child_parent = self.elements.get(&child_id).and_then(|c| c.parent.clone());
            match child_parent {
                Some(actual) if actual == parent_id => {}
                Some(_) => {
                    if let Some(parent) = self.elements.get_mut(&parent_id) {
                        parent.children.retain(|c| *c != child_id);
                        repaired += 1;
                    }
                }
                None => {
                    if let Some(child) = self.elements.get_mut(&child_id) {
                        child.parent = Some(parent_id);
                        repaired += 1;
                    }
                }
            }
        }

        // Every parent lists its children.
        let parented: Vec<(ElementId, ElementId)> = self
            .elements
            .values()
            .filter_map(|e| e.parent.clone().map(|p| (p, e.id.clone())))
            .collect();
        for (parent_id, child_id) in parented {
            if let Some(parent) = self.elements.get_mut(&parent_id) {
                if !parent.children.contains(&child_id) {
                    parent.children.push(child_id);
                    repaired += 1;
                }
            }
        }

        // Break cycles by detaching the element that closes the loop.
        let cyclic: Vec<ElementId> = self
            .order
            .iter()
            .filter(|id| self.descendants(id).contains(id))
            .cloned()
            .collect();
        for id in cyclic {
            if !self.descendants(&id).contains(&id) {
                continue;
            }
            if let Some(element) = self.elements.get_mut(&id) {
                element.parent = None;
            }
            for element in self.elements.values_mut() {
                element.children.retain(|c| *c != id);
            }
            repaired += 1;
        }

        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementContent, ElementStyles, TextContent};
    use kurbo::Size;

    fn store_with(types: &[ElementType]) -> (ElementStore, Vec<ElementId>) {
        let defaults = ElementDefaults::builtin();
        let mut store = ElementStore::new();
        let ids = types
            .iter()
            .map(|&ty| store.add_element(&defaults, ty, None).id)
            .collect();
        (store, ids)
    }

    #[test]
    fn test_add_element_uses_defaults() {
        let defaults = ElementDefaults::builtin();
        let mut store = ElementStore::new();
        for ty in ElementType::ALL {
            let element = store.add_element(&defaults, ty, None);
            let entry = defaults.get(ty);
            assert_eq!(element.content, entry.content);
            assert_eq!(element.styles, entry.styles);
            assert_eq!(element.size, entry.size);
            assert_eq!(element.position, DEFAULT_PLACEMENT);
        }
        let unique: HashSet<&ElementId> = store.ids().iter().collect();
        assert_eq!(unique.len(), ElementType::ALL.len());
    }

    #[test]
    fn test_add_element_z_on_top() {
        let (mut store, ids) = store_with(&[ElementType::Text, ElementType::Image]);
        assert_eq!(store.get(&ids[0]).unwrap().z_index, 1);
        assert_eq!(store.get(&ids[1]).unwrap().z_index, 2);

        // Gaps left by deletion do not cause collisions.
        store.delete_element(&ids[0]).unwrap();
        let defaults = ElementDefaults::builtin();
        let third = store.add_element(&defaults, ElementType::Button, Some(Point::new(1.0, 2.0)));
        assert_eq!(third.z_index, 3);
        assert_eq!(third.position, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_update_merges_styles() {
        let (mut store, ids) = store_with(&[ElementType::Button]);
        let patch = ElementStyles {
            color: Some("#000000".to_string()),
            ..Default::default()
        };
        store
            .update_element(&ids[0], ElementUpdate::default().with_styles(patch))
            .unwrap();

        let styles = &store.get(&ids[0]).unwrap().styles;
        assert_eq!(styles.color.as_deref(), Some("#000000"));
        assert_eq!(styles.background_color.as_deref(), Some("#3b82f6"));
    }

    #[test]
    fn test_update_missing_element() {
        let (mut store, _) = store_with(&[ElementType::Text]);
        let before = store.clone();
        let result = store.update_element(
            &ElementId::from("missing"),
            ElementUpdate::default().with_locked(true),
        );
        assert!(matches!(result, Err(EditorError::NotFound(_))));
        assert_eq!(store, before);
    }

    #[test]
    fn test_update_rejects_bad_input_atomically() {
        let (mut store, ids) = store_with(&[ElementType::Image]);
        let before = store.clone();

        let wrong_content = ElementUpdate::default()
            .with_locked(true)
            .with_content(ElementContent::Text(TextContent::default()));
        assert!(matches!(
            store.update_element(&ids[0], wrong_content),
            Err(EditorError::ContentMismatch { .. })
        ));

        let bad_size = ElementUpdate::default()
            .with_position(Point::new(5.0, 5.0))
            .with_size(Size::new(0.0, 10.0));
        assert!(matches!(
            store.update_element(&ids[0], bad_size),
            Err(EditorError::InvalidGeometry(_))
        ));

        let bad_position = ElementUpdate::default().with_position(Point::new(f64::NAN, 0.0));
        assert!(store.update_element(&ids[0], bad_position).is_err());

        assert_eq!(store, before);
    }

    #[test]
    fn test_delete_cascades() {
        let (mut store, ids) =
            store_with(&[ElementType::Container, ElementType::Form, ElementType::Button]);
        store.set_parent(&ids[1], Some(&ids[0])).unwrap();
        store.set_parent(&ids[2], Some(&ids[1])).unwrap();

        let removed = store.delete_element(&ids[0]).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(removed[0].id, ids[0]);
        assert!(store.is_empty());
        assert!(store.ids().is_empty());
    }

    #[test]
    fn test_delete_detaches_from_parent() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Text]);
        store.set_parent(&ids[1], Some(&ids[0])).unwrap();

        store.delete_element(&ids[1]).unwrap();
        assert!(store.get(&ids[0]).unwrap().children().is_empty());
        assert!(matches!(
            store.delete_element(&ids[1]),
            Err(EditorError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_offsets_and_tops() {
        let (mut store, ids) = store_with(&[ElementType::Text, ElementType::Image]);
        let source = store.get(&ids[0]).unwrap().clone();

        let copy = store.duplicate_element(&ids[0], DUPLICATE_OFFSET).unwrap();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.position, source.position + Vec2::new(20.0, 20.0));
        assert_eq!(copy.z_index, 3);
        assert_eq!(copy.content, source.content);
        assert_eq!(copy.styles, source.styles);
        assert_eq!(copy.size, source.size);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_duplicate_subtree() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Text]);
        store.set_parent(&ids[1], Some(&ids[0])).unwrap();

        let copy = store.duplicate_element(&ids[0], DUPLICATE_OFFSET).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(copy.children().len(), 1);

        let child_copy = store.get(&copy.children()[0]).unwrap();
        assert_ne!(child_copy.id, ids[1]);
        assert_eq!(child_copy.parent(), Some(&copy.id));
        assert!(child_copy.z_index > copy.z_index);
        // The source subtree is untouched.
        assert_eq!(store.get(&ids[0]).unwrap().children(), &[ids[1].clone()]);
    }

    #[test]
    fn test_duplicate_keeps_parent() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Text]);
        store.set_parent(&ids[1], Some(&ids[0])).unwrap();

        let copy = store.duplicate_element(&ids[1], DUPLICATE_OFFSET).unwrap();
        assert_eq!(copy.parent(), Some(&ids[0]));
        assert_eq!(store.get(&ids[0]).unwrap().children().len(), 2);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Container]);
        store.set_parent(&ids[1], Some(&ids[0])).unwrap();

        assert!(matches!(
            store.set_parent(&ids[0], Some(&ids[1])),
            Err(EditorError::InvalidParent { .. })
        ));
        assert!(store.set_parent(&ids[0], Some(&ids[0])).is_err());

        store.set_parent(&ids[1], None).unwrap();
        assert!(store.get(&ids[0]).unwrap().children().is_empty());
        assert!(store.get(&ids[1]).unwrap().parent().is_none());
    }

    #[test]
    fn test_set_parent_requires_container_type() {
        let (mut store, ids) = store_with(&[ElementType::Text, ElementType::Image, ElementType::Header]);
        let before = store.clone();

        assert!(matches!(
            store.set_parent(&ids[1], Some(&ids[0])),
            Err(EditorError::InvalidParent { .. })
        ));
        assert_eq!(store, before);

        store.set_parent(&ids[1], Some(&ids[2])).unwrap();
        assert_eq!(store.get(&ids[1]).unwrap().parent(), Some(&ids[2]));
    }

    #[test]
    fn test_repair_tree_detaches_from_leaf_types() {
        let (mut store, ids) = store_with(&[ElementType::Spacer, ElementType::Text]);
        store.get_mut(&ids[1]).unwrap().parent = Some(ids[0].clone());
        store.get_mut(&ids[0]).unwrap().children.push(ids[1].clone());

        assert_eq!(store.repair_tree(), 2);
        assert!(store.get(&ids[0]).unwrap().children().is_empty());
        assert!(store.get(&ids[1]).unwrap().parent().is_none());
    }

    #[test]
    fn test_move_element_carries_children() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Text]);
        store.set_parent(&ids[1], Some(&ids[0])).unwrap();

        store.move_element(&ids[0], Point::new(150.0, 70.0)).unwrap();
        assert_eq!(store.get(&ids[0]).unwrap().position, Point::new(150.0, 70.0));
        assert_eq!(store.get(&ids[1]).unwrap().position, Point::new(150.0, 70.0));
    }

    #[test]
    fn test_elements_at_point() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Button]);
        let hits = store.elements_at_point(Point::new(60.0, 60.0));
        assert_eq!(hits, vec![ids[1].clone(), ids[0].clone()]);

        store
            .update_element(&ids[1], ElementUpdate::default().with_visible(false))
            .unwrap();
        let hits = store.elements_at_point(Point::new(60.0, 60.0));
        assert_eq!(hits, vec![ids[0].clone()]);

        assert!(store.elements_at_point(Point::new(-5.0, -5.0)).is_empty());
    }

    #[test]
    fn test_bounds() {
        let (mut store, ids) = store_with(&[ElementType::Button, ElementType::Button]);
        store.move_element(&ids[1], Point::new(200.0, 300.0)).unwrap();
        let bounds = store.bounds().unwrap();
        assert_eq!(bounds, Rect::new(60.0, 60.0, 320.0, 340.0));
    }

    #[test]
    fn test_repair_tree() {
        let (mut store, ids) = store_with(&[ElementType::Container, ElementType::Text]);
        store.get_mut(&ids[1]).unwrap().parent = Some(ids[0].clone());
        store.get_mut(&ids[0]).unwrap().children.push(ElementId::from("ghost"));

        let repaired = store.repair_tree();
        assert_eq!(repaired, 2);
        assert_eq!(store.get(&ids[0]).unwrap().children(), &[ids[1].clone()]);
    }
}
