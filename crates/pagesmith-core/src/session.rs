//! Editing session: one open document with its history, view and
//! interaction state.

use crate::codec::{TemplateCodec, DEFAULT_PAGE_TYPE};
use crate::config::EditorConfig;
use crate::document::PageDocument;
use crate::drag::{handle_at, DragCapability, DragCommit, DragController, DragPayload};
use crate::element::{ElementDefaults, ElementId, ElementType, ElementUpdate, PageElement};
use crate::error::{EditorError, EditorResult};
use crate::history::HistoryManager;
use crate::input::{Key, Modifiers, MouseButton, PointerEvent};
use crate::layers::{self, LayerMove};
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::storage::{StorageResult, TemplateStore};
use crate::store::ElementStore;
use crate::transform::CanvasTransform;
use kurbo::{Point, Size};
use std::collections::HashSet;

/// Padding around content for `fit_to_content`, in screen pixels.
const FIT_PADDING: f64 = 40.0;

/// An open document together with everything needed to edit it.
///
/// Every successful mutating operation records exactly one history
/// snapshot and marks the session dirty. Selection, hover and view changes
/// record nothing.
pub struct EditorSession {
    document: PageDocument,
    history: HistoryManager,
    transform: CanvasTransform,
    drag: DragController,
    selection: Vec<ElementId>,
    hovered: Option<ElementId>,
    config: EditorConfig,
    codec: TemplateCodec,
    notifier: Box<dyn Notifier>,
    dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default(), ElementDefaults::builtin())
    }
}

impl EditorSession {
    /// Create a session editing an empty document.
    pub fn new(config: EditorConfig, defaults: ElementDefaults) -> Self {
        let mut session = Self {
            document: PageDocument::new(DEFAULT_PAGE_TYPE),
            history: HistoryManager::with_limit(config.history_limit),
            transform: config.transform(),
            drag: DragController::new(config.min_element_size),
            selection: Vec::new(),
            hovered: None,
            codec: TemplateCodec::new(defaults),
            notifier: Box::new(LogNotifier),
            config,
            dirty: false,
        };
        session.open(PageDocument::new(DEFAULT_PAGE_TYPE));
        session
    }

    /// Replace the notification channel.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Start editing `document`, discarding history and interaction state.
    ///
    /// The opened state becomes the first history snapshot.
    pub fn open(&mut self, document: PageDocument) {
        self.drag.cancel(&mut self.document.elements);
        self.document = document;
        self.history = HistoryManager::with_limit(self.config.history_limit);
        self.history.commit(&self.document.elements);
        self.selection.clear();
        self.hovered = None;
        self.dirty = false;
        log::info!(
            "Opened template {} ({} elements)",
            self.document.id,
            self.document.elements.len()
        );
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    /// Mutable access to page-wide styles and settings.
    ///
    /// Not tracked by element history; marks the session dirty.
    pub fn document_mut(&mut self) -> &mut PageDocument {
        self.dirty = true;
        &mut self.document
    }

    pub fn elements(&self) -> &ElementStore {
        &self.document.elements
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut CanvasTransform {
        &mut self.transform
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn codec(&self) -> &TemplateCodec {
        &self.codec
    }

    /// Whether there are changes since the last open or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn commit(&mut self) {
        self.history.commit(&self.document.elements);
        self.dirty = true;
    }

    fn report(&self, operation: &str, error: &EditorError) {
        match error {
            EditorError::NotFound(_) => log::warn!("{} failed: {}", operation, error),
            _ => log::error!("{} failed: {}", operation, error),
        }
    }

    /// Drop selection and hover entries that no longer exist.
    fn prune_interaction_state(&mut self) {
        let elements = &self.document.elements;
        self.selection.retain(|id| elements.contains(id));
        if self.hovered.as_ref().is_some_and(|id| !elements.contains(id)) {
            self.hovered = None;
        }
    }

    // --- Element operations ---

    /// Add an element of `ty` and select it.
    pub fn add_element(&mut self, ty: ElementType, position: Option<Point>) -> PageElement {
        let element = self
            .document
            .elements
            .add_element(self.codec.defaults(), ty, position);
        self.commit();
        self.select(element.id());
        element
    }

    pub fn update_element(&mut self, id: &ElementId, update: ElementUpdate) -> EditorResult<()> {
        if update.is_empty() {
            return self.document.elements.require(id).map(|_| ());
        }
        match self.document.elements.update_element(id, update) {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(e) => {
                self.report("Update", &e);
                Err(e)
            }
        }
    }

    /// Delete an element and its descendants.
    pub fn delete_element(&mut self, id: &ElementId) -> EditorResult<Vec<PageElement>> {
        match self.document.elements.delete_element(id) {
            Ok(removed) => {
                self.commit();
                self.prune_interaction_state();
                Ok(removed)
            }
            Err(e) => {
                self.report("Delete", &e);
                Err(e)
            }
        }
    }

    /// Duplicate an element (with its subtree) and select the copy.
    pub fn duplicate_element(&mut self, id: &ElementId) -> EditorResult<PageElement> {
        match self
            .document
            .elements
            .duplicate_element(id, self.config.duplicate_offset)
        {
            Ok(copy) => {
                self.commit();
                self.select(copy.id());
                Ok(copy)
            }
            Err(e) => {
                self.report("Duplicate", &e);
                Err(e)
            }
        }
    }

    /// Move an element (and its subtree) to a canvas position.
    pub fn move_element(&mut self, id: &ElementId, position: Point) -> EditorResult<()> {
        match self.document.elements.move_element(id, position) {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(e) => {
                self.report("Move", &e);
                Err(e)
            }
        }
    }

    /// Change an element's parent.
    pub fn set_parent(&mut self, child: &ElementId, parent: Option<&ElementId>) -> EditorResult<()> {
        if self.document.elements.require(child)?.parent() == parent {
            return Ok(());
        }
        match self.document.elements.set_parent(child, parent) {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(e) => {
                self.report("Reparent", &e);
                Err(e)
            }
        }
    }

    /// Reorder an element. Returns `Ok(false)` if it was already at that end.
    pub fn move_layer(&mut self, id: &ElementId, direction: LayerMove) -> EditorResult<bool> {
        match layers::move_layer(&mut self.document.elements, id, direction) {
            Ok(true) => {
                self.commit();
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                self.report("Layer move", &e);
                Err(e)
            }
        }
    }

    /// Delete every selected element as one undoable step.
    ///
    /// Returns the number of elements removed, descendants included.
    pub fn delete_selection(&mut self) -> usize {
        let selected = std::mem::take(&mut self.selection);
        let mut removed = 0;
        for id in &selected {
            // Already gone if an ancestor was selected too.
            if let Ok(elements) = self.document.elements.delete_element(id) {
                removed += elements.len();
            }
        }
        if removed > 0 {
            self.commit();
            self.prune_interaction_state();
        }
        removed
    }

    /// Duplicate every selected element as one undoable step and select
    /// the copies.
    ///
    /// Elements inside a selected subtree are copied with it, not again on
    /// their own. Returns the number of copies made.
    pub fn duplicate_selection(&mut self) -> usize {
        let selected = self.selection.clone();
        let nested: HashSet<ElementId> = selected
            .iter()
            .flat_map(|id| self.document.elements.descendants(id))
            .collect();

        let mut copies = Vec::new();
        for id in selected.iter().filter(|id| !nested.contains(*id)) {
            match self
                .document
                .elements
                .duplicate_element(id, self.config.duplicate_offset)
            {
                Ok(copy) => copies.push(copy.id().clone()),
                Err(e) => self.report("Duplicate", &e),
            }
        }
        let count = copies.len();
        if count > 0 {
            self.commit();
            self.selection = copies;
        }
        count
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.drag.cancel(&mut self.document.elements);
        let Some(state) = self.history.undo() else {
            return false;
        };
        self.document.elements = state.clone();
        self.dirty = true;
        self.prune_interaction_state();
        log::debug!("Undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        self.drag.cancel(&mut self.document.elements);
        let Some(state) = self.history.redo() else {
            return false;
        };
        self.document.elements = state.clone();
        self.dirty = true;
        self.prune_interaction_state();
        log::debug!("Redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Selection & hover ---

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    /// Select exactly one element. Unknown ids clear the selection.
    pub fn select(&mut self, id: &ElementId) {
        self.selection.clear();
        if self.document.elements.contains(id) {
            self.selection.push(id.clone());
        }
    }

    /// Toggle an element in a multi-selection.
    pub fn toggle_selection(&mut self, id: &ElementId) {
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
        } else if self.document.elements.contains(id) {
            self.selection.push(id.clone());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn hovered(&self) -> Option<&ElementId> {
        self.hovered.as_ref()
    }

    pub fn set_hover(&mut self, id: Option<&ElementId>) {
        self.hovered = id.filter(|id| self.document.elements.contains(id)).cloned();
    }

    // --- View ---

    /// Zoom and pan so that all visible elements fit in the viewport.
    pub fn fit_to_content(&mut self, viewport: Size) {
        match self.document.elements.bounds() {
            Some(bounds) => self.transform.fit_to_bounds(bounds, viewport, FIT_PADDING),
            None => self.transform.reset(),
        }
    }

    // --- Pointer & keyboard ---

    /// Feed a pointer event from the host toolkit.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => {
                if self.drag.is_active() {
                    self.on_drag_over(position);
                } else {
                    let canvas = self.transform.screen_to_canvas(position);
                    self.hovered = self.document.elements.elements_at_point(canvas).into_iter().next();
                }
            }
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => {
                if self.drag.is_active() {
                    self.on_drop(position);
                }
            }
            PointerEvent::Up { .. } => {}
        }
    }

    fn pointer_down(&mut self, screen_point: Point, modifiers: Modifiers) {
        let canvas = self.transform.screen_to_canvas(screen_point);

        // Resize handles of a single selected element take precedence.
        if let [selected] = self.selection.as_slice() {
            let selected = selected.clone();
            let handle = self
                .document
                .elements
                .get(&selected)
                .filter(|e| e.is_interactive())
                .and_then(|e| handle_at(e.bounds(), canvas, self.transform.scale()));
            if let Some(handle) = handle {
                if let Err(e) = self.drag.begin_resize(
                    &self.document.elements,
                    &self.transform,
                    &selected,
                    handle,
                    screen_point,
                ) {
                    self.report("Resize", &e);
                }
                return;
            }
        }

        let Some(hit) = self.document.elements.elements_at_point(canvas).into_iter().next() else {
            self.clear_selection();
            return;
        };
        if modifiers.shift {
            self.toggle_selection(&hit);
            return;
        }
        self.on_drag_start(DragPayload::Element(hit), screen_point);
    }

    /// Feed a key press. Returns `true` if the key was handled.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Escape => {
                if self.drag.is_active() {
                    self.on_drag_cancel();
                } else {
                    self.clear_selection();
                }
                true
            }
            Key::Delete | Key::Backspace => self.delete_selection() > 0,
            Key::Char('z') if modifiers.command() && modifiers.shift => self.redo(),
            Key::Char('z') if modifiers.command() => self.undo(),
            Key::Char('y') if modifiers.command() => self.redo(),
            Key::Char('d') if modifiers.command() => self.duplicate_selection() > 0,
            _ => false,
        }
    }

    fn apply_drag_commit(&mut self, commit: DragCommit) -> Option<ElementId> {
        let result = match commit {
            DragCommit::Moved { id, to, .. } => self.move_element(&id, to).map(|()| id),
            DragCommit::Resized { id, to, .. } => {
                let update = ElementUpdate::default()
                    .with_position(to.origin())
                    .with_size(to.size());
                self.update_element(&id, update).map(|()| id)
            }
            DragCommit::Place { ty, position } => Ok(self.add_element(ty, Some(position)).id().clone()),
        };
        result.ok()
    }

    // --- Persistence ---

    /// Save the document through `store`.
    ///
    /// An active drag is cancelled first, so no preview geometry is saved.
    /// A failure is reported through the notifier and returned; the
    /// in-memory document is left exactly as it was.
    pub async fn save(&mut self, store: &dyn TemplateStore, make_default: bool) -> StorageResult<()> {
        self.drag.cancel(&mut self.document.elements);
        let mut record = self.codec.serialize(&self.document);
        if make_default {
            record.active = true;
        }
        match store.save_template(&record, make_default).await {
            Ok(()) => {
                self.document.active = record.active;
                self.dirty = false;
                log::info!("Saved template {} ({})", record.id, record.page_type);
                self.notifier.notify(Notification::success("Template saved"));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save template {}: {}", record.id, e);
                self.notifier
                    .notify(Notification::error(format!("Could not save template: {}", e)));
                Err(e)
            }
        }
    }

    /// Open the default template of `page_type` from `store`.
    ///
    /// Returns `Ok(false)` and opens an empty document if the page type has
    /// no template yet. On failure the current document stays open.
    pub async fn load(&mut self, store: &dyn TemplateStore, page_type: &str) -> StorageResult<bool> {
        match store.load_template(page_type).await {
            Ok(Some(record)) => {
                let document = self.codec.deserialize(record);
                self.open(document);
                Ok(true)
            }
            Ok(None) => {
                log::info!("No template for page type '{}', starting empty", page_type);
                self.open(PageDocument::new(page_type));
                Ok(false)
            }
            Err(e) => {
                log::error!("Failed to load template for '{}': {}", page_type, e);
                self.notifier
                    .notify(Notification::error(format!("Could not load template: {}", e)));
                Err(e)
            }
        }
    }
}

impl DragCapability for EditorSession {
    fn on_drag_start(&mut self, payload: DragPayload, screen_point: Point) -> bool {
        if self.drag.is_active() {
            log::warn!("Ignoring drag start while another drag is active");
            return false;
        }
        match payload {
            DragPayload::Element(id) => {
                self.select(&id);
                match self
                    .drag
                    .begin_move(&self.document.elements, &self.transform, &id, screen_point)
                {
                    Ok(started) => started,
                    Err(e) => {
                        self.report("Drag", &e);
                        false
                    }
                }
            }
            DragPayload::NewElement(ty) => {
                self.drag.begin_place(&self.transform, ty, screen_point);
                true
            }
        }
    }

    fn on_drag_over(&mut self, screen_point: Point) {
        self.drag
            .update(&mut self.document.elements, &self.transform, screen_point);
    }

    fn on_drop(&mut self, screen_point: Point) -> Option<ElementId> {
        let commit = self
            .drag
            .finish(&mut self.document.elements, &self.transform, screen_point)?;
        self.apply_drag_commit(commit)
    }

    fn on_drag_cancel(&mut self) {
        self.drag.cancel(&mut self.document.elements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementStyles;
    use crate::storage::MemoryTemplateStore;
    use pollster::block_on;

    fn left_down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    fn left_up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_new_session_has_initial_snapshot() {
        let session = EditorSession::default();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().current_index(), Some(0));
        assert!(!session.can_undo());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_each_mutation_commits_once() {
        let mut session = EditorSession::default();
        let id = session.add_element(ElementType::Text, None).id().clone();
        session
            .update_element(&id, ElementUpdate::default().with_locked(true))
            .unwrap();
        session.duplicate_element(&id).unwrap();
        assert_eq!(session.history().len(), 4);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_failed_operation_records_nothing() {
        let mut session = EditorSession::default();
        let missing = ElementId::from("missing");
        assert!(session.update_element(&missing, ElementUpdate::default().with_visible(false)).is_err());
        assert!(session.delete_element(&missing).is_err());
        assert!(session.move_layer(&missing, LayerMove::Up).is_err());
        assert_eq!(session.history().len(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_selection_and_hover_record_nothing() {
        let mut session = EditorSession::default();
        let id = session.add_element(ElementType::Button, None).id().clone();
        let len = session.history().len();

        session.clear_selection();
        session.select(&id);
        session.set_hover(Some(&id));
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(1000.0, 1000.0),
        });
        assert_eq!(session.history().len(), len);
        assert!(session.hovered().is_none());
    }

    #[test]
    fn test_pointer_drag_commits_once() {
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementType::Header, Some(Point::new(100.0, 100.0)))
            .id()
            .clone();
        session.clear_selection();
        let len = session.history().len();

        session.handle_pointer(left_down(100.0, 100.0));
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(108.0, 121.0),
        });
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(117.0, 132.0),
        });
        assert_eq!(session.history().len(), len);
        session.handle_pointer(left_up(117.0, 132.0));

        assert_eq!(session.history().len(), len + 1);
        assert_eq!(session.elements().get(&id).unwrap().position, Point::new(120.0, 140.0));
        assert!(session.undo());
        assert_eq!(session.elements().get(&id).unwrap().position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_click_selects_without_commit() {
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementType::Button, Some(Point::new(55.0, 55.0)))
            .id()
            .clone();
        session.clear_selection();
        let len = session.history().len();

        session.handle_pointer(left_down(60.0, 60.0));
        session.handle_pointer(left_up(60.0, 60.0));

        assert_eq!(session.selection(), &[id.clone()]);
        assert_eq!(session.history().len(), len);
        assert_eq!(session.elements().get(&id).unwrap().position, Point::new(55.0, 55.0));
    }

    #[test]
    fn test_click_empty_canvas_clears_selection() {
        let mut session = EditorSession::default();
        session.add_element(ElementType::Button, None);
        assert_eq!(session.selection().len(), 1);

        session.handle_pointer(left_down(900.0, 900.0));
        session.handle_pointer(left_up(900.0, 900.0));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_locked_element_selects_without_drag() {
        let mut session = EditorSession::default();
        let id = session.add_element(ElementType::Button, None).id().clone();
        session
            .update_element(&id, ElementUpdate::default().with_locked(true))
            .unwrap();
        session.clear_selection();

        session.handle_pointer(left_down(60.0, 60.0));
        assert_eq!(session.selection(), &[id.clone()]);
        assert!(!session.drag().is_active());
    }

    #[test]
    fn test_resize_through_handle() {
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementType::Image, Some(Point::new(100.0, 100.0)))
            .id()
            .clone();
        // Image default is 300x200: bottom-right handle at (400, 300).
        session.handle_pointer(left_down(401.0, 299.0));
        session.handle_pointer(left_up(241.0, 219.0));

        let element = session.elements().get(&id).unwrap();
        assert_eq!(element.position, Point::new(100.0, 100.0));
        assert_eq!(element.size, Size::new(140.0, 120.0));
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut session = EditorSession::default();
        let id = session.add_element(ElementType::Button, None).id().clone();
        let len = session.history().len();

        session.handle_pointer(left_down(60.0, 60.0));
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(300.0, 300.0),
        });
        assert!(session.handle_key(Key::Escape, Modifiers::default()));
        session.handle_pointer(left_up(300.0, 300.0));

        assert_eq!(session.elements().get(&id).unwrap().position, Point::new(60.0, 60.0));
        assert_eq!(session.history().len(), len);
    }

    #[test]
    fn test_palette_drop() {
        let mut session = EditorSession::default();
        assert!(session.on_drag_start(DragPayload::NewElement(ElementType::Form), Point::new(0.0, 0.0)));
        session.on_drag_over(Point::new(50.0, 50.0));
        let id = session.on_drop(Point::new(205.0, 311.0)).unwrap();

        let element = session.elements().get(&id).unwrap();
        assert_eq!(element.element_type(), ElementType::Form);
        assert_eq!(element.position, Point::new(200.0, 320.0));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut session = EditorSession::default();
        session.add_element(ElementType::Text, None);
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };

        assert!(session.handle_key(Key::Char('d'), ctrl));
        assert_eq!(session.elements().len(), 2);
        assert!(session.handle_key(Key::Delete, Modifiers::default()));
        assert_eq!(session.elements().len(), 1);
        assert!(session.handle_key(Key::Char('z'), ctrl));
        assert_eq!(session.elements().len(), 2);
        assert!(session.handle_key(Key::Char('y'), ctrl));
        assert_eq!(session.elements().len(), 1);
        assert!(!session.handle_key(Key::Char('q'), ctrl));
    }

    #[test]
    fn test_duplicate_selection_commits_once() {
        let mut session = EditorSession::default();
        let a = session.add_element(ElementType::Text, None).id().clone();
        let b = session.add_element(ElementType::Image, None).id().clone();
        let c = session.add_element(ElementType::Button, None).id().clone();
        session.select(&a);
        session.toggle_selection(&b);
        session.toggle_selection(&c);
        let len = session.history().len();
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };

        assert!(session.handle_key(Key::Char('d'), ctrl));
        assert_eq!(session.history().len(), len + 1);
        assert_eq!(session.elements().len(), 6);
        assert_eq!(session.selection().len(), 3);
        assert!(!session.is_selected(&a));

        assert!(session.undo());
        assert_eq!(session.elements().len(), 3);
    }

    #[test]
    fn test_duplicate_selection_copies_nested_once() {
        let mut session = EditorSession::default();
        let container = session.add_element(ElementType::Container, None).id().clone();
        let text = session.add_element(ElementType::Text, None).id().clone();
        session.set_parent(&text, Some(&container)).unwrap();
        session.select(&container);
        session.toggle_selection(&text);

        assert_eq!(session.duplicate_selection(), 1);
        assert_eq!(session.elements().len(), 4);
    }

    #[test]
    fn test_undo_prunes_selection() {
        let mut session = EditorSession::default();
        let id = session.add_element(ElementType::Text, None).id().clone();
        assert!(session.is_selected(&id));
        session.undo();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_save_during_drag_stores_committed_geometry() {
        let store = MemoryTemplateStore::new();
        let mut session = EditorSession::default();
        let id = session
            .add_element(ElementType::Button, Some(Point::new(100.0, 100.0)))
            .id()
            .clone();
        session.handle_pointer(left_down(110.0, 110.0));
        session.handle_pointer(PointerEvent::Move {
            position: Point::new(400.0, 300.0),
        });

        block_on(session.save(&store, true)).unwrap();

        let saved = block_on(store.load_template(DEFAULT_PAGE_TYPE)).unwrap().unwrap();
        assert_eq!(saved.elements[0].id(), &id);
        assert_eq!(saved.elements[0].position, Point::new(100.0, 100.0));
        assert!(!session.drag().is_active());
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryTemplateStore::new();
        let mut session = EditorSession::default();
        let id = session.add_element(ElementType::Text, None).id().clone();
        let patch = ElementStyles {
            color: Some("#ff0000".to_string()),
            ..Default::default()
        };
        session
            .update_element(&id, ElementUpdate::default().with_styles(patch))
            .unwrap();

        block_on(session.save(&store, true)).unwrap();
        assert!(!session.is_dirty());
        assert!(session.document().active);

        let mut other = EditorSession::default();
        assert!(block_on(other.load(&store, DEFAULT_PAGE_TYPE)).unwrap());
        assert_eq!(other.elements(), session.elements());
        assert_eq!(other.history().len(), 1);

        assert!(!block_on(other.load(&store, "pricing")).unwrap());
        assert!(other.elements().is_empty());
        assert_eq!(other.document().page_type, "pricing");
    }
}
