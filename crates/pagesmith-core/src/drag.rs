//! Pointer drag state machine for moving, resizing and placing elements.
//!
//! While a drag is active the controller writes preview geometry straight
//! into the store. `finish` puts the original geometry back and hands the
//! final geometry to the caller, which applies it as a single committed
//! mutation.

use crate::element::{ElementId, ElementType};
use crate::error::EditorResult;
use crate::store::ElementStore;
use crate::transform::CanvasTransform;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Smallest width/height a resize can produce, in canvas units.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;
/// Pointer travel, in screen pixels, before a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum DragPayload {
    /// An element already on the canvas.
    Element(ElementId),
    /// A new element dragged in from the palette.
    NewElement(ElementType),
}

/// Resize handle positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight)
    }

    /// Handle position on a bounding box, in canvas coordinates.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        let x = if self.moves_left() {
            bounds.x0
        } else if self.moves_right() {
            bounds.x1
        } else {
            center.x
        };
        let y = if self.moves_top() {
            bounds.y0
        } else if self.moves_bottom() {
            bounds.y1
        } else {
            center.y
        };
        Point::new(x, y)
    }
}

/// Find the resize handle of `bounds` under a canvas point.
///
/// `scale` is the view scale so that the tolerance stays constant on screen.
pub fn handle_at(bounds: Rect, point: Point, scale: f64) -> Option<ResizeHandle> {
    let tolerance = HANDLE_HIT_TOLERANCE / scale;
    ResizeHandle::ALL
        .into_iter()
        .find(|handle| handle.position(bounds).distance(point) <= tolerance)
}

/// Apply a handle drag to a rectangle.
///
/// Moved edges are snapped through `transform`; the result is never smaller
/// than `min_size` on either axis, and the edges opposite the handle stay put.
pub fn resize_rect(
    original: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    transform: &CanvasTransform,
    min_size: f64,
) -> Rect {
    let grid = &transform.grid;
    let mut rect = original;
    if handle.moves_left() {
        rect.x0 = grid.snap_value(original.x0 + delta.x);
    }
    if handle.moves_right() {
        rect.x1 = grid.snap_value(original.x1 + delta.x);
    }
    if handle.moves_top() {
        rect.y0 = grid.snap_value(original.y0 + delta.y);
    }
    if handle.moves_bottom() {
        rect.y1 = grid.snap_value(original.y1 + delta.y);
    }

    if rect.x1 - rect.x0 < min_size {
        if handle.moves_left() {
            rect.x0 = rect.x1 - min_size;
        } else {
            rect.x1 = rect.x0 + min_size;
        }
    }
    if rect.y1 - rect.y0 < min_size {
        if handle.moves_top() {
            rect.y0 = rect.y1 - min_size;
        } else {
            rect.y1 = rect.y0 + min_size;
        }
    }
    rect
}

/// Current drag state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Moving an element (and its subtree).
    Moving {
        id: ElementId,
        /// Screen point of the press.
        press: Point,
        /// Whether the pointer has left the press point.
        moved: bool,
        /// Pointer position relative to the element's top-left corner.
        grab_offset: Vec2,
        /// Position before the drag.
        origin: Point,
        /// Position currently previewed.
        preview: Point,
    },
    /// Dragging one of an element's resize handles.
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        press: Point,
        moved: bool,
        /// Canvas point where the drag started.
        start: Point,
        /// Geometry before the drag.
        original: Rect,
        /// Geometry currently previewed.
        preview: Rect,
    },
    /// Dragging a new element in from the palette.
    Placing { ty: ElementType, preview: Point },
}

/// Final geometry of a completed drag, to be committed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DragCommit {
    Moved { id: ElementId, from: Point, to: Point },
    Resized { id: ElementId, from: Rect, to: Rect },
    Place { ty: ElementType, position: Point },
}

/// Drives a single pointer drag.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    min_size: f64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(MIN_ELEMENT_SIZE)
    }
}

fn set_rect(store: &mut ElementStore, id: &ElementId, rect: Rect) {
    if let Some(element) = store.get_mut(id) {
        element.position = rect.origin();
        element.size = rect.size();
    }
}

impl DragController {
    pub fn new(min_size: f64) -> Self {
        Self {
            state: DragState::Idle,
            min_size: if min_size.is_finite() && min_size > 0.0 {
                min_size
            } else {
                MIN_ELEMENT_SIZE
            },
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != DragState::Idle
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Start moving an element from a screen point.
    ///
    /// Returns `Ok(false)` without starting if the element is locked or
    /// hidden.
    pub fn begin_move(
        &mut self,
        store: &ElementStore,
        transform: &CanvasTransform,
        id: &ElementId,
        screen_point: Point,
    ) -> EditorResult<bool> {
        let element = store.require(id)?;
        if !element.is_interactive() {
            log::debug!("Element {} is not draggable", id);
            return Ok(false);
        }
        let canvas_point = transform.screen_to_canvas(screen_point);
        self.state = DragState::Moving {
            id: id.clone(),
            press: screen_point,
            moved: false,
            grab_offset: canvas_point - element.position,
            origin: element.position,
            preview: element.position,
        };
        log::debug!("Drag start: move {}", id);
        Ok(true)
    }

    /// Start resizing an element by one of its handles.
    pub fn begin_resize(
        &mut self,
        store: &ElementStore,
        transform: &CanvasTransform,
        id: &ElementId,
        handle: ResizeHandle,
        screen_point: Point,
    ) -> EditorResult<bool> {
        let element = store.require(id)?;
        if !element.is_interactive() {
            log::debug!("Element {} is not resizable", id);
            return Ok(false);
        }
        let bounds = element.bounds();
        self.state = DragState::Resizing {
            id: id.clone(),
            handle,
            press: screen_point,
            moved: false,
            start: transform.screen_to_canvas(screen_point),
            original: bounds,
            preview: bounds,
        };
        log::debug!("Drag start: resize {} by {:?}", id, handle);
        Ok(true)
    }

    /// Start placing a new element of `ty`.
    pub fn begin_place(&mut self, transform: &CanvasTransform, ty: ElementType, screen_point: Point) {
        self.state = DragState::Placing {
            ty,
            preview: transform.screen_to_snapped_canvas(screen_point),
        };
        log::debug!("Drag start: place {}", ty);
    }

    /// Update the live preview for a pointer move. No history is involved.
    ///
    /// Moves and resizes ignore the pointer until it has travelled
    /// [`DRAG_THRESHOLD`] pixels from the press, so a click never changes
    /// geometry.
    pub fn update(&mut self, store: &mut ElementStore, transform: &CanvasTransform, screen_point: Point) {
        let canvas_point = transform.screen_to_canvas(screen_point);
        let min_size = self.min_size;

        match &mut self.state {
            DragState::Idle => {}
            DragState::Moving {
                id,
                press,
                moved,
                grab_offset,
                preview,
                ..
            } => {
                if !past_threshold(moved, *press, screen_point) {
                    return;
                }
                let target = transform.snap(canvas_point - *grab_offset).point;
                match store.move_element(id, target) {
                    Ok(()) => *preview = target,
                    Err(e) => log::warn!("Drag preview failed: {}", e),
                }
            }
            DragState::Resizing {
                id,
                handle,
                press,
                moved,
                start,
                original,
                preview,
            } => {
                if !past_threshold(moved, *press, screen_point) {
                    return;
                }
                let rect = resize_rect(*original, *handle, canvas_point - *start, transform, min_size);
                set_rect(store, id, rect);
                *preview = rect;
            }
            DragState::Placing { preview, .. } => {
                *preview = transform.snap(canvas_point).point;
            }
        }
    }

    /// End the drag at a screen point.
    ///
    /// The store is left with the pre-drag geometry; the returned commit
    /// describes the final geometry. `None` if nothing changed.
    pub fn finish(
        &mut self,
        store: &mut ElementStore,
        transform: &CanvasTransform,
        screen_point: Point,
    ) -> Option<DragCommit> {
        self.update(store, transform, screen_point);
        let state = std::mem::take(&mut self.state);
        restore(store, &state);

        let commit = match state {
            DragState::Idle => None,
            DragState::Moving {
                id, origin, preview, ..
            } => (origin != preview).then_some(DragCommit::Moved {
                id,
                from: origin,
                to: preview,
            }),
            DragState::Resizing {
                id,
                original,
                preview,
                ..
            } => (original != preview).then_some(DragCommit::Resized {
                id,
                from: original,
                to: preview,
            }),
            DragState::Placing { ty, preview } => Some(DragCommit::Place {
                ty,
                position: preview,
            }),
        };
        log::debug!("Drag end: {:?}", commit);
        commit
    }

    /// Abort the drag, restoring the pre-drag geometry.
    pub fn cancel(&mut self, store: &mut ElementStore) {
        let state = std::mem::take(&mut self.state);
        if state != DragState::Idle {
            log::debug!("Drag cancelled");
        }
        restore(store, &state);
    }
}

fn past_threshold(moved: &mut bool, press: Point, screen_point: Point) -> bool {
    if !*moved && press.distance(screen_point) >= DRAG_THRESHOLD {
        *moved = true;
    }
    *moved
}

fn restore(store: &mut ElementStore, state: &DragState) {
    match state {
        DragState::Moving { id, origin, .. } => {
            if let Err(e) = store.move_element(id, *origin) {
                log::warn!("Could not restore {}: {}", id, e);
            }
        }
        DragState::Resizing { id, original, .. } => set_rect(store, id, *original),
        DragState::Idle | DragState::Placing { .. } => {}
    }
}

/// Drag-and-drop entry points of an editing surface.
pub trait DragCapability {
    /// A drag begins at a screen point. Returns `false` if it was refused.
    fn on_drag_start(&mut self, payload: DragPayload, screen_point: Point) -> bool;
    /// The pointer moved during a drag.
    fn on_drag_over(&mut self, screen_point: Point);
    /// The drag was released. Returns the affected element, if any.
    fn on_drop(&mut self, screen_point: Point) -> Option<ElementId>;
    /// The drag was aborted.
    fn on_drag_cancel(&mut self);
}
