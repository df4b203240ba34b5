//! Pagesmith Core Library
//!
//! Toolkit-independent editing engine for the Pagesmith page builder:
//! element model, undo history, canvas math, drag interaction, layer
//! ordering and template persistence.

pub mod codec;
pub mod color;
pub mod config;
pub mod document;
pub mod drag;
pub mod element;
pub mod error;
pub mod history;
pub mod input;
pub mod layers;
pub mod notify;
pub mod session;
pub mod snap;
pub mod storage;
pub mod store;
pub mod transform;

pub use codec::{TemplateCodec, TemplateRecord};
pub use color::SerializableColor;
pub use config::EditorConfig;
pub use document::{CanvasSettings, GlobalStyles, PageDocument, ViewMode};
pub use drag::{DragCapability, DragController, DragPayload, ResizeHandle};
pub use element::{ElementContent, ElementDefaults, ElementId, ElementStyles, ElementType, ElementUpdate, PageElement};
pub use error::{EditorError, EditorResult};
pub use history::{HistoryManager, MAX_HISTORY};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use layers::LayerMove;
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier};
pub use session::EditorSession;
pub use snap::{snap_to_grid, GridSnap, SnapResult, GRID_SIZE};
pub use storage::{MemoryTemplateStore, StorageError, StorageResult, TemplateStore};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileTemplateStore;
pub use store::ElementStore;
pub use transform::{CanvasTransform, MAX_ZOOM, MIN_ZOOM};
