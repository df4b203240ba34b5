//! Template persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryTemplateStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTemplateStore;

use crate::codec::TemplateRecord;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for template storage backends.
///
/// Backends keep at most one default (`active`) template per page type:
/// storing an active template clears the flag on the others of its page
/// type.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait TemplateStore: Send + Sync {
    /// Load the default template of a page type, if there is one.
    fn load_template(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Option<TemplateRecord>>>;

    /// Load a template by id.
    fn load_template_by_id(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>>;

    /// Save a template, optionally making it the default of its page type.
    fn save_template(&self, record: &TemplateRecord, make_default: bool) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a template. Deleting a missing template is not an error.
    fn delete_template(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All templates of a page type, sorted by name.
    fn list_templates(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>>;
}

/// Trait for template storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait TemplateStore {
    /// Load the default template of a page type, if there is one.
    fn load_template(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Option<TemplateRecord>>>;

    /// Load a template by id.
    fn load_template_by_id(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>>;

    /// Save a template, optionally making it the default of its page type.
    fn save_template(&self, record: &TemplateRecord, make_default: bool) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a template. Deleting a missing template is not an error.
    fn delete_template(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// All templates of a page type, sorted by name.
    fn list_templates(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>>;
}

/// Prepare a record for storage: `make_default` forces the active flag.
pub(crate) fn stored_copy(record: &TemplateRecord, make_default: bool) -> TemplateRecord {
    let mut stored = record.clone();
    stored.active = stored.active || make_default;
    stored
}

/// Order used by `list_templates`.
pub(crate) fn sort_templates(templates: &mut [TemplateRecord]) {
    templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
