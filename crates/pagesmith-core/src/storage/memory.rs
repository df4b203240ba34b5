//! In-memory template storage.

use super::{sort_templates, stored_copy, BoxFuture, StorageError, StorageResult, TemplateStore};
use crate::codec::TemplateRecord;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, TemplateRecord>>,
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl MemoryTemplateStore {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored templates.
    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load_template(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Option<TemplateRecord>>> {
        let page_type = page_type.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            Ok(templates
                .values()
                .find(|t| t.page_type == page_type && t.active)
                .cloned())
        })
    }

    fn load_template_by_id(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>> {
        let id = id.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            templates
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn save_template(&self, record: &TemplateRecord, make_default: bool) -> BoxFuture<'_, StorageResult<()>> {
        let stored = stored_copy(record, make_default);
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(lock_error)?;
            if stored.active {
                for other in templates.values_mut() {
                    if other.page_type == stored.page_type && other.id != stored.id && other.active {
                        log::debug!("Template {} is no longer the default", other.id);
                        other.active = false;
                    }
                }
            }
            templates.insert(stored.id.clone(), stored);
            Ok(())
        })
    }

    fn delete_template(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(lock_error)?;
            templates.remove(&id);
            Ok(())
        })
    }

    fn list_templates(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>> {
        let page_type = page_type.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            let mut matching: Vec<TemplateRecord> = templates
                .values()
                .filter(|t| t.page_type == page_type)
                .cloned()
                .collect();
            sort_templates(&mut matching);
            Ok(matching)
        })
    }
}
