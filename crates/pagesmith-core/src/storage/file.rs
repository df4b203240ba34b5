//! File-based template storage for native platforms.

use super::{sort_templates, stored_copy, BoxFuture, StorageError, StorageResult, TemplateStore};
use crate::codec::{TemplateCodec, TemplateRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Stores each template as a JSON file named after its id. Files are read
/// with the lenient decoder, so templates written by older versions load
/// with defaults for whatever they lack.
pub struct FileTemplateStore {
    /// Base directory for template storage.
    base_path: PathBuf,
    codec: TemplateCodec,
}

impl FileTemplateStore {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        Self::with_codec(base_path, TemplateCodec::default())
    }

    /// Like [`FileTemplateStore::new`], decoding with a custom codec.
    pub fn with_codec(base_path: PathBuf, codec: TemplateCodec) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path, codec })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/pagesmith/templates/`
    /// On Windows: `%LOCALAPPDATA%\pagesmith\templates\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        let path = base.join("pagesmith").join("templates");
        Self::new(path)
    }

    /// Get the file path for a template ID.
    fn template_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_stem(id)))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn read(&self, path: &Path) -> StorageResult<TemplateRecord> {
        let json = fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(self.codec.decode_str(&json))
    }

    fn write(&self, record: &TemplateRecord) -> StorageResult<()> {
        let path = self.template_path(&record.id);
        let json = self
            .codec
            .encode_str(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Every readable template in the directory.
    fn read_all(&self) -> StorageResult<Vec<TemplateRecord>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut templates = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Only include .json files
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match self.read(&path) {
                Ok(record) => templates.push(record),
                Err(e) => log::warn!("Skipping unreadable template: {}", e),
            }
        }
        Ok(templates)
    }
}

/// Filename-safe form of a template id.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_xx`
/// (lowercase hex), so distinct ids never share a file.
fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

impl TemplateStore for FileTemplateStore {
    fn load_template(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Option<TemplateRecord>>> {
        let page_type = page_type.to_string();
        Box::pin(async move {
            Ok(self
                .read_all()?
                .into_iter()
                .find(|t| t.page_type == page_type && t.active))
        })
    }

    fn load_template_by_id(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>> {
        let path = self.template_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }
            self.read(&path)
        })
    }

    fn save_template(&self, record: &TemplateRecord, make_default: bool) -> BoxFuture<'_, StorageResult<()>> {
        let stored = stored_copy(record, make_default);

        Box::pin(async move {
            if stored.active {
                for mut other in self.read_all()? {
                    if other.page_type == stored.page_type && other.id != stored.id && other.active {
                        log::debug!("Template {} is no longer the default", other.id);
                        other.active = false;
                        self.write(&other)?;
                    }
                }
            }
            self.write(&stored)
        })
    }

    fn delete_template(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.template_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list_templates(&self, page_type: &str) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>> {
        let page_type = page_type.to_string();

        Box::pin(async move {
            let mut matching: Vec<TemplateRecord> = self
                .read_all()?
                .into_iter()
                .filter(|t| t.page_type == page_type)
                .collect();
            sort_templates(&mut matching);
            Ok(matching)
        })
    }
}
