use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::texture_keys::validate_texture_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Sentinel for a texture that was never loaded. Drawing it is a no-op.
    pub const NOT_LOADED: TextureHandle = TextureHandle(u32::MAX);

    pub fn is_loaded(self) -> bool {
        self != Self::NOT_LOADED
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::NOT_LOADED
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("texture directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
    #[error("failed to read texture directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open texture {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Name-to-handle index for one loaded directory.
#[derive(Debug, Clone, Default)]
pub struct TextureDirectory {
    path: PathBuf,
    by_name: HashMap<String, TextureHandle>,
}

impl TextureDirectory {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            by_name: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<TextureHandle> {
        self.by_name.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, handle: TextureHandle) {
        self.by_name.insert(name.into(), handle);
    }

    pub fn handles(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.by_name.values().copied()
    }
}

/// Owns decoded RGBA pixels for every loaded texture.
///
/// Anything still loaded when the store is dropped is released then, so an
/// early exit cannot leak textures even if `unload_all` was never reached.
#[derive(Debug, Default)]
pub struct TextureStore {
    slots: Vec<Option<LoadedTexture>>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: LoadedTexture) -> TextureHandle {
        let handle = TextureHandle(self.slots.len() as u32);
        self.slots.push(Some(texture));
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&LoadedTexture> {
        if !handle.is_loaded() {
            return None;
        }
        self.slots.get(handle.0 as usize).and_then(Option::as_ref)
    }

    pub fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.get(handle).map(|texture| (texture.width, texture.height))
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn load_file(&mut self, path: &Path) -> Result<TextureHandle, TextureLoadError> {
        let texture = decode_rgba(path)?;
        Ok(self.insert(texture))
    }

    /// Loads every `*.png` directly inside `dir`, keyed by file name.
    ///
    /// Files that fail validation or decoding are logged and skipped; only a
    /// missing or unreadable directory is an error.
    pub fn load_directory(&mut self, dir: &Path) -> Result<TextureDirectory, TextureLoadError> {
        if !dir.is_dir() {
            return Err(TextureLoadError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }
        let entries = fs::read_dir(dir).map_err(|source| TextureLoadError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TextureLoadError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            candidates.push((name.to_string(), path));
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut directory = TextureDirectory::empty(dir);
        for (name, path) in candidates {
            if let Err(error) = validate_texture_name(&name) {
                warn!(texture = %name, error = %error, "texture_name_rejected");
                continue;
            }
            match self.load_file(&path) {
                Ok(handle) => directory.insert(name, handle),
                Err(error) => warn!(error = %error, "texture_load_failed"),
            }
        }

        info!(
            dir = %dir.display(),
            count = directory.len(),
            "texture_directory_loaded"
        );
        Ok(directory)
    }

    pub fn unload(&mut self, handle: TextureHandle) -> bool {
        if !handle.is_loaded() {
            return false;
        }
        match self.slots.get_mut(handle.0 as usize) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    pub fn unload_directory(&mut self, directory: &TextureDirectory) -> usize {
        let released = directory
            .handles()
            .filter(|handle| self.unload(*handle))
            .count();
        debug!(
            dir = %directory.path().display(),
            released,
            "texture_directory_unloaded"
        );
        released
    }

    pub fn unload_all(&mut self) -> usize {
        self.slots
            .iter_mut()
            .filter_map(Option::take)
            .count()
    }
}

impl Drop for TextureStore {
    fn drop(&mut self) {
        let released = self.unload_all();
        if released > 0 {
            debug!(released, "texture_store_released_on_drop");
        }
    }
}

fn decode_rgba(path: &Path) -> Result<LoadedTexture, TextureLoadError> {
    let reader = ImageReader::open(path).map_err(|source| TextureLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| TextureLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(LoadedTexture {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
