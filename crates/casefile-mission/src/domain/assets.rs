//! Asset catalogue and reference resolution.
//!
//! Scenes reference images and audio by key. A key resolves to a bundled
//! file when the mission's catalogue knows it, or to a remote resource when
//! it is a well-formed `http`/`https` URL. Anything else is unresolved and
//! the caller renders a placeholder.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use casefile_core::error::DomainError;
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac", "flac"];

/// Kind of asset a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// A scene image.
    Image,
    /// A narration or background track.
    Audio,
}

impl AssetKind {
    /// Classifies a file by extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Image)
        } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

/// A loadable resource handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetHandle {
    /// A file shipped with the mission.
    Bundled(PathBuf),
    /// A remote resource.
    Remote(Url),
}

/// The image and audio keys a mission can reference.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    root: Option<PathBuf>,
    images: BTreeSet<String>,
    audio: BTreeSet<String>,
}

impl AssetCatalog {
    /// Creates an empty catalogue rooted at `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Register an image key.
    #[must_use]
    pub fn with_image(mut self, key: impl Into<String>) -> Self {
        self.images.insert(key.into());
        self
    }

    /// Register an audio key.
    #[must_use]
    pub fn with_audio(mut self, key: impl Into<String>) -> Self {
        self.audio.insert(key.into());
        self
    }

    /// Directory bundled keys are relative to.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Known keys of `kind`, sorted.
    pub fn keys(&self, kind: AssetKind) -> impl Iterator<Item = &str> {
        let keys = match kind {
            AssetKind::Image => &self.images,
            AssetKind::Audio => &self.audio,
        };
        keys.iter().map(String::as_str)
    }

    /// Returns `true` if `key` is a known asset of `kind`.
    #[must_use]
    pub fn contains(&self, kind: AssetKind, key: &str) -> bool {
        match kind {
            AssetKind::Image => self.images.contains(key),
            AssetKind::Audio => self.audio.contains(key),
        }
    }

    /// Resolves a reference to a handle, or `None` if it is neither a known
    /// key nor a remote URL.
    #[must_use]
    pub fn resolve(&self, kind: AssetKind, reference: &str) -> Option<AssetHandle> {
        if reference.is_empty() {
            return None;
        }
        if self.contains(kind, reference) {
            let path = match &self.root {
                Some(root) => root.join(reference),
                None => PathBuf::from(reference),
            };
            return Some(AssetHandle::Bundled(path));
        }
        parse_remote(reference).map(AssetHandle::Remote)
    }

    /// Builds a catalogue from every image and audio file below `root`.
    ///
    /// Keys are paths relative to `root` joined with `/`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a directory cannot be read.
    pub async fn scan(root: &Path) -> Result<Self, DomainError> {
        let mut catalog = Self::rooted(root);
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
                DomainError::Infrastructure(format!(
                    "failed to read asset directory {}: {e}",
                    dir.display()
                ))
            })?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                DomainError::Infrastructure(format!(
                    "failed to read asset directory {}: {e}",
                    dir.display()
                ))
            })? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|e| {
                    DomainError::Infrastructure(format!("failed to stat {}: {e}", path.display()))
                })?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(kind) = AssetKind::from_path(&path) else {
                    continue;
                };
                let Some(key) = relative_key(root, &path) else {
                    continue;
                };
                match kind {
                    AssetKind::Image => catalog.images.insert(key),
                    AssetKind::Audio => catalog.audio.insert(key),
                };
            }
        }

        tracing::debug!(
            root = %root.display(),
            images = catalog.images.len(),
            audio = catalog.audio.len(),
            "scanned asset directory"
        );
        Ok(catalog)
    }
}

/// Parses `reference` as a remote `http`/`https` URL with a host.
#[must_use]
pub fn parse_remote(reference: &str) -> Option<Url> {
    let url = Url::parse(reference).ok()?;
    let remote = matches!(url.scheme(), "http" | "https") && url.host_str().is_some();
    remote.then_some(url)
}

/// Display name of a track: the last `/`-separated segment of its key.
#[must_use]
pub fn track_display_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(segments?.join("/"))
}
