//! Word → media lookup
//!
//! The extension ships a JSON object mapping normalized words to media
//! paths relative to the extension root. `MediaMapping` fetches it on first
//! use and keeps it once a fetch succeeds; a failed fetch is retried on the
//! next selection. `AssetResolver` turns mapping values into media URIs.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Opaque media URI handed to the page's media element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup failures. Both are shown to the user as "not found".
#[derive(Debug, Error)]
pub enum LookupError {
    /// Mapping could not be fetched
    #[error("transport failure: {0}")]
    Transport(String),

    /// Mapping fetched but not a word → path object
    #[error("malformed mapping: {0}")]
    Malformed(String),
}

/// Resolves normalized words to media references
pub trait LookupService: Send + Sync + 'static {
    /// `Ok(None)` means the word has no media.
    fn resolve(
        &self,
        word: &str,
    ) -> impl Future<Output = Result<Option<MediaRef>, LookupError>> + Send;
}

/// Turns mapping values into URIs under the extension's asset root
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: String,
}

impl AssetResolver {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute URIs pass through; `"."` or an empty root keeps paths relative.
    pub fn resolve(&self, path: &str) -> MediaRef {
        if path.contains("://") {
            return MediaRef::new(path);
        }
        let root = self.root.trim_end_matches('/');
        if root.is_empty() || root == "." {
            return MediaRef::new(path);
        }
        MediaRef::new(format!("{}/{}", root, path.trim_start_matches('/')))
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(".")
    }
}

/// JSON media mapping file, fetched lazily
#[derive(Debug)]
pub struct MediaMapping {
    path: PathBuf,
    assets: AssetResolver,
    entries: OnceCell<Map<String, Value>>,
}

impl MediaMapping {
    pub fn new(path: impl Into<PathBuf>, assets: AssetResolver) -> Self {
        Self {
            path: path.into(),
            assets,
            entries: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once a fetch has succeeded
    pub fn is_loaded(&self) -> bool {
        self.entries.initialized()
    }

    async fn fetch(&self) -> Result<Map<String, Value>, LookupError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| LookupError::Transport(format!("{}: {}", self.path.display(), e)))?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| LookupError::Malformed(format!("{}: {}", self.path.display(), e)))?;

        match value {
            Value::Object(map) => {
                info!(
                    "Loaded media mapping {} ({} words)",
                    self.path.display(),
                    map.len()
                );
                Ok(map)
            }
            other => Err(LookupError::Malformed(format!(
                "{}: expected an object, found {}",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }
}

impl LookupService for MediaMapping {
    async fn resolve(&self, word: &str) -> Result<Option<MediaRef>, LookupError> {
        let entries = self.entries.get_or_try_init(|| self.fetch()).await?;

        match entries.get(word) {
            None => Ok(None),
            Some(Value::String(path)) if path.is_empty() => Ok(None),
            Some(Value::String(path)) => {
                let media = self.assets.resolve(path);
                debug!("Resolved '{}' -> {}", word, media);
                Ok(Some(media))
            }
            Some(other) => Err(LookupError::Malformed(format!(
                "value for '{}' is {}, expected a string",
                word,
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// In-memory lookup table
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    entries: HashMap<String, MediaRef>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, word: &str, media: &str) -> Self {
        self.entries.insert(word.to_string(), MediaRef::new(media));
        self
    }
}

impl FromIterator<(String, MediaRef)> for StaticLookup {
    fn from_iter<I: IntoIterator<Item = (String, MediaRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl LookupService for StaticLookup {
    async fn resolve(&self, word: &str) -> Result<Option<MediaRef>, LookupError> {
        Ok(self.entries.get(word).cloned())
    }
}
