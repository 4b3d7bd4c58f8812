//! Artifact stores.
//!
//! A store holds at most one authoritative artifact. `save` either replaces it
//! completely or leaves the previous one in place.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::error::{ReadError, WriteError};
use super::Artifact;

/// Destination for trained artifacts.
pub trait ArtifactStore {
    /// Replace the stored artifact.
    ///
    /// # Errors
    ///
    /// On failure the previously stored artifact is unchanged.
    fn save(&mut self, artifact: &Artifact) -> Result<(), WriteError>;

    /// Current artifact, if one was stored.
    ///
    /// # Errors
    ///
    /// If a stored artifact exists but cannot be read or validated.
    fn load(&self) -> Result<Option<Artifact>, ReadError>;
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// Single JSON file, replaced via a sibling temporary file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the JSON file at `path`. Nothing is touched until the
    /// first save or load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ArtifactStore for JsonFileStore {
    fn save(&mut self, artifact: &Artifact) -> Result<(), WriteError> {
        let temp = self.temp_path();
        let written = File::create(&temp)
            .map_err(WriteError::from)
            .and_then(|file| artifact.write_buffered(file));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        log::debug!("saved {} artifact to {}", artifact.kind().as_str(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Artifact>, ReadError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Artifact::load_json(&self.path).map(Some)
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// Keeps the last saved artifact in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    artifact: Option<Artifact>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved artifact.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Take ownership of the last saved artifact.
    pub fn into_artifact(self) -> Option<Artifact> {
        self.artifact
    }
}

impl ArtifactStore for MemoryStore {
    fn save(&mut self, artifact: &Artifact) -> Result<(), WriteError> {
        self.artifact = Some(artifact.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Artifact>, ReadError> {
        Ok(self.artifact.clone())
    }
}
