//! Common types and data structures

use crate::error::ReviewError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A résumé picked from disk or dropped onto the window
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub path: Option<PathBuf>,
}

impl SelectedFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            path: None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ReviewError> {
        let bytes = std::fs::read(path).map_err(|source| ReviewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self {
            name,
            bytes: bytes.into(),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Where the current request cycle stands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    Loading,
    Displayed,
    Errored,
}

/// The single mutable record behind the upload panel
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadState {
    pub file: Option<SelectedFile>,
    pub prompt: Option<String>,
    pub loading: bool,
    pub result: Option<String>,
    pub phase: UploadPhase,
    /// Bumped whenever `result` changes so rendered markdown can be cached
    pub revision: u64,
    pub completed_at: Option<DateTime<Local>>,
}

impl UploadState {
    pub(crate) fn set_result(&mut self, result: Option<String>) {
        self.result = result;
        self.revision += 1;
    }
}

/// Outcome of the start-up health probe
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceStatus {
    Checking,
    Online,
    Offline(String),
    Mock,
}
