use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use feedgrab_logging::{grab_info, grab_warn};

use crate::{AtomicFileWriter, PersistError};

/// Opaque session token kept in a single file between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored token, or `None` when there is no usable one yet.
    pub fn load(&self) -> Result<Option<String>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(PersistError::Io(err)),
        };
        let token = content.trim();
        if token.is_empty() {
            grab_warn!("Session file {:?} is empty", self.path);
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    pub fn save(&self, token: &str) -> Result<(), PersistError> {
        let (dir, filename) = split_path(&self.path)?;
        AtomicFileWriter::new(dir).write_replace(&filename, token.as_bytes())?;
        grab_info!("Session saved to {:?}", self.path);
        Ok(())
    }
}

fn split_path(path: &Path) -> Result<(PathBuf, String), PersistError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PersistError::OutputDir(format!("invalid session path {path:?}")))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, filename.to_string()))
}
