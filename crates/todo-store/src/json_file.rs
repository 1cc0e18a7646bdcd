use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;

/// Whole-document JSON persistence for a value of type `T`.
///
/// `save` rewrites the file in place; a crash mid-write can leave it
/// truncated.
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into `target`. A missing file is an empty store:
    /// `target` is left untouched and the call succeeds.
    pub fn load_into(&self, target: &mut T) -> Result<(), StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file not found, starting empty");
                return Ok(());
            }
            Err(e) => return Err(StoreError::Io(format!("read {}: {e}", self.path.display()))),
        };

        *target = serde_json::from_slice(&bytes)?;
        Ok(())
    }

    /// Load the stored value, or `T::default()` when there is no file yet.
    pub fn load(&self) -> Result<T, StoreError>
    where
        T: Default,
    {
        let mut value = T::default();
        self.load_into(&mut value)?;
        Ok(value)
    }

    /// Serialize `value` as indented JSON and replace the file contents.
    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value)?;
        std::fs::write(&self.path, data)
            .map_err(|e| StoreError::Io(format!("write {}: {e}", self.path.display())))
    }
}

impl<T> Clone for JsonFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for JsonFile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFile").field("path", &self.path).finish()
    }
}
