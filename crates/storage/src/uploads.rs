#![forbid(unsafe_code)]

use crate::StoreError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSION: &str = ".bin";
const MAX_EXTENSION_LEN: usize = 16;

/// Flat directory of proof attachments. Callers only ever see basenames.
#[derive(Clone, Debug)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores `bytes` as `{node_id}_{token}{ext}` and returns that basename.
    /// The extension comes from the client filename, `.bin` when it has none.
    pub fn save(
        &self,
        node_id: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, StoreError> {
        let token = uuid::Uuid::new_v4().simple();
        let name = format!(
            "{}_{token}{}",
            filename_component(node_id),
            upload_extension(original_name)
        );

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&name))?;
        file.write_all(bytes)?;
        file.sync_all()?;

        tracing::debug!(file = %name, bytes = bytes.len(), "upload stored");
        Ok(name)
    }

    /// Deletes a stored upload; a missing file is not an error.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let Some(path) = self.resolve(name) else {
            return Ok(());
        };
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Path of a stored upload. Directory components of `name` are ignored.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        safe_basename(name).map(|base| self.root.join(base))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_some_and(|path| path.is_file())
    }

    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

/// Last path component of a client-supplied name, or `None` when nothing
/// usable remains (`""`, `"."`, `".."`).
pub fn safe_basename(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return None;
    }
    Some(base)
}

fn filename_component(node_id: &str) -> String {
    node_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn upload_extension(original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(safe_basename)
        .and_then(|base| Path::new(base).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });
    match extension {
        Some(ext) => format!(".{ext}"),
        None => DEFAULT_EXTENSION.to_string(),
    }
}
