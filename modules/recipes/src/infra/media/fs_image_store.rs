use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{ImageKind, ImageStore, ImageUpload};

const KNOWN_FOLDERS: [ImageKind; 2] = [ImageKind::Recipe, ImageKind::Avatar];

/// Stores images under `<root>/<folder>/` and hands back URLs under
/// `<url_prefix>/<folder>/`, where the folder follows the [`ImageKind`].
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix: String = url_prefix.into();
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_owned(),
        }
    }

    /// Maps a reference produced by `save` back to its file.
    fn local_path(&self, reference: &str) -> Option<PathBuf> {
        let rest = reference
            .strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')?;
        let (folder, file_name) = rest.split_once('/')?;
        let known = KNOWN_FOLDERS.iter().any(|k| k.folder() == folder);
        let plain = !file_name.is_empty()
            && !file_name.starts_with('.')
            && !file_name.contains(['/', '\\']);
        (known && plain).then(|| self.root.join(folder).join(file_name))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, kind: ImageKind, upload: ImageUpload) -> Result<String, DomainError> {
        let folder = kind.folder();
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::storage(format!("create {}: {e}", dir.display())))?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), upload.extension);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| DomainError::storage(format!("write {}: {e}", path.display())))?;

        debug!(path = %path.display(), bytes = upload.bytes.len(), "stored image");
        Ok(format!("{}/{folder}/{file_name}", self.url_prefix))
    }

    async fn remove(&self, reference: &str) -> Result<(), DomainError> {
        let Some(path) = self.local_path(reference) else {
            debug!(reference, "not a stored image, nothing to remove");
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "removed image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::storage(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}
