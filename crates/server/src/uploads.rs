use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// The lowercased extension of `filename` if it is an accepted image type.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Directory of uploaded receipt images.
///
/// Each upload gets a fresh random name, so two requests never write the
/// same file even when the client-side names collide.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `data` to `<dir>/<uuid>.<ext>` and return the path.
    pub async fn save(&self, ext: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.dir.join(format!("{}.{ext}", uuid::Uuid::new_v4()));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extension_is_case_insensitive() {
        assert_eq!(allowed_extension("receipt.PNG").as_deref(), Some("png"));
        assert_eq!(allowed_extension("scan.final.JpEg").as_deref(), Some("jpeg"));
        assert_eq!(allowed_extension("photo.jpg").as_deref(), Some("jpg"));
    }

    #[test]
    fn disallowed_or_missing_extension() {
        assert_eq!(allowed_extension("receipt.pdf"), None);
        assert_eq!(allowed_extension("receipt"), None);
        assert_eq!(allowed_extension("png"), None);
        assert_eq!(allowed_extension(""), None);
    }

    #[tokio::test]
    async fn save_never_reuses_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));
        store.ensure_dir().await.unwrap();

        let a = store.save("png", b"first").await.unwrap();
        let b = store.save("png", b"second").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(store.dir()));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(&a).unwrap(), b"first");
        assert_eq!(std::fs::read(&b).unwrap(), b"second");
    }
}
