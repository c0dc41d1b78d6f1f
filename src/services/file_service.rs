//! Almacenamiento de archivos subidos
//!
//! Los archivos se guardan en `UPLOAD_DIR/<categoría>/` con nombre único
//! `{categoría}_{timestamp}_{uuid}.{ext}` y se sirven bajo `PUBLIC_UPLOAD_PATH`.

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

/// Categoría de archivo con sus extensiones permitidas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    VehiclePhoto,
    Document,
    PaymentReceipt,
}

impl FileCategory {
    pub const ALL: [FileCategory; 3] = [
        FileCategory::VehiclePhoto,
        FileCategory::Document,
        FileCategory::PaymentReceipt,
    ];

    pub fn directory(&self) -> &'static str {
        match self {
            FileCategory::VehiclePhoto => "vehicles",
            FileCategory::Document => "documents",
            FileCategory::PaymentReceipt => "payments",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            FileCategory::VehiclePhoto => &["jpg", "jpeg", "png", "webp"],
            FileCategory::Document => &["pdf", "doc", "docx", "jpg", "jpeg", "png"],
            FileCategory::PaymentReceipt => &["pdf", "jpg", "jpeg", "png"],
        }
    }
}

/// Archivo recibido en un formulario multipart
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Resultado de guardar un archivo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub path: String,
    pub url: String,
    pub size: i64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn save(&self, upload: FileUpload, category: FileCategory) -> AppResult<StoredFile>;
    /// Contenido de un archivo guardado; `NotFound` si ya no está en disco
    async fn read(&self, path: &str) -> AppResult<Bytes>;
    /// Devuelve `true` si el archivo existía y se borró
    async fn delete(&self, path: &str) -> bool;
}

/// Borra varios archivos; los fallos solo se registran
pub async fn delete_all(storage: &dyn FileStorage, paths: &[String]) {
    for path in paths {
        if !storage.delete(path).await {
            warn!("⚠️  File {} could not be removed", path);
        }
    }
}

pub struct LocalFileStorage {
    root: PathBuf,
    public_path: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_path: &str, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            public_path: public_path.trim_end_matches('/').to_string(),
            max_file_size,
        }
    }

    /// Crea los directorios de cada categoría
    pub async fn ensure_directories(&self) -> std::io::Result<()> {
        for category in FileCategory::ALL {
            tokio::fs::create_dir_all(self.root.join(category.directory())).await?;
        }
        Ok(())
    }

    fn is_inside_root(&self, target: &Path) -> bool {
        let escapes = target
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
        !escapes && target.starts_with(&self.root)
    }

    fn extension_for(upload: &FileUpload, category: FileCategory) -> AppResult<String> {
        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        if !category.allowed_extensions().contains(&extension.as_str()) {
            return Err(AppError::BadRequest(format!(
                "File type not allowed. Allowed types: {}",
                category.allowed_extensions().join(", ")
            )));
        }
        Ok(extension)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, upload: FileUpload, category: FileCategory) -> AppResult<StoredFile> {
        if upload.bytes.is_empty() {
            return Err(validation_error("file", "File is empty"));
        }
        if upload.bytes.len() > self.max_file_size {
            return Err(validation_error("file", "File too large"));
        }
        let extension = Self::extension_for(&upload, category)?;

        let file_name = format!(
            "{}_{}_{}.{}",
            category.directory(),
            Utc::now().format("%Y%m%d_%H%M%S"),
            Uuid::new_v4(),
            extension
        );
        let directory = self.root.join(category.directory());
        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot create {}: {}", directory.display(), e)))?;

        let path = directory.join(&file_name);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot write {}: {}", path.display(), e)))?;
        debug!("💾 Stored {} ({} bytes)", path.display(), upload.bytes.len());

        Ok(StoredFile {
            file_name: upload.file_name,
            path: path.to_string_lossy().into_owned(),
            url: format!("{}/{}/{}", self.public_path, category.directory(), file_name),
            size: upload.bytes.len() as i64,
        })
    }

    async fn read(&self, path: &str) -> AppResult<Bytes> {
        let target = Path::new(path);
        if !self.is_inside_root(target) {
            warn!("⚠️  Refusing to read {} outside the upload directory", path);
            return Err(not_found_error("File"));
        }

        match tokio::fs::read(target).await {
            Ok(contents) => Ok(Bytes::from(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found_error("File")),
            Err(e) => Err(AppError::Storage(format!("Cannot read {}: {}", path, e))),
        }
    }

    async fn delete(&self, path: &str) -> bool {
        let target = Path::new(path);
        if !self.is_inside_root(target) {
            warn!("⚠️  Refusing to delete {} outside the upload directory", path);
            return false;
        }

        match tokio::fs::remove_file(target).await {
            Ok(()) => true,
            Err(e) => {
                debug!("File {} not removed: {}", path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, bytes: &'static [u8]) -> FileUpload {
        FileUpload {
            file_name: name.to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads", 1024);

        let stored = storage
            .save(upload("Receipt.PDF", b"%PDF-1.4"), FileCategory::PaymentReceipt)
            .await
            .unwrap();

        assert_eq!(stored.file_name, "Receipt.PDF");
        assert_eq!(stored.size, 8);
        assert!(stored.url.starts_with("/uploads/payments/payments_"));
        assert!(stored.url.ends_with(".pdf"));
        assert!(Path::new(&stored.path).exists());

        assert!(storage.delete(&stored.path).await);
        assert!(!Path::new(&stored.path).exists());
        assert!(!storage.delete(&stored.path).await);
    }

    #[tokio::test]
    async fn test_rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads", 1024);

        let err = storage
            .save(upload("photo.pdf", b"data"), FileCategory::VehiclePhoto)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads", 4);

        let err = storage
            .save(upload("doc.pdf", b"too big"), FileCategory::Document)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::NamedTempFile::new().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads", 1024);

        assert!(!storage.delete(&outside.path().to_string_lossy()).await);
        assert!(outside.path().exists());
        let err = storage.read(&outside.path().to_string_lossy()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_returns_stored_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads", 1024);

        let stored = storage
            .save(upload("license.pdf", b"%PDF-1.4 license"), FileCategory::Document)
            .await
            .unwrap();
        assert_eq!(&storage.read(&stored.path).await.unwrap()[..], b"%PDF-1.4 license");

        storage.delete(&stored.path).await;
        let err = storage.read(&stored.path).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_same_upload_twice_gets_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads", 1024);

        let first = storage
            .save(upload("car.jpg", b"jpeg"), FileCategory::VehiclePhoto)
            .await
            .unwrap();
        let second = storage
            .save(upload("car.jpg", b"jpeg"), FileCategory::VehiclePhoto)
            .await
            .unwrap();
        assert_ne!(first.path, second.path);
        assert_ne!(first.url, second.url);
    }
}
