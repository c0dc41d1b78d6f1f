//! Lectura de formularios multipart
//!
//! Junta el campo de archivo y los campos de texto de un `Multipart` de axum.

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::services::file_service::FileUpload;
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Formulario multipart ya leído
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub file: Option<FileUpload>,
    pub fields: HashMap<String, String>,
}

impl MultipartForm {
    /// Lee todos los campos; `file_field` es el nombre del campo de archivo
    pub async fn read(mut multipart: Multipart, file_field: &str) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == file_field {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("Uploaded file has no name".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Cannot read uploaded file: {}", e)))?;

                form.file = Some(FileUpload { file_name, bytes });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Cannot read field '{}': {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Archivo obligatorio
    pub fn require_file(&mut self) -> AppResult<FileUpload> {
        self.file
            .take()
            .ok_or_else(|| validation_error("file", "A file is required"))
    }

    /// Campo de texto no vacío, recortado
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}
