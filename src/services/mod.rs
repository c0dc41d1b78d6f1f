//! Services module
//!
//! Lógica de negocio y colaboradores externos: credenciales, tokens,
//! almacenamiento de archivos, envío de emails y evaluación de vencimientos.

pub mod auth_service;
pub mod document_expiry_service;
pub mod email_service;
pub mod file_service;
pub mod jwt_service;

pub use auth_service::AuthService;
pub use email_service::{BrevoEmailService, EmailSender, LogEmailService};
pub use file_service::{FileCategory, FileStorage, FileUpload, LocalFileStorage, StoredFile};
pub use jwt_service::JwtService;
