//! Servicio de credenciales
//!
//! Alta de usuarios, verificación de contraseña y ciclo de verificación de
//! email. Los hashes bcrypt se calculan en el pool bloqueante de tokio.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bcrypt::{hash, verify};
use rand::RngCore;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::user::{NewUser, User, UserRole};
use crate::repositories::UserRepository;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::validate_password;

/// Genera un token de verificación: 32 bytes aleatorios en base64 URL-safe
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
    /// Hash contra el que se compara un email desconocido
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Registra un usuario normal, sin verificar y con token de verificación
    pub async fn create(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);
        let password_hash = self.hash_password(password).await?;

        self.users
            .create(NewUser {
                email,
                password_hash,
                role: UserRole::User,
                is_verified: false,
                verification_token: Some(generate_verification_token()),
            })
            .await
    }

    /// Crea un admin ya verificado
    pub async fn create_admin(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);
        let password_hash = self.hash_password(password).await?;

        let admin = self
            .users
            .create(NewUser {
                email,
                password_hash,
                role: UserRole::Admin,
                is_verified: true,
                verification_token: None,
            })
            .await?;
        info!("🔐 Admin user created: {}", admin.email);
        Ok(admin)
    }

    /// Crea el admin inicial si todavía no existe
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<()> {
        match self.users.find_by_email(&normalize_email(email)).await? {
            Some(existing) if existing.is_admin() => Ok(()),
            Some(existing) => {
                warn!(
                    "⚠️  Bootstrap admin email {} belongs to a non-admin user, skipping",
                    existing.email
                );
                Ok(())
            }
            None => self.create_admin(email, password).await.map(|_| ()),
        }
    }

    /// Mismo error y mismo coste bcrypt para email desconocido y contraseña
    /// incorrecta
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.users.find_by_email(&normalize_email(email)).await?;
        let password_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash().await?,
        };

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
            .map_err(|e| AppError::Hash(e.to_string()))?;

        match user {
            Some(user) if matches => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn dummy_hash(&self) -> AppResult<String> {
        let cost = self.bcrypt_cost;
        self.dummy_hash
            .get_or_try_init(|| async move {
                tokio::task::spawn_blocking(move || hash(generate_verification_token(), cost))
                    .await
                    .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
                    .map_err(|e| AppError::Hash(e.to_string()))
            })
            .await
            .cloned()
    }

    pub async fn set_verified(&self, user_id: Uuid) -> AppResult<User> {
        self.users.mark_verified(user_id).await
    }

    /// Resuelve el token de verificación y marca el email como verificado
    pub async fn verify_email(&self, token: &str) -> AppResult<User> {
        let user = self
            .users
            .find_by_verification_token(token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        self.set_verified(user.id).await
    }

    /// Sustituye el token de verificación de un usuario no verificado
    pub async fn rotate_verification_token(&self, email: &str) -> AppResult<(User, String)> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        if user.is_verified {
            return Err(AppError::AlreadyVerified);
        }

        let token = generate_verification_token();
        let user = self.users.set_verification_token(user.id, &token).await?;
        Ok((user, token))
    }

    pub async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn hash_password(&self, password: &str) -> AppResult<String> {
        if validate_password(password).is_err() {
            return Err(validation_error(
                "password",
                "Password must be at least 6 characters long",
            ));
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Hash(e.to_string()))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
