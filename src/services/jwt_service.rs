use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Claims del access token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Servicio JWT: emite y verifica tokens HS256 firmados con `JWT_SECRET`
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_duration: Duration,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_duration: Duration::minutes(access_token_minutes),
        }
    }

    /// Duración configurada del access token
    pub fn access_token_duration(&self) -> Duration {
        self.access_token_duration
    }

    /// Genera un access token con la duración configurada
    pub fn generate_access_token(&self, user_id: Uuid) -> AppResult<String> {
        self.issue(user_id, self.access_token_duration)
    }

    /// Genera un token para `subject` válido durante `ttl`
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Error generating access token: {}", e)))
    }

    /// Valida el token y devuelve el id del sujeto
    ///
    /// Firma inválida, payload malformado, sujeto que no es UUID o `exp`
    /// vencido producen el mismo `Unauthorized`.
    pub fn verify(&self, token: &str) -> AppResult<Uuid> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| invalid_token())?;

        Uuid::parse_str(&claims.sub).map_err(|_| invalid_token())
    }
}

fn invalid_token() -> AppError {
    AppError::Unauthorized("Invalid or expired token".to_string())
}
