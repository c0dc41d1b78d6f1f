//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Repositories;
use crate::services::{AuthService, EmailSender, FileStorage, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub repositories: Repositories,
    pub auth: AuthService,
    pub jwt: Arc<JwtService>,
    pub storage: Arc<dyn FileStorage>,
    pub email: Arc<dyn EmailSender>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        repositories: Repositories,
        storage: Arc<dyn FileStorage>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        let auth = AuthService::new(repositories.users.clone(), config.bcrypt_cost);
        let jwt = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_minutes,
        ));

        Self {
            config: Arc::new(config),
            repositories,
            auth,
            jwt,
            storage,
            email,
        }
    }
}
