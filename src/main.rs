use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_rental::{
    build_router,
    config::{DatabaseConfig, EnvironmentConfig},
    repositories::Repositories,
    services::{BrevoEmailService, EmailSender, LocalFileStorage, LogEmailService},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚗 Vehicle Rental API");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    let database = DatabaseConfig::from_env()?;

    // Inicializar base de datos
    info!("🗄️  Conectando a {}", database.masked_url());
    let pool = match database.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e.into());
        }
    };
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Error aplicando migraciones")?;
    info!("✅ Migraciones aplicadas");

    // Almacenamiento de archivos
    let storage = LocalFileStorage::new(
        &config.upload_dir,
        &config.public_upload_path,
        config.max_file_size,
    );
    storage
        .ensure_directories()
        .await
        .with_context(|| format!("No se pudo crear {}", config.upload_dir))?;

    // Envío de emails
    let email: Arc<dyn EmailSender> = match config.brevo_api_key.clone() {
        Some(api_key) => {
            info!("📧 Emails vía Brevo");
            Arc::new(BrevoEmailService::new(&config, api_key))
        }
        None => {
            warn!("⚠️  BREVO_API_KEY no configurada, los enlaces de verificación solo se registran en el log");
            Arc::new(LogEmailService::new(config.frontend_url.clone()))
        }
    };

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida {}", config.server_url()))?;
    let admin = config.admin_email.clone().zip(config.admin_password.clone());

    let app_state = AppState::new(config, Repositories::postgres(pool), Arc::new(storage), email);

    // Admin inicial
    if let Some((admin_email, admin_password)) = admin {
        app_state
            .auth
            .ensure_admin(&admin_email, &admin_password)
            .await
            .map_err(|e| anyhow::anyhow!("Error creando el admin inicial: {}", e))?;
        info!("🔐 Admin inicial disponible: {}", admin_email);
    }

    let app = build_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   /auth       - signup, login, verificación de email");
    info!("   /vehicles   - vehículos, fotos y documentos");
    info!("   /drivers    - conductores, contratos y documentos");
    info!("   /rentals    - solicitudes de alquiler");
    info!("   /dashboard  - estadísticas y alertas de vencimiento");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
