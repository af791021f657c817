use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use vehicle_finance::config::{DatabaseConfig, EnvironmentConfig};
use vehicle_finance::database;
use vehicle_finance::repositories::{InMemoryVehicleRepository, PgVehicleRepository, VehicleRepository};
use vehicle_finance::routes::create_app_router;
use vehicle_finance::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Vehicle Finance - API de compra, gastos y venta");
    info!("=================================================");

    // Inicializar almacenamiento
    let repository: Arc<dyn VehicleRepository> = match &config.database_url {
        Some(url) => {
            let pool = database::connect(&DatabaseConfig::new(url.clone()))
                .await
                .map_err(|e| {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    e
                })?;
            Arc::new(PgVehicleRepository::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida: usando almacenamiento en memoria (los datos se pierden al reiniciar)");
            Arc::new(InMemoryVehicleRepository::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app_router(AppState::new(config, repository));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/vehicles - Listar vehículos con totales");
    info!("   POST /api/vehicles - Registrar vehículo");
    info!("   GET  /api/vehicles/:id - Detalle con gastos");
    info!("   POST /api/vehicles/:id/expenses - Registrar gasto");
    info!("   POST /api/vehicles/:id/sell - Marcar como vendido");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
