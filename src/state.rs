//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum. El
//! almacenamiento llega inyectado dentro de `VehicleService`.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::VehicleRepository;
use crate::services::VehicleService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<VehicleService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repository: Arc<dyn VehicleRepository>) -> Self {
        Self {
            config,
            vehicles: Arc::new(VehicleService::new(repository)),
        }
    }
}
