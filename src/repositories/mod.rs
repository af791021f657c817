//! Repositorios
//!
//! Puerto de persistencia que consume `VehicleService`. Hay dos
//! implementaciones: PostgreSQL (producción) y memoria (desarrollo y tests).
//! Ambas garantizan la unicidad de la placa y la venta condicional.

pub mod memory_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Expense, Vehicle};

pub use memory_repository::InMemoryVehicleRepository;
pub use vehicle_repository::PgVehicleRepository;

/// Errores del almacenamiento
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Violación de una restricción UNIQUE (p. ej. placa repetida)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// El registro referenciado ya no existe
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                if db_err.is_unique_violation() {
                    RepositoryError::UniqueViolation(constraint)
                } else if db_err.is_foreign_key_violation() {
                    RepositoryError::ForeignKeyViolation(constraint)
                } else {
                    RepositoryError::Backend(db_err.message().to_string())
                }
            }
            other => RepositoryError::Backend(other.to_string()),
        }
    }
}

/// Operaciones de persistencia sobre vehículos y gastos
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Insertar un vehículo; una placa repetida devuelve `UniqueViolation`
    async fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError>;

    /// Todos los vehículos, del más reciente al más antiguo
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError>;

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, RepositoryError>;

    /// Gastos de un vehículo, del más reciente al más antiguo
    async fn list_expenses(&self, vehicle_id: Uuid) -> Result<Vec<Expense>, RepositoryError>;

    /// Gastos de varios vehículos en una sola consulta
    async fn list_expenses_for(&self, vehicle_ids: &[Uuid]) -> Result<Vec<Expense>, RepositoryError>;

    /// Insertar un gasto; si el vehículo no existe devuelve `ForeignKeyViolation`
    async fn insert_expense(&self, expense: Expense) -> Result<Expense, RepositoryError>;

    /// Marcar como vendido solo si sigue `IN_STOCK`
    ///
    /// Devuelve `false` si no se actualizó ninguna fila (no existe o ya vendido).
    async fn mark_sold(
        &self,
        id: Uuid,
        sold_price: Decimal,
        sold_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}
