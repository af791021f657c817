use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryError, VehicleRepository};
use crate::models::{Expense, Vehicle, VehicleStatus};

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError> {
        // La unicidad de la placa la garantiza la restricción vehicles_plate_key
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, name, plate, status, purchase_price, sold_price, purchase_date, sold_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#
        )
        .bind(vehicle.id)
        .bind(&vehicle.name)
        .bind(&vehicle.plate)
        .bind(vehicle.status)
        .bind(vehicle.purchase_price)
        .bind(vehicle.sold_price)
        .bind(vehicle.purchase_date)
        .bind(vehicle.sold_date)
        .bind(vehicle.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, RepositoryError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_expenses(&self, vehicle_id: Uuid) -> Result<Vec<Expense>, RepositoryError> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE vehicle_id = $1 ORDER BY created_at DESC"
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    async fn list_expenses_for(&self, vehicle_ids: &[Uuid]) -> Result<Vec<Expense>, RepositoryError> {
        if vehicle_ids.is_empty() {
            return Ok(Vec::new());
        }

        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE vehicle_id = ANY($1) ORDER BY created_at DESC"
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    async fn insert_expense(&self, expense: Expense) -> Result<Expense, RepositoryError> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (id, vehicle_id, note, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(expense.id)
        .bind(expense.vehicle_id)
        .bind(&expense.note)
        .bind(expense.amount)
        .bind(expense.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }

    async fn mark_sold(
        &self,
        id: Uuid,
        sold_price: Decimal,
        sold_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        // Escritura condicional: dos ventas simultáneas no pueden ganar ambas
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET status = $2, sold_price = $3, sold_date = $4
            WHERE id = $1 AND status = $5
            "#
        )
        .bind(id)
        .bind(VehicleStatus::Sold)
        .bind(sold_price)
        .bind(sold_at)
        .bind(VehicleStatus::InStock)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
