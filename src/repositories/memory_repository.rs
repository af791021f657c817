//! Repositorio en memoria
//!
//! Mismas garantías que PostgreSQL: placa única, borrado en cascada implícito
//! (los gastos exigen un vehículo existente) y venta condicional atómica
//! bajo el lock de escritura.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, VehicleRepository};
use crate::models::{Expense, Vehicle, VehicleStatus};

#[derive(Default)]
struct Store {
    // orden de inserción; los listados se ordenan al leer
    vehicles: Vec<Vehicle>,
    expenses: Vec<Expense>,
}

#[derive(Default)]
pub struct InMemoryVehicleRepository {
    store: RwLock<Store>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Más reciente primero; a igual fecha, el último insertado primero
fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.reverse();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError> {
        let mut store = self.store.write().await;

        if store.vehicles.iter().any(|v| v.plate == vehicle.plate) {
            return Err(RepositoryError::UniqueViolation("vehicles_plate_key".to_string()));
        }
        if store.vehicles.iter().any(|v| v.id == vehicle.id) {
            return Err(RepositoryError::UniqueViolation("vehicles_pkey".to_string()));
        }

        store.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let store = self.store.read().await;
        Ok(newest_first(store.vehicles.clone(), |v| v.created_at))
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn list_expenses(&self, vehicle_id: Uuid) -> Result<Vec<Expense>, RepositoryError> {
        let store = self.store.read().await;
        let expenses = store
            .expenses
            .iter()
            .filter(|e| e.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        Ok(newest_first(expenses, |e| e.created_at))
    }

    async fn list_expenses_for(&self, vehicle_ids: &[Uuid]) -> Result<Vec<Expense>, RepositoryError> {
        let store = self.store.read().await;
        let expenses = store
            .expenses
            .iter()
            .filter(|e| vehicle_ids.contains(&e.vehicle_id))
            .cloned()
            .collect();
        Ok(newest_first(expenses, |e| e.created_at))
    }

    async fn insert_expense(&self, expense: Expense) -> Result<Expense, RepositoryError> {
        let mut store = self.store.write().await;

        if !store.vehicles.iter().any(|v| v.id == expense.vehicle_id) {
            return Err(RepositoryError::ForeignKeyViolation(
                "expenses_vehicle_id_fkey".to_string(),
            ));
        }

        store.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn mark_sold(
        &self,
        id: Uuid,
        sold_price: Decimal,
        sold_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut store = self.store.write().await;

        match store
            .vehicles
            .iter_mut()
            .find(|v| v.id == id && v.status == VehicleStatus::InStock)
        {
            Some(vehicle) => {
                vehicle.status = VehicleStatus::Sold;
                vehicle.sold_price = Some(sold_price);
                vehicle.sold_date = Some(sold_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewExpense, NewVehicle};
    use chrono::Duration;

    fn new_vehicle(plate: &str, created_at: DateTime<Utc>) -> Vehicle {
        NewVehicle {
            name: "Onix".to_string(),
            plate: plate.to_string(),
            purchase_price: Decimal::from(40000),
        }
        .into_vehicle(created_at)
    }

    #[tokio::test]
    async fn test_duplicate_plate_is_unique_violation() {
        let repo = InMemoryVehicleRepository::new();
        let now = Utc::now();
        repo.insert_vehicle(new_vehicle("AAA1A11", now)).await.unwrap();

        let err = repo.insert_vehicle(new_vehicle("AAA1A11", now)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation(_)));
        assert_eq!(repo.list_vehicles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_vehicles_newest_first() {
        let repo = InMemoryVehicleRepository::new();
        let now = Utc::now();
        let old = repo.insert_vehicle(new_vehicle("OLD0001", now - Duration::days(2))).await.unwrap();
        let new = repo.insert_vehicle(new_vehicle("NEW0001", now)).await.unwrap();
        let mid = repo.insert_vehicle(new_vehicle("MID0001", now - Duration::days(1))).await.unwrap();

        let ids: Vec<Uuid> = repo.list_vehicles().await.unwrap().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![new.id, mid.id, old.id]);
    }

    #[tokio::test]
    async fn test_expense_requires_vehicle() {
        let repo = InMemoryVehicleRepository::new();
        let expense = NewExpense {
            vehicle_id: Uuid::new_v4(),
            note: "Pneus".to_string(),
            amount: Decimal::from(800),
        }
        .into_expense(Utc::now());

        let err = repo.insert_expense(expense).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_mark_sold_only_once() {
        let repo = InMemoryVehicleRepository::new();
        let vehicle = repo.insert_vehicle(new_vehicle("SEL1234", Utc::now())).await.unwrap();
        let first_sale = Utc::now();

        assert!(repo.mark_sold(vehicle.id, Decimal::from(50000), first_sale).await.unwrap());
        assert!(!repo.mark_sold(vehicle.id, Decimal::from(1), Utc::now()).await.unwrap());
        assert!(!repo.mark_sold(Uuid::new_v4(), Decimal::from(1), Utc::now()).await.unwrap());

        let stored = repo.find_vehicle(vehicle.id).await.unwrap().unwrap();
        assert_eq!(stored.status, VehicleStatus::Sold);
        assert_eq!(stored.sold_price, Some(Decimal::from(50000)));
        assert_eq!(stored.sold_date, Some(first_sale));
    }
}
