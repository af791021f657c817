//! Servicio de vehículos
//!
//! Valida las escrituras, aplica el ciclo de vida `IN_STOCK -> SOLD` y compone
//! los resúmenes de `valuation` para las lecturas. El almacenamiento se inyecta
//! como `VehicleRepository`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    AddExpenseRequest, CreateVehicleRequest, ExpenseResponse, IdResponse, SellVehicleRequest,
    VehicleDetailResponse,
};
use crate::models::{Expense, NewExpense, NewVehicle};
use crate::repositories::{RepositoryError, VehicleRepository};
use crate::services::valuation::{summarize_vehicle, VehicleSummary};
use crate::utils::errors::{vehicle_not_found, AppError, AppResult};
use crate::utils::validation::{normalize_plate, parse_strict_amount, text_field, validate_amount};

const INVALID_VEHICLE: &str = "Dados inválidos. Envie name, plate e purchasePrice >= 0.";
const INVALID_EXPENSE: &str = "Dados inválidos. Envie note e amount > 0.";
const INVALID_SALE: &str = "Dados inválidos. Envie soldPrice >= 0.";
const DUPLICATE_PLATE: &str = "Já existe um veículo com essa placa.";
const ALREADY_SOLD: &str = "Esse veículo já está marcado como vendido.";

pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    /// Listar vehículos con sus totales, del más reciente al más antiguo
    ///
    /// Sin filtros ni paginación.
    pub async fn list_vehicles(&self) -> AppResult<Vec<VehicleSummary>> {
        let vehicles = self.repository.list_vehicles().await?;
        let ids: Vec<Uuid> = vehicles.iter().map(|v| v.id).collect();

        let mut expenses_by_vehicle: HashMap<Uuid, Vec<Expense>> = HashMap::new();
        for expense in self.repository.list_expenses_for(&ids).await? {
            expenses_by_vehicle
                .entry(expense.vehicle_id)
                .or_default()
                .push(expense);
        }

        let summaries = vehicles
            .iter()
            .map(|vehicle| {
                let expenses = expenses_by_vehicle
                    .get(&vehicle.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                summarize_vehicle(vehicle, expenses)
            })
            .collect::<Vec<_>>();

        debug!("📋 {} vehículos listados", summaries.len());
        Ok(summaries)
    }

    /// Registrar un vehículo nuevo en estado `IN_STOCK`
    pub async fn create_vehicle(&self, request: CreateVehicleRequest) -> AppResult<IdResponse> {
        // Validar campos antes de tocar el almacenamiento
        let name = text_field(request.name.as_ref()).unwrap_or_default();
        let plate = text_field(request.plate.as_ref())
            .map(|p| normalize_plate(&p))
            .unwrap_or_default();
        let purchase_price = parse_strict_amount(request.purchase_price.as_ref())
            .ok_or_else(|| invalid(INVALID_VEHICLE))?;

        let new_vehicle = NewVehicle {
            name,
            plate,
            purchase_price,
        };
        new_vehicle.validate().map_err(|_| invalid(INVALID_VEHICLE))?;

        // Sin comprobación previa de la placa: decide la restricción UNIQUE
        let plate = new_vehicle.plate.clone();
        let vehicle = self
            .repository
            .insert_vehicle(new_vehicle.into_vehicle(Utc::now()))
            .await
            .map_err(|e| match e {
                RepositoryError::UniqueViolation(_) => AppError::Conflict(DUPLICATE_PLATE.to_string()),
                other => other.into(),
            })?;

        info!("🚗 Vehículo creado: {} ({})", vehicle.id, plate);
        Ok(IdResponse { id: vehicle.id })
    }

    /// Obtener un vehículo con sus totales y sus gastos
    pub async fn get_vehicle(&self, id: Uuid) -> AppResult<VehicleDetailResponse> {
        let vehicle = self
            .repository
            .find_vehicle(id)
            .await?
            .ok_or_else(vehicle_not_found)?;

        let expenses = self.repository.list_expenses(id).await?;
        let summary = summarize_vehicle(&vehicle, &expenses);

        Ok(VehicleDetailResponse {
            summary,
            expenses: expenses.into_iter().map(ExpenseResponse::from).collect(),
        })
    }

    /// Registrar un gasto
    ///
    /// Se permiten gastos sobre vehículos ya vendidos.
    pub async fn add_expense(
        &self,
        vehicle_id: Uuid,
        request: AddExpenseRequest,
    ) -> AppResult<ExpenseResponse> {
        let note = text_field(request.note.as_ref()).unwrap_or_default();
        let amount = parse_strict_amount(request.amount.as_ref())
            .ok_or_else(|| invalid(INVALID_EXPENSE))?;

        let new_expense = NewExpense {
            vehicle_id,
            note,
            amount,
        };
        new_expense.validate().map_err(|_| invalid(INVALID_EXPENSE))?;

        let vehicle = self
            .repository
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(vehicle_not_found)?;

        if vehicle.is_sold() {
            warn!("💸 Gasto registrado sobre vehículo vendido: {}", vehicle_id);
        }

        // Si el vehículo desaparece entre la lectura y el insert, la FK responde 404
        let expense = self
            .repository
            .insert_expense(new_expense.into_expense(Utc::now()))
            .await?;

        info!("🧾 Gasto {} registrado para vehículo {}", expense.id, vehicle_id);
        Ok(ExpenseResponse::from(expense))
    }

    /// Vender un vehículo: `IN_STOCK -> SOLD`, una sola vez
    pub async fn sell_vehicle(
        &self,
        vehicle_id: Uuid,
        request: SellVehicleRequest,
    ) -> AppResult<IdResponse> {
        let sold_price = parse_strict_amount(request.sold_price.as_ref())
            .ok_or_else(|| invalid(INVALID_SALE))?;
        validate_amount(&sold_price).map_err(|_| invalid(INVALID_SALE))?;

        if self
            .repository
            .mark_sold(vehicle_id, sold_price, Utc::now())
            .await?
        {
            info!("💰 Vehículo {} vendido por {}", vehicle_id, sold_price);
            return Ok(IdResponse { id: vehicle_id });
        }

        // Ninguna fila actualizada: no existe o ya estaba vendido
        match self.repository.find_vehicle(vehicle_id).await? {
            None => Err(vehicle_not_found()),
            Some(_) => Err(AppError::Conflict(ALREADY_SOLD.to_string())),
        }
    }
}

fn invalid(message: &str) -> AppError {
    AppError::InvalidInput(message.to_string())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::models::VehicleStatus;
    use crate::repositories::InMemoryVehicleRepository;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn service() -> (VehicleService, Arc<InMemoryVehicleRepository>) {
        let repository = Arc::new(InMemoryVehicleRepository::new());
        (VehicleService::new(repository.clone()), repository)
    }

    fn create_request(name: &str, plate: &str, price: serde_json::Value) -> CreateVehicleRequest {
        CreateVehicleRequest {
            name: Some(json!(name)),
            plate: Some(json!(plate)),
            purchase_price: Some(price),
        }
    }

    fn expense_request(note: &str, amount: serde_json::Value) -> AddExpenseRequest {
        AddExpenseRequest {
            note: Some(json!(note)),
            amount: Some(amount),
        }
    }

    fn sell_request(price: serde_json::Value) -> SellVehicleRequest {
        SellVehicleRequest {
            sold_price: Some(price),
        }
    }

    #[tokio::test]
    async fn test_create_vehicle_normalizes_plate() {
        let (service, repository) = service();

        let created = service
            .create_vehicle(create_request("  Gol G6 ", " abc1d23 ", json!(25000)))
            .await
            .unwrap();

        let stored = repository.find_vehicle(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Gol G6");
        assert_eq!(stored.plate, "ABC1D23");
        assert_eq!(stored.status, VehicleStatus::InStock);
        assert_eq!(stored.purchase_price, dec("25000"));
        assert_eq!(stored.sold_price, None);
        assert_eq!(stored.sold_date, None);
    }

    #[tokio::test]
    async fn test_create_vehicle_rejects_invalid_input() {
        let (service, repository) = service();

        let cases = vec![
            create_request("Gol", "ABC1D23", json!(-1)),
            create_request("", "ABC1D23", json!(100)),
            create_request("Gol", "   ", json!(100)),
            create_request("Gol", "ABC1D23", json!("abc")),
            CreateVehicleRequest::default(),
        ];
        for request in cases {
            let err = service.create_vehicle(request).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{:?}", err);
        }

        assert!(repository.list_vehicles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_vehicle_duplicate_plate_is_conflict() {
        let (service, repository) = service();
        let first = service
            .create_vehicle(create_request("Gol G6", "ABC1D23", json!(25000)))
            .await
            .unwrap();

        let err = service
            .create_vehicle(create_request("Outro", "abc1d23", json!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == DUPLICATE_PLATE));

        let vehicles = repository.list_vehicles().await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, first.id);
        assert_eq!(vehicles[0].name, "Gol G6");
    }

    #[tokio::test]
    async fn test_totals_and_sale_scenario() {
        let (service, _) = service();
        let id = service
            .create_vehicle(create_request("Gol G6", "abc1d23", json!(25000)))
            .await
            .unwrap()
            .id;

        service.add_expense(id, expense_request("Pneus", json!(800))).await.unwrap();
        service.add_expense(id, expense_request("Revisão", json!("250"))).await.unwrap();

        let detail = service.get_vehicle(id).await.unwrap();
        assert_eq!(detail.summary.total_expenses, dec("1050.00"));
        assert_eq!(detail.summary.total_invested, dec("26050.00"));
        assert_eq!(detail.summary.profit, None);
        assert_eq!(detail.expenses.len(), 2);

        service.sell_vehicle(id, sell_request(json!(32000))).await.unwrap();

        let sold = service.get_vehicle(id).await.unwrap().summary;
        assert_eq!(sold.status, VehicleStatus::Sold);
        assert_eq!(sold.sold_price, Some(dec("32000")));
        assert_eq!(sold.profit, Some(dec("5950.00")));
        assert!(sold.sold_date.is_some());
    }

    #[tokio::test]
    async fn test_second_sale_is_conflict_and_keeps_state() {
        let (service, repository) = service();
        let id = service
            .create_vehicle(create_request("Uno", "UNO0001", json!(9000)))
            .await
            .unwrap()
            .id;

        service.sell_vehicle(id, sell_request(json!(12000))).await.unwrap();
        let before = repository.find_vehicle(id).await.unwrap().unwrap();

        let err = service.sell_vehicle(id, sell_request(json!(1))).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == ALREADY_SOLD));

        let after = repository.find_vehicle(id).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_sell_unknown_vehicle_is_not_found() {
        let (service, _) = service();

        let err = service
            .sell_vehicle(Uuid::new_v4(), sell_request(json!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sell_validates_price_first() {
        let (service, _) = service();

        let err = service
            .sell_vehicle(Uuid::new_v4(), sell_request(json!(-5)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_concurrent_sales_have_a_single_winner() {
        let (service, _) = service();
        let service = Arc::new(service);
        let id = service
            .create_vehicle(create_request("Palio", "PAL0001", json!(7000)))
            .await
            .unwrap()
            .id;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.sell_vehicle(id, sell_request(json!(8000 + i))).await })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(matches!(e, AppError::Conflict(_))),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_add_expense_validation() {
        let (service, repository) = service();
        let id = service
            .create_vehicle(create_request("Celta", "CEL0001", json!(5000)))
            .await
            .unwrap()
            .id;

        let zero = service.add_expense(id, expense_request("Lavagem", json!(0))).await.unwrap_err();
        assert!(matches!(zero, AppError::InvalidInput(_)));

        let blank = service.add_expense(id, expense_request("  ", json!(10))).await.unwrap_err();
        assert!(matches!(blank, AppError::InvalidInput(_)));

        let missing = service
            .add_expense(Uuid::new_v4(), expense_request("Lavagem", json!(10)))
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));

        assert!(repository.list_expenses(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expense_amount_rounds_on_output() {
        let (service, repository) = service();
        let id = service
            .create_vehicle(create_request("Ka", "KA00001", json!(1000)))
            .await
            .unwrap()
            .id;

        let created = service
            .add_expense(id, expense_request("Óleo", json!(250.555)))
            .await
            .unwrap();
        assert_eq!(created.amount, dec("250.56"));

        // armazenado com precisão completa
        let stored = repository.list_expenses(id).await.unwrap();
        assert_eq!(stored[0].amount, dec("250.555"));
    }

    #[tokio::test]
    async fn test_expense_allowed_after_sale() {
        let (service, _) = service();
        let id = service
            .create_vehicle(create_request("Fox", "FOX0001", json!(20000)))
            .await
            .unwrap()
            .id;
        service.sell_vehicle(id, sell_request(json!(21000))).await.unwrap();

        service.add_expense(id, expense_request("Transferência", json!(500))).await.unwrap();

        let summary = service.get_vehicle(id).await.unwrap().summary;
        assert_eq!(summary.profit, Some(dec("500.00")));
    }

    #[tokio::test]
    async fn test_list_vehicles_includes_totals() {
        let (service, _) = service();
        let first = service
            .create_vehicle(create_request("Gol", "GOL0001", json!(10000)))
            .await
            .unwrap()
            .id;
        let second = service
            .create_vehicle(create_request("Up", "UP00001", json!(30000)))
            .await
            .unwrap()
            .id;
        service.add_expense(first, expense_request("Pintura", json!(1500))).await.unwrap();

        let list = service.list_vehicles().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second);
        assert_eq!(list[1].id, first);
        assert_eq!(list[1].total_invested, dec("11500"));
        assert_eq!(list[0].total_expenses, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_amounts_above_limit_are_rejected() {
        let (service, repository) = service();

        let err = service
            .create_vehicle(create_request("Gol", "GOL0009", json!("79228162514264337593543950335")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(repository.list_vehicles().await.unwrap().is_empty());

        let id = service
            .create_vehicle(create_request("Gol", "GOL0009", json!(1_000_000_000_000i64)))
            .await
            .unwrap()
            .id;

        let expense = service
            .add_expense(id, expense_request("Motor", json!("50000000000000000000000000000")))
            .await
            .unwrap_err();
        assert!(matches!(expense, AppError::InvalidInput(_)));

        let sale = service
            .sell_vehicle(id, sell_request(json!("1000000000000.01")))
            .await
            .unwrap_err();
        assert!(matches!(sale, AppError::InvalidInput(_)));

        let summary = service.get_vehicle(id).await.unwrap().summary;
        assert_eq!(summary.total_invested, dec("1000000000000"));
        assert_eq!(summary.status, VehicleStatus::InStock);
    }

    #[tokio::test]
    async fn test_list_vehicles_with_rows_at_decimal_limits() {
        let (service, repository) = service();
        let vehicle = repository
            .insert_vehicle(
                NewVehicle {
                    name: "Importado".to_string(),
                    plate: "BIG0001".to_string(),
                    purchase_price: Decimal::MAX,
                }
                .into_vehicle(Utc::now()),
            )
            .await
            .unwrap();
        for _ in 0..2 {
            repository
                .insert_expense(
                    NewExpense {
                        vehicle_id: vehicle.id,
                        note: "Frete".to_string(),
                        amount: dec("50000000000000000000000000000"),
                    }
                    .into_expense(Utc::now()),
                )
                .await
                .unwrap();
        }

        let list = service.list_vehicles().await.unwrap();
        assert_eq!(list[0].total_expenses, Decimal::MAX);
        assert_eq!(list[0].total_invested, Decimal::MAX);
        assert!(service.get_vehicle(vehicle.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_unknown_vehicle_is_not_found() {
        let (service, _) = service();
        let err = service.get_vehicle(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
