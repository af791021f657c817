use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::Expense;
use crate::services::valuation::{round_money, VehicleSummary};

// Los campos llegan sin tipar: los formularios web y móvil
// mandan montos como número o como string. La validación es del servicio.

// Request para registrar un vehículo
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub name: Option<Value>,
    pub plate: Option<Value>,
    pub purchase_price: Option<Value>,
}

// Request para registrar un gasto
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExpenseRequest {
    pub note: Option<Value>,
    pub amount: Option<Value>,
}

// Request para vender un vehículo
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellVehicleRequest {
    pub sold_price: Option<Value>,
}

// Response con solo el id (alta y venta)
#[derive(Debug, Serialize, PartialEq)]
pub struct IdResponse {
    pub id: Uuid,
}

// Response de gasto
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub note: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            note: expense.note,
            amount: round_money(expense.amount),
            created_at: expense.created_at,
        }
    }
}

// Response de detalle: resumen + gastos (más reciente primero)
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    #[serde(flatten)]
    pub summary: VehicleSummary,
    pub expenses: Vec<ExpenseResponse>,
}
