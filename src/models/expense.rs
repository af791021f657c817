//! Modelo de Expense
//!
//! Gastos asociados a un vehículo. Se borran en cascada con el vehículo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Expense - mapea exactamente a la tabla expenses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub note: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Datos de un gasto nuevo (nota ya recortada)
#[derive(Debug, Clone, Validate)]
pub struct NewExpense {
    pub vehicle_id: Uuid,

    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub note: String,

    #[validate(custom = "crate::utils::validation::validate_positive_amount")]
    pub amount: Decimal,
}

impl NewExpense {
    pub fn into_expense(self, now: DateTime<Utc>) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            vehicle_id: self.vehicle_id,
            note: self.note,
            amount: self.amount,
            created_at: now,
        }
    }
}
