//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su ciclo de vida
//! (`IN_STOCK` -> `SOLD`). Mapea al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    InStock,
    Sold,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub plate: String,
    pub status: VehicleStatus,
    pub purchase_price: Decimal,
    pub sold_price: Option<Decimal>,
    pub purchase_date: DateTime<Utc>,
    pub sold_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn is_sold(&self) -> bool {
        self.status == VehicleStatus::Sold
    }
}

/// Datos de alta de un vehículo (nombre y placa ya recortados)
#[derive(Debug, Clone, Validate)]
pub struct NewVehicle {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub name: String,

    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub plate: String,

    #[validate(custom = "crate::utils::validation::validate_amount")]
    pub purchase_price: Decimal,
}

impl NewVehicle {
    /// Construir la fila completa de un vehículo recién comprado
    pub fn into_vehicle(self, now: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            name: self.name,
            plate: self.plate,
            status: VehicleStatus::InStock,
            purchase_price: self.purchase_price,
            sold_price: None,
            purchase_date: now,
            sold_date: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vehicle_starts_in_stock() {
        let now = Utc::now();
        let vehicle = NewVehicle {
            name: "Gol G6".to_string(),
            plate: "ABC1D23".to_string(),
            purchase_price: Decimal::from(25000),
        }
        .into_vehicle(now);

        assert_eq!(vehicle.status, VehicleStatus::InStock);
        assert!(!vehicle.is_sold());
        assert_eq!(vehicle.sold_price, None);
        assert_eq!(vehicle.sold_date, None);
        assert_eq!(vehicle.created_at, now);
        assert_eq!(vehicle.purchase_date, now);
    }

    #[test]
    fn test_new_vehicle_validation() {
        let valid = NewVehicle {
            name: "Gol G6".to_string(),
            plate: "ABC1D23".to_string(),
            purchase_price: Decimal::ZERO,
        };
        assert!(valid.validate().is_ok());

        let negative = NewVehicle {
            purchase_price: Decimal::from(-1),
            ..valid.clone()
        };
        assert!(negative.validate().is_err());

        let blank = NewVehicle {
            name: "   ".to_string(),
            ..valid
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_status_serializes_like_the_database_enum() {
        assert_eq!(serde_json::to_string(&VehicleStatus::InStock).unwrap(), "\"IN_STOCK\"");
        assert_eq!(serde_json::to_string(&VehicleStatus::Sold).unwrap(), "\"SOLD\"");
    }
}
