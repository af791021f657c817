//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL (`migrations/0001_vehicle_finance.sql`).

pub mod expense;
pub mod vehicle;

pub use expense::{Expense, NewExpense};
pub use vehicle::{NewVehicle, Vehicle, VehicleStatus};
