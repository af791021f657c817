//! Services module
//!
//! Este módulo contiene la lógica de negocio: la valoración pura de los
//! vehículos y el servicio que aplica el ciclo de vida sobre el almacenamiento.

pub mod valuation;
pub mod vehicle_service;

pub use valuation::{normalize_amount, summarize_vehicle, VehicleSummary};
pub use vehicle_service::VehicleService;
