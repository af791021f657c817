//! Vehicle finance backend
//!
//! API REST para controlar la compra, los gastos y la venta de vehículos
//! usados. La consumen el front-end web y la app móvil.

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
