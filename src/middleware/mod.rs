//! Middleware del sistema
//!
//! CORS para los clientes web y móvil.

pub mod cors;

pub use cors::*;
