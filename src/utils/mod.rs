//! Utilidades del sistema
//!
//! Manejo de errores y validación de las peticiones de escritura.

pub mod errors;
pub mod validation;
