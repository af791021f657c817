//! Utilidades de validación
//!
//! Conversión estricta de los campos que llegan en el body de las
//! peticiones de escritura. A diferencia de `services::valuation::normalize_amount`,
//! aquí nada se convierte en cero: un valor no numérico es un error.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use validator::ValidationError;

/// Monto máximo aceptado en escritura (precio de compra, gasto o venta)
///
/// Con este tope la suma de los montos de un vehículo queda muy lejos de
/// `Decimal::MAX`. La migración repite el límite en sus CHECK.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Convertir un campo JSON en un monto decimal finito
///
/// Acepta números JSON y strings numéricos (los formularios envían strings).
/// `null`, strings vacíos, booleanos y texto no numérico devuelven `None`.
pub fn parse_strict_amount(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => parse_decimal_text(s),
        _ => None,
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    // `Decimal::from_str` acepta separadores "1_000"
    if trimmed.is_empty() || trimmed.contains('_') {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Convertir un campo JSON en texto recortado
///
/// Los números se aceptan y se convierten a su representación textual.
pub fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalizar una placa: recortar espacios y pasar a mayúsculas
pub fn normalize_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Validar un monto entre cero y `MAX_AMOUNT`, ambos incluidos
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("actual".into(), &value.to_string());
        return Err(error);
    }
    validate_amount_limit(value)
}

/// Validar un monto estrictamente positivo y no mayor que `MAX_AMOUNT`
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("actual".into(), &value.to_string());
        return Err(error);
    }
    validate_amount_limit(value)
}

fn validate_amount_limit(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::from(MAX_AMOUNT) {
        let mut error = ValidationError::new("amount_too_large");
        error.add_param("max".into(), &MAX_AMOUNT);
        error.add_param("actual".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}
