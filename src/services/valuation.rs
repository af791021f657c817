//! Valoración de vehículos
//!
//! Funciones puras que calculan los campos financieros derivados de un
//! vehículo (gastos totales, total invertido, resultado de la venta) a partir
//! de los datos almacenados. Sin I/O ni estado: misma entrada, misma salida.
//!
//! La acumulación se hace con precisión completa; el redondeo a 2 decimales
//! (mitad lejos de cero) ocurre solo al construir el `VehicleSummary`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Expense, Vehicle, VehicleStatus};

/// Monto tal como llega desde almacenamiento o desde otro cliente
#[derive(Debug, Clone, PartialEq)]
pub enum RawAmount {
    Number(f64),
    Text(String),
    Decimal(Decimal),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        RawAmount::Decimal(value)
    }
}

impl From<&Decimal> for RawAmount {
    fn from(value: &Decimal) -> Self {
        RawAmount::Decimal(*value)
    }
}

/// Normalizar un monto a `Decimal` sin fallar nunca
///
/// Pensado para rutas de lectura/visualización: lo que no se puede
/// interpretar (texto no numérico, NaN, infinito) vale cero.
/// Las rutas de escritura usan `utils::validation::parse_strict_amount`.
pub fn normalize_amount(raw: impl Into<RawAmount>) -> Decimal {
    match raw.into() {
        RawAmount::Decimal(value) => value,
        RawAmount::Number(value) => Decimal::from_f64(value).unwrap_or(Decimal::ZERO),
        RawAmount::Text(text) => {
            let trimmed = text.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .unwrap_or(Decimal::ZERO)
        }
    }
}

/// Redondear un monto para salida: 2 decimales, mitad lejos de cero
pub fn round_money(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // evita "-0.0" en el JSON
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Totales con precisión completa, antes de redondear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub total_expenses: Decimal,
    pub total_invested: Decimal,
    pub profit: Option<Decimal>,
}

/// Calcular gastos, inversión y resultado a partir de montos sin normalizar
///
/// Las sumas saturan en `Decimal::MAX`/`Decimal::MIN`, nunca hacen panic.
pub fn compute_totals<P, E, I, S>(purchase_price: P, expense_amounts: I, sold_price: Option<S>) -> Totals
where
    P: Into<RawAmount>,
    E: Into<RawAmount>,
    I: IntoIterator<Item = E>,
    S: Into<RawAmount>,
{
    let purchase_price = normalize_amount(purchase_price);
    let total_expenses = expense_amounts
        .into_iter()
        .map(|amount| normalize_amount(amount))
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount));
    let total_invested = purchase_price.saturating_add(total_expenses);
    let profit = sold_price.map(|price| normalize_amount(price).saturating_sub(total_invested));

    Totals {
        total_expenses,
        total_invested,
        profit,
    }
}

/// Resumen financiero de un vehículo listo para la API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    pub name: String,
    pub plate: String,
    pub status: VehicleStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub purchase_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_invested: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub sold_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub profit: Option<Decimal>,
    pub purchase_date: DateTime<Utc>,
    pub sold_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Construir el resumen de un vehículo con sus gastos
///
/// El orden de `expenses` no afecta al resultado.
pub fn summarize_vehicle(vehicle: &Vehicle, expenses: &[Expense]) -> VehicleSummary {
    let totals = compute_totals(
        &vehicle.purchase_price,
        expenses.iter().map(|e| &e.amount),
        vehicle.sold_price.as_ref(),
    );

    VehicleSummary {
        id: vehicle.id,
        name: vehicle.name.clone(),
        plate: vehicle.plate.clone(),
        status: vehicle.status,
        purchase_price: round_money(vehicle.purchase_price),
        total_expenses: round_money(totals.total_expenses),
        total_invested: round_money(totals.total_invested),
        sold_price: vehicle.sold_price.map(round_money),
        profit: totals.profit.map(round_money),
        purchase_date: vehicle.purchase_date,
        sold_date: vehicle.sold_date,
        created_at: vehicle.created_at,
    }
}
