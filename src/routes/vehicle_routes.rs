use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::vehicle_dto::{
    AddExpenseRequest, CreateVehicleRequest, ExpenseResponse, IdResponse, SellVehicleRequest,
    VehicleDetailResponse,
};
use crate::services::VehicleSummary;
use crate::state::AppState;
use crate::utils::errors::{vehicle_not_found, AppError};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/:id", get(get_vehicle))
        .route("/vehicles/:id/expenses", post(add_expense))
        .route("/vehicles/:id/sell", post(sell_vehicle))
}

// Un id que no es UUID no puede existir: 404, igual que un id desconocido
fn parse_vehicle_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| vehicle_not_found())
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleSummary>>, AppError> {
    let vehicles = state.vehicles.list_vehicles().await?;
    Ok(Json(vehicles))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let Json(request) = payload?;
    let created = state.vehicles.create_vehicle(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleDetailResponse>, AppError> {
    let id = parse_vehicle_id(&id)?;
    let vehicle = state.vehicles.get_vehicle(id).await?;
    Ok(Json(vehicle))
}

async fn add_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AddExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    let Json(request) = payload?;
    let id = parse_vehicle_id(&id)?;
    let expense = state.vehicles.add_expense(id, request).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn sell_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SellVehicleRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, AppError> {
    let Json(request) = payload?;
    let id = parse_vehicle_id(&id)?;
    let sold = state.vehicles.sell_vehicle(id, request).await?;
    Ok(Json(sold))
}
