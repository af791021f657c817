//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::repositories::RepositoryError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Respuesta de error para la API
///
/// Los clientes web y móvil muestran `error` tal cual al usuario.
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl AppError {
    /// Código HTTP asociado al tipo de error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unexpected(_) => "UNEXPECTED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let message = match self {
            AppError::InvalidInput(msg) => {
                warn!("⚠️ Datos inválidos: {}", msg);
                msg
            }
            AppError::NotFound(msg) => {
                warn!("🔍 Recurso no encontrado: {}", msg);
                msg
            }
            AppError::Conflict(msg) => {
                warn!("⚔️ Conflicto: {}", msg);
                msg
            }
            AppError::Unexpected(detail) => {
                // El detalle queda en los logs, nunca en la respuesta
                error!("❌ Error inesperado: {}", detail);
                "Erro inesperado. Tente novamente.".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message, code })).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(constraint) => {
                AppError::Conflict(format!("Registro duplicado ({}).", constraint))
            }
            RepositoryError::ForeignKeyViolation(_) => vehicle_not_found(),
            RepositoryError::Backend(detail) => AppError::Unexpected(detail),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de vehículo no encontrado
pub fn vehicle_not_found() -> AppError {
    AppError::NotFound("Veículo não encontrado.".to_string())
}
