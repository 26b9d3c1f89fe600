use axum::{
    Json,
    extract::rejection::{FormRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cellhub_schema::DetailBody;
use std::fmt;
use thiserror::Error as ThisError;
use tracing::error;

use super::inventory::InventoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Device,
    Battery,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Device => f.write_str("Device"),
            Entity::Battery => f.write_str("Battery"),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum CellhubError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<FormRejection> for CellhubError {
    fn from(rejection: FormRejection) -> Self {
        CellhubError::InvalidForm(rejection.body_text())
    }
}

impl From<PathRejection> for CellhubError {
    fn from(rejection: PathRejection) -> Self {
        CellhubError::InvalidPath(rejection.body_text())
    }
}

impl CellhubError {
    pub fn status(&self) -> StatusCode {
        match self {
            CellhubError::Inventory(_) => StatusCode::BAD_REQUEST,
            CellhubError::NotFound(_) => StatusCode::NOT_FOUND,
            CellhubError::InvalidForm(_) | CellhubError::InvalidPath(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CellhubError::RactorError(_)
            | CellhubError::DatabaseError(_)
            | CellhubError::Config(_)
            | CellhubError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CellhubError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        (status, Json(DetailBody::new(detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_entity_message() {
        let err = CellhubError::NotFound(Entity::Battery);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Battery not found");
    }

    #[test]
    fn domain_violation_maps_to_400_with_domain_message() {
        let err: CellhubError = InventoryError::DeviceNotFound { device_id: 999 }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Device not found");
    }

    #[test]
    fn infrastructure_failure_maps_to_500() {
        let err = CellhubError::RactorError("actor stopped".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
