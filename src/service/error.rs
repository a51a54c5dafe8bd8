use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::rentalrequestmodel::RequestStatus,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Rental request {0} not found")]
    RentalRequestNotFound(Uuid),

    #[error("Property {0} not found")]
    PropertyNotFound(Uuid),

    #[error("Rental request {id} cannot move from {from:?} to {to:?}")]
    InvalidStatusTransition {
        id: Uuid,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Rental request {0} is no longer open for changes")]
    RequestClosed(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        let message = match &error {
            ServiceError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ErrorMessage::ServerError.to_string()
            }
            _ => error.to_string(),
        };

        HttpError::new(message, status)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::RentalRequestNotFound(_) | ServiceError::PropertyNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::InvalidStatusTransition { .. } | ServiceError::RequestClosed(_) => {
                StatusCode::CONFLICT
            }

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_mapping_matches_status_code() {
        let errors = vec![
            ServiceError::RentalRequestNotFound(Uuid::nil()),
            ServiceError::PropertyNotFound(Uuid::nil()),
            ServiceError::InvalidStatusTransition {
                id: Uuid::nil(),
                from: RequestStatus::Fulfilled,
                to: RequestStatus::Cancelled,
            },
            ServiceError::RequestClosed(Uuid::nil()),
            ServiceError::Validation("bad".to_string()),
            ServiceError::Database(sqlx::Error::RowNotFound),
        ];

        for error in errors {
            let status = error.status_code();
            let http: HttpError = error.into();
            assert_eq!(http.status, status);
        }
    }

    #[test]
    fn database_details_are_not_leaked() {
        let http: HttpError = ServiceError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(http.message, ErrorMessage::ServerError.to_string());
    }
}
