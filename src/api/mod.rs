//! API handlers for the library REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::ValidationErrors;

use crate::error::AppError;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Page content
    pub items: Vec<T>,
    /// Total number of matching records
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Records per page
    pub per_page: i64,
}

/// Bare pagination parameters for endpoints without filters
#[derive(Deserialize, IntoParams)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Flatten validator output into the flat `errors` list of the error body,
/// one message per violated field rule. Sorted so the ordering is stable.
pub(crate) fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Valor inválido.".to_string())
        })
        .collect();
    messages.sort();
    AppError::Validation(messages)
}
