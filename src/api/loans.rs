//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{LoanDetails, LoanQuery},
        page::Pagination,
    },
};

use super::{validation_error, PaginatedResponse};

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoanRequest {
    /// ISBN of the book to lend
    #[validate(length(min = 1, message = "Isbn é obrigatório."))]
    pub isbn: String,
    /// Customer name
    #[validate(length(min = 1, message = "Cliente é obrigatório."))]
    pub customer: String,
    /// Customer email (optional)
    #[validate(email(message = "Email do cliente inválido."))]
    pub customer_email: Option<String>,
}

/// Mark-returned request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnedLoanRequest {
    pub returned: bool,
}

/// List loans by ISBN or customer
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans matching the filter", body = PaginatedResponse<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let page = Pagination::clamp(query.page, query.per_page);
    let (items, total) = state.services.loans.find(&query, &page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    }))
}

/// Lend a book to a customer
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created, body is the new loan id", body = i32),
        (status = 400, description = "Unknown ISBN or book already loaned", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<i32>)> {
    request.validate().map_err(validation_error)?;

    let book = state
        .services
        .books
        .get_by_isbn(&request.isbn)
        .await?
        .ok_or_else(|| {
            AppError::BusinessRule("Livro não encontrado para o isbn informado.".to_string())
        })?;

    // The loan date is fixed at the HTTP boundary, not inside the service.
    let loan_date = Utc::now().date_naive();

    let loan = state
        .services
        .loans
        .create(
            &book,
            &request.customer,
            request.customer_email.as_deref(),
            loan_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(loan.id)))
}

/// Mark a loan as returned
#[utoipa::path(
    patch,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = ReturnedLoanRequest,
    responses(
        (status = 200, description = "Loan updated"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ReturnedLoanRequest>,
) -> AppResult<StatusCode> {
    let mut loan = state
        .services
        .loans
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

    loan.returned = Some(request.returned);
    state.services.loans.update(&loan).await?;

    Ok(StatusCode::OK)
}

/// List all overdue loans
#[utoipa::path(
    get,
    path = "/loans/late",
    tag = "loans",
    responses(
        (status = 200, description = "All unreturned loans past the grace period", body = Vec<LoanDetails>)
    )
)]
pub async fn late_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.late_loans().await?;
    Ok(Json(loans))
}
