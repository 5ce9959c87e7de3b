//! Book management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        loan::LoanDetails,
        page::Pagination,
    },
};

use super::{validation_error, PageParams, PaginatedResponse};

/// Register a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or ISBN already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    request.validate().map_err(validation_error)?;

    tracing::info!("creating a book for isbn: {}", request.isbn);

    let created = state
        .services
        .books
        .create(&request.title, &request.author, &request.isbn)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    state
        .services
        .books
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
}

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = PaginatedResponse<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = Pagination::clamp(query.page, query.per_page);
    let (items, total) = state.services.books.find(&query, &page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    }))
}

/// List loans of a book
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Loans of the book", body = PaginatedResponse<LoanDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn loans_by_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let book = state
        .services
        .books
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    let page = Pagination::clamp(params.page, params.per_page);
    let (items, total) = state.services.loans.loans_by_book(&book, &page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    }))
}

/// Update title and author of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    request.validate().map_err(validation_error)?;

    tracing::info!("updating book of id: {}", id);

    let mut book = state
        .services
        .books
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    book.title = request.title;
    book.author = request.author;

    let updated = state.services.books.update(&book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book has registered loans", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    tracing::info!("deleting book of id: {}", id);

    let book = state
        .services
        .books
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    state.services.books.delete(&book).await?;
    Ok(StatusCode::NO_CONTENT)
}
