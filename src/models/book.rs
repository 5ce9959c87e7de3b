//! Book model and related request types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database.
///
/// `id` is `None` until the row is persisted; the store assigns it on insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
    /// Natural key: globally unique among books.
    pub isbn: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Título é obrigatório."))]
    pub title: String,
    #[validate(length(min = 1, message = "Autor é obrigatório."))]
    pub author: String,
    #[validate(length(min = 1, message = "Isbn é obrigatório."))]
    pub isbn: String,
}

/// Update book request. Only title and author are mutable; the ISBN of a
/// persisted book never changes through this path.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Título é obrigatório."))]
    pub title: String,
    #[validate(length(min = 1, message = "Autor é obrigatório."))]
    pub author: String,
}

/// Book query parameters. Present fields are matched as case-insensitive
/// substrings; absent fields act as wildcards.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_book_requires_all_fields() {
        let req = CreateBook {
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn create_book_accepts_filled_fields() {
        let req = CreateBook {
            title: "As aventuras".to_string(),
            author: "Artur".to_string(),
            isbn: "001".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
