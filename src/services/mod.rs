//! Business logic services

pub mod books;
pub mod loans;

use crate::{config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            loans: loans::LoansService::new(repository, loans_config),
        }
    }
}
