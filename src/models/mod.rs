//! Data models for the library API

pub mod book;
pub mod loan;
pub mod page;
