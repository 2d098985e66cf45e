//! Storage layer for the survey intake service.
//!
//! Provides database access via SQLx with SQLite.

mod models;
mod repository;

pub use repository::SurveyRepository;
