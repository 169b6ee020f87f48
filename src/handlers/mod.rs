// src/handlers/mod.rs
pub mod dashboard;
pub mod error;
pub mod export;
pub mod query;
pub mod series;
