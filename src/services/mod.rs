// src/services/mod.rs
pub mod calculations;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod generator;
pub mod scenario;
pub mod store;
