//! Core types and configuration for the product-research engine.
//!
//! This crate provides shared types used across all other crates:
//! - Product, summary and price-segment records
//! - Display formatting for currency, counts and percentages
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod format;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
