//! Data ingestion and normalization for the product-research engine.
//!
//! This crate handles:
//! - Raw row normalization (CSV headers or API fields to `ProductRecord`)
//! - Defensive numeric and date parsing
//! - Caching of keyword-search results behind an injected key-value store

pub mod cache;
pub mod normalizer;

pub use cache::{KeyValueStore, MemoryStore, SearchCache};
pub use normalizer::{normalize, Normalizer};
