//! Version normalization and caching layer
//!
//! This module fetches version listings from several upstream APIs, normalizes
//! them into one record shape and keeps the result in a TTL cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Sources   │────▶│   Refresh   │◀───▶│    Cache    │
//! │  (fetch)    │     │ (fallback)  │     │  (storage)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Classifier  │     │ OrderedSet  │
//! │ (java, dp)  │     │  (dedupe)   │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: Cache store trait with SQLite and in-memory implementations
//! - [`catalog`]: The configured set of sources and refresh-all
//! - [`classifier`]: Java and datapack metadata for a Minecraft version
//! - [`cutoff`]: The `1.7.10` historical lower bound
//! - [`error`]: Error types for cache and source operations
//! - [`ordered_set`]: Keyed, insertion-ordered deduplication
//! - [`refresh`]: Cache-or-fetch with stale fallback
//! - [`source`]: Source trait for fetching from an upstream
//! - [`sources`]: Concrete upstream implementations
//! - [`types`]: `VersionRecord` and `NodeVersion`

pub mod cache;
pub mod catalog;
pub mod classifier;
pub mod cutoff;
pub mod error;
pub mod ordered_set;
pub mod refresh;
pub mod source;
pub mod sources;
pub mod types;
