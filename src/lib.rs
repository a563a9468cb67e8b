#![deny(missing_docs)]

//! Core library for the docdex batch indexer.

/// Environment-driven configuration management.
pub mod config;
/// Text-extraction client abstraction and Tika adapter.
pub mod extract;
/// Content-derived document identity.
pub mod identity;
/// Structured logging and tracing setup.
pub mod logging;
/// Run outcome counters and reporting.
pub mod metrics;
/// Sequential traversal-and-index pipeline.
pub mod pipeline;
/// Elasticsearch document store integration.
pub mod store;
