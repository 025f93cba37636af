//! HTTP ingestion service for IoT pressure sensors.
//!
//! Readings are validated, classified as leaking when pressure exceeds
//! [`ingest::LEAK_THRESHOLD`], persisted through a [`store::ReadingStore`],
//! and served back as listings and leak alerts.

pub mod api;
pub mod config;
pub mod db;
pub mod ingest;
pub mod server;
pub mod store;
