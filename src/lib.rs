//! MovieMine: similar-movie lookup over a precomputed similarity table.
//!
//! The catalog snapshot is loaded once at startup into an immutable
//! [`catalog::Catalog`]. Queries run against it in memory; display metadata is
//! resolved through a [`services::MetadataProvider`].

pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
