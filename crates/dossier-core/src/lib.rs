//! Core types and trait definitions for the Dossier client-and-contract
//! record service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod client;
pub mod contract;
pub mod error;
pub mod handler;
pub mod orchestrator;
pub mod payload;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod store;

pub use error::{Error, Result};
