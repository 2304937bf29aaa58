//! menu-maker - SQL query and menu metrics tools for AI agents.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod query;
pub mod resources;
pub mod server;
pub mod tools;
