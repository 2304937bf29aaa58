//! Query execution for menu-maker.
//!
//! Isolates statement execution and result normalization from the tool and
//! transport layers.

pub mod executor;

pub use executor::{QueryExecutor, QueryResponse, SUCCESS_MESSAGE};
