//! Command handler implementations for kubectl-multidelete
//!
//! - `multidelete`: analyze the query, list, select, delete

mod multidelete;

pub use multidelete::*;
