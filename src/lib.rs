//! kubectl-multidelete - interactive selective deletion of cluster resources
//!
//! The run is a straight pipeline:
//! - `namespace`: recover the namespace from the query, refuse `--all-namespaces`
//! - `resource`: list resources through `kubectl get`
//! - `select_tui` / `picker`: let the operator mark what to delete
//! - `delete`: rebuild one `kubectl delete` call for the marked resources
//!
//! # Examples
//!
//! ```rust
//! use multidelete::delete::delete_args;
//! use multidelete::resource::ResourceRecord;
//!
//! let selected = vec![ResourceRecord {
//!     name: "pod-b".to_string(),
//!     namespace: String::new(),
//!     display_line: "pod-b   1/1   Running".to_string(),
//! }];
//! let args = delete_args(Some("team-x"), "pods", &selected);
//! assert_eq!(args, ["delete", "-n", "team-x", "pods", "pod-b"]);
//! ```

pub mod cli;
pub mod config;
pub mod delete;
pub mod error;
pub mod kubectl;
pub mod namespace;
pub mod picker;
pub mod resource;
pub mod select_tui;

pub use config::Config;
pub use error::{Error, Result};
pub use resource::ResourceRecord;
