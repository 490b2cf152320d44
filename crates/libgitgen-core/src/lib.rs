//! Core library for gitgen
//!
//! Compiles a human-writable event log into canonical commands and runs them
//! against a version-control [`Backend`]:
//! - [`types::event`]: the permissive input grammar (shorthand or object events)
//! - [`normalize`]: event log -> `Vec<Command>` with defaults and counters applied
//! - [`types::command`]: the canonical command vocabulary
//! - [`execute`]: strictly sequential dispatch to a backend

pub mod backend;
pub mod config;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod types;

pub use backend::{Backend, ConflictPolicy};
pub use config::{load_request, AuthorDefaults, GenerateRequest, GitConf};
pub use error::{EventLogError, GenError};
pub use executor::execute;
pub use normalize::normalize;
pub use types::command::{Command, CommitInfo, Pathspec, TagCommand};
pub use types::event::{Event, EventKind, EventObject};
