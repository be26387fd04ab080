#![forbid(unsafe_code)]

//! Runtime: host wiring and tooling around the dockspace layout engine.
//!
//! - [`file_store::FileStore`] persists layouts as JSON files.
//! - [`host::DockHost`] routes normalized host events into a
//!   [`dock_layout::LayoutEngine`].
//! - [`script`] replays recorded JSONL sessions.
//! - [`cli`] is the `dockctl` command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_store;
pub mod host;
pub mod logging;
pub mod script;

pub use cli::{run, run_from_env};
pub use config::{ConfigError, RuntimeConfig};
pub use error::{DockError, Result};
pub use file_store::FileStore;
pub use host::{DockEvent, DockHost, HostOutcome};
