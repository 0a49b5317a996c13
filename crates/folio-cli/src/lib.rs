//! Folio CLI - plan and emit multi-page builds.
//!
//! The binary reads a `folio.toml` (or the `folio` field of `package.json`),
//! assembles build plans with [`folio_planner`] and emits one HTML document per
//! page with the reference [`html::HtmlEmitter`].
//!
//! # Modules
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `plan`, `build` and `check`
//! - [`error`] - CLI error type and miette conversion
//! - [`html`] - minijinja-based document emitter
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status messages
//!
//! # Example
//!
//! ```rust
//! use folio_cli::{error::Result, logger};
//! use folio_config::GlobalSettings;
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false, &GlobalSettings::default());
//!     // CLI command implementations...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod html;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
pub use html::HtmlEmitter;
