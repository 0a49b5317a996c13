//! Command implementations for the Folio CLI.
//!
//! - [`plan`] - assemble and print build plans
//! - [`build`] - assemble plans and emit page documents
//! - [`check`] - validate the configuration
//!
//! Each command provides an `execute` function taking its parsed arguments.

pub mod build;
pub mod check;
pub mod plan;
pub mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use plan::execute as plan_execute;
