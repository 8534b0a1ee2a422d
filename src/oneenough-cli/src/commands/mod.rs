//! Command handlers for the oneenough CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod matcher;
pub mod scan;
