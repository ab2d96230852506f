//! Command-line interface module.

mod args;
pub mod build;
pub mod check;
mod common;

pub use args::{BuildArgs, Cli, Commands};
pub use common::link_hint;
