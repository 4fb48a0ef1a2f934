//! Offline command-line front end for the inventory dashboard core

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;

pub use config::Config;
pub use error::{AppResult, CliError};
