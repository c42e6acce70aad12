//! `wa` command-line interface: argument parsing, configuration, command
//! execution and structured output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod session;
pub mod styles;
