//! Terse Console - management console for the Terse URL shortener
//!
//! This library provides the table controller behind the console: a
//! summary table of shortened URLs with selection, bulk delete, JSON
//! export and highlighted search results, driven over the Terse HTTP API.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//! - **tui**: Terminal user interface
//! - **full**: All features enabled
//!
//! # Architecture
//! - `client`: Remote store seam (`TerseApi`) and its HTTP implementation
//! - `controller`: Table state, refresh sequencing, submit gating, export
//! - `highlight`: Match highlighting and the search results table
//! - `models`: Records, summaries, previews and export payloads
//! - `interfaces`: User interfaces (CLI, TUI)
//! - `config`: Configuration management
//! - `runtime`: Execution modes
//! - `system`: Logging setup

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod highlight;
pub mod interfaces;
pub mod models;
#[cfg(feature = "cli")]
pub mod runtime;
pub mod system;
