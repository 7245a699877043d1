//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod lookup;
mod table;
mod transfer;

pub use config_gen::*;
pub use lookup::*;
pub use table::*;
pub use transfer::*;
