//! System-level modules
//!
//! This module contains process-wide setup that sits outside the console's
//! domain logic:
//! - Logging initialization

pub mod logging;
