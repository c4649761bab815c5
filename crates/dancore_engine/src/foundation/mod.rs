//! Foundation module - Core utilities and types
//!
//! - Time management
//! - Logging utilities

pub mod logging;
pub mod time;
