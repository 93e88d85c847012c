//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - State hashing for change tracking
//! - Time management
//! - Logging utilities

pub mod hashing;
pub mod logging;
pub mod math;
pub mod time;
