//! Utility modules for common functionality
//!
//! This module contains utility functions and helpers used throughout the application:
//! - `logging`: Logging configuration and setup

pub mod logging;
