//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod prepare;
pub mod report;
pub mod resolve;

pub use prepare::{execute_clean, execute_prepare};
pub use report::execute_report;
pub use resolve::{execute_resolve, render_resolved};
