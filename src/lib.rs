// ABOUTME: Library root for riodeploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod install;
pub mod output;
pub mod ssh;
pub mod target;
pub mod types;
