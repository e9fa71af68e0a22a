//! # Scriptorium Code Execution
//!
//! Runs untrusted code submissions in per-request isolated workspaces.
//! Supports Python, JavaScript, Java, C and C++ with per-language
//! compile/run profiles, bounded output capture and enforced timeouts.

mod error;
mod executor;
mod languages;
mod service;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use executor::CodeExecutor;
pub use languages::{Language, LanguageProfile, StdinMode, ToolCommand};
pub use service::ExecutionService;
pub use types::{ExecutionLimits, ExecutionRequest, Outcome, StdinPayload};
pub use workspace::Workspace;

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
