//! Dub Core - Backend logic for automated video dubbing
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be used by the CLI tool or embedded in a server.

pub mod analysis;
pub mod assembly;
pub mod collaborators;
pub mod config;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod remux;
pub mod sync;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
