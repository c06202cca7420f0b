//! Configuration management.
//!
//! TOML-based settings with atomic section-level updates.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    CollaboratorSettings, ConfigSection, JobSettings, LoggingSettings, PathSettings,
    RemuxSettings, Settings, SyncSettings,
};
