//! Process-level plumbing shared by claimsync binaries: layered configuration
//! and logging bootstrap.

pub mod config;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, BackendConfig, CliArgs, FirebaseConfig, LoggingConfig,
    Section, ServerConfig,
};
