use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use url::Url;

const REDACTED: &str = "***";

/// Main application configuration. Read once at process start and treated
/// as an immutable value afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Trigger ingress listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// GraphQL backend endpoint and admin credential.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Firebase project used for custom claims and refresh markers.
    #[serde(default)]
    pub firebase: FirebaseConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// GraphQL endpoint, e.g. "https://hasura.example.com/v1/graphql".
    pub url: String,
    /// Sent as `x-hasura-admin-secret` on every request.
    pub admin_secret: String,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// Identity Toolkit base URL; point at the auth emulator for local runs.
    pub auth_base_url: String,
    /// Firestore base URL; point at the Firestore emulator for local runs.
    pub firestore_base_url: String,
    /// Pre-minted OAuth2 bearer token ("owner" for the emulators).
    #[serde(default)]
    pub access_token: Option<String>,
    /// Collection holding one refresh marker document per user.
    pub marker_collection: String,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/claimsync.log", empty disables file output
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8088,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/v1/graphql".to_string(),
            admin_secret: String::new(),
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            auth_base_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_base_url: "https://firestore.googleapis.com".to_string(),
            access_token: None,
            marker_collection: "user_meta".to_string(),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("admin_secret", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("auth_base_url", &self.auth_base_url)
            .field("firestore_base_url", &self.firestore_base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| REDACTED))
            .field("marker_collection", &self.marker_collection)
            .finish()
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/claimsync.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            firebase: FirebaseConfig::default(),
            logging: Some(default_logging_config()),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            bail!("Config file not found: {}", config_path.display());
        }

        // Logging stays None unless YAML/ENV provide it.
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path))
            // Example: APP__BACKEND__ADMIN_SECRET=... maps to backend.admin_secret
            .merge(Env::prefixed("APP__").split("__"));

        figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())
    }

    /// Load configuration from file, or defaults overlaid with environment variables.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                use figment::{
                    providers::{Env, Serialized},
                    Figment,
                };
                Figment::new()
                    .merge(Serialized::defaults(AppConfig::default()))
                    .merge(Env::prefixed("APP__").split("__"))
                    .extract()
                    .context("Failed to extract default config")
            }
        }
    }

    /// Reject configurations the handlers cannot run with.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.backend.url)
            .with_context(|| format!("Invalid backend.url '{}'", self.backend.url))?;
        if self.backend.admin_secret.trim().is_empty() {
            bail!("backend.admin_secret is not configured");
        }
        if self.firebase.project_id.trim().is_empty() {
            bail!("firebase.project_id is not configured");
        }
        for (key, raw) in [
            ("firebase.auth_base_url", &self.firebase.auth_base_url),
            ("firebase.firestore_base_url", &self.firebase.firestore_base_url),
        ] {
            Url::parse(raw).with_context(|| format!("Invalid {key} '{raw}'"))?;
        }
        if self.firebase.marker_collection.trim().is_empty() {
            bail!("firebase.marker_collection must not be empty");
        }
        Ok(())
    }

    /// Serialize configuration to YAML with credentials masked.
    pub fn to_yaml(&self) -> Result<String> {
        let mut masked = self.clone();
        if !masked.backend.admin_secret.is_empty() {
            masked.backend.admin_secret = REDACTED.to_string();
        }
        if masked.firebase.access_token.is_some() {
            masked.firebase.access_token = Some(REDACTED.to_string());
        }
        serde_yaml::to_string(&masked).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

/// Command line values that override loaded configuration.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub verbose: u8,
}
