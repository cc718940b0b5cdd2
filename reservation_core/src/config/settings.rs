use crate::models::StoreSchema;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variables that supply the store endpoint, in lookup order.
const STORE_URL_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
/// Environment variables that supply the store's public API key, in lookup order.
const STORE_KEY_VARS: &[&str] = &["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub form: FormConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub anon_key: String,
    pub schema: StoreSchema,
    /// Overrides the table name implied by `schema`.
    pub table: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub reset_delay_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            form: FormConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Supabase,
            url: String::new(),
            anon_key: String::new(),
            schema: StoreSchema::StudioReservation,
            table: None,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            reset_delay_seconds: 3,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl StoreConfig {
    pub fn table_name(&self) -> &str {
        self.table
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.schema.default_table())
    }
}

impl FormConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_seconds)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_store_env(first_env(STORE_URL_VARS), first_env(STORE_KEY_VARS))
    }

    /// Layers defaults, `config.toml` and `APP__*` variables, then applies the
    /// store URL and key when given.
    pub fn load_with_store_env(
        store_url: Option<String>,
        store_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("store.url", store_url)?
            .set_override_option("store.anon_key", store_key)?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.form.reset_delay_seconds == 0 {
            return Err(ConfigError::Message(
                "Form reset delay must be greater than 0".to_string(),
            ));
        }

        if self.cors.allowed_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(ConfigError::Message(
                "CORS origins cannot be empty strings".to_string(),
            ));
        }

        if self.store.schema == StoreSchema::Reservations {
            tracing::warn!(
                "Using the legacy 'reservations' column layout - photo types and month are written to shooting_type/date"
            );
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}
