//! REST client for a Supabase (PostgREST) table

use crate::config::StoreConfig;
use crate::error::{AppError, StoreError};
use crate::models::ReservationRow;
use crate::store::ReservationStore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error};

/// Error body PostgREST returns for rejected writes.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: String,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseStore {
    http: Client,
    rest_url: String,
}

impl SupabaseStore {
    /// Builds the client from configuration. Missing URL or key is a startup
    /// error, never a per-request one. So is a key that is not a valid header.
    pub fn new(config: &StoreConfig) -> Result<Self, AppError> {
        let url = config.url.trim();
        let anon_key = config.anon_key.trim();

        if url.is_empty() || anon_key.is_empty() {
            error!("Supabase URL or anon key is missing. Please check your environment variables.");
            return Err(AppError::Config(
                "Supabase configuration is incomplete. Set SUPABASE_URL and SUPABASE_ANON_KEY.".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| AppError::Config(format!("Invalid Supabase URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Supabase URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        let key_header = HeaderValue::from_str(anon_key)
            .map_err(|_| AppError::Config("Supabase anon key contains invalid header characters".to_string()))?;
        let auth_header = HeaderValue::from_str(&format!("Bearer {}", anon_key))
            .map_err(|_| AppError::Config("Supabase anon key contains invalid header characters".to_string()))?;
        headers.insert("apikey", key_header);
        headers.insert(AUTHORIZATION, auth_header);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build Supabase HTTP client: {}", e)))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }
}

#[async_trait]
impl ReservationStore for SupabaseStore {
    async fn insert_one(
        &self,
        table: &str,
        row: &ReservationRow,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let url = format!("{}/{}", self.rest_url, table);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Prefer", "return=representation")
            .json(std::slice::from_ref(row))
            .send()
            .await
            .map_err(|e| StoreError::rejected(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::rejected(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Rejected {
                message: rejection_message(status, &body),
            });
        }

        serde_json::from_str::<Vec<serde_json::Value>>(&body).map_err(|e| {
            StoreError::Unexpected(format!("insert into '{}' returned {}: {}", table, status, e))
        })
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) if !err.message.is_empty() => {
            debug!(
                code = ?err.code,
                details = ?err.details,
                hint = ?err.hint,
                "store rejected insert"
            );
            err.message
        }
        _ => status.to_string(),
    }
}
