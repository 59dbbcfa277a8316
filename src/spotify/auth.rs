use chrono::Utc;
use reqwest::Client;

use crate::{config, config::Config, types::Token};

/// Seconds before nominal expiry at which a token is already treated as stale.
const EXPIRY_BUFFER_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Loads the cached token from the local data directory, or obtains a
    /// fresh client-credentials token when no cache exists yet.
    pub async fn load_or_obtain(config: &Config) -> Result<Self, String> {
        match Self::load().await {
            Ok(manager) => Ok(manager),
            Err(_) => {
                let token = request_client_credentials_token(config).await?;
                let manager = Self { token };
                manager.persist().await?;
                Ok(manager)
            }
        }
    }

    pub async fn load() -> Result<Self, String> {
        let path = config::token_cache_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = config::token_cache_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub async fn get_valid_token(&mut self, config: &Config) -> Result<String, String> {
        if self.is_expired() {
            let new_token = if self.token.refresh_token.is_empty() {
                request_client_credentials_token(config).await?
            } else {
                self.refresh_token(config).await?
            };
            self.token = new_token;
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    /// A token is stale once inside the buffer window before nominal expiry.
    /// Saturating arithmetic keeps a corrupt cache (tiny or zero timestamps)
    /// on the expired path instead of panicking.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        let stale_at = self
            .token
            .obtained_at
            .saturating_add(self.token.expires_in)
            .saturating_sub(EXPIRY_BUFFER_SECS);
        now >= stale_at
    }

    async fn refresh_token(&self, config: &Config) -> Result<Token, String> {
        let client = Client::new();
        let res = client
            .post(&config.token_url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", config.client_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let json: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;

        Ok(Token {
            access_token: json["access_token"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            // Spotify may omit the rotated refresh token; keep the old one then.
            refresh_token: json["refresh_token"]
                .as_str()
                .unwrap_or(&self.token.refresh_token)
                .to_string(),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

async fn request_client_credentials_token(config: &Config) -> Result<Token, String> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let json: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;
    let access_token = json["access_token"].as_str().unwrap_or_default();
    if access_token.is_empty() {
        return Err(format!("Token endpoint returned no access token: {json}"));
    }

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: String::new(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
