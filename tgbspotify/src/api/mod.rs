//! Couche d'accès à l'API REST Spotify
//!
//! Ce module fournit une interface bas-niveau pour communiquer avec les
//! serveurs `accounts` (OAuth) et `api` (Web API) de Spotify.

pub mod auth;
pub mod player;
pub mod user;

use crate::error::{Result, SpotifyError};
use reqwest::{Client, Proxy, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// URL du serveur d'autorisation Spotify
pub const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// URL de base de la Web API Spotify
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// URL de redirection enregistrée dans l'application Spotify
pub const REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";

/// Options de construction de [`SpotifyApi`]
#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub redirect_uri: String,
    pub accounts_url: String,
    pub api_url: String,
    /// Proxy HTTP(S) pour toutes les requêtes
    pub proxy: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            redirect_uri: REDIRECT_URI.to_string(),
            accounts_url: ACCOUNTS_BASE_URL.to_string(),
            api_url: API_BASE_URL.to_string(),
            proxy: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client API bas-niveau pour communiquer avec Spotify
pub struct SpotifyApi {
    /// Client HTTP
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    accounts_url: String,
    api_url: String,
}

impl SpotifyApi {
    /// Crée une nouvelle instance de l'API avec les endpoints officiels
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::with_options(client_id, client_secret, ApiOptions::default())
    }

    /// Crée une nouvelle instance avec des options personnalisées
    pub fn with_options(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        options: ApiOptions,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(options.timeout);
        if let Some(proxy) = options.proxy.as_deref() {
            debug!("Using HTTP proxy {}", proxy);
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: options.redirect_uri,
            accounts_url: options.accounts_url.trim_end_matches('/').to_string(),
            api_url: options.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Retourne le client ID
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Retourne l'URL de redirection OAuth
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Effectue une requête GET authentifiée à la Web API
    ///
    /// Retourne `None` quand Spotify répond `204 No Content`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        access_token: &str,
        endpoint: &str,
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.api_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Effectue un POST de formulaire sur l'endpoint token du serveur d'autorisation
    pub(crate) async fn post_token_form<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/api/token", self.accounts_url);
        debug!("POST {} ({})", url, params.first().map(|p| p.1).unwrap_or(""));

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Traite la réponse HTTP
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status.as_u16(), error_text);
            return Err(SpotifyError::from_status_code(status.as_u16(), error_text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            SpotifyError::JsonParse(e)
        })
    }
}
