//! Écouteur HTTP local pour le callback OAuth
//!
//! Déroulement :
//! 1. [`start_authorization`] démarre un serveur sur le port de redirection
//! 2. l'opérateur ouvre [`PendingAuthorization::authorize_url`]
//! 3. Spotify redirige le navigateur vers `/callback?code=...&state=...`
//! 4. le handler échange le code, vérifie l'identité, persiste le token
//! 5. [`PendingAuthorization::wait`] reçoit le résultat puis arrête le serveur
//!
//! Le serveur n'est arrêté qu'après la fin du handler : l'arrêt gracieux laisse
//! la page de confirmation partir vers le navigateur.

use crate::api::SpotifyApi;
use crate::error::{Result, SpotifyError};
use crate::models::Token;
use crate::token_store::TokenStore;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tgbserver::Server;
use tokio::sync::{Mutex, oneshot};
use tracing::{info, warn};

/// Jeton anti-falsification envoyé dans l'URL d'autorisation
pub const OAUTH_STATE: &str = "tgbio-spotify-state";

/// Route du callback, identique au chemin de [`crate::api::REDIRECT_URI`]
pub const CALLBACK_PATH: &str = "/callback";

const SUCCESS_PAGE: &str = r#"<html>
  <head>
    <meta charset="utf-8">
    <title>Spotify Auth</title>
    <style>
      body { font-family: Arial, sans-serif; text-align: center; margin-top: 50px; }
      h1 { color: #1DB954; }
    </style>
  </head>
  <body>
    <h1>Authorization successful!</h1>
    <p>You can close this window.</p>
  </body>
</html>"#;

/// Paramètres de l'écouteur de callback
#[derive(Debug, Clone)]
pub struct CallbackOptions {
    /// Adresse d'écoute ; le port doit correspondre à l'URL de redirection
    pub bind: SocketAddr,
    /// Attente maximale du retour du navigateur
    pub timeout: Duration,
}

impl Default for CallbackOptions {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Paramètres de requête reçus sur `/callback`
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

type ResultSender = Arc<Mutex<Option<oneshot::Sender<Result<Token>>>>>;

#[derive(Clone)]
struct CallbackState {
    api: Arc<SpotifyApi>,
    store: TokenStore,
    sender: ResultSender,
}

/// Autorisation en attente du callback
pub struct PendingAuthorization {
    server: Server,
    receiver: oneshot::Receiver<Result<Token>>,
    local_addr: SocketAddr,
    authorize_url: String,
    timeout: Duration,
}

/// Démarre l'écouteur et prépare l'URL d'autorisation
pub async fn start_authorization(
    api: Arc<SpotifyApi>,
    store: TokenStore,
    options: &CallbackOptions,
) -> Result<PendingAuthorization> {
    let authorize_url = api.authorize_url(OAUTH_STATE)?;
    let (tx, rx) = oneshot::channel();

    let state = CallbackState {
        api,
        store,
        sender: Arc::new(Mutex::new(Some(tx))),
    };

    let mut server = Server::new("spotify-callback", options.bind);
    server.add_handler_with_state(CALLBACK_PATH, handle_callback, state);
    let local_addr = server.start().await?;

    Ok(PendingAuthorization {
        server,
        receiver: rx,
        local_addr,
        authorize_url,
        timeout: options.timeout,
    })
}

impl PendingAuthorization {
    /// Adresse réellement écoutée
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL à ouvrir par l'opérateur
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    /// Attend le résultat du callback, puis arrête l'écouteur
    pub async fn wait(mut self) -> Result<Token> {
        let outcome = tokio::time::timeout(self.timeout, &mut self.receiver).await;
        self.server.stop().await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SpotifyError::Other(
                "callback handler dropped without a result".to_string(),
            )),
            Err(_) => {
                warn!("No Spotify callback received within {:?}", self.timeout);
                Err(SpotifyError::AuthorizationTimeout(self.timeout))
            }
        }
    }
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    info!("Received Spotify callback");

    // Seul le premier callback compte, même s'il est encore en cours
    let Some(tx) = state.sender.lock().await.take() else {
        return (StatusCode::GONE, "Authorization already in progress or completed")
            .into_response();
    };

    let outcome = complete_authorization(&state, params).await;
    let response = match &outcome {
        Ok(_) => Html(SUCCESS_PAGE).into_response(),
        Err(e) => {
            warn!("Spotify authorization failed: {}", e);
            (e.callback_status(), format!("Authorization failed: {}", e)).into_response()
        }
    };

    let _ = tx.send(outcome);
    response
}

async fn complete_authorization(state: &CallbackState, params: CallbackParams) -> Result<Token> {
    let code = match params.code.filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => {
            return Err(match params.error {
                Some(error) => SpotifyError::AuthorizationDenied(error),
                None => SpotifyError::MissingCode,
            });
        }
    };

    if params.state.as_deref() != Some(OAUTH_STATE) {
        return Err(SpotifyError::StateMismatch);
    }

    let token = state.api.exchange_code(&code).await?;
    let user = state.api.current_user(&token.access_token).await?;
    info!("✅ Spotify authorization granted for user {}", user.id);

    if let Err(e) = state.store.save(&token) {
        warn!("Failed to save Spotify token: {}", e);
    }
    Ok(token)
}
