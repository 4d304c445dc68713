//! Client principal pour interagir avec l'API Spotify
//!
//! Ce module fournit un client haut-niveau : autorisation (token en cache ou
//! flux complet avec callback local) et lecture de la piste en cours.

use crate::api::{ApiOptions, SpotifyApi};
use crate::callback::{CallbackOptions, PendingAuthorization, start_authorization};
use crate::error::{Result, SpotifyError};
use crate::models::{CurrentTrack, Token};
use crate::token_store::{TOKEN_FILE_NAME, TokenStore};
use std::sync::Arc;
use tgbconfig::{BridgeConfig, ConfigStore};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Client Spotify haut-niveau
pub struct SpotifyClient {
    /// API bas-niveau
    api: Arc<SpotifyApi>,
    store: TokenStore,
    callback: CallbackOptions,
    /// Token courant ; écrit à l'autorisation et au rafraîchissement
    token: Mutex<Option<Token>>,
}

impl SpotifyClient {
    /// Crée un client en chargeant le token en cache s'il existe
    pub fn new(api: SpotifyApi, store: TokenStore) -> Self {
        let token = store.load();
        Self {
            api: Arc::new(api),
            store,
            callback: CallbackOptions::default(),
            token: Mutex::new(token),
        }
    }

    /// Crée un client depuis la configuration du bridge
    ///
    /// Le token est stocké dans le répertoire de configuration.
    pub fn from_config(config: &BridgeConfig, store: &ConfigStore) -> Result<Self> {
        let api = SpotifyApi::with_options(
            &config.spotify_client_id,
            &config.spotify_client_secret,
            ApiOptions {
                proxy: config.http_proxy.clone(),
                ..ApiOptions::default()
            },
        )?;
        Ok(Self::new(api, TokenStore::new(store.file_path(TOKEN_FILE_NAME))))
    }

    /// Remplace les paramètres de l'écouteur de callback
    pub fn with_callback_options(mut self, options: CallbackOptions) -> Self {
        self.callback = options;
        self
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Autorise le client
    ///
    /// Un token en cache encore valide est réutilisé tel quel, sans démarrer
    /// l'écouteur. Sinon le flux complet est lancé et attend le navigateur.
    pub async fn authenticate(&self) -> Result<()> {
        {
            let token = self.token.lock().await;
            match token.as_ref() {
                Some(t) if t.is_valid() => {
                    info!("Using cached Spotify token");
                    return Ok(());
                }
                Some(_) => info!("Cached Spotify token expired, authorization required"),
                None => info!("No cached Spotify token, authorization required"),
            }
        }

        let pending = self.begin_authorization().await?;
        info!(
            "🔑 Open this URL to authorize Spotify access: {}",
            pending.authorize_url()
        );
        self.finish_authorization(pending).await
    }

    /// Démarre le flux d'autorisation complet (écouteur + URL)
    pub async fn begin_authorization(&self) -> Result<PendingAuthorization> {
        start_authorization(self.api.clone(), self.store.clone(), &self.callback).await
    }

    /// Attend la fin d'un flux démarré par [`SpotifyClient::begin_authorization`]
    pub async fn finish_authorization(&self, pending: PendingAuthorization) -> Result<()> {
        let token = pending.wait().await?;
        *self.token.lock().await = Some(token);
        info!("Spotify authorization completed");
        Ok(())
    }

    /// Récupère la piste en cours de lecture
    ///
    /// Chaque appel interroge Spotify ; `None` signifie que rien n'est en lecture.
    pub async fn get_current_track(&self) -> Result<Option<CurrentTrack>> {
        let access_token = self.access_token().await?;
        self.api.currently_playing(&access_token).await
    }

    /// Retourne un access token utilisable, en le rafraîchissant si besoin
    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        let token = guard.as_ref().ok_or(SpotifyError::NotAuthenticated)?;

        if token.is_valid() {
            return Ok(token.access_token.clone());
        }
        if !token.can_refresh() {
            return Err(SpotifyError::Unauthorized(
                "access token expired and no refresh token available".to_string(),
            ));
        }

        let refreshed = self.api.refresh_token(token).await?;
        if let Err(e) = self.store.save(&refreshed) {
            warn!("Failed to save refreshed Spotify token: {}", e);
        }
        let access_token = refreshed.access_token.clone();
        *guard = Some(refreshed);
        Ok(access_token)
    }
}
