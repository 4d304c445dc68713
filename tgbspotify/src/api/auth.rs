//! Module d'autorisation OAuth (authorization code) pour Spotify

use super::SpotifyApi;
use crate::error::Result;
use crate::models::{Token, TokenResponse};
use tracing::info;
use url::Url;

/// Scopes nécessaires pour lire la lecture en cours
pub const SCOPES: &[&str] = &["user-read-currently-playing", "user-read-playback-state"];

impl SpotifyApi {
    /// Construit l'URL d'autorisation à ouvrir dans le navigateur
    ///
    /// # Arguments
    ///
    /// * `state` - Jeton anti-falsification renvoyé tel quel dans le callback
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{}/authorize", self.accounts_url))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Échange un code d'autorisation contre un token
    ///
    /// # Errors
    ///
    /// * `SpotifyError::Unauthorized` - Code refusé par Spotify
    /// * `SpotifyError::ApiError` - Autre réponse en erreur (ex: `invalid_grant` en 400)
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        info!("Exchanging Spotify authorization code for a token");
        let response: TokenResponse = self
            .post_token_form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
            ])
            .await?;
        Ok(response.into_token(None))
    }

    /// Rafraîchit un token expiré à l'aide de son refresh token
    pub async fn refresh_token(&self, token: &Token) -> Result<Token> {
        info!("Refreshing Spotify access token");
        let response: TokenResponse = self
            .post_token_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &token.refresh_token),
            ])
            .await?;
        Ok(response.into_token(Some(&token.refresh_token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url() {
        let api = SpotifyApi::new("my-client", "secret").unwrap();
        let url = Url::parse(&api.authorize_url("xyz").unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("client_id").as_deref(), Some("my-client"));
        assert_eq!(get("response_type").as_deref(), Some("code"));
        assert_eq!(get("state").as_deref(), Some("xyz"));
        assert_eq!(
            get("scope").as_deref(),
            Some("user-read-currently-playing user-read-playback-state")
        );
        assert_eq!(
            get("redirect_uri").as_deref(),
            Some("http://127.0.0.1:8080/callback")
        );
    }
}
