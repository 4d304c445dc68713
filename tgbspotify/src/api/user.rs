//! API utilisateur

use super::SpotifyApi;
use crate::error::{Result, SpotifyError};
use crate::models::User;

impl SpotifyApi {
    /// Récupère l'utilisateur authentifié (`/me`)
    pub async fn current_user(&self, access_token: &str) -> Result<User> {
        self.get(access_token, "/me")
            .await?
            .ok_or_else(|| SpotifyError::Other("empty response from /me".to_string()))
    }
}
