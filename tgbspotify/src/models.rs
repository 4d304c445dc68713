//! Structures de données pour représenter les objets Spotify

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Marge appliquée avant l'expiration réelle d'un token
const EXPIRY_DELTA_SECS: i64 = 10;

/// Token OAuth Spotify, tel que persisté sur disque
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Un token est valide s'il a un access token et n'expire pas dans les 10 secondes
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.expiry - Duration::seconds(EXPIRY_DELTA_SECS) > now
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// Réponse de l'endpoint /api/token
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Convertit la réponse en token, en gardant l'ancien refresh token
    /// si Spotify n'en a pas renvoyé de nouveau
    pub(crate) fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            expiry: Utc::now() + Duration::seconds(self.expires_in),
        }
    }
}

/// Artiste tel que renvoyé dans un objet track
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Artist {
    pub name: String,
}

/// Élément en cours de lecture (track, ou épisode de podcast sans artistes)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayingItem {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// Réponse de /me/player/currently-playing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

/// Utilisateur authentifié (/me)
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Instantané de ce qui est en cours de lecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTrack {
    pub is_playing: bool,
    pub name: String,
    /// Premier artiste de la piste
    pub artist: Option<String>,
}

impl CurrentTrack {
    pub(crate) fn from_response(response: CurrentlyPlaying) -> Option<Self> {
        let item = response.item?;
        Some(Self {
            is_playing: response.is_playing,
            artist: item.artists.into_iter().next().map(|a| a.name),
            name: item.name,
        })
    }
}
