//! Gestion des erreurs pour le client Spotify

use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Type Result personnalisé pour tgbspotify
pub type Result<T> = std::result::Result<T, SpotifyError>;

/// Erreurs possibles lors de l'utilisation du client Spotify
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Erreur d'authentification (token invalide, révoqué ou expiré)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Ressource non trouvée
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur d'entrée/sortie (fichier de token)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL invalide (proxy, redirect, endpoints)
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Erreur de l'écouteur HTTP local
    #[error("Callback listener error: {0}")]
    Server(#[from] tgbserver::ServerError),

    /// Erreur de l'API Spotify
    #[error("Spotify API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Le callback ne contient pas de code d'autorisation
    #[error("Authorization code missing from callback")]
    MissingCode,

    /// L'utilisateur ou Spotify a refusé l'autorisation
    #[error("Authorization denied by Spotify: {0}")]
    AuthorizationDenied(String),

    /// Le paramètre `state` ne correspond pas à celui envoyé
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// Aucun callback reçu dans le délai imparti
    #[error("No authorization callback received within {0:?}")]
    AuthorizationTimeout(Duration),

    /// Le client n'a pas encore de token
    #[error("Spotify client is not authenticated")]
    NotAuthenticated,

    /// Erreur générique
    #[error("Spotify error: {0}")]
    Other(String),
}

impl SpotifyError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimitExceeded,
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur est une erreur de credentials (401/403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, SpotifyError::Unauthorized(_))
    }

    /// Vérifie si l'erreur est une erreur de rate limiting
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SpotifyError::RateLimitExceeded)
    }

    /// Statut HTTP renvoyé au navigateur quand le callback échoue
    pub(crate) fn callback_status(&self) -> StatusCode {
        match self {
            SpotifyError::MissingCode => StatusCode::BAD_REQUEST,
            SpotifyError::AuthorizationDenied(_)
            | SpotifyError::StateMismatch
            | SpotifyError::Unauthorized(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
